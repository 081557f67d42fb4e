use std::time::Duration;

use dlnaprobe::verdict::{ProbeError, Verdict};
use dlnaprobe::workdir::{Staging, WorkDir};
use dlnaprobe::xml::diff::diff;

#[test]
fn passed_renders_verdict_line() {
    assert_eq!(Verdict::Passed.to_string(), "\nTEST PASSED\n");
}

#[test]
fn failed_renders_verdict_line_only() {
    let verdict = Verdict::from(Err(ProbeError::Timeout {
        after: Duration::from_secs(2),
        waiting_for: "a reply",
    }));
    assert_eq!(verdict.to_string(), "\nTEST FAILED\n");
    assert!(!verdict.passed());
}

#[test]
fn ok_result_is_passed() {
    let verdict = Verdict::from(Ok(()));
    assert!(verdict.passed());
    assert!(verdict.failure().is_none());
}

#[test]
fn timeout_reason_names_the_wait() {
    let err = ProbeError::Timeout {
        after: Duration::from_secs(10),
        waiting_for: "both ssdp:byebye and ssdp:alive NOTIFYs",
    };
    assert_eq!(
        err.to_string(),
        "timed out after 10s waiting for both ssdp:byebye and ssdp:alive NOTIFYs"
    );
}

#[test]
fn mismatch_reason_lists_every_difference() {
    let diffs = diff("<a><b>1</b><c/></a>", "<a><b>2</b></a>").unwrap();
    let rendered = ProbeError::Mismatch(diffs).to_string();
    assert!(rendered.starts_with("2 difference(s) against reference:"), "got: {rendered}");
    assert!(rendered.contains("/a/b: "), "got: {rendered}");
    assert!(rendered.contains("/a/c: missing child <c>"), "got: {rendered}");
}

// ── WorkDir ───────────────────────────────────────────────────────────────────

#[test]
fn work_dir_removed_on_drop() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("dut_xml");
    {
        let work_dir = WorkDir::create(&path).unwrap();
        let staged = work_dir.stage("rootDesc.xml", b"<root/>").unwrap();
        assert_eq!(std::fs::read(&staged).unwrap(), b"<root/>");
        assert_eq!(staged.parent(), Some(work_dir.path()));
    }
    assert!(!path.exists());
}

#[test]
fn work_dir_refuses_names_outside_itself() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("dut_xml");
    let work_dir = WorkDir::create(&path).unwrap();
    for name in ["../escaped.xml", "sub/escaped.xml", "/tmp/escaped.xml", "..", ""] {
        let result = work_dir.stage(name, b"<root/>");
        assert!(
            matches!(&result, Err(ProbeError::InvalidFileName(n)) if n == name),
            "{name:?} gave {result:?}"
        );
    }
    assert!(!root.path().join("escaped.xml").exists());
    assert_eq!(std::fs::read_dir(&path).unwrap().count(), 0);
}

#[test]
fn work_dir_refuses_existing_directory() {
    let root = tempfile::tempdir().unwrap();
    let result = WorkDir::create(root.path());
    assert!(matches!(result, Err(ProbeError::WorkDirExists(_))));
    assert!(root.path().exists());
}

#[test]
fn staging_reference_path_joins_reference_dir() {
    let staging = Staging {
        reference_dir: "ref_xml".into(),
        work_dir: "dut_xml".into(),
    };
    assert_eq!(
        staging.reference("rootDesc.xml"),
        std::path::PathBuf::from("ref_xml/rootDesc.xml")
    );
}
