use clap::Parser;

use dlnaprobe::cli::{Args, Probe};

#[test]
fn parses_probe_with_global_flags_after_subcommand() {
    let args = Args::try_parse_from(["dlnaprobe", "msearch", "--host", "10.1.1.1", "-p", "8201"]).unwrap();
    assert_eq!(args.probe, Probe::Msearch);
    assert_eq!(args.host.as_deref(), Some("10.1.1.1"));
    assert_eq!(args.port, Some(8201));
}

#[test]
fn browse_defaults_match_reference_request() {
    let args = Args::try_parse_from(["dlnaprobe", "browse"]).unwrap();
    match args.probe {
        Probe::Browse {
            object_id,
            browse_flag,
            starting_index,
            requested_count,
            reference,
        } => {
            assert_eq!(object_id, "64");
            assert_eq!(browse_flag, "BrowseDirectChildren");
            assert_eq!(starting_index, 0);
            assert_eq!(requested_count, 24);
            assert_eq!(reference, "browse_BrowseDirectChildren_VIDEO.xml");
        }
        other => panic!("expected browse, got {other:?}"),
    }
}

#[test]
fn announce_default_uuid() {
    let args = Args::try_parse_from(["dlnaprobe", "announce"]).unwrap();
    match args.probe {
        Probe::Announce { uuid } => {
            assert_eq!(uuid.to_string(), "4d696e69-444c-164e-9d41-080027237071")
        }
        other => panic!("expected announce, got {other:?}"),
    }
}

#[test]
fn announce_rejects_invalid_uuid() {
    assert!(Args::try_parse_from(["dlnaprobe", "announce", "--uuid", "not-a-uuid"]).is_err());
}

#[test]
fn probe_is_required() {
    assert!(Args::try_parse_from(["dlnaprobe"]).is_err());
}

#[test]
fn kebab_case_probe_names() {
    let args = Args::try_parse_from(["dlnaprobe", "root-desc"]).unwrap();
    assert_eq!(args.probe, Probe::RootDesc);
    let args = Args::try_parse_from(["dlnaprobe", "soap-invalid"]).unwrap();
    assert_eq!(args.probe, Probe::SoapInvalid);
}
