use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::xml::diff::{DiffError, Difference};

/// Why a probe did not pass. Every variant ends up as `TEST FAILED`.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("timed out after {}s waiting for {waiting_for}", .after.as_secs_f32())]
    Timeout {
        after: Duration,
        waiting_for: &'static str,
    },
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}\n{body}")]
    Status { status: u16, body: String },
    #[error("DUT answered HTTP {status} without a UPnPError fault\n{body}")]
    MissingUpnpError { status: u16, body: String },
    #[error("no description URL found in SSDP response:\n{0}")]
    NoDescriptionUrl(String),
    #[error("work directory {} already exists", .0.display())]
    WorkDirExists(PathBuf),
    #[error("{0:?} is not a plain file name")]
    InvalidFileName(String),
    #[error(transparent)]
    Xml(#[from] DiffError),
    #[error("{} difference(s) against reference:\n{}", .0.len(), render_differences(.0))]
    Mismatch(Vec<Difference>),
}

fn render_differences(diffs: &[Difference]) -> String {
    diffs
        .iter()
        .map(|d| format!("  {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The outcome of one probe run.
#[derive(Debug)]
pub enum Verdict {
    Passed,
    Failed(ProbeError),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn failure(&self) -> Option<&ProbeError> {
        match self {
            Verdict::Passed => None,
            Verdict::Failed(e) => Some(e),
        }
    }
}

impl From<Result<(), ProbeError>> for Verdict {
    fn from(result: Result<(), ProbeError>) -> Self {
        match result {
            Ok(()) => Verdict::Passed,
            Err(e) => Verdict::Failed(e),
        }
    }
}

/// Renders only the verdict line; the failure reason is printed separately.
impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed => f.write_str("\nTEST PASSED\n"),
            Verdict::Failed(_) => f.write_str("\nTEST FAILED\n"),
        }
    }
}
