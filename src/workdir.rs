use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::verdict::ProbeError;

/// Staging directory for documents downloaded from the DUT.
///
/// Created fresh for one probe and removed recursively when dropped, on both
/// the pass and the fail path.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Refuses to reuse an existing directory so nothing outside this run is removed.
    pub fn create(path: &Path) -> Result<Self, ProbeError> {
        match std::fs::create_dir(path) {
            Ok(()) => Ok(WorkDir { path: path.to_owned() }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(ProbeError::WorkDirExists(path.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `file_name` inside the directory and return its path.
    ///
    /// `file_name` must be a single path component; separators, `..` and
    /// absolute paths are refused before anything is written.
    pub fn stage(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, ProbeError> {
        if Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
            return Err(ProbeError::InvalidFileName(file_name.to_owned()));
        }
        let target = self.path.join(file_name);
        std::fs::write(&target, contents)?;
        tracing::debug!("Staged {} bytes to {}", contents.len(), target.display());
        Ok(target)
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!("Failed to remove work directory {}: {}", self.path.display(), e);
        }
    }
}

/// Where reference documents live and where DUT documents are staged.
#[derive(Debug, Clone)]
pub struct Staging {
    pub reference_dir: PathBuf,
    pub work_dir: PathBuf,
}

impl Staging {
    pub fn reference(&self, file_name: &str) -> PathBuf {
        self.reference_dir.join(file_name)
    }
}
