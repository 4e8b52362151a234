//! Per-run staging directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::RunId;
use crate::error::Result;

/// File name of the manifest inside the staging area
pub const MANIFEST_FILE_NAME: &str = "info.json";

/// Temporary working directory `{root}/{run id}` owned by one run
///
/// Purged exactly once: explicitly via [`StagingArea::purge`], or on drop if
/// the run bailed out before reaching it.
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
    dir: PathBuf,
    purged: bool,
}

impl StagingArea {
    /// Create (or reuse) the staging directory for `run_id` below `root`
    pub fn create(root: &Path, run_id: &RunId) -> Result<Self> {
        let dir = root.join(run_id.as_str());
        fs::create_dir_all(&dir)?;
        tracing::debug!("Created staging directory {}", dir.display());

        Ok(Self {
            root: root.to_path_buf(),
            dir,
            purged: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the PAK builder writes `{mod_name}.pak`
    pub fn pak_path(&self, mod_name: &str) -> PathBuf {
        self.dir.join(format!("{mod_name}.pak"))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE_NAME)
    }

    /// Remove the staging directory and everything in it
    ///
    /// Failures come back as a console warning, never as an error.
    pub fn purge(mut self) -> Option<String> {
        self.purge_once()
    }

    fn purge_once(&mut self) -> Option<String> {
        if self.purged {
            return None;
        }
        self.purged = true;

        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                tracing::debug!("Removed staging directory {}", self.dir.display());
                None
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                let message = format!(
                    "Failed to clean staging directory {}: {e}",
                    self.dir.display()
                );
                tracing::debug!("{message}");
                Some(message)
            }
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        let _ = self.purge_once();
    }
}
