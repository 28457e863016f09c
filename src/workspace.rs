//! Script-directory layout
//!
//! Downloads land in `<root>/tmp/` and a failed install leaves its stderr
//! in `<root>/<error_log_name>`. The root defaults to the directory of the
//! running executable.

use std::path::{Path, PathBuf};

use crate::config::InstallerConfig;
use crate::error::InstallerError;

const TMP_DIR: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `root` when given, otherwise the executable's directory
    pub fn resolve(root: Option<PathBuf>) -> Result<Self, InstallerError> {
        if let Some(root) = root {
            return Ok(Self::new(root));
        }

        let exe = std::env::current_exe()
            .map_err(|e| InstallerError::io("locate executable", "current_exe", e))?;
        let exe = exe.canonicalize().unwrap_or(exe);
        let root = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join(TMP_DIR)
    }

    pub fn runtime_archive(&self, config: &InstallerConfig) -> PathBuf {
        self.tmp_dir().join(&config.runtime.archive_name)
    }

    pub fn installer(&self, config: &InstallerConfig) -> PathBuf {
        self.tmp_dir().join(&config.application.installer_name)
    }

    pub fn error_log(&self, config: &InstallerConfig) -> PathBuf {
        self.root.join(&config.application.error_log_name)
    }
}
