//! User interaction seam
//!
//! Stage code asks the user for a directory, for confirmation, or shows a
//! blocking error/warning through this trait. The desktop front end backs
//! it with native dialogs, the terminal front end with line prompts.

use std::path::{Path, PathBuf};

use log::{error, warn};

use crate::error::InstallerError;

pub trait Prompter: Send + Sync {
    /// Ask for a directory; `None` when the user cancels
    fn choose_directory(&self, title: &str, start: &Path) -> Option<PathBuf>;

    /// Yes/no question; `false` on "no" or dismissal
    fn confirm(&self, title: &str, message: &str) -> bool;

    /// Blocking error dialog
    fn error(&self, title: &str, message: &str);

    /// Blocking warning dialog
    fn warning(&self, title: &str, message: &str);
}

/// Show `err` to the user unless it is a cancellation (already warned)
pub fn report_failure(prompter: &dyn Prompter, err: &InstallerError) {
    if err.is_cancellation() {
        warn!("{err}");
        return;
    }
    error!("{err}");
    prompter.error(err.dialog_title(), &err.dialog_message());
}
