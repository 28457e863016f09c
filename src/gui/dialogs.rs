//! Native dialogs backing [`Prompter`] in the desktop front end

use std::path::{Path, PathBuf};

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::prompt::Prompter;

/// Blocking rfd dialogs, called from stage worker threads
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdPrompter;

impl RfdPrompter {
    fn message(level: MessageLevel, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

impl Prompter for RfdPrompter {
    fn choose_directory(&self, title: &str, start: &Path) -> Option<PathBuf> {
        FileDialog::new()
            .set_title(title)
            .set_directory(start)
            .pick_folder()
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show();
        matches!(answer, MessageDialogResult::Yes)
    }

    fn error(&self, title: &str, message: &str) {
        Self::message(MessageLevel::Error, title, message);
    }

    fn warning(&self, title: &str, message: &str) {
        Self::message(MessageLevel::Warning, title, message);
    }
}
