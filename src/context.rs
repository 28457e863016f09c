//! Shared state handed to every stage

use std::sync::Arc;

use crate::config::InstallerConfig;
use crate::error::InstallerError;
use crate::progress::ProgressReporter;
use crate::prompt::{self, Prompter};
use crate::workspace::Workspace;

/// Configuration, layout, user interaction and progress sink for a session
#[derive(Clone)]
pub struct InstallContext {
    pub config: Arc<InstallerConfig>,
    pub workspace: Workspace,
    pub prompter: Arc<dyn Prompter>,
    pub progress: ProgressReporter,
    client: reqwest::Client,
}

impl InstallContext {
    pub fn new(
        config: InstallerConfig,
        workspace: Workspace,
        prompter: Arc<dyn Prompter>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config: Arc::new(config),
            workspace,
            prompter,
            progress: ProgressReporter::disabled(),
            client,
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Surface a stage failure through the prompter
    pub fn report(&self, err: &InstallerError) {
        prompt::report_failure(self.prompter.as_ref(), err);
    }
}
