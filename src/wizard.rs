//! Three-stage wizard gating
//!
//! Stage N unlocks when stage N-1's worker has returned, whether it
//! succeeded or not. A stage is single-use: its control stays disabled
//! once started. Exit is unavailable while any stage runs.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    FetchFiles,
    BuildPrefix,
    RunInstaller,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::FetchFiles, Stage::BuildPrefix, Stage::RunInstaller];

    pub fn index(self) -> usize {
        match self {
            Stage::FetchFiles => 0,
            Stage::BuildPrefix => 1,
            Stage::RunInstaller => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::FetchFiles => "1. Download Necessary Files",
            Stage::BuildPrefix => "2. Create Wine Prefix",
            Stage::RunInstaller => "3. Install DCS",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Stage::FetchFiles => "Download required files for DCS.",
            Stage::BuildPrefix => "Set up a Wine prefix for DCS.",
            Stage::RunInstaller => "Install the DCS game.",
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::FetchFiles => Some(Stage::BuildPrefix),
            Stage::BuildPrefix => Some(Stage::RunInstaller),
            Stage::RunInstaller => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    enabled: [bool; 3],
    running: Option<Stage>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            enabled: [true, false, false],
            running: None,
        }
    }
}

impl WizardState {
    /// Mark `stage` as running. Refused if it is locked or another stage runs.
    pub fn begin(&mut self, stage: Stage) -> bool {
        if self.running.is_some() || !self.is_enabled(stage) {
            return false;
        }
        self.enabled[stage.index()] = false;
        self.running = Some(stage);
        true
    }

    /// Worker for `stage` returned; unlock the next stage unconditionally
    pub fn complete(&mut self, stage: Stage) {
        if self.running == Some(stage) {
            self.running = None;
        }
        if let Some(next) = stage.next() {
            self.enabled[next.index()] = true;
        }
    }

    pub fn is_enabled(&self, stage: Stage) -> bool {
        self.running.is_none() && self.enabled[stage.index()]
    }

    pub fn running(&self) -> Option<Stage> {
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn exit_enabled(&self) -> bool {
        self.running.is_none()
    }

    /// Every stage has been used
    pub fn is_done(&self) -> bool {
        self.running.is_none() && self.enabled.iter().all(|e| !e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_stage_starts_unlocked() {
        let wizard = WizardState::default();
        assert!(wizard.is_enabled(Stage::FetchFiles));
        assert!(!wizard.is_enabled(Stage::BuildPrefix));
        assert!(!wizard.is_enabled(Stage::RunInstaller));
        assert!(wizard.exit_enabled());
    }

    #[test]
    fn running_stage_locks_everything_including_exit() {
        let mut wizard = WizardState::default();
        assert!(wizard.begin(Stage::FetchFiles));

        assert!(wizard.is_running());
        assert!(!wizard.exit_enabled());
        assert!(Stage::ALL.iter().all(|s| !wizard.is_enabled(*s)));
        assert!(!wizard.begin(Stage::BuildPrefix));
    }

    #[test]
    fn completion_unlocks_next_and_retires_current() {
        let mut wizard = WizardState::default();
        for stage in Stage::ALL {
            assert!(wizard.begin(stage));
            wizard.complete(stage);
            assert!(!wizard.is_enabled(stage));
            if let Some(next) = stage.next() {
                assert!(wizard.is_enabled(next));
            }
        }
        assert!(wizard.is_done());
        assert!(wizard.exit_enabled());
    }

    #[test]
    fn stage_labels() {
        let labels: Vec<_> = Stage::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            ["1. Download Necessary Files", "2. Create Wine Prefix", "3. Install DCS"]
        );
    }
}
