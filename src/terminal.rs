//! Terminal front end
//!
//! Runs the three stages in order, asking before each one. Status
//! messages scroll above an indicatif bar; prompts suspend the bar while
//! the user answers.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Confirm, Text};
use log::warn;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tokio::sync::mpsc;

use crate::config::InstallerConfig;
use crate::context::InstallContext;
use crate::progress::{ProgressReporter, StageEvent};
use crate::prompt::Prompter;
use crate::stages::run_stage;
use crate::wizard::{Stage, WizardState};
use crate::workspace::Workspace;

/// Line prompts and coloured messages, drawn around a live progress bar
pub struct TerminalPrompter {
    bar: ProgressBar,
}

impl TerminalPrompter {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }

    fn colored(&self, color: Color, title: &str, message: &str) {
        self.bar.suspend(|| {
            let mut stderr = StandardStream::stderr(ColorChoice::Auto);
            let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
            let _ = write!(stderr, "{title}: ");
            let _ = stderr.reset();
            let _ = writeln!(stderr, "{message}");
        });
    }
}

impl Prompter for TerminalPrompter {
    fn choose_directory(&self, title: &str, start: &Path) -> Option<PathBuf> {
        let start = start.display().to_string();
        let answer = self.bar.suspend(|| {
            Text::new(title)
                .with_default(&start)
                .with_help_message("Directory path, Esc to cancel")
                .prompt()
        });
        match answer {
            Ok(path) => expand_path(path.trim()),
            Err(e) => {
                warn!("Directory prompt cancelled: {e}");
                None
            }
        }
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        self.bar.suspend(|| {
            Confirm::new(message)
                .with_default(false)
                .with_help_message(title)
                .prompt()
                .unwrap_or(false)
        })
    }

    fn error(&self, title: &str, message: &str) {
        self.colored(Color::Red, title, message);
    }

    fn warning(&self, title: &str, message: &str) {
        self.colored(Color::Yellow, title, message);
    }
}

/// `~` and `~/..` expand to the home directory; empty input is a cancel
fn expand_path(input: &str) -> Option<PathBuf> {
    if input.is_empty() {
        return None;
    }
    if input == "~" {
        return dirs::home_dir();
    }
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Some(home.join(rest));
    }
    Some(PathBuf::from(input))
}

/// Run the wizard in the terminal
pub async fn run_terminal(
    config: InstallerConfig,
    workspace: Workspace,
    client: reqwest::Client,
) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    let _ = writeln!(stdout, "Welcome to GNU/Linux DCS Installer");
    let _ = stdout.reset();
    let _ = writeln!(stdout, "Working directory: {}\n", workspace.root().display());

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos:>3}%  {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("█▓░"),
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<StageEvent>();
    let prompter = Arc::new(TerminalPrompter::new(bar.clone()));
    let ctx = InstallContext::new(config, workspace, prompter, client)
        .with_progress(ProgressReporter::new(tx));

    let bar_events = bar.clone();
    let progress_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                StageEvent::Fraction(Some(percent)) => bar_events.set_position(percent as u64),
                StageEvent::Fraction(None) => bar_events.tick(),
                StageEvent::Status(message) => bar_events.println(message),
                StageEvent::Detail(detail) => bar_events.set_message(detail),
                StageEvent::PrefixReady(_) => {}
                StageEvent::Finished(_) => bar_events.set_message(""),
            }
        }
    });

    let mut wizard = WizardState::default();
    let mut environment = None;
    for stage in Stage::ALL {
        let proceed = bar.suspend(|| {
            Confirm::new(&format!("Run \"{}\"?", stage.label()))
                .with_default(true)
                .with_help_message(stage.hint())
                .prompt()
                .map_err(|e| anyhow::anyhow!("Prompt cancelled: {}", e))
        })?;
        if !proceed {
            bar.println("Stopping here.");
            break;
        }

        wizard.begin(stage);
        if let Some(env) = run_stage(&ctx, stage, environment.clone()).await {
            environment = Some(env);
        }
        wizard.complete(stage);
    }

    // Closing the channel ends the consumer
    drop(ctx);
    progress_task.await.ok();
    bar.finish_and_clear();

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(
        stdout,
        "{}",
        if wizard.is_done() {
            "All steps finished."
        } else {
            "Installer exited."
        }
    );
    let _ = stdout.reset();
    Ok(())
}
