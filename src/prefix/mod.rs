//! Prefix Builder
//!
//! Builds an isolated Wine prefix in a user-chosen directory: the runtime
//! archive is unpacked under `<root>/runner/`, the environment overlay is
//! derived from it, and the dependency helper populates the prefix.

mod overlay;
pub mod wineserver;

use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio::process::Command;

use crate::context::InstallContext;
use crate::download::extract_archive;
use crate::error::InstallerError;
use crate::process;
use crate::prompt::Prompter;

pub use overlay::{BIN_DIR_VAR, DLL_OVERRIDES_VAR, PREFIX_VAR, WineEnvironment};

pub const RUNNER_DIR: &str = "runner";

/// Ask for the prefix root until the user picks a usable directory
///
/// Declining to overwrite an existing directory asks again; dismissing the
/// chooser warns once and yields [`InstallerError::Cancelled`].
pub fn choose_prefix_root(
    prompter: &dyn Prompter,
    title: &str,
    start: &Path,
) -> Result<PathBuf, InstallerError> {
    loop {
        let Some(root) = prompter.choose_directory(title, start) else {
            prompter.warning("Warning", "No installation directory selected.");
            return Err(InstallerError::Cancelled);
        };

        if root.exists()
            && !prompter.confirm(
                "Overwrite Existing Prefix",
                &format!(
                    "Wine prefix already exists at: {}.\nDo you want to overwrite it?",
                    root.display()
                ),
            )
        {
            continue;
        }

        return Ok(root);
    }
}

/// Directory the chooser opens in
pub fn default_start_dir(ctx: &InstallContext) -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| ctx.workspace.root().to_path_buf())
}

/// Create `<root>/runner`, unpack the runtime into it and derive the overlay
pub async fn prepare_prefix(
    ctx: &InstallContext,
    root: &Path,
) -> Result<WineEnvironment, InstallerError> {
    let runner = root.join(RUNNER_DIR);
    tokio::fs::create_dir_all(&runner)
        .await
        .map_err(|e| InstallerError::io("create", &runner, e))?;

    ctx.progress.update(10.0, "Extracting Wine files...");
    let archive = ctx.workspace.runtime_archive(&ctx.config);
    // Extraction fills the 10..50 band of this step
    let extraction = ctx.progress.scaled(10.0, 50.0);
    if let Err(e) = extract_archive(&archive, &runner, &extraction).await {
        ctx.progress.update(100.0, "Extraction failed.");
        return Err(e);
    }

    ctx.progress.update(50.0, "Setting environment variables...");
    let env = WineEnvironment::for_prefix(root, &ctx.config.runtime);
    for (name, value) in env.vars() {
        info!("{name}={}", value.to_string_lossy());
    }
    Ok(env)
}

/// Run the dependency helper inside the prefix, then stop its wineserver
pub async fn populate_prefix(
    ctx: &InstallContext,
    env: &WineEnvironment,
) -> Result<(), InstallerError> {
    ctx.progress.update(75.0, "Installing necessary components...");

    let result = run_helper(ctx, env).await;

    if let Err(e) = wineserver::shutdown(env).await {
        warn!("wineserver shutdown after prefix setup failed: {e}");
    }

    match &result {
        Ok(()) => {
            let root = env.prefix().map(Path::display);
            match root {
                Some(root) => ctx
                    .progress
                    .update(100.0, format!("Wine prefix created successfully at {root}")),
                None => ctx.progress.update(100.0, "Wine prefix created successfully"),
            }
        }
        Err(InstallerError::MissingDependency { .. }) => {}
        Err(_) => ctx
            .progress
            .update(0.0, "Error occurred during Wine prefix setup."),
    }
    result
}

async fn run_helper(ctx: &InstallContext, env: &WineEnvironment) -> Result<(), InstallerError> {
    let settings = &ctx.config.prefix;
    let helper = which::which(&settings.dependency_helper).map_err(|_| {
        InstallerError::MissingDependency {
            tool: settings.dependency_helper.clone(),
        }
    })?;

    let mut cmd = Command::new(&helper);
    cmd.args(&settings.helper_args).args(&settings.components);
    env.apply(&mut cmd);
    env.apply_tool_paths(&mut cmd);

    let output = process::output(&mut cmd, &settings.dependency_helper).await?;
    process::check(&output, &settings.dependency_helper)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use super::*;
    use crate::config::InstallerConfig;
    use crate::prompt::testing::{ScriptedPrompter, Shown};
    use crate::workspace::Workspace;

    fn context(workdir: &Path, config: InstallerConfig, prompter: Arc<ScriptedPrompter>) -> InstallContext {
        InstallContext::new(
            config,
            Workspace::new(workdir),
            prompter,
            reqwest::Client::new(),
        )
    }

    #[test]
    fn declined_overwrite_prompts_again() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("existing");
        fs::create_dir(&existing).unwrap();
        let fresh = dir.path().join("fresh");

        let prompter = ScriptedPrompter::new(vec![Some(existing), Some(fresh.clone())], vec![false]);
        let root = choose_prefix_root(&prompter, "title", dir.path()).unwrap();

        assert_eq!(root, fresh);
        assert_eq!(prompter.directory_requests(), 2);
        assert!(prompter.shown().is_empty());
    }

    #[test]
    fn accepted_overwrite_keeps_directory() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = ScriptedPrompter::new(vec![Some(dir.path().to_path_buf())], vec![true]);

        let root = choose_prefix_root(&prompter, "title", dir.path()).unwrap();
        assert_eq!(root, dir.path());
        assert_eq!(prompter.directory_requests(), 1);
    }

    #[test]
    fn dismissed_chooser_warns_and_cancels() {
        let prompter = ScriptedPrompter::new(vec![None], vec![]);

        let err = choose_prefix_root(&prompter, "title", Path::new("/")).unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(
            prompter.shown(),
            vec![Shown::Warning(
                "Warning".into(),
                "No installation directory selected.".into()
            )]
        );
    }

    #[tokio::test]
    async fn bad_archive_stops_before_overlay() {
        let work = tempfile::tempdir().unwrap();
        let prefix = tempfile::tempdir().unwrap();
        let config = InstallerConfig::default();
        let ctx = context(work.path(), config.clone(), Arc::new(ScriptedPrompter::default()));

        let archive = ctx.workspace.runtime_archive(&config);
        fs::create_dir_all(archive.parent().unwrap()).unwrap();
        fs::write(&archive, b"<html>not found</html>").unwrap();

        let err = prepare_prefix(&ctx, prefix.path()).await.unwrap_err();
        assert!(matches!(err, InstallerError::UnrecognizedArchive { .. }));
        assert!(prefix.path().join(RUNNER_DIR).is_dir());
        assert_eq!(fs::read_dir(prefix.path().join(RUNNER_DIR)).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn preparation_progress_never_moves_backwards() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use tokio::sync::mpsc;

        use crate::progress::{ProgressReporter, StageEvent};

        let work = tempfile::tempdir().unwrap();
        let prefix = tempfile::tempdir().unwrap();
        let mut config = InstallerConfig::default();
        config.runtime.directory = "wine-test".into();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = context(work.path(), config.clone(), Arc::new(ScriptedPrompter::default()))
            .with_progress(ProgressReporter::new(tx));

        let archive = ctx.workspace.runtime_archive(&config);
        fs::create_dir_all(archive.parent().unwrap()).unwrap();
        let encoder = GzEncoder::new(fs::File::create(&archive).unwrap(), Compression::fast());
        let mut builder = tar::Builder::new(encoder);
        let body = b"#!/bin/sh\nexit 0\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, "wine-test/bin/wine", &body[..])
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        prepare_prefix(&ctx, prefix.path()).await.unwrap();

        let mut fractions = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let StageEvent::Fraction(Some(percent)) = event {
                fractions.push(percent);
            }
        }
        assert_eq!(fractions.first(), Some(&10.0));
        assert_eq!(fractions.last(), Some(&50.0));
        assert!(
            fractions.windows(2).all(|pair| pair[0] <= pair[1]),
            "{fractions:?}"
        );
    }

    #[tokio::test]
    async fn missing_helper_is_reported_by_name() {
        let work = tempfile::tempdir().unwrap();
        let prefix = tempfile::tempdir().unwrap();
        let mut config = InstallerConfig::default();
        config.prefix.dependency_helper = "dcs-linux-installer-no-such-helper".into();
        let ctx = context(work.path(), config.clone(), Arc::new(ScriptedPrompter::default()));

        let env = WineEnvironment::for_prefix(prefix.path(), &config.runtime);
        let err = populate_prefix(&ctx, &env).await.unwrap_err();

        match err {
            InstallerError::MissingDependency { tool } => {
                assert_eq!(tool, "dcs-linux-installer-no-such-helper")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
