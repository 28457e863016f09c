//! The three wizard stages and the worker thread that runs one
//!
//! Stage operations handle their own failures: every error is shown to the
//! user through the context's prompter and the stage simply returns.

use std::path::Path;
use std::thread::JoinHandle;

use log::{error, info};
use tokio::runtime::Handle;

use crate::context::InstallContext;
use crate::download::download_file;
use crate::error::InstallerError;
use crate::installer::run_installer;
use crate::prefix::{self, WineEnvironment};
use crate::progress::{ProgressReporter, StageEvent};
use crate::wizard::Stage;

/// Stage 1: download the runtime archive and the application installer
///
/// Files already present in `tmp/` are kept. A failed download is
/// reported and the next one is still attempted.
pub async fn fetch_files(ctx: &InstallContext) {
    let tmp = ctx.workspace.tmp_dir();
    if let Err(e) = tokio::fs::create_dir_all(&tmp).await {
        ctx.report(&InstallerError::io("create", &tmp, e));
        return;
    }

    let downloads = [
        (
            ctx.config.runtime.url.clone(),
            ctx.workspace.runtime_archive(&ctx.config),
        ),
        (
            ctx.config.application.installer_url(),
            ctx.workspace.installer(&ctx.config),
        ),
    ];

    for (url, dest) in downloads {
        let name = file_name(&dest);
        if dest.exists() {
            info!("{} already present, skipping download", dest.display());
            continue;
        }

        match download_file(ctx.client(), &url, &dest, &ctx.progress).await {
            Ok(_) => ctx
                .progress
                .update(0.0, format!("{name} downloaded successfully.")),
            Err(e) => ctx.report(&e),
        }
    }
}

/// Stage 2: choose a prefix root, unpack the runtime and populate the prefix
///
/// Returns the environment overlay once the runtime is unpacked, even if
/// populating the prefix failed afterwards.
pub async fn create_prefix(ctx: &InstallContext) -> Option<WineEnvironment> {
    let start = prefix::default_start_dir(ctx);
    let title = &ctx.config.prefix.prompt_title;
    let root = match prefix::choose_prefix_root(ctx.prompter.as_ref(), title, &start) {
        Ok(root) => root,
        Err(e) => {
            ctx.report(&e);
            return None;
        }
    };

    let env = match prefix::prepare_prefix(ctx, &root).await {
        Ok(env) => env,
        Err(e) => {
            ctx.report(&e);
            return None;
        }
    };
    ctx.progress.send(StageEvent::PrefixReady(env.clone()));

    if let Err(e) = prefix::populate_prefix(ctx, &env).await {
        ctx.report(&e);
    }
    Some(env)
}

/// Stage 3: run the installer in the prefix from stage 2, or system Wine
pub async fn install_application(ctx: &InstallContext, env: Option<WineEnvironment>) {
    let env = env.unwrap_or_else(|| {
        info!("No prefix prepared in this session, using system Wine");
        WineEnvironment::system()
    });

    if let Err(e) = run_installer(ctx, &env).await {
        ctx.report(&e);
    }
}

/// Run one stage to completion. Yields the overlay when stage 2 built one.
pub async fn run_stage(
    ctx: &InstallContext,
    stage: Stage,
    env: Option<WineEnvironment>,
) -> Option<WineEnvironment> {
    ctx.progress.fraction(Some(0.0));
    match stage {
        Stage::FetchFiles => {
            fetch_files(ctx).await;
            None
        }
        Stage::BuildPrefix => create_prefix(ctx).await,
        Stage::RunInstaller => {
            install_application(ctx, env).await;
            None
        }
    }
}

/// Sends [`StageEvent::Finished`] when dropped, including during a panic
struct FinishGuard {
    progress: ProgressReporter,
    stage: Stage,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            error!("{} worker panicked", self.stage.label());
        }
        self.progress.send(StageEvent::Finished(self.stage));
    }
}

/// Start `stage` on a fresh named thread driving `handle`
pub fn spawn_stage_worker(
    handle: Handle,
    stage: Stage,
    ctx: InstallContext,
    env: Option<WineEnvironment>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name(format!("stage-{}", stage.index() + 1))
        .spawn(move || {
            let _guard = FinishGuard {
                progress: ctx.progress.clone(),
                stage,
            };
            handle.block_on(run_stage(&ctx, stage, env));
        })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
