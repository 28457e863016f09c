//! Installer Runner

use std::path::Path;

use log::{debug, warn};
use tokio::process::Command;

use crate::context::InstallContext;
use crate::error::InstallerError;
use crate::prefix::{WineEnvironment, wineserver};
use crate::process;

/// Longest stderr excerpt shown in the failure dialog
pub const EXCERPT_LIMIT: usize = 500;

const DEBUG_VAR: &str = "WINEDEBUG";

/// First `limit` characters of `text`, with an ellipsis when cut
pub fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Run the downloaded application installer under `env`
///
/// A missing installer fails before anything is launched. Whatever the
/// installer's exit status, a running wineserver is stopped afterwards;
/// failing to stop it only warns.
pub async fn run_installer(
    ctx: &InstallContext,
    env: &WineEnvironment,
) -> Result<(), InstallerError> {
    let installer = ctx.workspace.installer(&ctx.config);
    if !installer.is_file() {
        return Err(InstallerError::MissingInstaller(installer));
    }

    let result = launch(ctx, env, &installer).await;

    if wineserver::is_running(env) {
        if let Err(e) = wineserver::shutdown(env).await {
            warn!("{e}");
            ctx.prompter.warning(
                "Warning",
                &format!("Failed to shut down the Wine server. Returned {e}"),
            );
        }
    } else {
        debug!("No wineserver running after install");
    }

    result
}

async fn launch(
    ctx: &InstallContext,
    env: &WineEnvironment,
    installer: &Path,
) -> Result<(), InstallerError> {
    let app = &ctx.config.application;
    let target = env
        .prefix()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "the default Wine prefix".to_string());
    ctx.progress
        .update(0.0, format!("Installing {} at {target}.", app.name));
    // The web installer never reports progress.
    ctx.progress.fraction(None);

    let mut cmd = Command::new(env.wine());
    cmd.arg(installer);
    env.apply(&mut cmd);
    cmd.env(DEBUG_VAR, &app.debug_channels);

    let output = process::output(&mut cmd, "wine").await?;
    if output.status.success() {
        ctx.progress.update(
            100.0,
            format!("{} installation completed successfully.", app.name),
        );
        return Ok(());
    }

    let log = ctx.workspace.error_log(&ctx.config);
    ctx.progress.update(
        0.0,
        format!(
            "{} installation failed. Writing {} to {}.",
            app.name,
            app.error_log_name,
            ctx.workspace.root().display()
        ),
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    tokio::fs::write(&log, stderr.as_bytes())
        .await
        .map_err(|e| InstallerError::io("write", &log, e))?;

    Err(InstallerError::InstallerFailed {
        application: app.name.clone(),
        status: output.status.to_string(),
        log,
        excerpt: excerpt(&stderr, EXCERPT_LIMIT),
    })
}
