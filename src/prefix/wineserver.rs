//! Background wineserver control

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use log::{debug, info};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tokio::process::Command;

use crate::error::InstallerError;
use crate::process;

use super::{PREFIX_VAR, WineEnvironment};

const SERVER_NAME: &str = "wineserver";

/// Prefix Wine falls back to when WINEPREFIX is unset
const DEFAULT_PREFIX_DIR: &str = ".wine";

/// Check for a wineserver serving `env`'s prefix
///
/// Servers of other prefixes, and processes whose environment cannot be
/// read (other users), are ignored.
pub fn is_running(env: &WineEnvironment) -> bool {
    let Some(ours) = env
        .prefix()
        .map(Path::to_path_buf)
        .or_else(|| dirs::home_dir().map(|home| home.join(DEFAULT_PREFIX_DIR)))
    else {
        return false;
    };

    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_environ(UpdateKind::Always),
    );

    let mut servers = system.processes_by_exact_name(OsStr::new(SERVER_NAME));
    let found = servers.any(|server| serves_prefix(server.environ(), &ours));
    debug!("wineserver for {} running: {found}", ours.display());
    found
}

/// Whether a server started with `environ` belongs to `prefix`
fn serves_prefix(environ: &[OsString], prefix: &Path) -> bool {
    let var = |name: &str| {
        environ.iter().find_map(|entry| {
            entry
                .to_str()?
                .strip_prefix(name)?
                .strip_prefix('=')
                .map(PathBuf::from)
        })
    };

    let server_prefix =
        var(PREFIX_VAR).or_else(|| var("HOME").map(|home| home.join(DEFAULT_PREFIX_DIR)));
    server_prefix.is_some_and(|server_prefix| server_prefix == prefix)
}

/// Ask the prefix's wineserver to kill itself and its clients (`wineserver -k`)
pub async fn shutdown(env: &WineEnvironment) -> Result<(), InstallerError> {
    let server = env.wineserver();
    let mut cmd = Command::new(&server);
    cmd.arg("-k");
    env.apply(&mut cmd);

    let output = process::output(&mut cmd, SERVER_NAME).await?;
    process::check(&output, SERVER_NAME)?;

    match env.prefix() {
        Some(prefix) => info!("Stopped wineserver for {}", prefix.display()),
        None => debug!("Stopped default wineserver"),
    }
    Ok(())
}
