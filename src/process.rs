//! Child process helpers shared by the prefix builder and installer runner

use std::process::Output;

use log::debug;
use tokio::process::Command;

use crate::error::InstallerError;

/// Run `cmd` to completion capturing stdout/stderr
pub async fn output(cmd: &mut Command, program: &str) -> Result<Output, InstallerError> {
    debug!("Running {program}: {cmd:?}");
    cmd.kill_on_drop(true)
        .output()
        .await
        .map_err(|source| InstallerError::Spawn {
            program: program.to_string(),
            source,
        })
}

/// Turn a non-zero exit into [`InstallerError::ProcessFailed`]
pub fn check(output: &Output, program: &str) -> Result<(), InstallerError> {
    if output.status.success() {
        return Ok(());
    }

    Err(InstallerError::ProcessFailed {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
