//! Environment overlay scoping child processes to one prefix

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::config::RuntimeSource;

use super::RUNNER_DIR;

pub const PREFIX_VAR: &str = "WINEPREFIX";
pub const BIN_DIR_VAR: &str = "WINE_BIN_DIR";
pub const DLL_OVERRIDES_VAR: &str = "WINEDLLOVERRIDES";

/// Prefix root, runtime binary directory and DLL overrides for one session
///
/// Held in application state and applied to every child process launched
/// after the prefix builder established it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WineEnvironment {
    prefix: Option<PathBuf>,
    bin_dir: Option<PathBuf>,
    dll_overrides: Option<String>,
}

impl WineEnvironment {
    /// Overlay for the runtime extracted under `<root>/runner/<directory>`
    pub fn for_prefix(root: &Path, runtime: &RuntimeSource) -> Self {
        Self {
            prefix: Some(root.to_path_buf()),
            bin_dir: Some(root.join(RUNNER_DIR).join(&runtime.directory).join("bin")),
            dll_overrides: Some(runtime.dll_override_value()),
        }
    }

    /// No overlay: tools resolve from PATH and Wine uses its default prefix
    pub fn system() -> Self {
        Self {
            prefix: None,
            bin_dir: None,
            dll_overrides: None,
        }
    }

    pub fn prefix(&self) -> Option<&Path> {
        self.prefix.as_deref()
    }

    pub fn bin_dir(&self) -> Option<&Path> {
        self.bin_dir.as_deref()
    }

    /// Variables this overlay sets
    pub fn vars(&self) -> Vec<(&'static str, OsString)> {
        let mut vars = Vec::with_capacity(3);
        if let Some(prefix) = &self.prefix {
            vars.push((PREFIX_VAR, prefix.clone().into_os_string()));
        }
        if let Some(bin_dir) = &self.bin_dir {
            vars.push((BIN_DIR_VAR, bin_dir.clone().into_os_string()));
        }
        if let Some(overrides) = &self.dll_overrides {
            vars.push((DLL_OVERRIDES_VAR, OsString::from(overrides)));
        }
        vars
    }

    pub fn apply<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.envs(self.vars())
    }

    /// Point helper scripts at this runtime's binaries instead of PATH
    ///
    /// winetricks honours WINE and WINESERVER.
    pub fn apply_tool_paths<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        let wine = self.wine();
        if self.bin_dir.is_some() && wine.is_file() {
            cmd.env("WINE", wine).env("WINESERVER", self.wineserver());
        }
        cmd
    }

    pub fn wine(&self) -> PathBuf {
        self.tool("wine")
    }

    pub fn wineserver(&self) -> PathBuf {
        self.tool("wineserver")
    }

    fn tool(&self, name: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}
