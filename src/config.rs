use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// Directory name under the user config dir
const CONFIG_DIR_NAME: &str = "dcs-linux-installer";
const CONFIG_FILE_NAME: &str = "installer.toml";

/// Top-level installer configuration (defaults target DCS World on Wine-GE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstallerConfig {
    pub runtime: RuntimeSource,
    pub application: ApplicationSource,
    pub prefix: PrefixSettings,
}

/// Where the Wine runtime comes from and how it unpacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSource {
    pub url: String,
    /// File name inside `tmp/`
    pub archive_name: String,
    /// Top-level directory the archive unpacks to inside `runner/`
    pub directory: String,
    /// `dll=mode` pairs joined with `;` into WINEDLLOVERRIDES
    pub dll_overrides: Vec<String>,
}

impl Default for RuntimeSource {
    fn default() -> Self {
        Self {
            url: "https://github.com/GloriousEggroll/wine-ge-custom/releases/download/GE-Proton8-26/wine-lutris-GE-Proton8-26-x86_64.tar.xz".into(),
            archive_name: "wine-lutris-GE-Proton8-26-x86_64.tar.xz".into(),
            directory: "wine-lutris-GE-Proton8-26-x86_64".into(),
            dll_overrides: vec!["wbemprox=n".into(), "msdmo=n".into()],
        }
    }
}

impl RuntimeSource {
    pub fn dll_override_value(&self) -> String {
        self.dll_overrides.join(";")
    }
}

/// The Windows application whose web installer gets fetched and run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSource {
    pub name: String,
    pub base_url: String,
    pub installer_name: String,
    /// Value for WINEDEBUG while the installer runs
    pub debug_channels: String,
    pub error_log_name: String,
}

impl Default for ApplicationSource {
    fn default() -> Self {
        Self {
            name: "DCS World".into(),
            base_url: "https://www.digitalcombatsimulator.com/upload/iblock/959/d33ul8g3arxnzc1ejgdaa8uev8gvmew2".into(),
            installer_name: "DCS_World_web.exe".into(),
            debug_channels: "+all".into(),
            error_log_name: "wine_error_log.txt".into(),
        }
    }
}

impl ApplicationSource {
    pub fn installer_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.installer_name
        )
    }
}

/// Prefix population settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixSettings {
    /// Executable name (looked up on PATH) or absolute path
    pub dependency_helper: String,
    pub helper_args: Vec<String>,
    pub components: Vec<String>,
    pub prompt_title: String,
}

impl Default for PrefixSettings {
    fn default() -> Self {
        let components = [
            "corefonts",
            "oleaut32",
            "vcrun2017",
            "dxvk",
            "d3dcompiler_43",
            "d3dcompiler_47",
            "d3dx9",
            "win10",
        ];
        Self {
            dependency_helper: "winetricks".into(),
            helper_args: vec!["-q".into()],
            components: components.iter().map(|c| c.to_string()).collect(),
            prompt_title: "Choose or add your DCS install location".into(),
        }
    }
}

/// Default config location: `<config_dir>/dcs-linux-installer/installer.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join(CONFIG_DIR_NAME);
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

impl InstallerConfig {
    /// Load config from `path`, writing the defaults there first when missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "Config not found at {}, creating default configuration",
                path.display()
            );

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }

            let default_toml = toml::to_string_pretty(&Self::default())
                .context("Failed to serialize default config")?;
            fs::write(path, default_toml).context("Failed to write config file")?;
        }

        let cfg_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: Self = toml::from_str(&cfg_str)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        info!("Using config from: {}", path.display());
        Ok(cfg)
    }
}
