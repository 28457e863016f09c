mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use dcs_linux_installer::config::{self, InstallerConfig};
use dcs_linux_installer::download::build_client;
use dcs_linux_installer::{Workspace, environment, privilege, terminal};

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Some(refusal) = privilege::current_refusal() {
        println!("{refusal}");
        std::process::exit(1);
    }

    let args = cli::Args::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            eprintln!("The installer cannot run without an async runtime.");
            std::process::exit(1);
        }
    };

    if let Err(e) = real_main(args, &rt) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn real_main(args: cli::Args, rt: &tokio::runtime::Runtime) -> Result<()> {
    let cfg_path = match args.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let cfg = InstallerConfig::load_or_create(&cfg_path)?;

    let workspace = Workspace::resolve(args.workdir).context("Failed to locate working directory")?;
    info!("Working directory: {}", workspace.root().display());

    let client = build_client()?;

    let use_terminal = args.terminal || environment::is_cli_environment();
    if !use_terminal {
        #[cfg(feature = "gui")]
        {
            use std::sync::Arc;

            use dcs_linux_installer::InstallContext;
            use dcs_linux_installer::gui::{RfdPrompter, run_gui};

            let ctx = InstallContext::new(cfg, workspace, Arc::new(RfdPrompter), client);
            return run_gui(ctx, rt.handle().clone());
        }

        #[cfg(not(feature = "gui"))]
        info!("Built without the desktop front end, using the terminal");
    }

    rt.block_on(terminal::run_terminal(cfg, workspace, client))
}
