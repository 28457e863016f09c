use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Download, prepare and run the DCS World installer under Wine")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding tmp/ and the error log (default: next to the executable)
    #[arg(long, short = 'w')]
    pub workdir: Option<PathBuf>,

    /// Use the terminal front end even in a graphical session
    #[arg(long)]
    pub terminal: bool,
}
