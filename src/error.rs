//! Installer error taxonomy
//!
//! Every failure a stage can hit maps onto one variant here. Each variant
//! knows the dialog title and body it is shown with, so front ends only
//! have to hand the error to a [`Prompter`](crate::prompt::Prompter).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallerError {
    /// Connection, TLS or body-stream failure while downloading
    #[error("download of {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("download of {url} failed: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Archive signature is neither gzip nor XZ
    #[error("{} is not a valid .tar.gz or .tar.xz file", path.display())]
    UnrecognizedArchive { path: PathBuf },

    #[error("extraction of {} failed: {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Required external helper is not on the system path
    #[error("{tool} is not installed. Please install it before proceeding.")]
    MissingDependency { tool: String },

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    ProcessFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The application installer exited non-zero; stderr was written to `log`
    #[error("{application} installation failed ({status}), see {}", log.display())]
    InstallerFailed {
        application: String,
        status: String,
        log: PathBuf,
        excerpt: String,
    },

    #[error("Installer file does not exist: {}", .0.display())]
    MissingInstaller(PathBuf),

    /// User closed the directory chooser without picking anything
    #[error("No installation directory selected.")]
    Cancelled,

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallerError {
    /// Shorthand for wrapping filesystem errors with the path involved
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Title of the blocking dialog this error is reported with
    pub fn dialog_title(&self) -> &'static str {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => "Download Error",
            Self::UnrecognizedArchive { .. } => "File Type Error",
            Self::Extraction { .. } => "Extraction Error",
            Self::Cancelled => "Warning",
            _ => "Error",
        }
    }

    /// Body of the blocking dialog this error is reported with
    pub fn dialog_message(&self) -> String {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => format!("Download failed: {self}"),
            Self::Extraction { .. } => format!("Extraction failed: {self}"),
            Self::ProcessFailed { .. } => format!("Failed to set up Wine prefix: {self}"),
            Self::InstallerFailed {
                application,
                excerpt,
                ..
            } => format!("{application} installation failed:\n{excerpt}"),
            _ => self.to_string(),
        }
    }

    /// Cancellation is a warning that has already been shown when raised
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
