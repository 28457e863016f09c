//! Streaming download with progress tracking

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use log::debug;
use tokio::io::AsyncWriteExt;

use crate::error::InstallerError;
use crate::progress::ProgressReporter;

/// Bytes written (and reported) per step
pub const CHUNK_SIZE: usize = 8 * 1024;

const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by all downloads of a session
pub fn build_client() -> Result<reqwest::Client, InstallerError> {
    reqwest::Client::builder()
        .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT)
        .user_agent(concat!("dcs-linux-installer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| InstallerError::Transport {
            url: String::new(),
            source,
        })
}

/// Byte counter for one transfer
///
/// A missing or zero content length makes the transfer indeterminate:
/// no percentage is ever computed for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    total: Option<u64>,
    written: u64,
}

impl TransferProgress {
    pub fn new(content_length: Option<u64>) -> Self {
        Self {
            total: content_length.filter(|&len| len > 0),
            written: 0,
        }
    }

    /// Record `bytes` more written, returning the new percentage if known
    pub fn advance(&mut self, bytes: usize) -> Option<f32> {
        self.written += bytes as u64;
        self.percent()
    }

    pub fn percent(&self) -> Option<f32> {
        self.total
            .map(|total| (self.written as f64 * 100.0 / total as f64) as f32)
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn describe(&self) -> String {
        match self.total {
            Some(total) => format!("Downloaded {} of {} bytes...", self.written, total),
            None => format!("Downloaded {} bytes...", self.written),
        }
    }
}

/// Stream `url` into `dest`, reporting progress per chunk
///
/// No retry and no cleanup: a failed transfer leaves whatever was written.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    progress: &ProgressReporter,
) -> Result<u64, InstallerError> {
    progress.update(0.0, "Starting download...");

    let transport = |source: reqwest::Error| InstallerError::Transport {
        url: url.to_string(),
        source,
    };

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| InstallerError::io("create directory", parent, e))?;
    }

    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(InstallerError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut tracker = TransferProgress::new(response.content_length());
    if tracker.total().is_none() {
        debug!("No content length for {url}, progress is indeterminate");
        progress.fraction(None);
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| InstallerError::io("create", dest, e))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(transport)?;

        for piece in chunk.chunks(CHUNK_SIZE) {
            file.write_all(piece)
                .await
                .map_err(|e| InstallerError::io("write", dest, e))?;

            if let Some(percent) = tracker.advance(piece.len()) {
                progress.fraction(Some(percent));
            }
            progress.detail(tracker.describe());
        }
    }

    file.flush()
        .await
        .map_err(|e| InstallerError::io("write", dest, e))?;

    progress.update(100.0, "Download completed successfully!");
    Ok(tracker.written())
}
