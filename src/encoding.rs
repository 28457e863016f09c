//! Text file encoding normalization
//!
//! Detects a text file's encoding and rewrites it as UTF-8 when it is
//! anything else. Detection looks at a byte-order mark first and falls back
//! to statistical detection over the head of the file.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::error::InstallerError;

/// Bytes fed to the statistical detector
const DETECTION_WINDOW: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingReport {
    pub detected: &'static Encoding,
    /// Whether the file was rewritten
    pub converted: bool,
}

/// Guess the encoding of `bytes`
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let window = &bytes[..bytes.len().min(DETECTION_WINDOW)];
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(window, window.len() == bytes.len());
    detector.guess(None, true)
}

/// Rewrite the file at `path` as UTF-8 if it is not UTF-8 already
pub fn normalize_to_utf8(path: &Path) -> Result<EncodingReport, InstallerError> {
    let bytes = fs::read(path).map_err(|e| InstallerError::io("read", path, e))?;
    let detected = detect_encoding(&bytes);
    info!("Detected encoding of {}: {}", path.display(), detected.name());

    if detected == UTF_8 {
        debug!("No conversion needed, {} is already UTF-8", path.display());
        return Ok(EncodingReport {
            detected,
            converted: false,
        });
    }

    let (text, _, had_errors) = detected.decode(&bytes);
    if had_errors {
        debug!(
            "Malformed {} sequences in {} replaced during conversion",
            detected.name(),
            path.display()
        );
    }
    fs::write(path, text.as_bytes()).map_err(|e| InstallerError::io("write", path, e))?;
    info!("Converted {} from {} to UTF-8", path.display(), detected.name());

    Ok(EncodingReport {
        detected,
        converted: true,
    })
}
