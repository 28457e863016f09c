//! Artifact download and runtime archive extraction
//!
//! ## Module Organization
//!
//! - `core` - Streaming HTTP download with percent progress
//! - `extract` - Signature sniffing and tarball unpacking (gzip, XZ)

mod core;
mod extract;

// Re-export public API
pub use self::core::{CHUNK_SIZE, TransferProgress, build_client, download_file};
pub use self::extract::{ArchiveKind, extract_archive};
