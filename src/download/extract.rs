//! Runtime archive extraction
//!
//! The archive type is decided from its leading bytes, never from the file
//! name. Only gzip and XZ compressed tarballs are accepted.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use xz2::read::XzDecoder;

use crate::error::InstallerError;
use crate::progress::ProgressReporter;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// Compression wrapped around a tarball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Gzip,
    Xz,
}

impl ArchiveKind {
    /// Match a file header against the known signatures
    pub fn from_magic(header: &[u8]) -> Option<Self> {
        if header.starts_with(XZ_MAGIC) {
            Some(Self::Xz)
        } else if header.starts_with(GZIP_MAGIC) {
            Some(Self::Gzip)
        } else {
            None
        }
    }

    /// Read the head of `path` and classify it
    pub fn sniff(path: &Path) -> std::io::Result<Option<Self>> {
        let mut header = [0u8; 6];
        let mut file = File::open(path)?;
        let mut filled = 0;
        while filled < header.len() {
            match file.read(&mut header[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(Self::from_magic(&header[..filled]))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gzip => ".tar.gz",
            Self::Xz => ".tar.xz",
        }
    }
}

/// Unpack `archive` into the existing directory `dest`
///
/// Nothing is written to `dest` unless the signature is recognized.
pub async fn extract_archive(
    archive: &Path,
    dest: &Path,
    progress: &ProgressReporter,
) -> Result<ArchiveKind, InstallerError> {
    let kind = ArchiveKind::sniff(archive)
        .map_err(|e| InstallerError::io("open", archive, e))?
        .ok_or_else(|| InstallerError::UnrecognizedArchive {
            path: archive.to_path_buf(),
        })?;

    progress.update(10.0, format!("Extracting {} files...", kind.label()));

    // Decompression is CPU-bound
    let archive_path = archive.to_path_buf();
    let dest_path = dest.to_path_buf();
    let unpacked = tokio::task::spawn_blocking(move || unpack(kind, &archive_path, &dest_path))
        .await
        .map_err(|join| InstallerError::Extraction {
            path: archive.to_path_buf(),
            source: std::io::Error::other(join),
        })?;

    unpacked.map_err(|source| InstallerError::Extraction {
        path: archive.to_path_buf(),
        source,
    })?;

    progress.update(100.0, "Extraction completed successfully!");
    Ok(kind)
}

fn unpack(kind: ArchiveKind, archive: &Path, dest: &Path) -> std::io::Result<()> {
    let reader = BufReader::new(File::open(archive)?);
    match kind {
        ArchiveKind::Gzip => unpack_tar(GzDecoder::new(reader), dest),
        ArchiveKind::Xz => unpack_tar(XzDecoder::new(reader), dest),
    }
}

fn unpack_tar(decoder: impl Read, dest: &Path) -> std::io::Result<()> {
    let mut archive = Archive::new(decoder);
    archive.set_preserve_permissions(true);
    archive.unpack(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use xz2::write::XzEncoder;

    fn tarball<W: Write>(writer: W) -> W {
        let mut builder = tar::Builder::new(writer);
        let body = b"#!/bin/sh\nexit 0\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, "wine-test/bin/wine", &body[..])
            .unwrap();
        builder.into_inner().unwrap()
    }

    #[test]
    fn signatures() {
        assert_eq!(ArchiveKind::from_magic(&[0x1f, 0x8b, 8, 0]), Some(ArchiveKind::Gzip));
        assert_eq!(
            ArchiveKind::from_magic(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]),
            Some(ArchiveKind::Xz)
        );
        assert_eq!(ArchiveKind::from_magic(b"PK\x03\x04"), None);
        assert_eq!(ArchiveKind::from_magic(&[0x1f]), None);
        assert_eq!(ArchiveKind::from_magic(&[]), None);
    }

    #[tokio::test]
    async fn extracts_gzip_tarball() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("runtime.tar.gz");
        let encoder = GzEncoder::new(File::create(&archive).unwrap(), Compression::fast());
        tarball(encoder).finish().unwrap();

        let dest = dir.path().join("runner");
        fs::create_dir_all(&dest).unwrap();

        let kind = extract_archive(&archive, &dest, &ProgressReporter::disabled())
            .await
            .unwrap();
        assert_eq!(kind, ArchiveKind::Gzip);
        assert!(dest.join("wine-test/bin/wine").is_file());
    }

    #[tokio::test]
    async fn extracts_xz_tarball() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("runtime.bin");
        let encoder = XzEncoder::new(File::create(&archive).unwrap(), 1);
        tarball(encoder).finish().unwrap();

        let dest = dir.path().join("runner");
        fs::create_dir_all(&dest).unwrap();

        let kind = extract_archive(&archive, &dest, &ProgressReporter::disabled())
            .await
            .unwrap();
        assert_eq!(kind, ArchiveKind::Xz);
        assert!(dest.join("wine-test/bin/wine").is_file());
    }

    #[tokio::test]
    async fn unknown_signature_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("runtime.tar.xz");
        fs::write(&archive, b"PK\x03\x04 not really a tarball").unwrap();
        let dest = dir.path().join("runner");
        fs::create_dir_all(&dest).unwrap();

        let err = extract_archive(&archive, &dest, &ProgressReporter::disabled())
            .await
            .unwrap_err();
        assert!(matches!(err, InstallerError::UnrecognizedArchive { .. }));
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }
}
