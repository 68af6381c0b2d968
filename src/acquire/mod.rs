//! Dataset acquisition: download, integrity check, and extraction.
//!
//! This module owns the filesystem side effects of making a dataset
//! available under its root directory. Indexing and decoding live in
//! `crate::index` and `crate::load`.

pub mod checksum;
pub mod download;
pub mod extract;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::GeoloadError;

pub use checksum::{md5_file, verify_md5};
pub use download::{classify_source, partial_path, Downloader, FetchDownloader, SourceLocation};
pub use extract::extract_zip;

/// One archive to acquire. Built at dataset construction and consumed once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    /// Remote URL or local path of the archive.
    pub url: String,
    /// Expected lowercase hex MD5 of the archive.
    pub expected_md5: String,
    /// File name the archive is stored under inside `destination`.
    pub filename: String,
    /// Top-level directory the archive unpacks to.
    pub directory: String,
    /// Directory the archive is downloaded into and extracted under.
    pub destination: PathBuf,
}

impl ArchiveDescriptor {
    /// Path of the archive file once downloaded.
    pub fn archive_path(&self) -> PathBuf {
        self.destination.join(&self.filename)
    }

    /// Path of the directory the archive extracts to.
    pub fn extracted_path(&self) -> PathBuf {
        self.destination.join(&self.directory)
    }
}

/// Options controlling acquisition.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcquireOptions {
    /// Fetch missing archives instead of failing.
    pub download: bool,
    /// Verify archive MD5 digests before extraction.
    pub checksum: bool,
}

/// Whether every archive's extracted directory is present.
pub fn is_extracted(archives: &[ArchiveDescriptor]) -> bool {
    archives
        .iter()
        .all(|archive| archive.extracted_path().is_dir())
}

/// Make sure the extracted contents of `archives` exist under `root`.
///
/// Presence of the extracted directories is treated as sufficient; no
/// checksum is re-verified in that case. Otherwise each archive is
/// downloaded, verified when `options.checksum` is set, and extracted in
/// order. An archive file already in place is reused only if it passes the
/// checksum; a stale one is downloaded again.
pub fn ensure_available(
    root: &Path,
    archives: &[ArchiveDescriptor],
    options: AcquireOptions,
    downloader: &dyn Downloader,
) -> Result<(), GeoloadError> {
    if is_extracted(archives) {
        info!(root = %root.display(), "files already downloaded and verified");
        return Ok(());
    }

    if !options.download {
        return Err(not_found(root));
    }

    for archive in archives {
        let archive_path = archive.archive_path();
        if !reusable(archive, &archive_path, options) {
            downloader.download(&archive.url, &archive_path)?;
            if options.checksum {
                verify_md5(&archive_path, &archive.expected_md5)?;
                debug!(archive = %archive_path.display(), "checksum verified");
            }
        }

        extract_zip(&archive_path, &archive.destination)?;
        info!(
            archive = %archive_path.display(),
            directory = %archive.directory,
            "archive extracted"
        );
    }

    Ok(())
}

/// Whether an archive file left by an earlier run can be used as is.
fn reusable(archive: &ArchiveDescriptor, archive_path: &Path, options: AcquireOptions) -> bool {
    if !archive_path.is_file() {
        return false;
    }
    if !options.checksum {
        debug!(archive = %archive_path.display(), "using existing archive");
        return true;
    }

    match verify_md5(archive_path, &archive.expected_md5) {
        Ok(()) => {
            debug!(archive = %archive_path.display(), "using existing verified archive");
            true
        }
        Err(err) => {
            warn!(archive = %archive_path.display(), %err, "existing archive is stale, downloading again");
            false
        }
    }
}

pub(crate) fn not_found(root: &Path) -> GeoloadError {
    GeoloadError::DatasetNotFound {
        root: root.to_path_buf(),
        reason: format!(
            "No extracted data under {}. Enable download to fetch it.",
            root.display()
        ),
    }
}
