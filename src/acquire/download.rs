use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use url::Url;

use crate::error::GeoloadError;

/// Fetches a single resource to a local path.
///
/// The acquirer only ever calls this for archives that are not already
/// present; checksum verification happens afterwards in the acquirer.
pub trait Downloader: Send + Sync {
    fn download(&self, url: &str, destination: &Path) -> Result<(), GeoloadError>;
}

/// Where a source string points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(String),
    Local(PathBuf),
}

/// Classify a source as an HTTP(S) URL or a local file.
///
/// `file://` URLs and anything that does not parse as a URL (relative
/// paths, Windows drive letters) are treated as local paths.
pub fn classify_source(source: &str) -> SourceLocation {
    match Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            SourceLocation::Remote(source.to_string())
        }
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => SourceLocation::Local(path),
            Err(()) => SourceLocation::Local(PathBuf::from(url.path())),
        },
        _ => SourceLocation::Local(PathBuf::from(source)),
    }
}

/// Default downloader: HTTP(S) through `ureq`, everything else is a file copy.
#[derive(Clone, Debug, Default)]
pub struct FetchDownloader;

impl Downloader for FetchDownloader {
    fn download(&self, url: &str, destination: &Path) -> Result<(), GeoloadError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        // `destination` only ever holds a finished transfer.
        let partial = partial_path(destination);
        let fetched = match classify_source(url) {
            SourceLocation::Remote(remote) => fetch_remote(&remote, &partial),
            SourceLocation::Local(path) => {
                info!(source = %path.display(), destination = %destination.display(), "copying archive");
                fs::copy(&path, &partial)
                    .map(|_| ())
                    .map_err(|source| GeoloadError::Download {
                        url: url.to_string(),
                        message: source.to_string(),
                    })
            }
        };

        if let Err(err) = fetched {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }
        fs::rename(&partial, destination)?;
        Ok(())
    }
}

/// `<destination>.part`, next to the final file.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str, destination: &Path) -> Result<(), GeoloadError> {
    use std::fs::File;
    use std::io::{self, BufWriter, Write};

    info!(url, destination = %destination.display(), "downloading archive");

    let response = ureq::get(url)
        .call()
        .map_err(|source| GeoloadError::Download {
            url: url.to_string(),
            message: source.to_string(),
        })?;

    let mut reader = response.into_body().into_reader();
    let mut writer = BufWriter::new(File::create(destination)?);
    io::copy(&mut reader, &mut writer).map_err(|source| GeoloadError::Download {
        url: url.to_string(),
        message: source.to_string(),
    })?;
    writer.flush()?;
    Ok(())
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(_url: &str, _destination: &Path) -> Result<(), GeoloadError> {
    Err(GeoloadError::DependencyMissing {
        dependency: "ureq",
        purpose: "download remote archives",
    })
}
