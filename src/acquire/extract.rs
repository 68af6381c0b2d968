use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::GeoloadError;

/// Extract a zip archive into `destination`, overwriting existing files.
///
/// Returns the number of files written. Entries whose names would resolve
/// outside `destination` are rejected.
pub fn extract_zip(archive: &Path, destination: &Path) -> Result<usize, GeoloadError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|source| GeoloadError::Extract {
        archive: archive.to_path_buf(),
        message: source.to_string(),
    })?;

    fs::create_dir_all(destination)?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|source| GeoloadError::Extract {
            archive: archive.to_path_buf(),
            message: source.to_string(),
        })?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(GeoloadError::Extract {
                archive: archive.to_path_buf(),
                message: format!("entry '{}' escapes the destination directory", entry.name()),
            });
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&out_path)?);
        io::copy(&mut entry, &mut writer)?;
        written += 1;
    }

    debug!(archive = %archive.display(), files = written, "extracted archive");
    Ok(written)
}
