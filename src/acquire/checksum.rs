use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::GeoloadError;

/// Compute the lowercase hex MD5 digest of a file.
pub fn md5_file(path: &Path) -> Result<String, GeoloadError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Fail with [`GeoloadError::Integrity`] unless `path` hashes to `expected`.
///
/// The comparison ignores ASCII case so upper-case digests from dataset
/// pages are accepted as-is.
pub fn verify_md5(path: &Path, expected: &str) -> Result<(), GeoloadError> {
    let actual = md5_file(path)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(GeoloadError::Integrity {
            path: path.to_path_buf(),
            expected: expected.trim().to_string(),
            actual,
        })
    }
}
