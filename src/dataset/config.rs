use std::fmt;
use std::path::{Path, PathBuf};

use crate::acquire::{AcquireOptions, ArchiveDescriptor};
use crate::error::GeoloadError;
use crate::load::Transform;

/// Construction parameters shared by dataset loaders.
pub struct DatasetConfig {
    /// Root directory the dataset is stored under.
    pub root: PathBuf,
    /// Download missing archives.
    pub download: bool,
    /// Verify archive MD5 digests after downloading.
    pub checksum: bool,
    /// Applied to every sample before it is returned.
    pub transform: Option<Transform>,
    /// Archive sources, one per archive.
    pub source_urls: Vec<String>,
    /// Expected MD5 digests, parallel to `source_urls`.
    pub expected_checksums: Vec<String>,
}

impl DatasetConfig {
    /// Config rooted at `root` with downloads and checksums disabled.
    pub fn new(
        root: impl AsRef<Path>,
        source_urls: Vec<String>,
        expected_checksums: Vec<String>,
    ) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            download: false,
            checksum: false,
            transform: None,
            source_urls,
            expected_checksums,
        }
    }

    pub fn acquire_options(&self) -> AcquireOptions {
        AcquireOptions {
            download: self.download,
            checksum: self.checksum,
        }
    }

    /// Pair sources with their `(filename, directory)` archive slots.
    ///
    /// URLs and checksums must be parallel and there must be exactly one of
    /// each per slot.
    pub fn archives(
        &self,
        slots: &[(&str, &str)],
    ) -> Result<Vec<ArchiveDescriptor>, GeoloadError> {
        if self.source_urls.len() != self.expected_checksums.len() {
            return Err(GeoloadError::InvalidConfig(format!(
                "{} source URL(s) but {} checksum(s)",
                self.source_urls.len(),
                self.expected_checksums.len()
            )));
        }
        if self.source_urls.len() != slots.len() {
            return Err(GeoloadError::InvalidConfig(format!(
                "expected {} archive source(s), got {}",
                slots.len(),
                self.source_urls.len()
            )));
        }

        Ok(self
            .source_urls
            .iter()
            .zip(&self.expected_checksums)
            .zip(slots)
            .map(|((url, md5), (filename, directory))| ArchiveDescriptor {
                url: url.clone(),
                expected_md5: md5.clone(),
                filename: filename.to_string(),
                directory: directory.to_string(),
                destination: self.root.clone(),
            })
            .collect())
    }
}

impl fmt::Debug for DatasetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetConfig")
            .field("root", &self.root)
            .field("download", &self.download)
            .field("checksum", &self.checksum)
            .field("transform", &self.transform.is_some())
            .field("source_urls", &self.source_urls)
            .field("expected_checksums", &self.expected_checksums)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOTS: &[(&str, &str)] = &[("A_vision.zip", "vision"), ("A_sound.zip", "sound")];

    fn config(urls: &[&str], md5s: &[&str]) -> DatasetConfig {
        DatasetConfig::new(
            "root",
            urls.iter().map(|s| s.to_string()).collect(),
            md5s.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn archives_pair_sources_with_slots() {
        let archives = config(&["u1", "u2"], &["m1", "m2"])
            .archives(SLOTS)
            .expect("archives");

        assert_eq!(archives.len(), 2);
        assert_eq!(archives[1].url, "u2");
        assert_eq!(archives[1].expected_md5, "m2");
        assert_eq!(archives[1].filename, "A_sound.zip");
        assert_eq!(archives[1].archive_path(), Path::new("root/A_sound.zip"));
        assert_eq!(archives[1].extracted_path(), Path::new("root/sound"));
    }

    #[test]
    fn mismatched_url_and_checksum_counts_are_rejected() {
        let err = config(&["u1", "u2"], &["m1"]).archives(SLOTS).unwrap_err();
        assert!(err.to_string().contains("2 source URL(s) but 1 checksum(s)"));
    }

    #[test]
    fn wrong_archive_count_is_rejected() {
        let err = config(&["u1"], &["m1"]).archives(SLOTS).unwrap_err();
        assert!(matches!(err, GeoloadError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_transform_body() {
        let mut cfg = config(&[], &[]);
        cfg.transform = Some(Box::new(|sample| sample));
        assert!(format!("{cfg:?}").contains("transform: true"));
    }
}
