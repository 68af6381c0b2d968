//! Sample indexing over an extracted multi-modal dataset tree.
//!
//! The layout is `<modality>/<category>/<name>.<ext>`. Images drive the
//! index: every recognised image under the image modality becomes one
//! sample, paired with the same-named audio file under the audio modality.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::GeoloadError;

/// Image extensions recognised by the indexer (matched case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// Directory names and audio extension of a multi-modal tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModalityLayout {
    pub image_dir: &'static str,
    pub audio_dir: &'static str,
    pub audio_extension: &'static str,
}

/// Files and label making up one sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleEntry {
    pub image: PathBuf,
    pub audio: PathBuf,
    pub class_name: String,
    pub label: usize,
}

/// Ordered, immutable sample table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleIndex {
    entries: Vec<SampleEntry>,
    classes: Vec<String>,
}

impl SampleIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SampleEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    /// Sorted class names; a sample's label is its class's position here.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class id for `name`, if observed.
    pub fn class_id(&self, name: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(name))
            .ok()
    }
}

/// Build the sample index for the tree rooted at `root`.
pub fn build_index(root: &Path, layout: &ModalityLayout) -> Result<SampleIndex, GeoloadError> {
    let image_root = root.join(layout.image_dir);
    if !image_root.is_dir() {
        return Err(GeoloadError::DatasetNotFound {
            root: root.to_path_buf(),
            reason: format!("Missing image directory {}.", image_root.display()),
        });
    }

    let images = collect_images(&image_root)?;
    if images.is_empty() {
        return Err(GeoloadError::DatasetNotFound {
            root: root.to_path_buf(),
            reason: format!("No images found under {}.", image_root.display()),
        });
    }

    let classes: Vec<String> = images
        .iter()
        .map(|(_, category, _)| category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let audio_root = root.join(layout.audio_dir);
    let mut entries = Vec::with_capacity(images.len());
    for (image, category, stem) in images {
        let audio = audio_root
            .join(&category)
            .join(format!("{stem}.{}", layout.audio_extension));
        if !audio.is_file() {
            return Err(GeoloadError::DatasetNotFound {
                root: root.to_path_buf(),
                reason: format!(
                    "Missing audio file {} for image {}.",
                    audio.display(),
                    image.display()
                ),
            });
        }

        let label = classes
            .binary_search(&category)
            .unwrap_or_default();
        entries.push(SampleEntry {
            image,
            audio,
            class_name: category,
            label,
        });
    }

    debug!(
        root = %root.display(),
        samples = entries.len(),
        classes = classes.len(),
        "built sample index"
    );

    Ok(SampleIndex { entries, classes })
}

/// `(path, category, stem)` for every image at `<image_root>/<category>/<file>`,
/// sorted by relative path.
fn collect_images(image_root: &Path) -> Result<Vec<(PathBuf, String, String)>, GeoloadError> {
    let mut found = Vec::new();

    for entry in WalkDir::new(image_root)
        .follow_links(true)
        .min_depth(2)
        .max_depth(2)
    {
        let entry = entry.map_err(|source| GeoloadError::DatasetNotFound {
            root: image_root.to_path_buf(),
            reason: format!("Failed while traversing image directory: {source}."),
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() || !has_image_extension(path) {
            continue;
        }

        let category = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string());
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string());
        let (Some(category), Some(stem)) = (category, stem) else {
            continue;
        };

        found.push((rel_string(image_root, path), (path.to_path_buf(), category, stem)));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found.into_iter().map(|(_, image)| image).collect())
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

fn rel_string(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
