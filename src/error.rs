use std::path::PathBuf;
use thiserror::Error;

/// The main error type for geoload operations.
#[derive(Debug, Error)]
pub enum GeoloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset not found or corrupted. {reason}")]
    DatasetNotFound { root: PathBuf, reason: String },

    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("{dependency} is not installed and is required to {purpose}")]
    DependencyMissing {
        dependency: &'static str,
        purpose: &'static str,
    },

    #[error("Index {index} is out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Failed to extract {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to decode audio {path}: {message}")]
    AudioDecode { path: PathBuf, message: String },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid dataset configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown weights: {0}")]
    UnknownWeights(String),

    #[error("Invalid weights metadata for {name}: {message}")]
    InvalidWeights { name: &'static str, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
