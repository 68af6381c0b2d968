//! Per-sample decoding into `ndarray` arrays.

pub mod audio;

use std::fmt;
use std::path::Path;

use ndarray::{arr0, Array0, Array2, Array3};

use crate::error::GeoloadError;
use crate::index::{SampleEntry, SampleIndex};

pub use audio::{try_create, AudioDecoder, AudioDecoderFactory};
#[cfg(feature = "audio")]
pub use audio::SymphoniaDecoder;

/// A decoded multi-modal sample.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRecord {
    /// RGB pixels, `3 × height × width`.
    pub image: Array3<u8>,
    /// Audio samples, `channels × frames`.
    pub audio: Array2<f32>,
    /// Class id.
    pub label: Array0<i64>,
}

/// User-supplied function applied to every sample before it is returned.
pub type Transform = Box<dyn Fn(SampleRecord) -> SampleRecord + Send + Sync>;

/// Decode an image file into a `3 × H × W` RGB array.
pub fn decode_image(path: &Path) -> Result<Array3<u8>, GeoloadError> {
    let image = image::open(path)
        .map_err(|source| GeoloadError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    let (width, height) = image.dimensions();
    let hwc = Array3::from_shape_vec((height as usize, width as usize, 3), image.into_raw())?;
    Ok(hwc.permuted_axes([2, 0, 1]).as_standard_layout().into_owned())
}

/// Decode the sample at `position` of `index`.
pub fn load(
    position: usize,
    index: &SampleIndex,
    audio: &dyn AudioDecoder,
    transform: Option<&Transform>,
) -> Result<SampleRecord, GeoloadError> {
    let entry = index.get(position).ok_or(GeoloadError::IndexOutOfRange {
        index: position,
        len: index.len(),
    })?;

    let record = load_entry(entry, audio)?;
    Ok(match transform {
        Some(transform) => transform(record),
        None => record,
    })
}

fn load_entry(entry: &SampleEntry, audio: &dyn AudioDecoder) -> Result<SampleRecord, GeoloadError> {
    Ok(SampleRecord {
        image: decode_image(&entry.image)?,
        audio: audio.decode(&entry.audio)?,
        label: arr0(entry.label as i64),
    })
}

impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image {:?}, audio {:?}, label {}",
            self.image.shape(),
            self.audio.shape(),
            self.label[()]
        )
    }
}
