use std::path::Path;

use ndarray::Array2;

use crate::error::GeoloadError;

/// Decodes an audio file into a `channels × samples` array.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<Array2<f32>, GeoloadError>;
}

/// Creates an [`AudioDecoder`], or reports why none is available.
pub type AudioDecoderFactory = fn() -> Result<Box<dyn AudioDecoder>, GeoloadError>;

/// Default factory: the symphonia-backed decoder when the `audio` feature
/// is enabled, otherwise [`GeoloadError::DependencyMissing`].
#[cfg(feature = "audio")]
pub fn try_create() -> Result<Box<dyn AudioDecoder>, GeoloadError> {
    Ok(Box::new(SymphoniaDecoder))
}

#[cfg(not(feature = "audio"))]
pub fn try_create() -> Result<Box<dyn AudioDecoder>, GeoloadError> {
    Err(GeoloadError::DependencyMissing {
        dependency: "symphonia",
        purpose: "use this dataset",
    })
}

#[cfg(feature = "audio")]
pub use backend::SymphoniaDecoder;

#[cfg(feature = "audio")]
mod backend {
    use std::fs::File;
    use std::io::ErrorKind;
    use std::path::Path;

    use ndarray::Array2;
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    use super::AudioDecoder;
    use crate::error::GeoloadError;

    /// PCM decoder backed by symphonia. Samples are scaled to `[-1, 1]`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SymphoniaDecoder;

    impl AudioDecoder for SymphoniaDecoder {
        fn decode(&self, path: &Path) -> Result<Array2<f32>, GeoloadError> {
            let fail = |message: String| GeoloadError::AudioDecode {
                path: path.to_path_buf(),
                message,
            };

            let file = File::open(path)?;
            let stream = MediaSourceStream::new(Box::new(file), Default::default());

            let mut hint = Hint::new();
            if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
                hint.with_extension(ext);
            }

            let probed = symphonia::default::get_probe()
                .format(
                    &hint,
                    stream,
                    &FormatOptions::default(),
                    &MetadataOptions::default(),
                )
                .map_err(|source| fail(source.to_string()))?;
            let mut reader = probed.format;

            let (track_id, mut decoder, mut channels) = {
                let track = reader
                    .tracks()
                    .iter()
                    .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
                    .ok_or_else(|| fail("no decodable audio track".to_string()))?;
                let decoder = symphonia::default::get_codecs()
                    .make(&track.codec_params, &DecoderOptions::default())
                    .map_err(|source| fail(source.to_string()))?;
                let channels = track.codec_params.channels.map(|c| c.count());
                (track.id, decoder, channels)
            };

            let mut interleaved: Vec<f32> = Vec::new();
            loop {
                let packet = match reader.next_packet() {
                    Ok(packet) => packet,
                    Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => {
                        break
                    }
                    Err(source) => return Err(fail(source.to_string())),
                };
                if packet.track_id() != track_id {
                    continue;
                }

                let decoded = decoder
                    .decode(&packet)
                    .map_err(|source| fail(source.to_string()))?;
                let spec = *decoded.spec();
                channels = Some(spec.channels.count());

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buffer.samples());
            }

            let channels = channels.filter(|&c| c > 0).unwrap_or(1);
            if interleaved.len() % channels != 0 {
                return Err(fail(format!(
                    "{} samples do not divide evenly into {} channels",
                    interleaved.len(),
                    channels
                )));
            }
            let frames = interleaved.len() / channels;

            let by_frame = Array2::from_shape_vec((frames, channels), interleaved)?;
            Ok(by_frame.reversed_axes().as_standard_layout().into_owned())
        }
    }
}
