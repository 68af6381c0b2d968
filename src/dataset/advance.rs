use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::info;

use crate::acquire::{ensure_available, Downloader, FetchDownloader};
use crate::error::GeoloadError;
use crate::index::{build_index, ModalityLayout, SampleEntry, SampleIndex};
use crate::load::{self, AudioDecoder, AudioDecoderFactory, SampleRecord, Transform};

use super::DatasetConfig;

/// Zenodo sources of the two ADVANCE archives.
pub const ADVANCE_URLS: [&str; 2] = [
    "https://zenodo.org/record/3828124/files/ADVANCE_vision.zip?download=1",
    "https://zenodo.org/record/3828124/files/ADVANCE_sound.zip?download=1",
];

/// MD5 digests of [`ADVANCE_URLS`].
pub const ADVANCE_MD5S: [&str; 2] = [
    "a9e8748219ef5864d3b5a8979a67b471",
    "a2d12f2d2a64f5c3d3a9d8c09aaf1c31",
];

/// `(archive filename, extracted directory)` per archive.
pub const ADVANCE_ARCHIVES: [(&str, &str); 2] = [
    ("ADVANCE_vision.zip", "vision"),
    ("ADVANCE_sound.zip", "sound"),
];

/// Scene classes of the full dataset.
pub const ADVANCE_CLASSES: [&str; 13] = [
    "airport",
    "beach",
    "bridge",
    "farmland",
    "forest",
    "grassland",
    "harbour",
    "lake",
    "orchard",
    "residential",
    "sparse shrub land",
    "sports land",
    "train station",
];

const LAYOUT: ModalityLayout = ModalityLayout {
    image_dir: "vision",
    audio_dir: "sound",
    audio_extension: "wav",
};

/// ADVANCE (AuDio Visual Aerial sceNe reCognition datasEt).
///
/// 5075 pairs of 512×512 RGB aerial images and 10 s mono ambient sound
/// recordings, each labelled with one of 13 scene classes. Each sample
/// decodes to a [`SampleRecord`] with the image as `3 × H × W` `u8` pixels,
/// the audio as `1 × N` `f32` samples, and the class id as a scalar.
///
/// Audio decoding needs the `audio` feature. Without it, construction still
/// succeeds and [`Advance::get`] fails with
/// [`GeoloadError::DependencyMissing`].
pub struct Advance {
    root: PathBuf,
    index: SampleIndex,
    transform: Option<Transform>,
    audio_factory: AudioDecoderFactory,
    audio: OnceLock<Box<dyn AudioDecoder>>,
}

impl Advance {
    /// Builder rooted at `root` with the default sources.
    pub fn builder(root: impl AsRef<Path>) -> AdvanceBuilder {
        AdvanceBuilder::new(root)
    }

    /// Construct from a config with the default collaborators.
    pub fn new(config: DatasetConfig) -> Result<Self, GeoloadError> {
        Self::with_collaborators(config, &FetchDownloader, load::try_create)
    }

    /// Construct with an explicit downloader and audio decoder factory.
    ///
    /// Acquisition runs first (downloading only when `config.download` is
    /// set), then the sample index is built. The audio decoder is not
    /// created until the first [`Advance::get`].
    pub fn with_collaborators(
        config: DatasetConfig,
        downloader: &dyn Downloader,
        audio_factory: AudioDecoderFactory,
    ) -> Result<Self, GeoloadError> {
        let archives = config.archives(&ADVANCE_ARCHIVES)?;
        ensure_available(&config.root, &archives, config.acquire_options(), downloader)?;

        let index = build_index(&config.root, &LAYOUT)?;
        info!(
            root = %config.root.display(),
            samples = index.len(),
            classes = index.classes().len(),
            "ADVANCE dataset ready"
        );

        Ok(Self {
            root: config.root,
            index,
            transform: config.transform,
            audio_factory,
            audio: OnceLock::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Sorted class names observed on disk.
    pub fn classes(&self) -> &[String] {
        self.index.classes()
    }

    pub fn entries(&self) -> &[SampleEntry] {
        self.index.entries()
    }

    pub fn index(&self) -> &SampleIndex {
        &self.index
    }

    /// Decode the sample at `position`. Nothing is cached between calls.
    pub fn get(&self, position: usize) -> Result<SampleRecord, GeoloadError> {
        if position >= self.len() {
            return Err(GeoloadError::IndexOutOfRange {
                index: position,
                len: self.len(),
            });
        }
        let audio = self.audio_decoder()?;
        load::load(position, &self.index, audio, self.transform.as_ref())
    }

    /// Iterate over all samples in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<SampleRecord, GeoloadError>> + '_ {
        (0..self.len()).map(move |position| self.get(position))
    }

    fn audio_decoder(&self) -> Result<&dyn AudioDecoder, GeoloadError> {
        let decoder = match self.audio.get() {
            Some(decoder) => decoder,
            None => {
                let created = (self.audio_factory)()?;
                self.audio.get_or_init(|| created)
            }
        };
        Ok(decoder.as_ref())
    }
}

impl std::fmt::Debug for Advance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advance")
            .field("root", &self.root)
            .field("len", &self.index.len())
            .field("classes", &self.index.classes())
            .finish()
    }
}

/// Builder for [`Advance`].
pub struct AdvanceBuilder {
    config: DatasetConfig,
    downloader: Option<Box<dyn Downloader>>,
    audio_factory: AudioDecoderFactory,
}

impl AdvanceBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            config: DatasetConfig::new(
                root,
                ADVANCE_URLS.iter().map(|url| url.to_string()).collect(),
                ADVANCE_MD5S.iter().map(|md5| md5.to_string()).collect(),
            ),
            downloader: None,
            audio_factory: load::try_create,
        }
    }

    pub fn download(mut self, yes: bool) -> Self {
        self.config.download = yes;
        self
    }

    pub fn checksum(mut self, yes: bool) -> Self {
        self.config.checksum = yes;
        self
    }

    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(SampleRecord) -> SampleRecord + Send + Sync + 'static,
    {
        self.config.transform = Some(Box::new(transform));
        self
    }

    /// Replace the archive sources and their expected digests.
    pub fn sources(mut self, urls: Vec<String>, md5s: Vec<String>) -> Self {
        self.config.source_urls = urls;
        self.config.expected_checksums = md5s;
        self
    }

    pub fn downloader(mut self, downloader: impl Downloader + 'static) -> Self {
        self.downloader = Some(Box::new(downloader));
        self
    }

    pub fn audio_decoder_factory(mut self, factory: AudioDecoderFactory) -> Self {
        self.audio_factory = factory;
        self
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn build(self) -> Result<Advance, GeoloadError> {
        match self.downloader {
            Some(downloader) => {
                Advance::with_collaborators(self.config, downloader.as_ref(), self.audio_factory)
            }
            None => Advance::with_collaborators(self.config, &FetchDownloader, self.audio_factory),
        }
    }
}
