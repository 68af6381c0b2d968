use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::GeoloadError;

/// Prediction head a set of weights was trained for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Task {
    #[serde(rename = "segment")]
    Segment,
    #[serde(rename = "bbox")]
    BoundingBox,
}

impl Task {
    pub fn as_str(self) -> &'static str {
        match self {
            Task::Segment => "segment",
            Task::BoundingBox => "bbox",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One dimension of the expected input shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputDim {
    Fixed(u32),
    /// Any size; serialised as `-1`.
    Dynamic,
}

impl Serialize for InputDim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InputDim::Fixed(n) => serializer.serialize_i64(i64::from(*n)),
            InputDim::Dynamic => serializer.serialize_i64(-1),
        }
    }
}

impl fmt::Display for InputDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputDim::Fixed(n) => write!(f, "{n}"),
            InputDim::Dynamic => f.write_str("-1"),
        }
    }
}

/// Preprocessing the weights expect, applied by the caller's pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformSpec {
    /// Pass samples through unchanged (the backend handles preprocessing).
    Identity,
    /// Resize to a fixed spatial size.
    Resize { height: u32, width: u32 },
}

/// Metadata describing one set of pretrained weights.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightsMeta {
    pub url: &'static str,
    pub transforms: TransformSpec,
    pub dataset: &'static str,
    pub in_chans: usize,
    pub num_classes: Option<usize>,
    pub classes: Option<&'static [&'static str]>,
    pub model: &'static str,
    pub task: Task,
    pub encoder: Option<&'static str>,
    pub input_shape: [InputDim; 3],
    pub bands: &'static [&'static str],
    pub publication: Option<&'static str>,
    pub repo: &'static str,
    pub resolution: Option<f64>,
    pub license: &'static str,
}

const RGB: &[&str] = &["R", "G", "B"];
const FIELD: &[&str] = &["field"];

// Delineate-Anything trains on 512x512 crops from sources of mixed
// resolution; per-source normalisation is not published.
const DELINEATE_ANYTHING_TRANSFORMS: TransformSpec = TransformSpec::Resize {
    height: 512,
    width: 512,
};

const DELINEATE_ANYTHING: WeightsMeta = WeightsMeta {
    url: "https://hf.co/torchgeo/delineate-anything-s/resolve/60bea7b2f81568d16d5c75e4b5b06289e1d7efaf/delineate_anything_rgb_yolo11x-88ede029.pt",
    transforms: DELINEATE_ANYTHING_TRANSFORMS,
    dataset: "FBIS-22M",
    in_chans: 3,
    num_classes: Some(1),
    classes: Some(FIELD),
    model: "yolo11x-seg",
    task: Task::Segment,
    encoder: None,
    input_shape: [InputDim::Fixed(3), InputDim::Fixed(512), InputDim::Fixed(512)],
    bands: RGB,
    publication: Some("https://arxiv.org/abs/2409.16252"),
    repo: "https://github.com/Lavreniuk/Delineate-Anything",
    resolution: None,
    license: "AGPL-3.0",
};

const DELINEATE_ANYTHING_SMALL: WeightsMeta = WeightsMeta {
    url: "https://hf.co/torchgeo/delineate-anything-s/resolve/69cd440b0c5bd450ced145e68294aa9393ddae05/delineate_anything_s_rgb_yolo11n-b879d643.pt",
    model: "yolo11n-seg",
    ..DELINEATE_ANYTHING
};

const CORE_DINO: WeightsMeta = WeightsMeta {
    url: "https://hf.co/torchgeo/core-dino/resolve/59427e13d114cbbf02f4745e1bea7570be3e2057/core_dino_rgb_yolo11x-80ca836f.pt",
    transforms: TransformSpec::Identity,
    dataset: "core-five",
    in_chans: 3,
    num_classes: None,
    classes: None,
    model: "yolo11x",
    task: Task::BoundingBox,
    encoder: None,
    // Trained for dynamic spatial input.
    input_shape: [InputDim::Fixed(3), InputDim::Dynamic, InputDim::Dynamic],
    bands: RGB,
    publication: None,
    repo: "https://huggingface.co/gajeshladhar/core-dino",
    resolution: None,
    license: "CC-BY-NC-3.0",
};

/// Pretrained YOLO weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum YoloWeights {
    DelineateAnything,
    DelineateAnythingSmall,
    CoreDino,
}

impl YoloWeights {
    pub const ALL: [YoloWeights; 3] = [
        YoloWeights::DelineateAnything,
        YoloWeights::DelineateAnythingSmall,
        YoloWeights::CoreDino,
    ];

    /// Registry name, as accepted by [`YoloWeights::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            YoloWeights::DelineateAnything => "delineate_anything",
            YoloWeights::DelineateAnythingSmall => "delineate_anything_small",
            YoloWeights::CoreDino => "core_dino",
        }
    }

    pub fn meta(self) -> &'static WeightsMeta {
        match self {
            YoloWeights::DelineateAnything => &DELINEATE_ANYTHING,
            YoloWeights::DelineateAnythingSmall => &DELINEATE_ANYTHING_SMALL,
            YoloWeights::CoreDino => &CORE_DINO,
        }
    }

    pub fn url(self) -> &'static str {
        self.meta().url
    }

    /// Check that the metadata record is complete and self-consistent.
    pub fn validate(self) -> Result<(), GeoloadError> {
        let meta = self.meta();
        let invalid = |message: String| GeoloadError::InvalidWeights {
            name: self.name(),
            message,
        };

        for (field, value) in [
            ("url", meta.url),
            ("dataset", meta.dataset),
            ("model", meta.model),
            ("repo", meta.repo),
            ("license", meta.license),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("'{field}' is empty")));
            }
        }

        if meta.bands.len() != meta.in_chans {
            return Err(invalid(format!(
                "{} band(s) listed for {} input channel(s)",
                meta.bands.len(),
                meta.in_chans
            )));
        }

        if meta.input_shape[0] != InputDim::Fixed(meta.in_chans as u32) {
            return Err(invalid(format!(
                "input shape leads with {} but in_chans is {}",
                meta.input_shape[0], meta.in_chans
            )));
        }

        if let (Some(classes), Some(num_classes)) = (meta.classes, meta.num_classes) {
            if classes.len() != num_classes {
                return Err(invalid(format!(
                    "{} class name(s) for num_classes = {}",
                    classes.len(),
                    num_classes
                )));
            }
        }

        if let TransformSpec::Resize { height, width } = meta.transforms {
            if meta.input_shape[1..] != [InputDim::Fixed(height), InputDim::Fixed(width)] {
                return Err(invalid(format!(
                    "resize to {height}x{width} disagrees with input shape"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for YoloWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for YoloWeights {
    type Err = GeoloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        YoloWeights::ALL
            .into_iter()
            .find(|weights| weights.name() == normalized)
            .ok_or_else(|| {
                GeoloadError::UnknownWeights(format!(
                    "'{}' (available: {})",
                    s,
                    YoloWeights::ALL
                        .iter()
                        .map(|w| w.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}
