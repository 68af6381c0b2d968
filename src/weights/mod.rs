//! Pretrained YOLO weights and the detection model factory.
//!
//! The registry is a closed set of [`YoloWeights`] variants, each mapping to
//! an immutable [`WeightsMeta`] record. Building an actual model is delegated
//! to a [`DetectionBackend`]; this crate only prepares its arguments.

mod registry;

pub use registry::{InputDim, Task, TransformSpec, WeightsMeta, YoloWeights};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::GeoloadError;

/// Arguments handed to a [`DetectionBackend`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct YoloArgs {
    /// Weights URL or local checkpoint path.
    pub model: Option<String>,
    /// Task head; filled from the weights metadata when left unset.
    pub task: Option<Task>,
    /// Backend-specific options passed through untouched.
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// An external detection library able to construct YOLO models.
pub trait DetectionBackend {
    type Model;

    fn build(&self, args: YoloArgs) -> Result<Self::Model, GeoloadError>;
}

/// Build a YOLO model through `backend`.
///
/// `backend` is resolved before anything else so that an unavailable
/// detection library is reported even when no weights are requested. When
/// `weights` is given, `args.model` is set to its URL and `args.task` is
/// taken from its metadata unless the caller already chose one.
pub fn yolo<B, F>(
    backend: F,
    weights: Option<YoloWeights>,
    mut args: YoloArgs,
) -> Result<B::Model, GeoloadError>
where
    B: DetectionBackend,
    F: FnOnce() -> Result<B, GeoloadError>,
{
    let backend = backend()?;

    if let Some(weights) = weights {
        let meta = weights.meta();
        args.model = Some(meta.url.to_string());
        if args.task.is_none() {
            args.task = Some(meta.task);
        }
    }

    backend.build(args)
}

/// The error a backend loader should return when the detection library is absent.
pub fn backend_missing() -> GeoloadError {
    GeoloadError::DependencyMissing {
        dependency: "ultralytics",
        purpose: "build YOLO models",
    }
}
