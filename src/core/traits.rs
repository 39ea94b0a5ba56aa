//! Model seams for the two external collaborators.
//!
//! The detection and recognition networks (and the engine that executes
//! them) live outside this crate. They are consumed as pure functions:
//! tensor in, tensor out. Implementations own whatever long-lived engine
//! handle they need; the pipeline holds one instance of each, constructed
//! once and reused across calls. Handles are not assumed reentrant:
//! concurrent page processing requires one detector/recognizer pair per
//! worker.

use crate::core::{OcrError, Tensor3D, Tensor4D};
use crate::processors::DetectionMap;

/// A text detection model.
///
/// Takes a `[1, 3, T, T]` letterboxed input tensor and produces a
/// probability (or raw logit) map over the same spatial extent, either
/// `[1, 1, H, W]` or `[1, H, W]` depending on the exporting toolchain.
pub trait DetectionModel {
    /// Runs detection inference on a single letterboxed page tensor.
    fn infer(&self, input: &Tensor4D) -> Result<DetectionMap, OcrError>;
}

/// A text recognition model.
///
/// Takes a `[1, 3, H, W]` normalized crop tensor and produces per-timestep
/// class logits, either `[1, T, C]` or `[1, C, T]`; the sequence decoder
/// disambiguates the layout.
pub trait RecognitionModel {
    /// Runs recognition inference on a single normalized crop tensor.
    fn infer(&self, input: &Tensor4D) -> Result<Tensor3D, OcrError>;
}
