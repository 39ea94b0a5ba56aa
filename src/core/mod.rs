//! Core types: errors, constants, tensor aliases, and model seams.

pub mod constants;
pub mod errors;
pub mod traits;

pub use errors::{OcrError, OcrResult};
pub use traits::{DetectionModel, RecognitionModel};

/// A 3-dimensional f32 tensor.
pub type Tensor3D = ndarray::Array3<f32>;

/// A 4-dimensional f32 tensor.
pub type Tensor4D = ndarray::Array4<f32>;
