//! Image and tensor processors making up the OCR stages.

pub mod crop_normalize;
pub mod ctc_decode;
pub mod det_postprocess;
pub mod geometry;
pub mod letterbox;
pub mod sequencing;
pub mod types;

pub use crop_normalize::RecognitionCropNormalizer;
pub use ctc_decode::CtcGreedyDecoder;
pub use det_postprocess::{DetectionMap, DetectionMapDecoder};
pub use geometry::{BoxCorners, OrientedBox, Point, min_area_rect};
pub use letterbox::{LetterboxResize, LetterboxTransform};
pub use sequencing::ReadingOrderSequencer;
pub use types::{ColorOrder, LogitsLayout};
