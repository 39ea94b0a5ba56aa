//! # pagescan
//!
//! A document OCR pipeline: detect text regions on a page image, read them
//! in order with a CTC recognition model, and optionally re-render the page
//! as a searchable PDF with an invisible text layer.
//!
//! The heavy lifting happens in three layers:
//!
//! - [`processors`]: the individual image/tensor stages (letterboxing,
//!   detection-map decoding, reading-order sequencing, crop normalization,
//!   CTC decoding).
//! - [`pipeline`]: [`pipeline::OcrPipeline`] wires the stages around a
//!   [`core::DetectionModel`] and a [`core::RecognitionModel`], producing a
//!   [`pipeline::PageResult`] per image.
//! - [`overlay`]: [`overlay::DocumentSynthesizer`] turns page results into
//!   a searchable document through the [`overlay::DocumentCanvas`] seam.
//!
//! Model inference itself sits behind traits so any backend that can
//! produce the expected tensors plugs in.

pub mod core;
pub mod overlay;
pub mod pipeline;
pub mod processors;
pub mod utils;

pub use crate::core::{DetectionModel, OcrError, OcrResult, RecognitionModel};
pub use crate::overlay::{DocumentCanvas, DocumentSynthesizer, PdfCanvas};
pub use crate::pipeline::{DetectedBox, OcrPipeline, PageResult, PipelineConfig};
pub use crate::processors::{
    ColorOrder, CtcGreedyDecoder, DetectionMap, DetectionMapDecoder, LetterboxResize,
    LogitsLayout, OrientedBox, Point, ReadingOrderSequencer, RecognitionCropNormalizer,
};
pub use crate::utils::load_image;
