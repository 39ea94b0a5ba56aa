//! The end-to-end OCR pipeline.
//!
//! Wires the detection and recognition models together with the
//! preprocessing, decoding, sequencing, and assembly stages, producing one
//! [`PageResult`] per input image.

pub mod assemble;
pub mod result;

pub use assemble::assemble_page;
pub use result::{DetectedBox, PageResult};

use std::path::{Path, PathBuf};

use crate::core::constants::{
    DEFAULT_DET_TARGET_SIZE, DEFAULT_LINE_RATIO, DEFAULT_MIN_BOX_AREA, PIPELINE_DET_PROB_THRESH,
};
use crate::core::{DetectionModel, OcrError, OcrResult, RecognitionModel};
use crate::processors::{
    ColorOrder, CtcGreedyDecoder, DetectionMapDecoder, LetterboxResize,
    ReadingOrderSequencer, RecognitionCropNormalizer,
};
use crate::utils::load_image;
use image::RgbImage;

/// Tunable parameters of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Side length of the square detector input.
    pub det_target_size: u32,
    /// Probability threshold for the detection map. The default is kept
    /// deliberately near zero; see DESIGN.md for the rationale behind the
    /// divergence from the standalone decoder default.
    pub det_prob_thresh: f32,
    /// Minimum detected box area in map pixels.
    pub det_min_box_area: f32,
    /// Line-grouping ratio for reading-order sequencing.
    pub line_ratio: f32,
    /// Channel order fed to both models.
    pub color_order: ColorOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            det_target_size: DEFAULT_DET_TARGET_SIZE,
            det_prob_thresh: PIPELINE_DET_PROB_THRESH,
            det_min_box_area: DEFAULT_MIN_BOX_AREA,
            line_ratio: DEFAULT_LINE_RATIO,
            color_order: ColorOrder::Bgr,
        }
    }
}

/// The complete OCR pipeline over a detection and a recognition model.
pub struct OcrPipeline<D, R> {
    detector: D,
    recognizer: R,
    decoder: CtcGreedyDecoder,
    letterbox: LetterboxResize,
    det_decoder: DetectionMapDecoder,
    sequencer: ReadingOrderSequencer,
    normalizer: RecognitionCropNormalizer,
    det_prob_thresh: f32,
}

impl<D: DetectionModel, R: RecognitionModel> OcrPipeline<D, R> {
    /// Builds a pipeline around the given models and vocabulary.
    ///
    /// The blank index constructed here is the single source of truth for
    /// decoding; `None` places it one past the last vocabulary entry.
    pub fn new(
        detector: D,
        recognizer: R,
        vocabulary: Vec<char>,
        blank_index: Option<usize>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            detector,
            recognizer,
            decoder: CtcGreedyDecoder::new(vocabulary, blank_index),
            letterbox: LetterboxResize::new(config.det_target_size, config.color_order),
            det_decoder: DetectionMapDecoder::new(None, Some(config.det_min_box_area)),
            sequencer: ReadingOrderSequencer::new(config.line_ratio),
            normalizer: RecognitionCropNormalizer {
                color_order: config.color_order,
                ..Default::default()
            },
            det_prob_thresh: config.det_prob_thresh,
        }
    }

    /// Runs OCR on an already-decoded image.
    ///
    /// `path_label` identifies the page in the result and in errors; any
    /// stage failure is wrapped as a page-level error carrying it.
    pub fn process_image(&self, path_label: &str, img: &RgbImage) -> OcrResult<PageResult> {
        self.run_stages(path_label, img)
            .map_err(|e| OcrError::page(path_label, e))
    }

    /// Loads an image from disk and runs OCR on it.
    ///
    /// # Errors
    ///
    /// Input validation failures (unsupported extension, undecodable file)
    /// surface directly; processing failures are page-wrapped.
    pub fn process_path(&self, path: &Path) -> OcrResult<PageResult> {
        let img = load_image(path)?;
        self.process_image(&path.to_string_lossy(), &img)
    }

    /// Processes several pages in order, stopping at the first failure.
    pub fn process_paths(&self, paths: &[PathBuf]) -> OcrResult<Vec<PageResult>> {
        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            pages.push(self.process_path(path)?);
        }
        Ok(pages)
    }

    fn run_stages(&self, path_label: &str, img: &RgbImage) -> OcrResult<PageResult> {
        let (width, height) = img.dimensions();

        let (tensor, transform) = self.letterbox.apply(img)?;
        let map = self
            .detector
            .infer(&tensor)
            .map_err(OcrError::inference)?;
        let map_boxes = self.det_decoder.decode_with_thresh(&map, self.det_prob_thresh);
        let page_boxes = transform.remap_boxes(&map_boxes);
        let sequence = self.sequencer.sequence(&page_boxes);

        let mut texts: Vec<Option<String>> = Vec::with_capacity(sequence.len());
        for bx in &sequence {
            if bx.is_line_break() {
                texts.push(None);
                continue;
            }
            let Some(input) = self.normalizer.normalize(img, bx)? else {
                texts.push(None);
                continue;
            };
            let logits = self.recognizer.infer(&input).map_err(OcrError::inference)?;
            texts.push(Some(self.decoder.decode(&logits)));
        }

        tracing::debug!(
            "{path_label}: {} boxes detected, {} sequenced entries",
            page_boxes.len(),
            sequence.len()
        );
        Ok(assemble_page(path_label, width, height, &sequence, &texts))
    }
}
