//! Searchable-document synthesis.
//!
//! Re-renders OCR'd pages into a document whose visible content is the
//! original page image, with an invisible text layer placed over each
//! recognized box so the output is selectable and searchable.

pub mod canvas;
pub mod pdf;

pub use canvas::DocumentCanvas;
pub use pdf::PdfCanvas;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::core::constants::{
    DEFAULT_JPEG_QUALITY, OVERLAY_FONT_RATIO, OVERLAY_HIGHLIGHT_ALPHA, OVERLAY_MIN_FONT_SIZE,
    OVERLAY_WIDTH_FUDGE,
};
use crate::core::{OcrError, OcrResult};
use crate::pipeline::result::PageResult;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

/// Builds searchable documents from OCR page results.
#[derive(Debug, Clone)]
pub struct DocumentSynthesizer {
    /// Quality of the re-encoded page background images.
    pub jpeg_quality: u8,
    /// Font size as a fraction of each box height.
    pub font_ratio: f32,
    /// Lower bound on the overlay font size in points.
    pub min_font_size: f32,
    /// Widening factor applied when stretching text across its box.
    pub width_fudge: f32,
    /// Opacity of highlight rectangles.
    pub highlight_alpha: f32,
}

impl Default for DocumentSynthesizer {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            font_ratio: OVERLAY_FONT_RATIO,
            min_font_size: OVERLAY_MIN_FONT_SIZE,
            width_fudge: OVERLAY_WIDTH_FUDGE,
            highlight_alpha: OVERLAY_HIGHLIGHT_ALPHA,
        }
    }
}

impl DocumentSynthesizer {
    /// Renders `pages` onto `canvas` and saves the document to `output`.
    ///
    /// Each page image is re-encoded as JPEG into a temporary directory
    /// that is removed when this call returns, on success or failure. A
    /// box whose text is a case-insensitive substring of any entry in
    /// `highlight_targets` gets a highlight rectangle under its text.
    ///
    /// Returns the accumulated overlay text, one trailing space per box.
    pub fn synthesize<C: DocumentCanvas>(
        &self,
        mut canvas: C,
        pages: &[(&PageResult, &RgbImage)],
        output: &Path,
        highlight_targets: &[String],
    ) -> OcrResult<String> {
        let staging = tempfile::tempdir()?;
        let targets_lower: Vec<String> =
            highlight_targets.iter().map(|t| t.to_lowercase()).collect();

        let mut accumulated = String::new();
        for (index, (page, img)) in pages.iter().enumerate() {
            let jpeg_path = staging.path().join(format!("page-{index}.jpg"));
            let file = File::create(&jpeg_path)?;
            let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.jpeg_quality);
            encoder
                .encode_image(*img)
                .map_err(|e| OcrError::document(format!("encoding page {index}: {e}")))?;

            let (width_pt, height_pt) = (page.width as f32, page.height as f32);
            canvas.begin_page(width_pt, height_pt)?;
            canvas.draw_page_image(&jpeg_path, width_pt, height_pt)?;

            for bx in &page.boxes {
                if bx.text.trim().is_empty() {
                    continue;
                }
                let font_size = (bx.height * self.font_ratio).max(self.min_font_size);
                let natural = canvas.text_width(&bx.text, font_size);
                if natural <= 0.0 {
                    continue;
                }
                let h_scale = (bx.width * self.width_fudge) / natural;

                let text_lower = bx.text.to_lowercase();
                if targets_lower.iter().any(|t| t.contains(&text_lower)) {
                    canvas.draw_highlight(
                        bx.x,
                        bx.y,
                        bx.width,
                        bx.height,
                        self.highlight_alpha,
                    )?;
                }
                canvas.draw_invisible_text(&bx.text, bx.x, bx.y, font_size, h_scale)?;

                accumulated.push_str(&bx.text);
                accumulated.push(' ');
            }
        }

        canvas.save(output)?;
        tracing::debug!(
            "synthesized {} pages to {}",
            pages.len(),
            output.display()
        );
        Ok(accumulated)
    }
}
