//! The drawing surface abstraction used by document synthesis.

use std::path::Path;

use crate::core::OcrResult;

/// A multi-page drawing surface for searchable-document output.
///
/// All coordinates are in points with the origin at the top-left of the
/// current page; implementations flip to their native convention as
/// needed. Pages are drawn strictly in order: `begin_page`, the page
/// image, then any number of highlights and text runs.
pub trait DocumentCanvas {
    /// Starts a new page of the given size in points.
    fn begin_page(&mut self, width_pt: f32, height_pt: f32) -> OcrResult<()>;

    /// Draws the page background image, stretched to the given size.
    fn draw_page_image(&mut self, path: &Path, width_pt: f32, height_pt: f32) -> OcrResult<()>;

    /// Measures the natural advance width of `text` at `font_size`.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Draws an invisible text run whose baseline-relative box starts at
    /// `(x, y_top)`, horizontally scaled by `h_scale`.
    fn draw_invisible_text(
        &mut self,
        text: &str,
        x: f32,
        y_top: f32,
        font_size: f32,
        h_scale: f32,
    ) -> OcrResult<()>;

    /// Fills a highlight rectangle with the given opacity.
    fn draw_highlight(&mut self, x: f32, y_top: f32, width: f32, height: f32, alpha: f32)
        -> OcrResult<()>;

    /// Writes the finished document to `path`.
    fn save(self, path: &Path) -> OcrResult<()>
    where
        Self: Sized;
}
