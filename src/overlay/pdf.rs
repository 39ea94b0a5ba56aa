//! PDF backend for document synthesis, built on `printpdf`.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rgb, TextMatrix,
    TextRenderingMode,
};

use crate::core::{OcrError, OcrResult};
use crate::overlay::canvas::DocumentCanvas;

/// Advance widths for the ASCII range of built-in Helvetica, in 1/1000 em.
/// Taken from the Adobe core font metrics; characters outside this range
/// fall back to 0.6 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20..
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30..
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40..
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50..
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60..
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70..0x7e
];

const FALLBACK_WIDTH_EM: f32 = 0.6;

fn mm(pt: f32) -> Mm {
    Mm(f64::from(pt) * 25.4 / 72.0)
}

/// A searchable-PDF canvas.
///
/// The document is created lazily on the first page so an unused canvas
/// allocates nothing. Page images are embedded at 72 dpi, making one image
/// pixel equal one point.
pub struct PdfCanvas {
    title: String,
    doc: Option<PdfDocumentReference>,
    font: Option<IndirectFontRef>,
    current: Option<(PdfPageIndex, PdfLayerIndex)>,
    page_height_pt: f32,
}

impl PdfCanvas {
    /// Creates an empty canvas with the given document title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            doc: None,
            font: None,
            current: None,
            page_height_pt: 0.0,
        }
    }

    fn layer(&self) -> OcrResult<PdfLayerReference> {
        let doc = self
            .doc
            .as_ref()
            .ok_or_else(|| OcrError::invalid_input("no page started"))?;
        let (page, layer) = self
            .current
            .ok_or_else(|| OcrError::invalid_input("no page started"))?;
        Ok(doc.get_page(page).get_layer(layer))
    }

    fn font(&self) -> OcrResult<&IndirectFontRef> {
        self.font
            .as_ref()
            .ok_or_else(|| OcrError::invalid_input("no page started"))
    }
}

impl DocumentCanvas for PdfCanvas {
    fn begin_page(&mut self, width_pt: f32, height_pt: f32) -> OcrResult<()> {
        match &self.doc {
            None => {
                let (doc, page, layer) =
                    PdfDocument::new(self.title.clone(), mm(width_pt), mm(height_pt), "Page 1");
                let font = doc
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| OcrError::document(format!("adding builtin font: {e}")))?;
                self.doc = Some(doc);
                self.font = Some(font);
                self.current = Some((page, layer));
            }
            Some(doc) => {
                let (page, layer) = doc.add_page(mm(width_pt), mm(height_pt), "Page");
                self.current = Some((page, layer));
            }
        }
        self.page_height_pt = height_pt;
        Ok(())
    }

    fn draw_page_image(&mut self, path: &Path, _width_pt: f32, _height_pt: f32) -> OcrResult<()> {
        let layer = self.layer()?;
        let bytes = fs::read(path)?;
        // Decode with printpdf's own image crate to match its pixel types
        let decoded = printpdf::image_crate::load_from_memory(&bytes)
            .map_err(|e| OcrError::document(format!("decoding page image: {e}")))?;
        let image = printpdf::Image::from_dynamic_image(&decoded);
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(0.0)),
                rotate: None,
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(72.0),
            },
        );
        Ok(())
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let em: f32 = text
            .chars()
            .map(|c| {
                let code = c as u32;
                if (0x20..=0x7e).contains(&code) {
                    HELVETICA_WIDTHS[(code - 0x20) as usize] as f32 / 1000.0
                } else {
                    FALLBACK_WIDTH_EM
                }
            })
            .sum();
        em * font_size
    }

    fn draw_invisible_text(
        &mut self,
        text: &str,
        x: f32,
        y_top: f32,
        font_size: f32,
        h_scale: f32,
    ) -> OcrResult<()> {
        let layer = self.layer()?;
        let font = self.font()?.clone();
        let baseline = self.page_height_pt - y_top - font_size;

        layer.begin_text_section();
        layer.set_font(&font, f64::from(font_size));
        layer.set_text_rendering_mode(TextRenderingMode::Invisible);
        layer.set_text_matrix(TextMatrix::Raw([
            f64::from(h_scale),
            0.0,
            0.0,
            1.0,
            f64::from(x),
            f64::from(baseline),
        ]));
        layer.write_text(text, &font);
        layer.end_text_section();
        Ok(())
    }

    fn draw_highlight(
        &mut self,
        x: f32,
        y_top: f32,
        width: f32,
        height: f32,
        alpha: f32,
    ) -> OcrResult<()> {
        let layer = self.layer()?;
        let bottom = self.page_height_pt - y_top - height;

        // No fill opacity in this backend; approximate by blending a
        // yellow highlight toward the white page
        let blend = |c: f32| f64::from(1.0 - alpha * (1.0 - c));
        layer.set_fill_color(Color::Rgb(Rgb::new(blend(1.0), blend(1.0), blend(0.0), None)));

        let points = vec![
            (printpdf::Point::new(mm(x), mm(bottom)), false),
            (printpdf::Point::new(mm(x + width), mm(bottom)), false),
            (printpdf::Point::new(mm(x + width), mm(bottom + height)), false),
            (printpdf::Point::new(mm(x), mm(bottom + height)), false),
        ];
        layer.add_shape(Line {
            points,
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clipping_path: false,
        });
        Ok(())
    }

    fn save(self, path: &Path) -> OcrResult<()> {
        let doc = self
            .doc
            .ok_or_else(|| OcrError::invalid_input("document has no pages"))?;
        let file = fs::File::create(path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| OcrError::document(format!("writing pdf: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_ascii() {
        let canvas = PdfCanvas::new("t");
        // "Hi" = 722 + 222 thousandths of an em
        let w = canvas.text_width("Hi", 10.0);
        assert!((w - 9.44).abs() < 1e-3);
    }

    #[test]
    fn test_text_width_non_ascii_fallback() {
        let canvas = PdfCanvas::new("t");
        let w = canvas.text_width("\u{4e2d}", 10.0);
        assert!((w - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_save_without_pages_fails() {
        let canvas = PdfCanvas::new("t");
        let dir = tempfile::tempdir().unwrap();
        assert!(canvas.save(&dir.path().join("out.pdf")).is_err());
    }

    #[test]
    fn test_two_page_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = PdfCanvas::new("t");
        canvas.begin_page(612.0, 792.0).unwrap();
        canvas
            .draw_invisible_text("hello", 10.0, 10.0, 12.0, 1.0)
            .unwrap();
        canvas.draw_highlight(10.0, 10.0, 50.0, 14.0, 0.35).unwrap();
        canvas.begin_page(612.0, 792.0).unwrap();

        let out = dir.path().join("out.pdf");
        canvas.save(&out).unwrap();
        assert!(out.metadata().unwrap().len() > 0);
    }
}
