//! Crop extraction and normalization for the recognition model.
//!
//! Cuts a padded axis-aligned crop around each detected box, optionally
//! tightens it to the ink it actually contains, and resizes it into the
//! fixed-height normalized tensor the recognizer expects.

use crate::core::constants::{
    CROP_PAD_LEFT_RATIO, CROP_PAD_RIGHT_RATIO, CROP_PAD_VERTICAL_RATIO, DEFAULT_REC_HEIGHT,
    DEFAULT_REC_MAX_WIDTH, DEFAULT_REC_MIN_WIDTH, REC_MEAN, REC_STD, TRIM_INK_FRACTION,
    TRIM_PAD_HORIZONTAL_RATIO, TRIM_PAD_VERTICAL_RATIO,
};
use crate::core::{OcrError, Tensor4D};
use crate::processors::geometry::OrientedBox;
use crate::processors::types::ColorOrder;
use image::RgbImage;
use imageproc::contrast::otsu_level;

/// Prepares recognition input tensors from page crops.
#[derive(Debug)]
pub struct RecognitionCropNormalizer {
    /// Fixed tensor height.
    pub target_height: u32,
    /// Lower clamp on the aspect-preserving width.
    pub min_width: u32,
    /// Upper clamp on the aspect-preserving width.
    pub max_width: u32,
    /// Whether to tighten the crop around detected ink before resizing.
    pub trim_enabled: bool,
    /// Channel order expected by the recognizer.
    pub color_order: ColorOrder,
}

impl Default for RecognitionCropNormalizer {
    fn default() -> Self {
        Self {
            target_height: DEFAULT_REC_HEIGHT,
            min_width: DEFAULT_REC_MIN_WIDTH,
            max_width: DEFAULT_REC_MAX_WIDTH,
            trim_enabled: true,
            color_order: ColorOrder::Bgr,
        }
    }
}

impl RecognitionCropNormalizer {
    /// Extracts and normalizes the crop for one detected box.
    ///
    /// Returns `Ok(None)` when the padded crop degenerates to zero size,
    /// which callers treat as "nothing to recognize" rather than an error.
    ///
    /// # Errors
    ///
    /// Fails if the source image is empty.
    pub fn normalize(
        &self,
        img: &RgbImage,
        bx: &OrientedBox,
    ) -> Result<Option<Tensor4D>, OcrError> {
        let (img_w, img_h) = img.dimensions();
        if img_w == 0 || img_h == 0 {
            return Err(OcrError::invalid_input("empty source image"));
        }

        let Some(crop) = self.padded_crop(img, bx) else {
            return Ok(None);
        };
        let crop = if self.trim_enabled {
            self.trim_to_ink(&crop)
        } else {
            crop
        };

        let (cw, ch) = crop.dimensions();
        if cw == 0 || ch == 0 {
            return Ok(None);
        }

        // Aspect-preserving width, clamped and forced even
        let ratio = cw as f32 / ch as f32;
        let mut width = (ratio * self.target_height as f32).round() as u32;
        width = width.clamp(self.min_width, self.max_width);
        if width % 2 != 0 {
            width += 1;
        }

        let resized = image::imageops::resize(
            &crop,
            width,
            self.target_height,
            image::imageops::FilterType::Triangle,
        );

        let mut tensor = Tensor4D::zeros((1, 3, self.target_height as usize, width as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                let src = self.color_order.source_channel(c);
                let v = pixel[src] as f32 / 255.0;
                tensor[[0, c, y as usize, x as usize]] = (v - REC_MEAN[c]) / REC_STD[c];
            }
        }
        Ok(Some(tensor))
    }

    /// Cuts the padded axis-aligned crop around the box, clamped to the
    /// image. Returns `None` for a degenerate region.
    fn padded_crop(&self, img: &RgbImage, bx: &OrientedBox) -> Option<RgbImage> {
        let (img_w, img_h) = img.dimensions();
        let (x, y, w, h) = bx.bounding_rect();

        let x0 = (x - w * CROP_PAD_LEFT_RATIO).floor().max(0.0) as u32;
        let x1 = ((x + w + w * CROP_PAD_RIGHT_RATIO).ceil() as u32).min(img_w);
        let y0 = (y - h * CROP_PAD_VERTICAL_RATIO).floor().max(0.0) as u32;
        let y1 = ((y + h + h * CROP_PAD_VERTICAL_RATIO).ceil() as u32).min(img_h);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(image::imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image())
    }

    /// Tightens the crop to the region that actually carries ink.
    ///
    /// Ink pixels are those at or below the Otsu threshold of the grayscale
    /// crop. A column or row counts as inked when its ink mass exceeds 1%
    /// of its theoretical maximum, which keeps isolated noise pixels from
    /// stretching the window. The tight window is re-padded by a fraction
    /// of its own size. If no column or row qualifies the crop is returned
    /// unchanged.
    fn trim_to_ink(&self, crop: &RgbImage) -> RgbImage {
        let gray = image::imageops::grayscale(crop);
        let (w, h) = gray.dimensions();
        let level = otsu_level(&gray);

        let mut col_ink = vec![0u32; w as usize];
        let mut row_ink = vec![0u32; h as usize];
        for (x, y, pixel) in gray.enumerate_pixels() {
            if pixel[0] <= level {
                col_ink[x as usize] += 255;
                row_ink[y as usize] += 255;
            }
        }

        let col_cutoff = (TRIM_INK_FRACTION * h as f32 * 255.0) as u32;
        let row_cutoff = (TRIM_INK_FRACTION * w as f32 * 255.0) as u32;
        let first_col = col_ink.iter().position(|&v| v > col_cutoff);
        let last_col = col_ink.iter().rposition(|&v| v > col_cutoff);
        let first_row = row_ink.iter().position(|&v| v > row_cutoff);
        let last_row = row_ink.iter().rposition(|&v| v > row_cutoff);

        let (Some(x0), Some(x1), Some(y0), Some(y1)) = (first_col, last_col, first_row, last_row)
        else {
            return crop.clone();
        };

        let win_w = (x1 - x0 + 1) as f32;
        let win_h = (y1 - y0 + 1) as f32;
        let pad_x = (win_w * TRIM_PAD_HORIZONTAL_RATIO).round() as i64;
        let pad_y = (win_h * TRIM_PAD_VERTICAL_RATIO).round() as i64;

        let nx0 = (x0 as i64 - pad_x).max(0) as u32;
        let ny0 = (y0 as i64 - pad_y).max(0) as u32;
        let nx1 = ((x1 as i64 + 1 + pad_x) as u32).min(w);
        let ny1 = ((y1 as i64 + 1 + pad_y) as u32).min(h);

        image::imageops::crop_imm(crop, nx0, ny0, nx1 - nx0, ny1 - ny0).to_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::geometry::Point;

    fn white_page(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, image::Rgb([255, 255, 255]))
    }

    #[test]
    fn test_normalize_shape() {
        let norm = RecognitionCropNormalizer {
            trim_enabled: false,
            ..Default::default()
        };
        let img = white_page(400, 200);
        let bx = OrientedBox::new(Point::new(100.0, 50.0), 96.0, 32.0, 0.0);

        let tensor = norm.normalize(&img, &bx).unwrap().unwrap();
        let shape = tensor.shape();
        assert_eq!(shape[0], 1);
        assert_eq!(shape[1], 3);
        assert_eq!(shape[2], 32);
        assert_eq!(shape[3] % 2, 0);
        assert!(shape[3] >= 48 && shape[3] <= 512);
    }

    #[test]
    fn test_normalize_width_clamps() {
        let norm = RecognitionCropNormalizer {
            trim_enabled: false,
            ..Default::default()
        };
        let img = white_page(2000, 200);

        // Very narrow box clamps to min width
        let narrow = OrientedBox::new(Point::new(100.0, 50.0), 10.0, 40.0, 0.0);
        let t = norm.normalize(&img, &narrow).unwrap().unwrap();
        assert_eq!(t.shape()[3], 48);

        // Very wide box clamps to max width
        let wide = OrientedBox::new(Point::new(1000.0, 50.0), 1900.0, 20.0, 0.0);
        let t = norm.normalize(&img, &wide).unwrap().unwrap();
        assert_eq!(t.shape()[3], 512);
    }

    #[test]
    fn test_normalize_degenerate_box() {
        let norm = RecognitionCropNormalizer::default();
        let img = white_page(100, 100);
        let bx = OrientedBox::new(Point::new(-500.0, -500.0), 10.0, 10.0, 0.0);
        assert!(norm.normalize(&img, &bx).unwrap().is_none());
    }

    #[test]
    fn test_normalize_value_range() {
        let norm = RecognitionCropNormalizer {
            trim_enabled: false,
            color_order: ColorOrder::Rgb,
            ..Default::default()
        };
        let img = white_page(200, 100);
        let bx = OrientedBox::new(Point::new(100.0, 50.0), 100.0, 30.0, 0.0);

        let tensor = norm.normalize(&img, &bx).unwrap().unwrap();
        // White maps to (1.0 - 0.5) / 0.5 = 1.0
        assert!((tensor[[0, 0, 16, 16]] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_trim_tightens_to_ink() {
        let norm = RecognitionCropNormalizer::default();
        let mut img = white_page(400, 120);
        // A compact ink blob inside a much wider detected box
        for y in 30..70 {
            for x in 170..230 {
                img.put_pixel(x, y, image::Rgb([0, 0, 0]));
            }
        }
        let bx = OrientedBox::new(Point::new(200.0, 60.0), 380.0, 100.0, 0.0);

        let trimmed = norm.normalize(&img, &bx).unwrap().unwrap();
        let loose = RecognitionCropNormalizer {
            trim_enabled: false,
            ..Default::default()
        }
        .normalize(&img, &bx)
        .unwrap()
        .unwrap();

        // The trimmed crop has a smaller aspect ratio, hence narrower tensor
        assert!(trimmed.shape()[3] < loose.shape()[3]);
    }
}
