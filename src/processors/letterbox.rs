//! Letterbox preprocessing for the detection model.
//!
//! Resizes a page image into a fixed square tensor while preserving aspect
//! ratio, recording the transform so that detected boxes can be mapped back
//! into original-image pixel space.

use crate::core::{OcrError, Tensor4D, constants::DEFAULT_DET_TARGET_SIZE};
use crate::processors::geometry::{OrientedBox, Point, min_area_rect};
use crate::processors::types::ColorOrder;
use image::RgbImage;

/// The invertible part of a letterbox operation.
///
/// `pad_x`/`pad_y` are computed by truncating division of the leftover
/// space in half; for an odd remainder the spare pixel lands on the
/// right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxTransform {
    /// The uniform scale applied to the source image.
    pub scale: f32,
    /// Horizontal offset of the resized image on the square canvas.
    pub pad_x: u32,
    /// Vertical offset of the resized image on the square canvas.
    pub pad_y: u32,
}

impl LetterboxTransform {
    /// Maps boxes from detection-map pixel space back into original-image
    /// pixel space.
    ///
    /// Each box's four corners are inverse-transformed and the minimum-area
    /// rectangle is recomputed from them, rather than naively rescaling
    /// center and size, to keep the numbers consistent with how the boxes
    /// were derived. The scale is guaranteed non-zero by the preprocessor.
    pub fn remap_boxes(&self, boxes: &[OrientedBox]) -> Vec<OrientedBox> {
        boxes
            .iter()
            .map(|bx| {
                let corners: Vec<Point> = bx
                    .corner_points()
                    .iter()
                    .map(|p| {
                        Point::new(
                            (p.x - self.pad_x as f32) / self.scale,
                            (p.y - self.pad_y as f32) / self.scale,
                        )
                    })
                    .collect();
                min_area_rect(&corners)
            })
            .collect()
    }
}

/// Letterbox preprocessor producing the detector input tensor.
#[derive(Debug)]
pub struct LetterboxResize {
    /// Side length of the square output tensor.
    pub target: u32,
    /// Channel order expected by the detector.
    pub color_order: ColorOrder,
}

impl Default for LetterboxResize {
    fn default() -> Self {
        Self {
            target: DEFAULT_DET_TARGET_SIZE,
            color_order: ColorOrder::Bgr,
        }
    }
}

impl LetterboxResize {
    /// Creates a new letterbox preprocessor.
    pub fn new(target: u32, color_order: ColorOrder) -> Self {
        Self {
            target,
            color_order,
        }
    }

    /// Resizes and pads the image into a `[1, 3, target, target]` tensor
    /// with each channel scaled to `[0, 1]`, returning the tensor together
    /// with the transform needed to invert the operation.
    ///
    /// # Errors
    ///
    /// Fails only for an empty source image. Extreme aspect ratios are
    /// accepted and degenerate to a near-zero dimension.
    pub fn apply(&self, img: &RgbImage) -> Result<(Tensor4D, LetterboxTransform), OcrError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::invalid_input("empty source image"));
        }

        let target = self.target;
        let scale = (target as f32 / width as f32).min(target as f32 / height as f32);
        let new_w = ((width as f32 * scale).round() as u32).max(1);
        let new_h = ((height as f32 * scale).round() as u32).max(1);

        let pad_x = (target - new_w.min(target)) / 2;
        let pad_y = (target - new_h.min(target)) / 2;

        // Triangle matches cv2.resize INTER_LINEAR
        let resized =
            image::imageops::resize(img, new_w, new_h, image::imageops::FilterType::Triangle);

        let mut tensor = Tensor4D::zeros((1, 3, target as usize, target as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let tx = (x + pad_x) as usize;
            let ty = (y + pad_y) as usize;
            if tx >= target as usize || ty >= target as usize {
                continue;
            }
            for c in 0..3 {
                let src = self.color_order.source_channel(c);
                tensor[[0, c, ty, tx]] = pixel[src] as f32 / 255.0;
            }
        }

        Ok((
            tensor,
            LetterboxTransform {
                scale,
                pad_x,
                pad_y,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_empty_image_fails() {
        let letterbox = LetterboxResize::new(64, ColorOrder::Rgb);
        let img = RgbImage::new(0, 0);
        assert!(letterbox.apply(&img).is_err());
    }

    #[test]
    fn test_apply_shape_and_padding() {
        let letterbox = LetterboxResize::new(100, ColorOrder::Rgb);
        let img = RgbImage::from_pixel(200, 100, image::Rgb([255, 0, 0]));

        let (tensor, transform) = letterbox.apply(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 100, 100]);
        assert!((transform.scale - 0.5).abs() < 1e-6);
        assert_eq!(transform.pad_x, 0);
        assert_eq!(transform.pad_y, 25);

        // Padding rows stay zero; image rows carry the red channel
        assert_eq!(tensor[[0, 0, 0, 50]], 0.0);
        assert!((tensor[[0, 0, 50, 50]] - 1.0).abs() < 1e-6);
        assert_eq!(tensor[[0, 1, 50, 50]], 0.0);
    }

    #[test]
    fn test_channel_swap_bgr() {
        let letterbox = LetterboxResize::new(10, ColorOrder::Bgr);
        let img = RgbImage::from_pixel(10, 10, image::Rgb([255, 0, 0]));
        let (tensor, _) = letterbox.apply(&img).unwrap();

        // Red lands in the last tensor channel under BGR order
        assert_eq!(tensor[[0, 0, 5, 5]], 0.0);
        assert!((tensor[[0, 2, 5, 5]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_letterbox_round_trip() {
        // A box placed exactly over the resized image on the canvas must
        // map back to the full original image.
        let (w, h, target) = (200u32, 100u32, 128u32);
        let letterbox = LetterboxResize::new(target, ColorOrder::Rgb);
        let img = RgbImage::new(w, h);
        let (_, transform) = letterbox.apply(&img).unwrap();

        let scaled_w = w as f32 * transform.scale;
        let scaled_h = h as f32 * transform.scale;
        let canvas_box = OrientedBox::new(
            Point::new(
                transform.pad_x as f32 + scaled_w / 2.0,
                transform.pad_y as f32 + scaled_h / 2.0,
            ),
            scaled_w,
            scaled_h,
            0.0,
        );

        let remapped = transform.remap_boxes(&[canvas_box]);
        let (x, y, bw, bh) = remapped[0].bounding_rect();
        assert!(x.abs() < 1e-2);
        assert!(y.abs() < 1e-2);
        assert!((bw - w as f32).abs() < 1e-1);
        assert!((bh - h as f32).abs() < 1e-1);
    }
}
