//! Post-processing for the text detection map.
//!
//! Turns the detector's raw output tensor into a set of oriented region
//! boxes in input-tensor space: binarize the probability map, bridge
//! word-internal gaps with dilation, extract external contours, and fit a
//! minimum-area rectangle to each.

use crate::core::constants::{DEFAULT_DET_PROB_THRESH, DEFAULT_MIN_BOX_AREA, DET_MAP_GAMMA};
use crate::core::{Tensor3D, Tensor4D};
use crate::processors::geometry::{OrientedBox, Point, min_area_rect};
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use ndarray::{ArrayView2, Axis};

/// Raw detector output, tagged by rank.
///
/// Exported detection models disagree on whether they emit a channel axis;
/// the variant is resolved once here instead of re-inferring the shape at
/// every access.
#[derive(Debug, Clone)]
pub enum DetectionMap {
    /// Shape `[batch, H, W]`.
    Rank3(Tensor3D),
    /// Shape `[batch, channel, H, W]`; channel 0 is used.
    Rank4(Tensor4D),
}

impl DetectionMap {
    /// Returns the single-channel probability map of the first batch item.
    pub fn channel(&self) -> ArrayView2<'_, f32> {
        match self {
            DetectionMap::Rank3(t) => t.index_axis(Axis(0), 0),
            DetectionMap::Rank4(t) => t.index_axis(Axis(0), 0).index_axis_move(Axis(0), 0),
        }
    }
}

/// Decoder for raw detection maps.
#[derive(Debug)]
pub struct DetectionMapDecoder {
    /// Threshold applied to the probability map (default 0.3 for standalone
    /// use; the integrated pipeline deliberately passes a much lower value
    /// through [`DetectionMapDecoder::decode_with_thresh`]).
    pub prob_thresh: f32,
    /// Minimum area, in map-space pixels squared, below which a fitted
    /// rectangle is discarded.
    pub min_box_area: f32,
}

impl Default for DetectionMapDecoder {
    fn default() -> Self {
        Self {
            prob_thresh: DEFAULT_DET_PROB_THRESH,
            min_box_area: DEFAULT_MIN_BOX_AREA,
        }
    }
}

impl DetectionMapDecoder {
    /// Creates a new decoder with optional overrides.
    pub fn new(prob_thresh: Option<f32>, min_box_area: Option<f32>) -> Self {
        Self {
            prob_thresh: prob_thresh.unwrap_or(DEFAULT_DET_PROB_THRESH),
            min_box_area: min_box_area.unwrap_or(DEFAULT_MIN_BOX_AREA),
        }
    }

    /// Decodes the map using the configured probability threshold.
    pub fn decode(&self, map: &DetectionMap) -> Vec<OrientedBox> {
        self.decode_with_thresh(map, self.prob_thresh)
    }

    /// Decodes the map with an explicit probability threshold.
    ///
    /// If any map value falls outside `[0, 1]` the map is treated as raw
    /// logits and a fixed gamma (`v^1.3`) is applied to sharpen contrast
    /// before binarization; negative values are clamped to zero first, so
    /// they always binarize to "off". That step is a reproduced heuristic,
    /// not a calibrated transform.
    pub fn decode_with_thresh(&self, map: &DetectionMap, prob_thresh: f32) -> Vec<OrientedBox> {
        let pred = map.channel();
        let (height, width) = (pred.shape()[0], pred.shape()[1]);
        if height == 0 || width == 0 {
            return Vec::new();
        }

        let mut min_v = f32::INFINITY;
        let mut max_v = f32::NEG_INFINITY;
        for &v in pred.iter() {
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
        let raw_logits = min_v < 0.0 || max_v > 1.0;
        if raw_logits {
            tracing::debug!(
                "detection map outside [0,1] (min={min_v}, max={max_v}); applying gamma {DET_MAP_GAMMA}"
            );
        }

        // Rescale to 8-bit and binarize at prob_thresh * 255
        let cutoff = prob_thresh * 255.0;
        let mut binary = GrayImage::new(width as u32, height as u32);
        for y in 0..height {
            for x in 0..width {
                let mut v = pred[[y, x]];
                if raw_logits {
                    v = v.max(0.0).powf(DET_MAP_GAMMA);
                }
                let scaled = (v * 255.0).clamp(0.0, 255.0);
                let on = scaled > cutoff;
                binary.put_pixel(x as u32, y as u32, Luma([if on { 255 } else { 0 }]));
            }
        }

        // Two 3x3 dilation passes bridge gaps between strokes of one word
        let dilated = morphology::dilate(&binary, Norm::LInf, 2);

        let contours = find_contours::<u32>(&dilated);
        let mut boxes = Vec::new();
        for contour in &contours {
            if contour.border_type != BorderType::Outer || contour.parent.is_some() {
                continue;
            }
            if contour.points.len() < 3 {
                continue;
            }

            let points: Vec<Point> = contour
                .points
                .iter()
                .map(|p| Point::new(p.x as f32, p.y as f32))
                .collect();
            let rect = min_area_rect(&points);
            if rect.area() < self.min_box_area {
                continue;
            }
            boxes.push(rect);
        }

        tracing::debug!(
            "detection decode: {} contours, {} boxes kept (thresh={prob_thresh})",
            contours.len(),
            boxes.len()
        );
        boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_block(h: usize, w: usize, x0: usize, y0: usize, bw: usize, bh: usize) -> Tensor4D {
        let mut t = Tensor4D::zeros((1, 1, h, w));
        for y in y0..(y0 + bh) {
            for x in x0..(x0 + bw) {
                t[[0, 0, y, x]] = 0.9;
            }
        }
        t
    }

    #[test]
    fn test_decode_single_block() {
        let map = DetectionMap::Rank4(map_with_block(64, 64, 10, 20, 30, 8));
        let decoder = DetectionMapDecoder::default();
        let boxes = decoder.decode(&map);

        assert_eq!(boxes.len(), 1);
        let (x, y, w, h) = boxes[0].bounding_rect();
        // Dilation widens the region by up to 2 pixels per side
        assert!(x >= 7.0 && x <= 10.0);
        assert!(y >= 17.0 && y <= 20.0);
        assert!(w >= 29.0 && w <= 35.0);
        assert!(h >= 7.0 && h <= 13.0);
    }

    #[test]
    fn test_decode_rank3_matches_rank4() {
        let rank4 = map_with_block(64, 64, 10, 20, 30, 8);
        let rank3 = rank4
            .clone()
            .into_shape_with_order((1, 64, 64))
            .unwrap();
        let decoder = DetectionMapDecoder::default();

        let a = decoder.decode(&DetectionMap::Rank4(rank4));
        let b = decoder.decode(&DetectionMap::Rank3(rank3));
        assert_eq!(a.len(), b.len());
        assert!((a[0].area() - b[0].area()).abs() < 1e-3);
    }

    #[test]
    fn test_decode_min_area_filter() {
        // A 1x1 activation survives thresholding but not the area filter
        let mut t = Tensor4D::zeros((1, 1, 32, 32));
        t[[0, 0, 5, 5]] = 0.9;
        let decoder = DetectionMapDecoder::new(Some(0.3), Some(100.0));
        assert!(decoder.decode(&DetectionMap::Rank4(t)).is_empty());
    }

    #[test]
    fn test_decode_negative_logits_stay_off() {
        // Raw logits: negative background, positive block. Negatives clamp
        // to zero ahead of the gamma and never cross the threshold.
        let mut t = Tensor4D::from_elem((1, 1, 64, 64), -3.5);
        for y in 20..30 {
            for x in 10..40 {
                t[[0, 0, y, x]] = 2.0;
            }
        }
        let decoder = DetectionMapDecoder::default();
        let boxes = decoder.decode(&DetectionMap::Rank4(t));

        assert_eq!(boxes.len(), 1);
        let (x, y, _, _) = boxes[0].bounding_rect();
        assert!(x >= 7.0 && y >= 17.0);
    }

    #[test]
    fn test_decode_empty_map() {
        let map = DetectionMap::Rank4(Tensor4D::zeros((1, 1, 32, 32)));
        let decoder = DetectionMapDecoder::default();
        assert!(decoder.decode(&map).is_empty());
    }

    #[test]
    fn test_decode_deterministic() {
        let map = DetectionMap::Rank4(map_with_block(64, 64, 4, 4, 20, 10));
        let decoder = DetectionMapDecoder::default();
        let a = decoder.decode(&map);
        let b = decoder.decode(&map);
        assert_eq!(a, b);
    }
}
