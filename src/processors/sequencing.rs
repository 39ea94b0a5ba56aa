//! Reading-order sequencing of detected text boxes.
//!
//! Groups boxes into visual lines using an adaptive vertical threshold,
//! orders them top-to-bottom then left-to-right, and marks each line end
//! with a sentinel box so downstream consumers can recover line structure.

use crate::core::constants::DEFAULT_LINE_RATIO;
use crate::processors::geometry::{BoxCorners, OrientedBox};

/// Orders detected boxes into reading sequence.
#[derive(Debug)]
pub struct ReadingOrderSequencer {
    /// Fraction of the median box height used as the same-line tolerance.
    pub line_ratio: f32,
}

impl Default for ReadingOrderSequencer {
    fn default() -> Self {
        Self {
            line_ratio: DEFAULT_LINE_RATIO,
        }
    }
}

impl ReadingOrderSequencer {
    /// Creates a sequencer with an explicit line ratio.
    pub fn new(line_ratio: f32) -> Self {
        Self { line_ratio }
    }

    /// Computes the vertical tolerance for grouping boxes into one line.
    ///
    /// The estimate is the median of each box's shorter side scaled by
    /// `line_ratio`. With fewer than three boxes there is not enough signal
    /// for a median, so the threshold collapses to zero and every box forms
    /// its own line.
    pub fn line_threshold(&self, boxes: &[OrientedBox]) -> f32 {
        if boxes.len() < 3 {
            return 0.0;
        }
        let mut sides: Vec<f32> = boxes.iter().map(|b| b.min_side()).collect();
        sides.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = sides.len() / 2;
        let median = if sides.len() % 2 == 0 {
            (sides[mid - 1] + sides[mid]) / 2.0
        } else {
            sides[mid]
        };
        median * self.line_ratio
    }

    /// Sequences boxes into reading order with line-break sentinels.
    ///
    /// Boxes are sorted by top-left corner, grouped greedily into lines
    /// (a box joins the current line if its top edge is within the
    /// threshold of the last admitted box), each line re-sorted by x, and
    /// a [`OrientedBox::line_break`] sentinel appended after every line,
    /// including the last. An empty input yields an empty sequence with no
    /// sentinel.
    pub fn sequence(&self, boxes: &[OrientedBox]) -> Vec<OrientedBox> {
        if boxes.is_empty() {
            return Vec::new();
        }
        let threshold = self.line_threshold(boxes);

        let mut sorted: Vec<OrientedBox> = boxes.to_vec();
        sorted.sort_by(|a, b| {
            let ca = BoxCorners::of(a).top_left;
            let cb = BoxCorners::of(b).top_left;
            ca.y
                .partial_cmp(&cb.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ca.x.partial_cmp(&cb.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut lines: Vec<Vec<OrientedBox>> = Vec::new();
        let mut last_top = f32::NEG_INFINITY;
        for bx in sorted {
            let top = BoxCorners::of(&bx).top_left.y;
            match lines.last_mut() {
                Some(line) if (top - last_top).abs() <= threshold => line.push(bx),
                _ => lines.push(vec![bx]),
            }
            last_top = top;
        }

        let mut out = Vec::with_capacity(boxes.len() + lines.len());
        for mut line in lines {
            line.sort_by(|a, b| {
                let xa = BoxCorners::of(a).top_left.x;
                let xb = BoxCorners::of(b).top_left.x;
                xa.partial_cmp(&xb).unwrap_or(std::cmp::Ordering::Equal)
            });
            out.extend(line);
            out.push(OrientedBox::line_break());
        }

        tracing::debug!(
            "sequenced {} boxes into {} lines (threshold={threshold})",
            boxes.len(),
            out.iter().filter(|b| b.is_line_break()).count()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::geometry::Point;

    fn word(x: f32, y: f32) -> OrientedBox {
        // Top-left (x, y), 40 wide, 10 tall
        OrientedBox::new(Point::new(x + 20.0, y + 5.0), 40.0, 10.0, 0.0)
    }

    #[test]
    fn test_sequence_empty() {
        let seq = ReadingOrderSequencer::default().sequence(&[]);
        assert!(seq.is_empty());
    }

    #[test]
    fn test_sequence_two_lines() {
        // min_side = 10 for every box, median 10, threshold 5;
        // y offsets of 2 stay within a line, 38 starts a new one
        let boxes = vec![word(50.0, 12.0), word(0.0, 10.0), word(0.0, 50.0), word(50.0, 52.0)];
        let seq = ReadingOrderSequencer::default().sequence(&boxes);

        assert_eq!(seq.len(), 6);
        assert!(seq[2].is_line_break());
        assert!(seq[5].is_line_break());

        // Each line reads left to right
        let x0 = BoxCorners::of(&seq[0]).top_left.x;
        let x1 = BoxCorners::of(&seq[1]).top_left.x;
        assert!(x0 < x1);
        let x3 = BoxCorners::of(&seq[3]).top_left.x;
        let x4 = BoxCorners::of(&seq[4]).top_left.x;
        assert!(x3 < x4);
    }

    #[test]
    fn test_sequence_under_three_boxes_splits_lines() {
        // Threshold is zero, so even close boxes land on separate lines
        let boxes = vec![word(0.0, 10.0), word(50.0, 11.0)];
        let seq = ReadingOrderSequencer::default().sequence(&boxes);
        assert_eq!(seq.len(), 4);
        assert!(seq[1].is_line_break());
        assert!(seq[3].is_line_break());
    }

    #[test]
    fn test_line_threshold_median() {
        let boxes = vec![word(0.0, 0.0), word(0.0, 20.0), word(0.0, 40.0)];
        let t = ReadingOrderSequencer::default().line_threshold(&boxes);
        assert!((t - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_line_threshold_too_few() {
        let boxes = vec![word(0.0, 0.0), word(0.0, 20.0)];
        assert_eq!(ReadingOrderSequencer::default().line_threshold(&boxes), 0.0);
    }
}
