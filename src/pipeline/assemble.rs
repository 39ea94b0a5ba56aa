//! Assembly of sequenced boxes and recognized texts into a page result.

use crate::pipeline::result::{DetectedBox, PageResult};
use crate::processors::geometry::OrientedBox;

/// Builds the final [`PageResult`] from a reading-order sequence and the
/// recognized text for each entry.
///
/// `texts` is index-aligned with `sequence`; line-break sentinels carry
/// `None`. A sequence entry with no text at its index (absent text, or a
/// `texts` slice shorter than the sequence) is treated as skipped upstream
/// and dropped, as are entries that clamp down to a non-positive size at
/// the page borders. Surviving boxes are clamped to
/// `[0, width] x [0, height]`.
pub fn assemble_page(
    path: &str,
    width: u32,
    height: u32,
    sequence: &[OrientedBox],
    texts: &[Option<String>],
) -> PageResult {
    let mut boxes = Vec::new();
    let mut dropped = 0usize;
    for (index, bx) in sequence.iter().enumerate() {
        if bx.is_line_break() {
            continue;
        }
        let Some(text) = texts.get(index).and_then(|t| t.as_ref()) else {
            dropped += 1;
            continue;
        };
        if text.trim().is_empty() {
            dropped += 1;
            continue;
        }

        let (x, y, w, h) = bx.bounding_rect();
        let x0 = x.max(0.0);
        let y0 = y.max(0.0);
        let x1 = (x + w).min(width as f32);
        let y1 = (y + h).min(height as f32);
        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            dropped += 1;
            continue;
        }

        boxes.push(DetectedBox {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
            text: text.clone(),
        });
    }

    if dropped > 0 {
        tracing::debug!("page assembly dropped {dropped} boxes for {path}");
    }
    PageResult {
        path: path.to_string(),
        width,
        height,
        boxes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::geometry::Point;

    #[test]
    fn test_assemble_clamps_and_drops() {
        let sequence = vec![
            // Hangs off the left edge, survives clamped
            OrientedBox::new(Point::new(0.0, 50.0), 40.0, 10.0, 0.0),
            OrientedBox::line_break(),
            // Entirely outside the page, dropped
            OrientedBox::new(Point::new(-100.0, -100.0), 10.0, 10.0, 0.0),
            OrientedBox::line_break(),
        ];
        let texts = vec![Some("edge".to_string()), None, Some("gone".to_string()), None];

        let page = assemble_page("p.png", 100, 100, &sequence, &texts);
        assert_eq!(page.boxes.len(), 1);
        let b = &page.boxes[0];
        assert_eq!(b.x, 0.0);
        assert!((b.width - 20.0).abs() < 1e-5);
        assert_eq!(b.text, "edge");
    }

    #[test]
    fn test_assemble_skips_missing_text() {
        let sequence = vec![
            OrientedBox::new(Point::new(50.0, 50.0), 20.0, 10.0, 0.0),
            OrientedBox::line_break(),
        ];
        let texts = vec![None, None];
        let page = assemble_page("p.png", 100, 100, &sequence, &texts);
        assert!(page.boxes.is_empty());
    }

    #[test]
    fn test_assemble_short_texts_drop_unmatched() {
        // Boxes beyond the end of the texts slice count as skipped upstream
        let sequence = vec![
            OrientedBox::new(Point::new(30.0, 20.0), 20.0, 10.0, 0.0),
            OrientedBox::new(Point::new(30.0, 50.0), 20.0, 10.0, 0.0),
        ];
        let texts = vec![Some("kept".to_string())];
        let page = assemble_page("p.png", 100, 100, &sequence, &texts);

        assert_eq!(page.boxes.len(), 1);
        assert_eq!(page.boxes[0].text, "kept");
    }

    #[test]
    fn test_assemble_bounds_invariant() {
        let sequence = vec![OrientedBox::new(Point::new(95.0, 95.0), 30.0, 30.0, 0.0)];
        let texts = vec![Some("corner".to_string())];
        let page = assemble_page("p.png", 100, 100, &sequence, &texts);

        for b in &page.boxes {
            assert!(b.x >= 0.0 && b.y >= 0.0);
            assert!(b.x + b.width <= 100.0);
            assert!(b.y + b.height <= 100.0);
            assert!(b.width > 0.0 && b.height > 0.0);
        }
    }
}
