//! Page-level OCR results.

use serde::{Deserialize, Serialize};

/// One recognized text region in original-image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, always positive.
    pub width: f32,
    /// Height, always positive.
    pub height: f32,
    /// Recognized text for this region.
    pub text: String,
}

/// The assembled OCR result for a single page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Label identifying the source image, usually its path.
    pub path: String,
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Recognized regions in reading order.
    pub boxes: Vec<DetectedBox>,
}

impl PageResult {
    /// Joins all recognized texts with single spaces, in reading order.
    pub fn joined_text(&self) -> String {
        self.boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_text() {
        let page = PageResult {
            path: "p.png".into(),
            width: 100,
            height: 100,
            boxes: vec![
                DetectedBox {
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                    text: "Hello".into(),
                },
                DetectedBox {
                    x: 20.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                    text: "World".into(),
                },
            ],
        };
        assert_eq!(page.joined_text(), "Hello World");
    }

    #[test]
    fn test_serde_round_trip() {
        let page = PageResult {
            path: "p.png".into(),
            width: 10,
            height: 20,
            boxes: Vec::new(),
        };
        let json = serde_json::to_string(&page).unwrap();
        let back: PageResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, page);
    }
}
