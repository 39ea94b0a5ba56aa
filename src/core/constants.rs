//! Default constants for the detection and recognition stages.

/// Default square side length of the detector input tensor.
pub const DEFAULT_DET_TARGET_SIZE: u32 = 1024;

/// Default probability threshold for standalone detection-map decoding.
pub const DEFAULT_DET_PROB_THRESH: f32 = 0.3;

/// Probability threshold used by the integrated per-page pipeline.
///
/// Intentionally much lower than [`DEFAULT_DET_PROB_THRESH`]; the two call
/// sites have always used different values and are kept configurable rather
/// than unified (see DESIGN.md).
pub const PIPELINE_DET_PROB_THRESH: f32 = 0.001;

/// Default minimum area (map-space pixels squared) for a detected box.
pub const DEFAULT_MIN_BOX_AREA: f32 = 9.0;

/// Gamma exponent applied to raw (non-probability) detection maps.
pub const DET_MAP_GAMMA: f32 = 1.3;

/// Default ratio applied to the median box side when computing the
/// reading-order line threshold.
pub const DEFAULT_LINE_RATIO: f32 = 0.5;

/// Target height of the recognizer input tensor.
pub const DEFAULT_REC_HEIGHT: u32 = 32;

/// Minimum width of the recognizer input tensor.
pub const DEFAULT_REC_MIN_WIDTH: u32 = 48;

/// Maximum width of the recognizer input tensor.
pub const DEFAULT_REC_MAX_WIDTH: u32 = 512;

/// Per-channel mean used when normalizing recognizer crops.
pub const REC_MEAN: [f32; 3] = [0.5, 0.5, 0.5];

/// Per-channel standard deviation used when normalizing recognizer crops.
pub const REC_STD: [f32; 3] = [0.5, 0.5, 0.5];

/// Horizontal crop padding ratios (left, right). The right pad is 1.5x the
/// left one; recognizers tend to truncate trailing glyphs otherwise.
pub const CROP_PAD_LEFT_RATIO: f32 = 0.05;
pub const CROP_PAD_RIGHT_RATIO: f32 = 0.075;

/// Vertical crop padding ratio, applied on both sides.
pub const CROP_PAD_VERTICAL_RATIO: f32 = 0.30;

/// Re-padding ratios applied after the ink-profile trim.
pub const TRIM_PAD_HORIZONTAL_RATIO: f32 = 0.15;
pub const TRIM_PAD_VERTICAL_RATIO: f32 = 0.25;

/// Fraction of the theoretical maximum column/row ink required for the
/// trim window to consider a column/row occupied.
pub const TRIM_INK_FRACTION: f32 = 0.01;

/// JPEG quality used when re-encoding page backgrounds for the document.
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

/// Ratio of box height used as the overlay font size.
pub const OVERLAY_FONT_RATIO: f32 = 0.7;

/// Minimum overlay font size in points.
pub const OVERLAY_MIN_FONT_SIZE: f32 = 4.0;

/// Widening factor applied to the box width before computing the horizontal
/// text scale, compensating for metric mismatch between the measuring font
/// and whatever glyphs the viewer substitutes.
pub const OVERLAY_WIDTH_FUDGE: f32 = 1.05;

/// Alpha of the highlight rectangle drawn behind matched text.
pub const OVERLAY_HIGHLIGHT_ALPHA: f32 = 0.35;
