//! Shared processor configuration types.

use serde::{Deserialize, Serialize};

/// Color channel ordering expected by a model.
///
/// Models exported from OpenCV-based training stacks usually expect BGR;
/// anything trained against decoded RGB buffers expects RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorOrder {
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl ColorOrder {
    /// Maps a tensor channel index to the source RGB channel index.
    #[inline]
    pub fn source_channel(&self, channel: usize) -> usize {
        match self {
            ColorOrder::Rgb => channel,
            ColorOrder::Bgr => 2 - channel,
        }
    }
}

/// Layout of a recognizer logits tensor.
///
/// Used to fix the class-axis convention when the time and class dimensions
/// are equal and cannot be disambiguated from the shape alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogitsLayout {
    /// Shape `[1, T, C]`: the time axis comes first.
    TimeMajor,
    /// Shape `[1, C, T]`: the class axis comes first.
    ClassMajor,
}
