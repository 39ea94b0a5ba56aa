//! Greedy CTC decoding of recognizer logits.

use crate::core::Tensor3D;
use crate::processors::types::LogitsLayout;

/// Greedy decoder mapping recognizer logits to text.
///
/// Takes the argmax class at every timestep, then applies the CTC collapse
/// rule: drop blanks, and drop a class that repeats the previous timestep's
/// class.
#[derive(Debug, Clone)]
pub struct CtcGreedyDecoder {
    /// Characters indexed by class id.
    pub vocabulary: Vec<char>,
    /// Class id reserved for the CTC blank.
    pub blank_index: usize,
    /// Layout assumed when the time and class axes have equal length.
    pub square_layout: LogitsLayout,
}

impl CtcGreedyDecoder {
    /// Creates a decoder over the given vocabulary.
    ///
    /// When `blank_index` is `None` the blank is placed one past the last
    /// vocabulary entry, matching the common export convention.
    pub fn new(vocabulary: Vec<char>, blank_index: Option<usize>) -> Self {
        let blank = blank_index.unwrap_or(vocabulary.len());
        Self {
            vocabulary,
            blank_index: blank,
            square_layout: LogitsLayout::TimeMajor,
        }
    }

    /// Creates a decoder from a string of vocabulary characters.
    pub fn from_characters(characters: &str, blank_index: Option<usize>) -> Self {
        Self::new(characters.chars().collect(), blank_index)
    }

    /// Overrides the layout assumed for square logits tensors.
    pub fn with_square_layout(mut self, layout: LogitsLayout) -> Self {
        self.square_layout = layout;
        self
    }

    /// Decodes a `[1, T, C]` or `[1, C, T]` logits tensor into text.
    ///
    /// The class axis is taken to be the smaller of the two trailing
    /// dimensions; when they are equal the configured square layout breaks
    /// the tie.
    pub fn decode(&self, logits: &Tensor3D) -> String {
        self.decode_with_blank(logits, self.blank_index)
    }

    /// Decodes with an explicit blank index in place of the configured one.
    ///
    /// Kept for callers that need to probe a model whose blank placement
    /// is uncertain; the standard path is [`CtcGreedyDecoder::decode`].
    pub fn decode_with_blank_override(
        &self,
        logits: &Tensor3D,
        blank_index: Option<usize>,
    ) -> String {
        self.decode_with_blank(logits, blank_index.unwrap_or(self.blank_index))
    }

    fn decode_with_blank(&self, logits: &Tensor3D, blank_index: usize) -> String {
        let shape = logits.shape();
        let (d1, d2) = (shape[1], shape[2]);
        let layout = if d1 < d2 {
            LogitsLayout::ClassMajor
        } else if d2 < d1 {
            LogitsLayout::TimeMajor
        } else {
            self.square_layout
        };
        let (steps, classes) = match layout {
            LogitsLayout::TimeMajor => (d1, d2),
            LogitsLayout::ClassMajor => (d2, d1),
        };

        let mut text = String::new();
        let mut prev: Option<usize> = None;
        for t in 0..steps {
            let best = (0..classes)
                .map(|c| {
                    let v = match layout {
                        LogitsLayout::TimeMajor => logits[[0, t, c]],
                        LogitsLayout::ClassMajor => logits[[0, c, t]],
                    };
                    (c, v)
                })
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(c, _)| c);

            if let Some(idx) = best {
                if idx != blank_index && prev != Some(idx) {
                    if let Some(&ch) = self.vocabulary.get(idx) {
                        text.push(ch);
                    }
                }
                prev = Some(idx);
            }
        }

        tracing::debug!(
            "ctc decode: {steps} steps, {classes} classes, {} chars",
            text.chars().count()
        );
        text
    }
}
