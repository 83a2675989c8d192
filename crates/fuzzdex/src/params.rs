//! Parameter types for fuzzy enumeration.

use crate::error::FuzzyError;

/// Default minimum similarity when none is supplied.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.5;

/// Default required common prefix length.
pub const DEFAULT_PREFIX_LEN: usize = 0;

/// Parameters controlling a fuzzy term enumeration.
///
/// A term is emitted when its normalized Levenshtein similarity to `text`
/// strictly exceeds `min_similarity` and it starts with the first
/// `prefix_len` characters of `text`.
#[derive(Debug, Clone)]
pub struct FuzzyParams {
    /// The pattern term.
    pub text: String,
    /// Minimum required similarity, in `[0, 1)`. Default: 0.5.
    pub min_similarity: f32,
    /// Number of leading pattern characters every match must share
    /// literally. Clamped to the pattern length. Default: 0.
    pub prefix_len: usize,
}

impl FuzzyParams {
    /// Creates parameters for the given pattern with default thresholds.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            min_similarity: DEFAULT_MIN_SIMILARITY,
            prefix_len: DEFAULT_PREFIX_LEN,
        }
    }

    /// Sets the minimum required similarity.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Sets the required common prefix length.
    pub fn with_prefix_len(mut self, prefix_len: usize) -> Self {
        self.prefix_len = prefix_len;
        self
    }

    /// Rejects out-of-range thresholds before any resources are allocated.
    pub(crate) fn validate(&self) -> Result<(), FuzzyError> {
        if !(0.0..1.0).contains(&self.min_similarity) {
            return Err(FuzzyError::InvalidArgument(format!(
                "minimum similarity must be in [0, 1), got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }
}
