//! Encoded length checks for header text fields.
//!
//! Names and comments are written as UTF-8, so their limit applies to the
//! encoded byte count rather than the number of characters.

use log::trace;

/// Widest UTF-8 encoding of a single `char`.
pub const MAX_CHAR_WIDTH: usize = 4;

/// Checks that a text field fits a byte limit once encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLengthValidator {
    limit: usize,
}

impl TextLengthValidator {
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Worst-case encoded length: every character at full width.
    pub fn fast_upper_bound(text: &str) -> usize {
        text.chars().count().saturating_mul(MAX_CHAR_WIDTH)
    }

    /// Exact encoded length, using the same per-char widths as the UTF-8
    /// encoder that produces the header bytes.
    pub fn exact_length(text: &str) -> usize {
        text.chars().map(char::len_utf8).sum()
    }

    /// Whether `text` fits the limit. The exact pass only runs when the
    /// worst-case bound exceeds the limit.
    pub fn fits(&self, text: &str) -> bool {
        if Self::fast_upper_bound(text) <= self.limit {
            return true;
        }
        trace!(
            "text of {} chars may exceed {} bytes, measuring exactly",
            text.chars().count(),
            self.limit
        );
        Self::exact_length(text) <= self.limit
    }
}
