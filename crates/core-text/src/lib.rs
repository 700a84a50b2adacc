//! Text primitives shared by the gauge and the composer.
//!
//! Every offset handed out by this crate is a UTF-8 byte offset into the
//! caller's `&str` and always lands on a grapheme cluster boundary. Lengths
//! reported to the gauge are measured by a [`LengthMetric`], which counts in
//! its own units (UTF-16 code units by default).

pub mod metric;
pub mod segment;
pub mod width;

pub use metric::{LengthMetric, MetricKind, Utf16Length, WeightedLength};
pub use width::egc_width;

/// Number of UTF-16 code units needed to encode `text`.
///
/// A single astral code point (most emoji) counts as two.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a string.
    pub fn iter(text: &str) -> impl Iterator<Item = &str> {
        text.graphemes(true)
    }

    /// Previous grapheme boundary (returns 0 if already at or below 1st boundary).
    pub fn prev_boundary(text: &str, byte: usize) -> usize {
        if byte == 0 || byte > text.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in text.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns text.len() if at or beyond end).
    pub fn next_boundary(text: &str, byte: usize) -> usize {
        if byte >= text.len() {
            return text.len();
        }
        for (idx, _) in text.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        text.len()
    }

    /// Largest grapheme boundary that is `<= byte`.
    ///
    /// Used to pull an arbitrary offset back out of the middle of a cluster.
    pub fn floor_boundary(text: &str, byte: usize) -> usize {
        if byte >= text.len() {
            return text.len();
        }
        let mut last = 0;
        for (idx, _) in text.grapheme_indices(true) {
            if idx > byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Whether `byte` sits on a grapheme boundary (both ends count).
    pub fn is_boundary(text: &str, byte: usize) -> bool {
        floor_boundary(text, byte) == byte
    }
}
