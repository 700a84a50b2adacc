//! NFC normalization and positioned grapheme clusters.
//!
//! Everything that enters the composer goes through [`normalize`], so a
//! decomposed `e` + U+0301 and a precomposed `é` measure and cut the same.
//! [`clusters`] walks already-normalized text and reports where each cluster
//! sits and how many terminal cells it takes.

use crate::egc_width;
use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};
use unicode_segmentation::{GraphemeIndices, UnicodeSegmentation};

/// NFC form of `input`. Text that is already NFC is copied without
/// re-composing.
pub fn normalize(input: &str) -> String {
    match is_nfc_quick(input.chars()) {
        IsNormalized::Yes => input.to_owned(),
        IsNormalized::No | IsNormalized::Maybe => input.nfc().collect(),
    }
}

/// A grapheme cluster and its position in the text it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster<'a> {
    pub text: &'a str,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Terminal cells.
    pub width: u16,
}

impl Cluster<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self.text, "\n" | "\r\n" | "\r")
    }
}

pub struct Clusters<'a>(GraphemeIndices<'a>);

impl<'a> Iterator for Clusters<'a> {
    type Item = Cluster<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, text) = self.0.next()?;
        Some(Cluster {
            text,
            start,
            width: egc_width(text),
        })
    }
}

/// Extended grapheme clusters of `text` in order.
pub fn clusters(text: &str) -> Clusters<'_> {
    Clusters(text.grapheme_indices(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposed_and_precomposed_normalize_alike() {
        assert_eq!(normalize("cafe\u{0301}"), "caf\u{00E9}");
        assert_eq!(normalize("caf\u{00E9}"), "caf\u{00E9}");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn clusters_tile_the_text() {
        let text = "漢😀👨‍👩‍👧‍👦a\r\n";
        let all: Vec<_> = clusters(text).collect();
        assert_eq!(all.len(), 5);
        let mut next = 0;
        for c in &all {
            assert_eq!(c.start, next);
            next = c.end();
        }
        assert_eq!(next, text.len());
        assert_eq!(all[0].width, 2);
        assert!(all[4].is_line_break());
        assert!(!all[3].is_line_break());
    }
}
