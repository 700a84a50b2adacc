//! Decorations laid over the wrapped composer text.
//!
//! The composer turns the caret and the overflow highlight into row-local
//! column ranges here, and only [`StyleLayer::apply`] touches cell styles.
//! Ranges are half-open in screen columns and always start and end on
//! cluster edges because they come from the same wrap that placed the text.
//! Later spans win; the cursor goes in last so it shows on a red background.

use crate::{CellFlags, Frame};
use core_gauge::Rgba;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    InvertCursor,
    OverflowHighlight(Rgba),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleSpan {
    /// Row relative to the top of the text area.
    pub line: u16,
    pub start_col: u16,
    pub end_col: u16,
    pub attr: StyleAttr,
}

impl StyleSpan {
    pub fn cols(&self) -> Range<u16> {
        self.start_col..self.end_col.max(self.start_col)
    }

    pub fn width(&self) -> u16 {
        self.cols().len() as u16
    }
}

#[derive(Default, Debug)]
pub struct StyleLayer {
    spans: Vec<StyleSpan>,
}

impl StyleLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty ranges are ignored.
    pub fn push(&mut self, span: StyleSpan) {
        if !span.cols().is_empty() {
            self.spans.push(span);
        }
    }

    pub fn spans(&self) -> &[StyleSpan] {
        &self.spans
    }

    pub fn cursor_span(&self) -> Option<&StyleSpan> {
        self.spans
            .iter()
            .rfind(|s| s.attr == StyleAttr::InvertCursor)
    }

    pub fn overflow_spans(&self) -> impl Iterator<Item = &StyleSpan> {
        self.spans
            .iter()
            .filter(|s| matches!(s.attr, StyleAttr::OverflowHighlight(_)))
    }

    /// Paint the spans onto `frame`; span row 0 lands on frame row `top`.
    pub fn apply(&self, frame: &mut Frame, top: u16) {
        for span in &self.spans {
            let row = top.saturating_add(span.line);
            let (x, w) = (span.start_col, span.width());
            match span.attr {
                StyleAttr::InvertCursor => {
                    frame.apply_flags_span(x, row, w, CellFlags::REVERSE | CellFlags::CURSOR)
                }
                StyleAttr::OverflowHighlight(bg) => frame.apply_bg_span(x, row, w, bg),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: u16, cols: Range<u16>, attr: StyleAttr) -> StyleSpan {
        StyleSpan {
            line,
            start_col: cols.start,
            end_col: cols.end,
            attr,
        }
    }

    #[test]
    fn zero_width_spans_are_not_kept() {
        let mut layer = StyleLayer::new();
        layer.push(span(0, 4..4, StyleAttr::OverflowHighlight(Rgba::rgb(1, 1, 1))));
        layer.push(span(0, 5..2, StyleAttr::InvertCursor));
        assert!(layer.spans().is_empty());
        assert!(layer.cursor_span().is_none());
    }

    #[test]
    fn cursor_is_found_among_highlights() {
        let bg = Rgba::rgb(0xFF, 0xB8, 0xC2);
        let mut layer = StyleLayer::new();
        layer.push(span(0, 0..3, StyleAttr::OverflowHighlight(bg)));
        layer.push(span(1, 0..2, StyleAttr::OverflowHighlight(bg)));
        layer.push(span(1, 2..4, StyleAttr::InvertCursor));
        assert_eq!(layer.overflow_spans().count(), 2);
        assert_eq!(layer.cursor_span().map(StyleSpan::cols), Some(2..4));
        assert_eq!(layer.cursor_span().map(StyleSpan::width), Some(2));
    }

    #[test]
    fn cursor_keeps_highlight_background() {
        let bg = Rgba::rgb(0xFF, 0xB8, 0xC2);
        let mut layer = StyleLayer::new();
        layer.push(span(0, 0..2, StyleAttr::OverflowHighlight(bg)));
        layer.push(span(0, 1..2, StyleAttr::InvertCursor));
        let mut frame = Frame::new(3, 2);
        layer.apply(&mut frame, 1);

        let row1 = |x| frame.cell(x, 1).map(|c| c.style);
        assert_eq!(row1(0).and_then(|s| s.bg), Some(bg));
        let under_cursor = row1(1).expect("cell");
        assert!(under_cursor.flags.contains(CellFlags::REVERSE));
        assert_eq!(under_cursor.bg, Some(bg));
        assert_eq!(frame.cell(0, 0).and_then(|c| c.style.bg), None);
    }
}
