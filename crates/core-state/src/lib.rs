//! Composer state: the text being written, the caret, and the overflow
//! decoration the gauge applies through [`TextHost`].
//!
//! Invariants:
//! - `text` is NFC normalized. Typed and pasted input is normalized together
//!   with the clusters on either side of the splice.
//! - The caret and both selection ends are UTF-8 byte offsets that always sit
//!   on a grapheme cluster boundary of `text`.
//! - Every mutation marks the state dirty; the event loop re-measures and
//!   repaints only when `take_dirty` reports a change.
//!
//! Edits never log content. Spans and events carry byte lengths only.

use core_gauge::{Rgba, TextHost};
use core_text::grapheme;
use core_text::segment::normalize;
use std::ops::Range;
use tracing::trace;

/// Background decoration covering `from..` of the composer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowHighlight {
    pub from: usize,
    pub background: Rgba,
}

/// Bracketed paste accumulator. Chunks are buffered and inserted as one edit
/// so normalization sees the whole payload.
#[derive(Debug, Default, Clone)]
struct PasteSession {
    buf: String,
    chunks: u32,
}

#[derive(Debug, Default, Clone)]
pub struct ComposerState {
    text: String,
    selection: Range<usize>,
    overflow: Option<OverflowHighlight>,
    paste: Option<PasteSession>,
    dirty: bool,
    posts: u64,
}

impl ComposerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `initial` (normalized) and the caret at the end.
    pub fn with_text(initial: &str) -> Self {
        let text = normalize(initial);
        let end = text.len();
        Self {
            text,
            selection: end..end,
            dirty: true,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret byte offset (the selection's active end).
    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    pub fn overflow_highlight(&self) -> Option<OverflowHighlight> {
        self.overflow
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of times the composer has been posted (cleared via Ctrl-S).
    pub fn posts(&self) -> u64 {
        self.posts
    }

    pub fn in_paste(&self) -> bool {
        self.paste.is_some()
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn set_cursor(&mut self, byte: usize) {
        let byte = grapheme::floor_boundary(&self.text, byte);
        if self.selection != (byte..byte) {
            self.selection = byte..byte;
            self.dirty = true;
        }
    }

    /// Replace the selection with `input`; caret lands after the inserted
    /// text.
    ///
    /// The clusters touching the splice are renormalized together with the
    /// input, so a combining mark typed after its base composes with it.
    pub fn insert_str(&mut self, input: &str) {
        if input.is_empty() {
            return;
        }
        let Range { start, end } = self.selection.clone();
        let window_start = grapheme::prev_boundary(&self.text, start);
        let window_end = grapheme::next_boundary(&self.text, end).max(end);
        let lead = normalize(&[&self.text[window_start..start], input].concat());
        let spliced = normalize(&[lead.as_str(), &self.text[end..window_end]].concat());
        self.text.replace_range(window_start..window_end, &spliced);

        let mut caret = (window_start + lead.len()).min(window_start + spliced.len());
        if !grapheme::is_boundary(&self.text, caret) {
            caret = grapheme::next_boundary(&self.text, caret);
        }
        self.selection = caret..caret;
        self.dirty = true;
        trace!(target: "state.edit", inserted = input.len(), total = self.text.len(), "edit_insert");
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    pub fn insert_newline(&mut self) {
        self.insert_str("\n");
    }

    /// Remove the selection if any, otherwise the grapheme before the caret.
    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let end = self.cursor();
        if end == 0 {
            return false;
        }
        let start = grapheme::prev_boundary(&self.text, end);
        self.remove_range(start..end);
        true
    }

    /// Remove the selection if any, otherwise the grapheme after the caret.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let start = self.cursor();
        if start >= self.text.len() {
            return false;
        }
        let end = grapheme::next_boundary(&self.text, start);
        self.remove_range(start..end);
        true
    }

    fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let range = self.selection.clone();
        self.remove_range(range);
        true
    }

    fn remove_range(&mut self, range: Range<usize>) {
        let removed = range.len();
        let start = range.start;
        self.text.replace_range(range, "");
        // Removing a base character can merge neighbours into one cluster.
        let caret = grapheme::floor_boundary(&self.text, start);
        self.selection = caret..caret;
        self.dirty = true;
        trace!(target: "state.edit", removed, total = self.text.len(), "edit_remove");
    }

    pub fn move_left(&mut self) {
        let target = if self.selection.is_empty() {
            grapheme::prev_boundary(&self.text, self.cursor())
        } else {
            self.selection.start.min(self.selection.end)
        };
        self.set_cursor(target);
    }

    pub fn move_right(&mut self) {
        let target = if self.selection.is_empty() {
            grapheme::next_boundary(&self.text, self.cursor())
        } else {
            self.selection.start.max(self.selection.end)
        };
        self.set_cursor(target);
    }

    /// Caret to the start of the current line.
    pub fn move_home(&mut self) {
        let cursor = self.cursor();
        let start = self.text[..cursor].rfind('\n').map_or(0, |i| i + 1);
        self.set_cursor(start);
    }

    /// Caret to the end of the current line (before its newline).
    pub fn move_end(&mut self) {
        let cursor = self.cursor();
        let end = self.text[cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| cursor + i);
        self.set_cursor(end);
    }

    /// Take the composed text and reset to an empty composer.
    pub fn post(&mut self) -> String {
        let posted = std::mem::take(&mut self.text);
        self.selection = 0..0;
        self.overflow = None;
        self.paste = None;
        self.dirty = true;
        self.posts += 1;
        trace!(target: "state.edit", len = posted.len(), "composer_posted");
        posted
    }

    pub fn begin_paste(&mut self) {
        if self.paste.is_some() {
            trace!(target: "state.paste", "paste_restarted");
        }
        self.paste = Some(PasteSession::default());
    }

    /// Buffer one paste chunk. Chunks outside a session are inserted directly.
    pub fn push_paste_chunk(&mut self, chunk: &str) {
        match self.paste.as_mut() {
            Some(session) => {
                session.buf.push_str(chunk);
                session.chunks += 1;
            }
            None => self.insert_str(chunk),
        }
    }

    /// Finish the paste session, inserting the accumulated payload.
    pub fn end_paste(&mut self) {
        let Some(session) = self.paste.take() else {
            return;
        };
        trace!(
            target: "state.paste",
            bytes = session.buf.len(),
            chunks = session.chunks,
            "paste_committed"
        );
        self.insert_str(&session.buf);
    }
}

impl TextHost for ComposerState {
    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn set_selection(&mut self, selection: Range<usize>) {
        let start = grapheme::floor_boundary(&self.text, selection.start);
        let end = grapheme::floor_boundary(&self.text, selection.end);
        self.selection = start..end;
    }

    fn highlight_overflow(&mut self, from: usize, background: Rgba) {
        let next = Some(OverflowHighlight {
            from: from.min(self.text.len()),
            background,
        });
        if self.overflow != next {
            self.overflow = next;
            self.dirty = true;
        }
    }

    fn clear_highlight(&mut self) {
        if self.overflow.take().is_some() {
            self.dirty = true;
        }
    }
}
