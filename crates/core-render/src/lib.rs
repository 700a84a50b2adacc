//! Screen composition for the length-gauge composer.
//!
//! A [`Frame`] is a grid of [`Cell`]s covering the whole terminal. A cluster
//! wider than one column owns a leader cell holding its text followed by
//! blank continuation cells, so column arithmetic stays in screen units and
//! the writer prints each cluster exactly once. Styles painted over a range
//! reach continuations too, but only the leader's style is emitted.
//!
//! `composer` builds the frame from composer state and the gauge, `canvas`
//! rasterizes the gauge in Braille dots, `style` carries the caret and
//! overflow ranges, `writer` turns a frame into terminal commands and
//! `terminal` owns raw mode.

use bitflags::bitflags;
use core_gauge::Rgba;

pub mod canvas;
pub mod composer;
pub mod style;
pub mod terminal;
pub mod writer;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE = 1;
        /// Part of the software cursor.
        const CURSOR = 1 << 1;
    }
}

impl Default for CellFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Colors and attributes of one cell. `None` keeps the terminal's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub flags: CellFlags,
}

impl CellStyle {
    pub fn fg(color: Rgba) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Empty on continuation cells.
    pub cluster: String,
    /// Columns covered starting here; 0 on continuation cells.
    pub width: u8,
    pub style: CellStyle,
}

impl Cell {
    fn blank() -> Self {
        Self {
            cluster: String::from(" "),
            width: 1,
            style: CellStyle::default(),
        }
    }

    pub fn is_leader(&self) -> bool {
        self.width != 0
    }
}

/// A printable cluster found by [`Frame::row_leaders`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leader<'a> {
    pub x: u16,
    pub text: &'a str,
    pub width: u16,
    pub style: CellStyle,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    /// Caret position; the hardware cursor is parked here but stays hidden.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(); usize::from(width) * usize::from(height)],
            cursor: None,
        }
    }

    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Cells of row `y` from column `x` for up to `len` columns, clipped to
    /// the frame.
    fn run_mut(&mut self, x: u16, y: u16, len: u16) -> &mut [Cell] {
        let Some(start) = self.offset(x, y) else {
            return &mut [];
        };
        let len = usize::from(len.min(self.width - x));
        &mut self.cells[start..start + len]
    }

    /// Place `cluster` at (x, y) covering `width` columns, clipped at the
    /// right edge. Zero widths are treated as one column.
    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, style: CellStyle) {
        let run = self.run_mut(x, y, width.max(1));
        let Some((leader, rest)) = run.split_first_mut() else {
            return;
        };
        *leader = Cell {
            cluster: cluster.to_owned(),
            width: (rest.len() + 1) as u8,
            style,
        };
        for cell in rest {
            *cell = Cell {
                cluster: String::new(),
                width: 0,
                style,
            };
        }
    }

    /// Write `text` from (x, y) until a cluster would cross the right edge.
    /// Returns the columns used.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: CellStyle) -> u16 {
        let mut used = 0u16;
        for g in core_text::grapheme::iter(text) {
            let w = core_text::egc_width(g);
            let col = x.saturating_add(used);
            if col.saturating_add(w) > self.width {
                break;
            }
            self.set_cluster(col, y, g, w, style);
            used += w;
        }
        used
    }

    pub fn apply_flags_span(&mut self, x: u16, y: u16, len: u16, flags: CellFlags) {
        for cell in self.run_mut(x, y, len) {
            cell.style.flags |= flags;
        }
    }

    pub fn apply_bg_span(&mut self, x: u16, y: u16, len: u16, bg: Rgba) {
        for cell in self.run_mut(x, y, len) {
            cell.style.bg = Some(bg);
        }
    }

    /// Leader cells of row `y`, left to right.
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = Leader<'_>> + '_ {
        let row: &[Cell] = match self.offset(0, y) {
            Some(start) => &self.cells[start..start + usize::from(self.width)],
            None => &[],
        };
        row.iter()
            .zip(0u16..)
            .filter(|(cell, _)| cell.is_leader())
            .map(|(cell, x)| Leader {
                x,
                text: &cell.cluster,
                width: u16::from(cell.width),
                style: cell.style,
            })
    }

    /// Row `y` as text with trailing blanks removed.
    pub fn line_text(&self, y: u16) -> String {
        let line: String = self.row_leaders(y).map(|l| l.text).collect();
        line.trim_end().to_owned()
    }
}
