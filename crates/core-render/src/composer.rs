//! Composer screen layout.
//!
//! ```text
//! row 0            title
//! rows 1..=n       wrapped composer text (overflow highlight, software cursor)
//! row n+1          separator
//! last 5 rows      key hints on the left, the gauge control on the right
//! ```
//!
//! Text wraps on grapheme clusters using the shared width engine, so the
//! cursor and the highlight always cover whole clusters. When the text is
//! taller than its area the view scrolls to keep the cursor line visible.

use crate::canvas::BrailleCanvas;
use crate::style::{StyleAttr, StyleLayer, StyleSpan};
use crate::{CellStyle, Frame};
use core_gauge::geometry::CONTROL_SIZE;
use core_gauge::{Gauge, GaugeState, Rgba};
use core_state::ComposerState;
use core_text::segment::clusters;
use core_text::{egc_width, grapheme};
use tracing::trace;

const TITLE: &str = " New post";
const HINTS: &str = " Ctrl-S post · Esc quit";
const SEPARATOR: &str = "─";
const DIM: Rgba = Rgba::rgb(0x65, 0x77, 0x86);

/// Screen areas for a terminal of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub width: u16,
    pub height: u16,
    pub text_top: u16,
    pub text_rows: u16,
    pub separator_row: u16,
    pub gauge_top: u16,
    pub gauge_rows: u16,
}

impl ScreenLayout {
    pub fn for_size(width: u16, height: u16) -> Self {
        let canvas = BrailleCanvas::for_points(CONTROL_SIZE);
        let gauge_rows = canvas.rows().min(height);
        let gauge_top = height - gauge_rows;
        let separator_row = gauge_top.saturating_sub(1);
        let text_top = 1.min(separator_row);
        let text_rows = separator_row.saturating_sub(text_top);
        Self {
            width,
            height,
            text_top,
            text_rows,
            separator_row,
            gauge_top,
            gauge_rows,
        }
    }
}

/// One cluster placed on the wrapped grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placed {
    byte: usize,
    end: usize,
    line: usize,
    col: u16,
    width: u16,
}

struct Wrapped {
    placed: Vec<Placed>,
    cursor: (usize, u16), // (line, col)
    cursor_width: u16,
    lines: usize,
}

fn wrap(text: &str, cursor: usize, width: u16) -> Wrapped {
    let width = width.max(1);
    let mut placed = Vec::new();
    let (mut line, mut col) = (0usize, 0u16);
    let mut cursor_at = None;
    let mut cursor_width = 1;

    for cluster in clusters(text) {
        let byte = cluster.start;
        if cluster.is_line_break() {
            if byte == cursor {
                cursor_at = Some((line, col.min(width - 1)));
            }
            line += 1;
            col = 0;
            continue;
        }
        let w = cluster.width.min(width);
        if col + w > width {
            line += 1;
            col = 0;
        }
        if byte == cursor {
            cursor_at = Some((line, col));
            cursor_width = w;
        }
        placed.push(Placed {
            byte,
            end: cluster.end(),
            line,
            col,
            width: w,
        });
        col += w;
    }

    let cursor = cursor_at.unwrap_or_else(|| {
        if col >= width {
            (line + 1, 0)
        } else {
            (line, col)
        }
    });
    Wrapped {
        placed,
        lines: line.max(cursor.0) + 1,
        cursor,
        cursor_width,
    }
}

/// Compose the whole screen for the current composer and gauge.
pub fn build_frame(state: &ComposerState, gauge: &Gauge, width: u16, height: u16) -> Frame {
    let layout = ScreenLayout::for_size(width, height);
    let mut frame = Frame::new(width, height);

    frame.put_str(0, 0, TITLE, CellStyle::fg(DIM));

    let wrapped = wrap(state.text(), state.cursor(), width);
    let rows = usize::from(layout.text_rows);
    let scroll = (wrapped.cursor.0 + 1).saturating_sub(rows);
    // Wrapped line -> text-area row, for lines inside the visible window.
    let row_of = |line: usize| -> Option<u16> {
        line.checked_sub(scroll)
            .filter(|&r| r < rows)
            .and_then(|r| u16::try_from(r).ok())
    };

    let text = state.text();
    for p in &wrapped.placed {
        if let Some(row) = row_of(p.line) {
            let cluster = &text[p.byte..p.end];
            frame.set_cluster(p.col, layout.text_top + row, cluster, p.width, CellStyle::default());
        }
    }

    let mut styles = StyleLayer::new();
    if let Some(hl) = state.overflow_highlight() {
        push_overflow_spans(&mut styles, &wrapped.placed, hl.from, hl.background, row_of);
    }
    if let Some(row) = row_of(wrapped.cursor.0) {
        let col = wrapped.cursor.1;
        styles.push(StyleSpan {
            line: row,
            start_col: col,
            end_col: col + wrapped.cursor_width,
            attr: StyleAttr::InvertCursor,
        });
        frame.cursor = Some((col, layout.text_top + row));
    }
    styles.apply(&mut frame, layout.text_top);

    if layout.separator_row > 0 && layout.separator_row < layout.gauge_top {
        let rule = SEPARATOR.repeat(width as usize);
        frame.put_str(0, layout.separator_row, &rule, CellStyle::fg(DIM));
    }

    draw_gauge_strip(&mut frame, &layout, gauge);

    trace!(
        target: "render.compose",
        width,
        height,
        text_lines = wrapped.lines,
        scroll,
        "frame_built"
    );
    frame
}

fn push_overflow_spans(
    styles: &mut StyleLayer,
    placed: &[Placed],
    from: usize,
    bg: Rgba,
    row_of: impl Fn(usize) -> Option<u16>,
) {
    let mut run: Option<StyleSpan> = None;
    for (p, line) in placed
        .iter()
        .filter(|p| p.byte >= from)
        .filter_map(|p| row_of(p.line).map(|row| (p, row)))
    {
        match run.as_mut() {
            Some(span) if span.line == line && span.end_col == p.col => {
                span.end_col = p.col + p.width;
            }
            _ => {
                if let Some(done) = run.take() {
                    styles.push(done);
                }
                run = Some(StyleSpan {
                    line,
                    start_col: p.col,
                    end_col: p.col + p.width,
                    attr: StyleAttr::OverflowHighlight(bg),
                });
            }
        }
    }
    if let Some(done) = run {
        styles.push(done);
    }
}

fn draw_gauge_strip(frame: &mut Frame, layout: &ScreenLayout, gauge: &Gauge) {
    if layout.gauge_rows == 0 {
        return;
    }
    let mut canvas = BrailleCanvas::for_points(CONTROL_SIZE);
    gauge.draw(&mut canvas);
    let x = layout.width.saturating_sub(canvas.cols());
    canvas.blit(frame, x, layout.gauge_top);

    let mid = layout.gauge_top + layout.gauge_rows / 2;
    let hint_style = match gauge.state() {
        GaugeState::Overflowing => CellStyle::fg(gauge.palette().overflowing_number),
        _ => CellStyle::fg(DIM),
    };
    if x > 0 {
        let hints: String = grapheme::iter(HINTS)
            .scan(0u16, |used, g| {
                *used += egc_width(g);
                (*used <= x).then_some(g)
            })
            .collect();
        frame.put_str(0, mid, &hints, hint_style);
    }
}
