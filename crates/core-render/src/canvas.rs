//! Braille dot canvas: the terminal surface the gauge draws onto.
//!
//! Each terminal cell holds a 2x4 grid of Braille dots and one gauge point
//! maps to one dot, so the 100x20 point control fits in 50x5 cells. Dots are
//! square on a typical 1:2 cell, which keeps the ring round.
//!
//! Color is per cell: the last stroke that sets any dot in a cell decides the
//! cell's foreground. Text runs land on whole cells and replace the dots
//! underneath them.

use crate::{CellStyle, Frame};
use core_gauge::geometry::Size;
use core_gauge::{ArcStroke, Drawable, Rgba, TextAlign, TextRun};
use core_text::{egc_width, grapheme};

const DOTS_X: u16 = 2;
const DOTS_Y: u16 = 4;
const BRAILLE_BASE: u32 = 0x2800;
// Bit for dot (col, row) inside a cell, per the Unicode Braille layout.
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];
const ELLIPSIS: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Glyph {
    Dots,
    Text(String, u16),
    Continuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CanvasCell {
    dots: u8,
    glyph: Glyph,
    color: Option<Rgba>,
}

impl Default for CanvasCell {
    fn default() -> Self {
        Self {
            dots: 0,
            glyph: Glyph::Dots,
            color: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrailleCanvas {
    cols: u16,
    rows: u16,
    cells: Vec<CanvasCell>,
}

impl BrailleCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![CanvasCell::default(); cols as usize * rows as usize],
        }
    }

    /// Canvas sized to hold `size` gauge points.
    pub fn for_points(size: Size) -> Self {
        let cols = (size.width / f64::from(DOTS_X)).ceil().max(0.0) as u16;
        let rows = (size.height / f64::from(DOTS_Y)).ceil().max(0.0) as u16;
        Self::new(cols, rows)
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn idx(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row as usize * self.cols as usize + col as usize)
    }

    /// Set the dot at (x, y) in dot coordinates. Out of range dots are ignored.
    pub fn set_dot(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let col = (x / u32::from(DOTS_X)) as u16;
        let row = (y / u32::from(DOTS_Y)) as u16;
        let Some(idx) = self.idx(col, row) else {
            return;
        };
        let bit = DOT_BITS[(x % u32::from(DOTS_X)) as usize][(y % u32::from(DOTS_Y)) as usize];
        let cell = &mut self.cells[idx];
        cell.dots |= bit;
        cell.color = Some(color);
    }

    pub fn is_dot_set(&self, x: u16, y: u16) -> bool {
        self.idx(x / DOTS_X, y / DOTS_Y).is_some_and(|idx| {
            self.cells[idx].dots & DOT_BITS[(x % DOTS_X) as usize][(y % DOTS_Y) as usize] != 0
        })
    }

    /// Character a cell renders as, or `None` for a continuation cell.
    pub fn glyph_at(&self, col: u16, row: u16) -> Option<String> {
        let cell = &self.cells[self.idx(col, row)?];
        match &cell.glyph {
            Glyph::Text(s, _) => Some(s.clone()),
            Glyph::Continuation => None,
            Glyph::Dots if cell.dots == 0 => Some(" ".to_string()),
            Glyph::Dots => char::from_u32(BRAILLE_BASE + u32::from(cell.dots)).map(String::from),
        }
    }

    pub fn color_at(&self, col: u16, row: u16) -> Option<Rgba> {
        self.idx(col, row).and_then(|idx| self.cells[idx].color)
    }

    /// Copy the canvas into `frame` with its top-left cell at (x, y).
    pub fn blit(&self, frame: &mut Frame, x: u16, y: u16) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(idx) = self.idx(col, row) else {
                    continue;
                };
                let cell = &self.cells[idx];
                let style = CellStyle {
                    fg: cell.color,
                    ..CellStyle::default()
                };
                let (fx, fy) = (x.saturating_add(col), y.saturating_add(row));
                match &cell.glyph {
                    Glyph::Text(s, w) => frame.set_cluster(fx, fy, s, *w, style),
                    Glyph::Continuation => {}
                    Glyph::Dots => {
                        if let Some(g) = self.glyph_at(col, row) {
                            frame.set_cluster(fx, fy, &g, 1, style);
                        }
                    }
                }
            }
        }
    }

    fn place_text(&mut self, col: u16, row: u16, cluster: &str, width: u16, color: Rgba) {
        let Some(idx) = self.idx(col, row) else {
            return;
        };
        self.cells[idx] = CanvasCell {
            dots: 0,
            glyph: Glyph::Text(cluster.to_string(), width),
            color: Some(color),
        };
        for dx in 1..width {
            if let Some(c_idx) = self.idx(col + dx, row) {
                self.cells[c_idx] = CanvasCell {
                    dots: 0,
                    glyph: Glyph::Continuation,
                    color: Some(color),
                };
            }
        }
    }
}

/// Longest prefix of `text` fitting `cols` cells, ending in an ellipsis when cut.
fn truncate_tail(text: &str, cols: u16) -> Vec<(&str, u16)> {
    let clusters: Vec<(&str, u16)> = grapheme::iter(text).map(|g| (g, egc_width(g))).collect();
    let total: u16 = clusters.iter().map(|(_, w)| *w).sum();
    if total <= cols {
        return clusters;
    }
    if cols == 0 {
        return Vec::new();
    }
    let budget = cols - 1;
    let mut used = 0;
    let mut out = Vec::new();
    for (g, w) in clusters {
        if used + w > budget {
            break;
        }
        used += w;
        out.push((g, w));
    }
    out.push((ELLIPSIS, 1));
    out
}

impl Drawable for BrailleCanvas {
    fn stroke_arc(&mut self, stroke: &ArcStroke) {
        // A sweep past a full turn paints the same dots again.
        let sweep = stroke.span.sweep_deg().clamp(0.0, 360.0);
        if sweep <= 0.0 || stroke.radius <= 0.0 {
            return;
        }
        let half = stroke.line_width / 2.0;
        let inner = (stroke.radius - half).max(0.0);
        let outer = stroke.radius + half;
        // Quarter-dot radial and sub-dot angular steps leave no gaps.
        let steps = ((sweep.to_radians() * outer * 4.0).ceil() as usize).max(1);
        let mut r = inner;
        while r <= outer {
            for i in 0..=steps {
                let deg = stroke.span.start_deg + sweep * (i as f64 / steps as f64);
                let rad = deg.to_radians();
                let x = stroke.center.x + r * rad.cos();
                let y = stroke.center.y + r * rad.sin();
                self.set_dot(x.floor() as i32, y.floor() as i32, stroke.color);
            }
            r += 0.25;
        }
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        let frame = run.frame;
        if frame.size.width <= 0.0 || frame.size.height <= 0.0 {
            return;
        }
        let first_col = (frame.origin.x / f64::from(DOTS_X)).ceil().max(0.0) as u16;
        let last_col = (frame.max_x() / f64::from(DOTS_X)).floor().max(0.0) as u16;
        let cols = last_col.saturating_sub(first_col).min(self.cols.saturating_sub(first_col));
        let mid_y = frame.origin.y + frame.size.height / 2.0;
        let row = (mid_y / f64::from(DOTS_Y)).floor().max(0.0) as u16;

        let clusters = truncate_tail(run.text, cols);
        let width: u16 = clusters.iter().map(|(_, w)| *w).sum();
        let mut col = match run.align {
            TextAlign::Left => first_col,
            TextAlign::Right => first_col + cols - width,
        };
        for (g, w) in clusters {
            self.place_text(col, row, g, w, run.color);
            col += w;
        }
    }

    fn bounds(&self) -> Size {
        Size {
            width: f64::from(self.cols * DOTS_X),
            height: f64::from(self.rows * DOTS_Y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_gauge::geometry::{CONTROL_SIZE, Point, Rect};
    use core_gauge::{ArcSpan, Gauge, MaxCount, Palette};

    fn stroke(span: ArcSpan, color: Rgba) -> ArcStroke {
        ArcStroke {
            center: Point::new(90.0, 10.0),
            radius: 8.0,
            span,
            line_width: 2.0,
            color,
        }
    }

    #[test]
    fn control_fits_fifty_by_five_cells() {
        let canvas = BrailleCanvas::for_points(CONTROL_SIZE);
        assert_eq!((canvas.cols(), canvas.rows()), (50, 5));
        assert_eq!(canvas.bounds(), CONTROL_SIZE);
    }

    #[test]
    fn dots_map_to_braille_bits() {
        let mut canvas = BrailleCanvas::new(1, 1);
        let c = Rgba::rgb(1, 1, 1);
        canvas.set_dot(0, 0, c);
        assert_eq!(canvas.glyph_at(0, 0).as_deref(), Some("⠁"));
        canvas.set_dot(1, 3, c);
        assert_eq!(canvas.glyph_at(0, 0).as_deref(), Some("⢁"));
        canvas.set_dot(5, 5, c);
        canvas.set_dot(-1, 0, c);
        assert!(canvas.is_dot_set(1, 3));
        assert!(!canvas.is_dot_set(0, 1));
    }

    #[test]
    fn full_circle_touches_all_four_extremes() {
        let mut canvas = BrailleCanvas::for_points(CONTROL_SIZE);
        canvas.stroke_arc(&stroke(ArcSpan::FULL, Rgba::rgb(9, 9, 9)));
        assert!(canvas.is_dot_set(90, 2), "top");
        assert!(canvas.is_dot_set(90, 18), "bottom");
        assert!(canvas.is_dot_set(82, 10), "left");
        assert!(canvas.is_dot_set(98, 10), "right");
        assert!(!canvas.is_dot_set(90, 10), "center stays empty");
    }

    #[test]
    fn quarter_arc_stays_in_top_right() {
        let mut canvas = BrailleCanvas::for_points(CONTROL_SIZE);
        canvas.stroke_arc(&stroke(core_gauge::progress_arc(0.25), Rgba::rgb(9, 9, 9)));
        assert!(canvas.is_dot_set(90, 2));
        assert!(canvas.is_dot_set(98, 10));
        assert!(!canvas.is_dot_set(82, 10));
        assert!(!canvas.is_dot_set(90, 18));
    }

    #[test]
    fn empty_sweep_draws_nothing() {
        let mut canvas = BrailleCanvas::for_points(CONTROL_SIZE);
        canvas.stroke_arc(&stroke(core_gauge::progress_arc(0.0), Rgba::rgb(9, 9, 9)));
        assert!((0..5).all(|r| (0..50).all(|c| canvas.glyph_at(c, r).as_deref() == Some(" "))));
    }

    #[test]
    fn right_aligned_text_lands_in_middle_row() {
        let mut canvas = BrailleCanvas::for_points(CONTROL_SIZE);
        let color = Rgba::rgb(0x65, 0x77, 0x86);
        canvas.draw_text(&TextRun {
            text: "20",
            color,
            frame: Rect::new(0.0, 3.0, 72.0, 14.0),
            font_size: 14.0,
            align: TextAlign::Right,
        });
        assert_eq!(canvas.glyph_at(34, 2).as_deref(), Some("2"));
        assert_eq!(canvas.glyph_at(35, 2).as_deref(), Some("0"));
        assert_eq!(canvas.color_at(35, 2), Some(color));
    }

    #[test]
    fn long_text_is_tail_truncated() {
        let mut canvas = BrailleCanvas::new(4, 1);
        canvas.draw_text(&TextRun {
            text: "-12345",
            color: Rgba::rgb(1, 1, 1),
            frame: Rect::new(0.0, 0.0, 8.0, 4.0),
            font_size: 14.0,
            align: TextAlign::Right,
        });
        let row: Vec<String> = (0..4).filter_map(|c| canvas.glyph_at(c, 0)).collect();
        assert_eq!(row.concat(), "-12…");
    }

    #[test]
    fn gauge_draw_in_warning_shows_count() {
        let mut gauge = Gauge::new(MaxCount::new(280).unwrap());
        gauge.set_weighted_length(270);
        let mut canvas = BrailleCanvas::for_points(CONTROL_SIZE);
        gauge.draw(&mut canvas);
        assert_eq!(canvas.glyph_at(34, 2).as_deref(), Some("1"));
        assert_eq!(canvas.glyph_at(35, 2).as_deref(), Some("0"));
        assert_eq!(
            canvas.color_at(45, 0),
            Some(Palette::default().warning_circle)
        );
    }
}
