use core_gauge::geometry::{INNER_STROKE_WIDTH, OUTER_STROKE_WIDTH};
use core_gauge::{
    ArcSpan, ArcStroke, Drawable, Gauge, GaugeState, MaxCount, Palette, Point, Rect, Rgba,
    TextAlign, TextHost, TextRun,
};
use core_text::WeightedLength;
use pretty_assertions::assert_eq;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Arc(ArcStroke),
    Text {
        text: String,
        color: Rgba,
        frame: Rect,
        align: TextAlign,
    },
}

#[derive(Default)]
struct RecordingSurface {
    ops: Vec<Op>,
}

impl Drawable for RecordingSurface {
    fn stroke_arc(&mut self, stroke: &ArcStroke) {
        self.ops.push(Op::Arc(*stroke));
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        self.ops.push(Op::Text {
            text: run.text.to_string(),
            color: run.color,
            frame: run.frame,
            align: run.align,
        });
    }
}

struct StringHost {
    text: String,
    selection: Range<usize>,
    highlight: Option<(usize, Rgba)>,
    clears: usize,
}

impl StringHost {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: text.len()..text.len(),
            highlight: None,
            clears: 0,
        }
    }
}

impl TextHost for StringHost {
    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = selection;
    }

    fn highlight_overflow(&mut self, from: usize, background: Rgba) {
        // Applying attributes resets the caret in a real widget.
        self.selection = 0..0;
        self.highlight = Some((from, background));
    }

    fn clear_highlight(&mut self) {
        self.selection = 0..0;
        self.highlight = None;
        self.clears += 1;
    }
}

fn gauge(max: usize, len: usize) -> Gauge {
    let mut g = Gauge::new(MaxCount::new(max).unwrap());
    g.set_weighted_length(len);
    g
}

#[test]
fn ok_state_draws_track_and_arc_only() {
    let g = gauge(280, 140);
    let mut surface = RecordingSurface::default();
    g.draw(&mut surface);

    let palette = Palette::default();
    let center = Point::new(90.0, 10.0);
    assert_eq!(
        surface.ops,
        vec![
            Op::Arc(ArcStroke {
                center,
                radius: 8.0,
                span: ArcSpan::FULL,
                line_width: INNER_STROKE_WIDTH,
                color: palette.track,
            }),
            Op::Arc(ArcStroke {
                center,
                radius: 8.0,
                span: ArcSpan {
                    start_deg: -90.0,
                    end_deg: 90.0,
                },
                line_width: OUTER_STROKE_WIDTH,
                color: palette.ok_circle,
            }),
        ]
    );
}

#[test]
fn warning_state_shows_remaining_count() {
    let g = gauge(280, 270);
    let mut surface = RecordingSurface::default();
    g.draw(&mut surface);

    assert_eq!(surface.ops.len(), 3);
    let Op::Arc(progress) = &surface.ops[1] else {
        panic!("expected progress arc");
    };
    assert_eq!(progress.color, Palette::default().warning_circle);
    assert_eq!(
        surface.ops[2],
        Op::Text {
            text: "10".to_string(),
            color: Palette::default().warning_number,
            frame: Rect::new(0.0, 3.0, 72.0, 14.0),
            align: TextAlign::Right,
        }
    );
}

#[test]
fn overflowing_state_shows_negative_count_and_full_ring() {
    let g = gauge(280, 300);
    let mut surface = RecordingSurface::default();
    g.draw(&mut surface);

    let Op::Arc(progress) = &surface.ops[1] else {
        panic!("expected progress arc");
    };
    assert!(progress.span.is_full_turn());
    assert_eq!(progress.color, Palette::default().overflowing_circle);
    let Op::Text { text, color, .. } = &surface.ops[2] else {
        panic!("expected remaining count");
    };
    assert_eq!(text, "-20");
    assert_eq!(*color, Palette::default().overflowing_number);
}

#[test]
fn update_highlights_overflow_and_restores_selection() {
    let mut g = gauge(5, 0);
    let mut host = StringHost::new("hello world");
    host.selection = 2..4;

    let state = g.update(&mut host, Some(11));

    assert_eq!(state, GaugeState::Overflowing);
    assert_eq!(g.weighted_length(), 11);
    assert_eq!(
        host.highlight,
        Some((5, Palette::default().overflow_background))
    );
    assert_eq!(host.selection, 2..4);
}

#[test]
fn update_clears_when_back_under_limit() {
    let mut g = gauge(5, 0);
    let mut host = StringHost::new("hello world");
    g.update(&mut host, Some(11));
    assert!(host.highlight.is_some());

    host.text = "hey".to_string();
    host.selection = 3..3;
    let state = g.update(&mut host, Some(3));

    assert_eq!(state, GaugeState::Ok);
    assert_eq!(host.highlight, None);
    assert_eq!(host.clears, 1);
    assert_eq!(host.selection, 3..3);
}

#[test]
fn exactly_at_limit_is_overflowing_but_not_highlighted() {
    let mut g = gauge(5, 0);
    let mut host = StringHost::new("hello");
    let state = g.update(&mut host, Some(5));
    assert_eq!(state, GaugeState::Overflowing);
    assert_eq!(host.highlight, None);
}

#[test]
fn update_without_length_keeps_stored_value() {
    let mut g = gauge(3, 4);
    let mut host = StringHost::new("ab👍cd");
    g.update(&mut host, None);
    assert_eq!(g.weighted_length(), 4);
    // Cut pulled back before the emoji's surrogate pair.
    assert_eq!(host.highlight.map(|(from, _)| from), Some(2));
}

#[test]
fn update_with_weighted_metric_cuts_by_weight() {
    let mut g = gauge(4, 0);
    let mut host = StringHost::new("ab漢字");
    g.update_with(&mut host, Some(6), &WeightedLength);
    assert_eq!(host.highlight.map(|(from, _)| from), Some(2 + "漢".len()));
}
