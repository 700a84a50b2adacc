use crate::error::MaxCount;
use crate::geometry::{
    self, ArcSpan, CONTROL_SIZE, GaugeLayout, INNER_STROKE_WIDTH, NUMBER_FONT_SIZE,
    OUTER_STROKE_WIDTH, Point, Rect, Size,
};
use crate::palette::{Palette, Rgba};
use crate::split::split_validated;
use crate::state::{GaugeState, WARNING_CUTOFF_PERCENT};
use core_text::{LengthMetric, Utf16Length};
use std::ops::Range;
use tracing::trace;

/// One circular stroke request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStroke {
    pub center: Point,
    pub radius: f64,
    pub span: ArcSpan,
    pub line_width: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

/// One line of text to draw inside `frame`, truncated at the tail if it does
/// not fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub color: Rgba,
    pub frame: Rect,
    pub font_size: f64,
    pub align: TextAlign,
}

/// A 2D surface the gauge renders onto.
pub trait Drawable {
    fn stroke_arc(&mut self, stroke: &ArcStroke);
    fn draw_text(&mut self, run: &TextRun<'_>);

    /// Size of the area the control occupies, in gauge points.
    fn bounds(&self) -> Size {
        CONTROL_SIZE
    }
}

/// An editable text widget whose display the gauge decorates.
///
/// Offsets are UTF-8 byte offsets into [`TextHost::text`].
pub trait TextHost {
    fn text(&self) -> &str;
    fn selection(&self) -> Range<usize>;
    fn set_selection(&mut self, selection: Range<usize>);
    /// Paint `background` behind everything from byte `from` to the end.
    fn highlight_overflow(&mut self, from: usize, background: Rgba);
    /// Drop every decoration previously applied.
    fn clear_highlight(&mut self);
}

/// The gauge component: a max count, the current weighted length and the
/// colors to present them with.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    max_count: MaxCount,
    weighted_length: usize,
    warning_cutoff: f64,
    palette: Palette,
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new(MaxCount::default())
    }
}

impl Gauge {
    pub fn new(max_count: MaxCount) -> Self {
        Self {
            max_count,
            weighted_length: 0,
            warning_cutoff: WARNING_CUTOFF_PERCENT,
            palette: Palette::default(),
        }
    }

    pub fn with_warning_cutoff(mut self, percent: f64) -> Self {
        self.set_warning_cutoff(percent);
        self
    }

    pub fn set_warning_cutoff(&mut self, percent: f64) {
        self.warning_cutoff = percent;
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn max_count(&self) -> MaxCount {
        self.max_count
    }

    pub fn set_max_count(&mut self, max_count: MaxCount) {
        self.max_count = max_count;
    }

    pub fn weighted_length(&self) -> usize {
        self.weighted_length
    }

    pub fn set_weighted_length(&mut self, weighted_length: usize) {
        self.weighted_length = weighted_length;
    }

    pub fn warning_cutoff(&self) -> f64 {
        self.warning_cutoff
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn state(&self) -> GaugeState {
        GaugeState::derive(self.weighted_length, self.max_count, self.warning_cutoff)
    }

    /// Fill ratio, unclamped.
    pub fn percent(&self) -> f64 {
        self.weighted_length as f64 / self.max_count.get() as f64
    }

    pub fn progress_arc(&self) -> ArcSpan {
        geometry::progress_arc(self.percent())
    }

    /// Characters left before the limit; negative once over it.
    pub fn remaining(&self) -> i64 {
        let max = i64::try_from(self.max_count.get()).unwrap_or(i64::MAX);
        let used = i64::try_from(self.weighted_length).unwrap_or(i64::MAX);
        max.saturating_sub(used)
    }

    /// Render onto `surface`: the track circle, the progress arc on top of it
    /// and, outside the `Ok` state, the remaining count left of the circle.
    pub fn draw<D>(&self, surface: &mut D)
    where
        D: Drawable + ?Sized,
    {
        let layout = GaugeLayout::for_bounds(surface.bounds());
        let state = self.state();

        surface.stroke_arc(&ArcStroke {
            center: layout.center,
            radius: layout.radius,
            span: ArcSpan::FULL,
            line_width: INNER_STROKE_WIDTH,
            color: self.palette.track,
        });
        surface.stroke_arc(&ArcStroke {
            center: layout.center,
            radius: layout.radius,
            span: self.progress_arc(),
            line_width: OUTER_STROKE_WIDTH,
            color: self.palette.circle(state),
        });

        if let Some(color) = self.palette.number(state) {
            let remaining = self.remaining().to_string();
            surface.draw_text(&TextRun {
                text: &remaining,
                color,
                frame: layout.number_rect,
                font_size: NUMBER_FONT_SIZE,
                align: TextAlign::Right,
            });
        }
    }

    /// Refresh `host`'s overflow highlight, counting in UTF-16 code units.
    ///
    /// `weighted_length`, when given, replaces the stored length first.
    pub fn update<H>(&mut self, host: &mut H, weighted_length: Option<usize>) -> GaugeState
    where
        H: TextHost + ?Sized,
    {
        self.update_with(host, weighted_length, &Utf16Length)
    }

    /// [`Gauge::update`] with an explicit metric for locating the cut.
    ///
    /// Text past the limit is highlighted only while the weighted length
    /// strictly exceeds the maximum; otherwise every highlight is cleared. The
    /// host's selection is the same afterwards as before.
    pub fn update_with<H, M>(
        &mut self,
        host: &mut H,
        weighted_length: Option<usize>,
        metric: &M,
    ) -> GaugeState
    where
        H: TextHost + ?Sized,
        M: LengthMetric + ?Sized,
    {
        if let Some(weighted_length) = weighted_length {
            self.weighted_length = weighted_length;
        }

        let selection = host.selection();
        let cut = if self.weighted_length > self.max_count.get() {
            let split = split_validated(host.text(), self.max_count, metric);
            split.is_overflowing().then(|| split.cut())
        } else {
            None
        };

        match cut {
            Some(from) => host.highlight_overflow(from, self.palette.overflow_background),
            None => host.clear_highlight(),
        }
        host.set_selection(selection);

        let state = self.state();
        trace!(
            target: "gauge.update",
            weighted_length = self.weighted_length,
            max_count = self.max_count.get(),
            state = state.as_str(),
            overflow_from = cut,
            "gauge_updated"
        );
        state
    }
}
