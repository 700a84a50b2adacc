//! Fixed geometry of the gauge control.
//!
//! Coordinates are abstract points with the origin at the top-left corner and
//! y growing downwards. Angles are degrees, `0` pointing right and increasing
//! clockwise on screen, so `-90` is twelve o'clock.

pub const CIRCLE_RADIUS: f64 = 8.0;
pub const INNER_STROKE_WIDTH: f64 = 1.5;
pub const OUTER_STROKE_WIDTH: f64 = 2.0;
pub const NUMBER_FONT_SIZE: f64 = 14.0;
/// Gap between the remaining-count text and the circle.
pub const NUMBER_GAP: f64 = 8.0;
/// Progress arcs start at twelve o'clock.
pub const START_ANGLE_DEG: f64 = -90.0;

/// Widest stroke; the circle is inset by it so strokes stay inside the bounds.
pub const STROKE_INSET: f64 = if INNER_STROKE_WIDTH > OUTER_STROKE_WIDTH {
    INNER_STROKE_WIDTH
} else {
    OUTER_STROKE_WIDTH
};

/// Intrinsic size of the control (100 x 20).
pub const CONTROL_SIZE: Size = Size {
    width: (CIRCLE_RADIUS + STROKE_INSET) * 10.0,
    height: (CIRCLE_RADIUS + STROKE_INSET) * 2.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }
}

pub fn degrees_to_radians(value: f64) -> f64 {
    value * std::f64::consts::PI / 180.0
}

/// Start and end angle of an arc, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl ArcSpan {
    /// The full track circle.
    pub const FULL: ArcSpan = ArcSpan {
        start_deg: 0.0,
        end_deg: 360.0,
    };

    /// Angular extent in degrees; above 360 for an over-spun arc.
    pub fn sweep_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    /// Whether the arc covers the full circle (possibly more than once).
    pub fn is_full_turn(&self) -> bool {
        self.sweep_deg() >= 360.0
    }

    pub fn start_rad(&self) -> f64 {
        degrees_to_radians(self.start_deg)
    }

    pub fn end_rad(&self) -> f64 {
        degrees_to_radians(self.end_deg)
    }
}

/// Arc for a fill ratio.
///
/// `percent` is the raw `weighted / max` ratio and is not clamped: past `1.0`
/// the arc keeps spinning past a full circle, which is what draws the closed
/// ring once the text overflows.
pub fn progress_arc(percent: f64) -> ArcSpan {
    ArcSpan {
        start_deg: START_ANGLE_DEG,
        end_deg: START_ANGLE_DEG + 360.0 * percent,
    }
}

/// Where the pieces of the control go inside a given bounds size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeLayout {
    pub bounds: Size,
    pub center: Point,
    pub radius: f64,
    pub number_rect: Rect,
}

impl GaugeLayout {
    /// Lay the control out in `bounds`: circle hugging the right edge,
    /// remaining count right-aligned in the space to its left.
    pub fn for_bounds(bounds: Size) -> Self {
        let center = Point::new(
            bounds.width - CIRCLE_RADIUS - STROKE_INSET,
            bounds.height / 2.0,
        );
        let number_width = (center.x - CIRCLE_RADIUS - STROKE_INSET - NUMBER_GAP).max(0.0);
        let number_rect = Rect::new(
            0.0,
            (bounds.height - NUMBER_FONT_SIZE) / 2.0,
            number_width,
            NUMBER_FONT_SIZE,
        );
        Self {
            bounds,
            center,
            radius: CIRCLE_RADIUS,
            number_rect,
        }
    }
}

impl Default for GaugeLayout {
    fn default() -> Self {
        Self::for_bounds(CONTROL_SIZE)
    }
}
