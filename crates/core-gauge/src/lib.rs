//! Length gauge: the circular character-count meter of a message composer.
//!
//! The gauge is a pure function of two integers, a maximum count and the
//! current weighted length, plus the text they describe:
//!
//! * [`classify`] turns the pair into a [`GaugeState`] (`Ok`, `Warning`,
//!   `Overflowing`).
//! * [`split`] cuts the text into an allowed prefix and an overflowing
//!   suffix without ever breaking a grapheme cluster.
//! * [`geometry::progress_arc`] turns the fill ratio into a start / end angle.
//!
//! Presentation goes through two capabilities so no UI toolkit leaks in:
//! [`Drawable`] receives strokes and text, [`TextHost`] receives the overflow
//! highlight. [`Gauge`] ties both to a single stateful component.

mod error;
pub mod geometry;
pub mod palette;
mod split;
mod state;
mod view;

pub use error::{GaugeError, MaxCount};
pub use geometry::{ArcSpan, GaugeLayout, Point, Rect, Size, progress_arc};
pub use palette::{Palette, Rgba};
pub use split::{SplitResult, split, split_with};
pub use state::{
    DEFAULT_MAX_COUNT, GaugeState, WARNING_CUTOFF_PERCENT, classify, classify_with_cutoff,
};
pub use view::{ArcStroke, Drawable, Gauge, TextAlign, TextHost, TextRun};
