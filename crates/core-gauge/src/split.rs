use crate::error::{GaugeError, MaxCount};
use core_text::{LengthMetric, Utf16Length};

/// A text cut into the part that fits and the part that overflows.
///
/// Both halves borrow from the measured text; `allowed` followed by
/// `overflowing` is always exactly the input, and the cut point is always a
/// grapheme cluster boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitResult<'a> {
    pub allowed: &'a str,
    pub overflowing: &'a str,
}

impl<'a> SplitResult<'a> {
    fn whole(text: &'a str) -> Self {
        Self {
            allowed: text,
            overflowing: "",
        }
    }

    /// Byte offset of the cut in the measured text.
    pub fn cut(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_overflowing(&self) -> bool {
        !self.overflowing.is_empty()
    }
}

/// Split `text` at `max_count` UTF-16 code units.
///
/// # Errors
/// [`GaugeError::InvalidConfiguration`] when `max_count` is zero.
pub fn split(text: &str, max_count: usize) -> Result<SplitResult<'_>, GaugeError> {
    split_with(text, max_count, &Utf16Length)
}

/// Split `text` so that `allowed` measures at most `max_count` under `metric`.
///
/// Text that already fits is returned whole. Otherwise the cut lands on the
/// grapheme boundary just before the first prefix that goes over the limit
/// (see [`LengthMetric::fit_boundary`]), which may be `0` when the first
/// cluster alone exceeds it.
///
/// # Errors
/// [`GaugeError::InvalidConfiguration`] when `max_count` is zero.
pub fn split_with<'a, M>(
    text: &'a str,
    max_count: usize,
    metric: &M,
) -> Result<SplitResult<'a>, GaugeError>
where
    M: LengthMetric + ?Sized,
{
    let max_count = MaxCount::new(max_count)?;
    Ok(split_validated(text, max_count, metric))
}

pub(crate) fn split_validated<'a, M>(
    text: &'a str,
    max_count: MaxCount,
    metric: &M,
) -> SplitResult<'a>
where
    M: LengthMetric + ?Sized,
{
    let limit = max_count.get();
    if metric.measure(text) <= limit {
        return SplitResult::whole(text);
    }
    let cut = metric.fit_boundary(text, limit);
    let (allowed, overflowing) = text.split_at(cut);
    tracing::trace!(
        target: "gauge.split",
        metric = metric.kind().as_str(),
        limit,
        cut,
        overflow_bytes = overflowing.len(),
        "overflow_split"
    );
    SplitResult {
        allowed,
        overflowing,
    }
}
