use crate::error::{GaugeError, MaxCount};
use std::fmt;

/// Default maximum count of a composer message.
pub const DEFAULT_MAX_COUNT: usize = 280;

/// Fill percentage strictly above which the gauge warns.
pub const WARNING_CUTOFF_PERCENT: f64 = 92.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GaugeState {
    #[default]
    Ok,
    Warning,
    Overflowing,
}

impl GaugeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GaugeState::Ok => "ok",
            GaugeState::Warning => "warning",
            GaugeState::Overflowing => "overflowing",
        }
    }

    /// Derive the state for an already validated maximum.
    ///
    /// Overflowing takes precedence: at or above the maximum the warning
    /// ratio is never consulted. The ratio test is cross-multiplied so a fill
    /// of exactly `cutoff_percent` stays `Ok`.
    pub fn derive(weighted_length: usize, max_count: MaxCount, cutoff_percent: f64) -> Self {
        let max = max_count.get();
        if weighted_length >= max {
            GaugeState::Overflowing
        } else if weighted_length as f64 * 100.0 > cutoff_percent * max as f64 {
            GaugeState::Warning
        } else {
            GaugeState::Ok
        }
    }
}

impl fmt::Display for GaugeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a weighted length against a maximum count.
///
/// # Errors
/// [`GaugeError::InvalidConfiguration`] when `max_count` is zero.
pub fn classify(weighted_length: usize, max_count: usize) -> Result<GaugeState, GaugeError> {
    classify_with_cutoff(weighted_length, max_count, WARNING_CUTOFF_PERCENT)
}

/// [`classify`] with a caller supplied warning cutoff percentage.
///
/// # Errors
/// [`GaugeError::InvalidConfiguration`] when `max_count` is zero.
pub fn classify_with_cutoff(
    weighted_length: usize,
    max_count: usize,
    cutoff_percent: f64,
) -> Result<GaugeState, GaugeError> {
    let max_count = MaxCount::new(max_count)?;
    Ok(GaugeState::derive(weighted_length, max_count, cutoff_percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenarios_at_280() {
        assert_eq!(classify(0, 280), Ok(GaugeState::Ok));
        assert_eq!(classify(259, 280), Ok(GaugeState::Ok));
        assert_eq!(classify(260, 280), Ok(GaugeState::Warning));
        assert_eq!(classify(279, 280), Ok(GaugeState::Warning));
        assert_eq!(classify(280, 280), Ok(GaugeState::Overflowing));
        assert_eq!(classify(10_000, 280), Ok(GaugeState::Overflowing));
    }

    #[test]
    fn cutoff_is_strictly_greater_than() {
        // 928 / 1000 is exactly 92.8%: not a warning yet.
        assert_eq!(classify(928, 1000), Ok(GaugeState::Ok));
        assert_eq!(classify(929, 1000), Ok(GaugeState::Warning));
    }

    #[test]
    fn tiny_maxima_jump_straight_to_overflow() {
        assert_eq!(classify(0, 1), Ok(GaugeState::Ok));
        assert_eq!(classify(1, 1), Ok(GaugeState::Overflowing));
    }

    #[test]
    fn zero_max_is_invalid() {
        assert!(matches!(
            classify(0, 0),
            Err(GaugeError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn custom_cutoff() {
        assert_eq!(classify_with_cutoff(50, 100, 40.0), Ok(GaugeState::Warning));
        assert_eq!(classify_with_cutoff(50, 100, 50.0), Ok(GaugeState::Ok));
    }
}
