use std::fmt;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GaugeError {
    /// The maximum count must be strictly positive.
    #[error("invalid gauge configuration: max count must be positive, got {max_count}")]
    InvalidConfiguration { max_count: i64 },
}

/// A validated, strictly positive maximum count.
///
/// Non-positive maxima would make the fill ratio undefined, so they are
/// rejected here, before any gauge arithmetic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxCount(NonZeroUsize);

impl MaxCount {
    pub fn new(max_count: usize) -> Result<Self, GaugeError> {
        NonZeroUsize::new(max_count)
            .map(Self)
            .ok_or(GaugeError::InvalidConfiguration { max_count: 0 })
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for MaxCount {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(crate::DEFAULT_MAX_COUNT - 1))
    }
}

impl TryFrom<i64> for MaxCount {
    type Error = GaugeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or(GaugeError::InvalidConfiguration { max_count: value })
    }
}

impl From<MaxCount> for usize {
    fn from(value: MaxCount) -> Self {
        value.get()
    }
}

impl fmt::Display for MaxCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
