//! Length metrics: how many "characters" a composer text is worth.
//!
//! Two metrics are provided:
//! * [`Utf16Length`]: UTF-16 code units, the way `NSString` lengths are
//!   counted. This is the default.
//! * [`WeightedLength`]: twitter-text v3 style weighting (NFC, per code point
//!   range weights, emoji clusters and URLs at fixed weights).
//!
//! Both report whole units; the gauge compares them against its max count.

use crate::segment::normalize;
use crate::utf16_len;
use crate::width::is_emoji_cluster;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Measures text and finds the furthest grapheme boundary that still fits.
pub trait LengthMetric {
    /// Which metric this is (for logging and config round-trips).
    fn kind(&self) -> MetricKind;

    /// Length of `text` in this metric's units.
    fn measure(&self, text: &str) -> usize;

    /// End of the longest run of grapheme clusters whose every prefix
    /// measures `<= limit`, i.e. the boundary just before the first prefix
    /// that goes over.
    ///
    /// Prefix lengths need not grow steadily (a URL jumps to a fixed weight
    /// once it gains a host), so a later prefix that fits again is not
    /// considered. Returns a byte offset into `text`; `0` when not even the
    /// first cluster fits.
    fn fit_boundary(&self, text: &str, limit: usize) -> usize {
        let mut fit = 0;
        for (idx, g) in text.grapheme_indices(true) {
            let end = idx + g.len();
            if self.measure(&text[..end]) > limit {
                break;
            }
            fit = end;
        }
        fit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricKind {
    #[default]
    Utf16,
    Weighted,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Utf16 => "utf16",
            MetricKind::Weighted => "weighted",
        }
    }

    /// Instantiate the metric this kind names.
    pub fn metric(&self) -> Box<dyn LengthMetric + Send + Sync> {
        match self {
            MetricKind::Utf16 => Box::new(Utf16Length),
            MetricKind::Weighted => Box::new(WeightedLength),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown length metric `{0}` (expected utf16 or weighted)")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricKind {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf16" | "utf-16" | "code-units" => Ok(MetricKind::Utf16),
            "weighted" | "twitter" => Ok(MetricKind::Weighted),
            other => Err(UnknownMetric(other.to_string())),
        }
    }
}

/// UTF-16 code unit count.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Length;

impl LengthMetric for Utf16Length {
    fn kind(&self) -> MetricKind {
        MetricKind::Utf16
    }

    fn measure(&self, text: &str) -> usize {
        utf16_len(text)
    }

    // Additive per cluster, so a single pass suffices.
    fn fit_boundary(&self, text: &str, limit: usize) -> usize {
        let mut used = 0;
        let mut fit = 0;
        for (idx, g) in text.grapheme_indices(true) {
            used += utf16_len(g);
            if used > limit {
                break;
            }
            fit = idx + g.len();
        }
        fit
    }
}

pub const WEIGHT_SCALE: usize = 100;
pub const DEFAULT_WEIGHT: usize = 200;
pub const LIGHT_WEIGHT: usize = 100;
pub const TRANSFORMED_URL_LENGTH: usize = 23;

/// Code point ranges that count as a single unit; everything else counts double.
const LIGHT_RANGES: [(u32, u32); 4] = [(0, 4351), (8192, 8205), (8208, 8223), (8242, 8247)];

static URL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\bhttps?://[^\s<>]+").ok());

/// twitter-text v3 style weighted length.
///
/// URLs are only recognized with an explicit `http://` / `https://` scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedLength;

impl WeightedLength {
    fn code_point_weight(c: char) -> usize {
        let cp = c as u32;
        if LIGHT_RANGES
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&cp))
        {
            LIGHT_WEIGHT
        } else {
            DEFAULT_WEIGHT
        }
    }

    fn plain_weight(text: &str) -> usize {
        text.graphemes(true)
            .map(|g| {
                if is_emoji_cluster(g) {
                    DEFAULT_WEIGHT
                } else {
                    g.chars().map(Self::code_point_weight).sum()
                }
            })
            .sum()
    }

    /// Weight in scaled units (before dividing by [`WEIGHT_SCALE`]).
    pub fn scaled_weight(text: &str) -> usize {
        let normalized = normalize(text);
        let Some(url) = URL_PATTERN.as_ref() else {
            return Self::plain_weight(&normalized);
        };
        let mut total = 0;
        let mut last = 0;
        for m in url.find_iter(&normalized) {
            total += Self::plain_weight(&normalized[last..m.start()]);
            total += TRANSFORMED_URL_LENGTH * WEIGHT_SCALE;
            last = m.end();
        }
        total + Self::plain_weight(&normalized[last..])
    }
}

impl LengthMetric for WeightedLength {
    fn kind(&self) -> MetricKind {
        MetricKind::Weighted
    }

    fn measure(&self, text: &str) -> usize {
        Self::scaled_weight(text) / WEIGHT_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_metric_matches_code_units() {
        let m = Utf16Length;
        assert_eq!(m.measure("hello"), 5);
        assert_eq!(m.measure("ab👍cd"), 6);
        assert_eq!(m.kind(), MetricKind::Utf16);
    }

    #[test]
    fn utf16_fit_boundary_never_splits_surrogates() {
        let m = Utf16Length;
        let s = "ab👍cd";
        assert_eq!(m.fit_boundary(s, 2), 2);
        assert_eq!(m.fit_boundary(s, 3), 2);
        assert_eq!(m.fit_boundary(s, 4), 6);
        assert_eq!(m.fit_boundary(s, 100), s.len());
        assert_eq!(m.fit_boundary(s, 0), 0);
    }

    #[test]
    fn weighted_latin_counts_one_cjk_counts_two() {
        let m = WeightedLength;
        assert_eq!(m.measure("abc"), 3);
        assert_eq!(m.measure("漢字"), 4);
        assert_eq!(m.measure("a漢"), 3);
        // U+2010 hyphen sits in a light range
        assert_eq!(m.measure("\u{2010}"), 1);
    }

    #[test]
    fn weighted_emoji_cluster_counts_two() {
        let m = WeightedLength;
        assert_eq!(m.measure("👍"), 2);
        assert_eq!(m.measure("👨‍👩‍👧‍👦"), 2);
        assert_eq!(m.measure("👍🏽a"), 3);
    }

    #[test]
    fn weighted_urls_are_fixed_length() {
        let m = WeightedLength;
        assert_eq!(m.measure("https://example.com/a/very/long/path/that/keeps/going"), 23);
        assert_eq!(m.measure("see http://a.co ok"), 4 + 23 + 3);
    }

    #[test]
    fn weighted_normalizes_before_counting() {
        let m = WeightedLength;
        assert_eq!(m.measure("e\u{0301}"), 1);
    }

    #[test]
    fn weighted_fit_boundary_uses_weights() {
        let m = WeightedLength;
        let s = "ab漢c";
        assert_eq!(m.fit_boundary(s, 3), 2);
        assert_eq!(m.fit_boundary(s, 4), 2 + "漢".len());
    }

    #[test]
    fn weighted_fit_boundary_stops_where_a_url_starts_counting() {
        let m = WeightedLength;
        let s = "https://example.com";
        assert_eq!(m.measure("https://"), 8);
        assert_eq!(m.measure("https://e"), 23);
        assert_eq!(m.fit_boundary(s, 10), "https://".len());
        assert_eq!(m.fit_boundary(s, 23), s.len());
    }

    #[test]
    fn unknown_metric_is_a_std_error_naming_the_input() {
        let err = "bytes".parse::<MetricKind>().unwrap_err();
        assert_eq!(err, UnknownMetric("bytes".to_string()));
        let dyn_err: &dyn std::error::Error = &err;
        assert_eq!(
            dyn_err.to_string(),
            "unknown length metric `bytes` (expected utf16 or weighted)"
        );
    }

    #[test]
    fn kind_parses_from_config_strings() {
        assert_eq!("utf16".parse::<MetricKind>(), Ok(MetricKind::Utf16));
        assert_eq!(" Weighted ".parse::<MetricKind>(), Ok(MetricKind::Weighted));
        assert!("bogus".parse::<MetricKind>().is_err());
        assert_eq!(MetricKind::Weighted.metric().kind(), MetricKind::Weighted);
        assert_eq!(MetricKind::default().to_string(), "utf16");
    }
}
