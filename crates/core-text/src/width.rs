//! Terminal cell width of a grapheme cluster.
//!
//! All width decisions in the workspace flow through [`egc_width`]. The
//! baseline comes from `unicode_width`; emoji presentation sequences are
//! widened to two cells since terminals render them as wide glyphs even when
//! the baseline table measures the base character as narrow.
//!
//! Invariants:
//! - Never returns 0 for a non-empty cluster that contains a visible base.
//! - Over-estimation is preferred to under-estimation (an extra blank cell is
//!   harmless, a missing one drifts every following column).

use unicode_width::UnicodeWidthStr;

const VS16: char = '\u{FE0F}';
const ZWJ: char = '\u{200D}';
const KEYCAP: char = '\u{20E3}';

/// Whether a cluster should be presented as an emoji.
///
/// Small range checks instead of a full Extended_Pictographic table; the
/// ranges cover the emoji blocks terminals actually render wide.
pub fn is_emoji_cluster(g: &str) -> bool {
    let mut chars = g.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if is_pictographic(first) || is_regional_indicator(first) {
        return true;
    }
    g.chars().any(|c| c == VS16 || c == KEYCAP || c == ZWJ) && g.chars().count() > 1
}

fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0x2300..=0x23FF
    )
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

/// Terminal column width for one grapheme cluster.
pub fn egc_width(g: &str) -> u16 {
    if g.is_empty() {
        return 0;
    }
    if g.is_ascii() {
        return 1;
    }
    if is_emoji_cluster(g) {
        return 2;
    }
    let base = UnicodeWidthStr::width(g).min(u16::MAX as usize) as u16;
    base.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_cjk() {
        assert_eq!(egc_width("a"), 1);
        assert_eq!(egc_width(""), 0);
        assert_eq!(egc_width("漢"), 2);
    }

    #[test]
    fn emoji_sequences_are_two_cells() {
        assert_eq!(egc_width("👍"), 2);
        assert_eq!(egc_width("👍🏽"), 2);
        assert_eq!(egc_width("👨‍👩‍👧‍👦"), 2);
        assert_eq!(egc_width("🇯🇵"), 2);
        assert_eq!(egc_width("#\u{FE0F}\u{20E3}"), 2);
    }

    #[test]
    fn combining_mark_stays_narrow() {
        assert_eq!(egc_width("e\u{0301}"), 1);
        assert!(!is_emoji_cluster("e\u{0301}"));
    }
}
