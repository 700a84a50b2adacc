//! Property-based tests for classification and overflow splitting.

use core_gauge::{GaugeState, classify, split, split_with};
use core_text::{WeightedLength, grapheme, utf16_len};
use proptest::prelude::*;

fn composer_text() -> impl Strategy<Value = String> {
    // Mix ASCII, combining marks, CJK, astral emoji, ZWJ and skin tones.
    prop::collection::vec(
        prop_oneof![
            "[a-z ]{1,4}",
            Just("e\u{0301}".to_string()),
            Just("漢".to_string()),
            Just("👍".to_string()),
            Just("👍🏽".to_string()),
            Just("👨\u{200D}👩\u{200D}👧".to_string()),
            Just("🇯🇵".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn ok_at_or_below_cutoff(max in 1usize..5000, frac in 0.0f64..=0.928) {
        let len = ((max as f64) * frac).floor() as usize;
        prop_assume!(len < max);
        prop_assume!((len as f64) * 100.0 <= 92.8 * max as f64);
        prop_assert_eq!(classify(len, max).unwrap(), GaugeState::Ok);
    }

    #[test]
    fn warning_between_cutoff_and_max(
        (max, len) in (100usize..5000).prop_flat_map(|max| (Just(max), (max * 928 / 1000)..max))
    ) {
        prop_assume!((len as f64) * 100.0 > 92.8 * max as f64);
        prop_assert_eq!(classify(len, max).unwrap(), GaugeState::Warning);
    }

    #[test]
    fn overflowing_at_or_above_max(max in 1usize..5000, extra in 0usize..5000) {
        prop_assert_eq!(classify(max + extra, max).unwrap(), GaugeState::Overflowing);
    }

    #[test]
    fn split_concatenates_back(text in composer_text(), max in 1usize..80) {
        let r = split(&text, max).unwrap();
        prop_assert_eq!(format!("{}{}", r.allowed, r.overflowing), text);
    }

    #[test]
    fn split_cut_is_grapheme_boundary_and_fits(text in composer_text(), max in 1usize..80) {
        let r = split(&text, max).unwrap();
        prop_assert!(grapheme::is_boundary(&text, r.cut()));
        prop_assert!(utf16_len(r.allowed) <= max);
        if utf16_len(&text) <= max {
            prop_assert_eq!(r.overflowing, "");
        } else {
            // The next cluster would not have fit.
            let next = grapheme::next_boundary(&text, r.cut());
            prop_assert!(utf16_len(&text[..next]) > max);
        }
    }

    #[test]
    fn weighted_split_concatenates_back(text in composer_text(), max in 1usize..80) {
        let r = split_with(&text, max, &WeightedLength).unwrap();
        prop_assert_eq!(format!("{}{}", r.allowed, r.overflowing), text.clone());
        prop_assert!(grapheme::is_boundary(&text, r.cut()));
    }
}
