//! Property tests for the comparison, normalization and splitting
//! invariants the pipeline relies on.

use biosup::attrs::{AttributeSpec, BirthDate, PoliticsStatus};
use biosup::corpus::split_ratios;
use biosup::text::to_halfwidth;
use biosup::vocab::{VocabConfig, Vocabulary};
use proptest::prelude::*;

proptest! {
    #[test]
    fn default_equal_is_symmetric(a in "[一二三四五六七八九十]{1,6}", b in "[一二三四五六七八九十]{1,6}") {
        let spec = PoliticsStatus;
        prop_assert_eq!(spec.equal(&a, &b), spec.equal(&b, &a));
    }

    #[test]
    fn default_equal_is_reflexive(a in "[一二三四五六七八九十]{1,6}") {
        prop_assert!(PoliticsStatus.equal(&a, &a));
    }

    #[test]
    fn date_equal_is_symmetric(
        y in 1900u32..2100,
        m in 1u32..13,
        d in 1u32..29,
        keep_a in 1usize..4,
        keep_b in 1usize..4,
    ) {
        let parts = [format!("{y}年"), format!("{m}月"), format!("{d}日")];
        let a: String = parts[..keep_a].concat();
        let b: String = parts[..keep_b].concat();
        let spec = BirthDate;
        prop_assert_eq!(spec.equal(&a, &b), spec.equal(&b, &a));
    }

    #[test]
    fn halfwidth_is_idempotent(s in "\\PC{0,20}") {
        let once = to_halfwidth(&s);
        prop_assert_eq!(to_halfwidth(&once), once);
    }

    #[test]
    fn vocabulary_entries_respect_thresholds_and_ordering(
        values in prop::collection::vec("[北京上海汉回族市的A]{1,5}", 0..40),
    ) {
        let config = VocabConfig::default();
        let vocab = Vocabulary::build(&values, config);
        let mut last_len = 0;
        for entry in vocab.entries() {
            let len = entry.chars().count();
            prop_assert!(len >= config.min_len);
            prop_assert!(!entry.contains('的'));
            prop_assert!(!entry.contains('A'));
            prop_assert!(values.iter().filter(|v| *v == entry).count() >= config.min_count);
            // Ascending length ordering.
            prop_assert!(len >= last_len);
            last_len = len;
        }
    }

    #[test]
    fn split_preserves_every_item_in_order(len in 0usize..100) {
        let data: Vec<usize> = (0..len).collect();
        let parts = split_ratios(data, &[0.8, 0.1, 0.1]);
        let rejoined: Vec<usize> = parts.into_iter().flatten().collect();
        prop_assert_eq!(rejoined, (0..len).collect::<Vec<_>>());
    }
}
