//! The attribute taxonomy: one [`AttributeSpec`] per attribute type.
//!
//! Every attribute type has irregular surface syntax (dates, places,
//! institution names, multi-valued lists, foreign-script names) behind
//! one uniform contract: detect the infobox key, clean the raw value,
//! aggregate repeated observations, and compare values fuzzily. The
//! trait supplies generic defaults; each type overrides the subset it
//! needs. Pattern tables are ordered and first-match-wins — the order
//! is observable behavior, not an implementation accident.
//!
//! All operations are infallible by design: malformed input yields
//! `None`/empty, never an error, so the labeling pipeline proceeds
//! attribute by attribute without failure isolation.

pub mod body;
pub mod cluster;
pub mod date;
pub mod misc;
pub mod person;
pub mod place;
pub mod school;

use crate::record::AttributeValue;
use crate::text::{first_match, normalize_width};
use crate::vocab::Vocabulary;
use regex::Regex;
use std::sync::Arc;

pub use body::{Height, Weight};
pub use date::{BirthDate, DeathDate};
pub use misc::{Belief, Constellation, PoliticsStatus, Production, SportPosition, SportTeam, SportType};
pub use person::{ForeignName, Gender, Name};
pub use place::{BirthPlace, Country, Nation};
pub use school::{Degree, School};

/// Compile an ordered pattern table. Called only on literal tables, so
/// a bad pattern is a programming error.
pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid built-in pattern"))
        .collect()
}

/// Replace every separator occurrence with a space and split, dropping
/// empty tokens. The shared first stage of the separator-splitting
/// filters (names, teams, sport types).
pub(crate) fn separator_tokens(s: &str, separators: &[&str]) -> Vec<String> {
    let mut s = s.to_string();
    for sep in separators {
        s = s.replace(sep, " ");
    }
    s.split_whitespace().map(str::to_string).collect()
}

/// Size-limited colon handling: values with more than one colon segment
/// are over-structured and dropped; `标签:值` keeps the tail; plain
/// values pass through.
pub(crate) fn colon_tail(s: &str) -> Option<String> {
    let segments: Vec<&str> = s.split(':').collect();
    match segments.len() {
        1 => Some(segments[0].to_string()),
        2 => Some(segments[1].to_string()),
        _ => None,
    }
}

/// The shared colon-then-separator filter: half-width normalize, apply
/// [`colon_tail`], then separator-split into tokens.
pub(crate) fn colon_separated(raw: &str, separators: &[&str]) -> AttributeValue {
    if raw.is_empty() {
        return AttributeValue::None;
    }
    let halfwidth = crate::text::to_halfwidth(raw);
    let Some(tail) = colon_tail(&halfwidth) else {
        return AttributeValue::None;
    };
    AttributeValue::from_tokens(separator_tokens(&tail, separators))
}

/// Per-attribute-type rules for cleaning, matching, aggregation and
/// comparison.
///
/// Implementations are stateless (vocabulary-backed types hold a shared
/// frozen [`Vocabulary`]); statistics live in the supervisor's
/// accumulator, not here.
pub trait AttributeSpec {
    /// Canonical attribute label, e.g. `出生日期`.
    fn name(&self) -> &'static str;

    /// Priority-ordered patterns for detecting which infobox key
    /// corresponds to this attribute. `None` means literal containment
    /// of [`name`](Self::name) in the key.
    fn name_patterns(&self) -> Option<&[Regex]> {
        None
    }

    /// Ordered patterns for cleaning a raw value in [`filter`](Self::filter).
    fn filter_patterns(&self) -> Option<&[Regex]> {
        None
    }

    /// Ordered patterns for locating a value in free text in
    /// [`extract`](Self::extract).
    fn extract_patterns(&self) -> Option<&[Regex]> {
        None
    }

    /// Find the infobox key for this attribute. First pattern with any
    /// match wins; without patterns, the first key containing the
    /// canonical name wins.
    fn find_key_in(&self, keys: &[&str]) -> Option<String> {
        match self.name_patterns() {
            Some(patterns) => {
                for pattern in patterns {
                    for key in keys {
                        if pattern.is_match(key) {
                            return Some((*key).to_string());
                        }
                    }
                }
                None
            }
            None => keys
                .iter()
                .find(|k| k.contains(self.name()))
                .map(|k| (*k).to_string()),
        }
    }

    /// Clean one raw infobox value into canonical form.
    ///
    /// Default: the first matching filter pattern wins; with no filter
    /// patterns the value passes through unchanged.
    fn filter(&self, raw: &str) -> AttributeValue {
        if raw.is_empty() {
            return AttributeValue::None;
        }
        match self.filter_patterns() {
            Some(patterns) => AttributeValue::from_scalar(first_match(patterns, raw)),
            None => AttributeValue::Scalar(raw.to_string()),
        }
    }

    /// Locate a value for this attribute directly inside free text.
    ///
    /// Only used by the optional text-inference path. Default:
    /// width-normalize the sentence, try the extract patterns in order,
    /// and filter the first hit.
    fn extract(&self, sentence: &str) -> Option<String> {
        if sentence.is_empty() {
            return None;
        }
        let sentence = normalize_width(sentence);
        let patterns = self.extract_patterns()?;
        for pattern in patterns {
            if let Some(m) = pattern.find(&sentence) {
                match self.filter(m.as_str()) {
                    AttributeValue::Scalar(v) => return Some(v),
                    AttributeValue::List(mut l) => return Some(l.remove(0)),
                    AttributeValue::None => {}
                }
            }
        }
        None
    }

    /// Collapse repeated/conflicting observed values into one canonical
    /// value. Default: the most frequent exact value.
    fn normalize(&self, values: &[String]) -> AttributeValue {
        AttributeValue::from_scalar(cluster::most_frequent(values))
    }

    /// Fuzzy equality. Default: true when either string contains the
    /// other (symmetric, not transitive).
    fn equal(&self, a: &str, b: &str) -> bool {
        a.contains(b) || b.contains(a)
    }
}

/// The frozen vocabularies injected into vocabulary-backed specs.
#[derive(Debug, Clone, Default)]
pub struct VocabularyStore {
    /// Country names, used by `国籍`.
    pub country: Arc<Vocabulary>,
    /// Ethnic-group names, used by `民族`.
    pub nation: Arc<Vocabulary>,
    /// Birthplace names, used by `出生地`.
    pub birthplace: Arc<Vocabulary>,
    /// Institution names, used by `毕业院校`.
    pub school: Arc<Vocabulary>,
}

/// The fixed, ordered attribute taxonomy.
///
/// Registration order decides only which name-pattern match or
/// paragraph-skip heuristic wins first, not final correctness, so
/// reordering is safe but changes tie-break outcomes.
#[must_use]
pub fn registry(vocabs: &VocabularyStore) -> Vec<Box<dyn AttributeSpec>> {
    vec![
        Box::new(Country::new(Arc::clone(&vocabs.country))),
        Box::new(Gender),
        Box::new(Height),
        Box::new(Weight),
        Box::new(Nation::new(Arc::clone(&vocabs.nation))),
        Box::new(Degree),
        Box::new(School::new(Arc::clone(&vocabs.school))),
        Box::new(BirthPlace::new(Arc::clone(&vocabs.birthplace))),
        Box::new(BirthDate),
        Box::new(DeathDate),
        Box::new(Name),
        Box::new(ForeignName),
        Box::new(SportType),
        Box::new(SportTeam),
        Box::new(Belief),
        Box::new(SportPosition),
        Box::new(PoliticsStatus),
        Box::new(Constellation),
        Box::new(Production),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl AttributeSpec for Plain {
        fn name(&self) -> &'static str {
            "星座"
        }
    }

    #[test]
    fn default_find_key_uses_containment() {
        let spec = Plain;
        assert_eq!(
            spec.find_key_in(&["出生日期", "星座信息"]),
            Some("星座信息".to_string())
        );
        assert_eq!(spec.find_key_in(&["出生日期"]), None);
    }

    #[test]
    fn default_filter_passes_through() {
        let spec = Plain;
        assert_eq!(
            spec.filter("处女座"),
            AttributeValue::Scalar("处女座".to_string())
        );
        assert_eq!(spec.filter(""), AttributeValue::None);
    }

    #[test]
    fn default_equal_is_substring_containment() {
        let spec = Plain;
        assert!(spec.equal("北京", "北京市"));
        assert!(spec.equal("北京市", "北京"));
        assert!(!spec.equal("北京", "上海"));
    }

    #[test]
    fn registry_has_fixed_order() {
        let registry = registry(&VocabularyStore::default());
        assert_eq!(registry.len(), 19);
        assert_eq!(registry[0].name(), "国籍");
        assert_eq!(registry[8].name(), "出生日期");
        assert_eq!(registry[18].name(), "作品");
    }
}
