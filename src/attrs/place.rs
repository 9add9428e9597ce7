//! Geographic/ethnic attributes: country, nation (ethnic group),
//! birthplace.
//!
//! These types have no reliable surface shape of their own, so they
//! lean on frozen corpus vocabularies: `国籍` resolves ambiguous
//! strings against the country vocabulary, and the free-text extractors
//! all confirm candidates by vocabulary membership.

use super::cluster::{cluster_by_substring, most_frequent};
use super::{compile, AttributeSpec};
use crate::record::AttributeValue;
use crate::text::{char_len, han_digits, is_plain, normalize_width};
use crate::vocab::Vocabulary;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static COUNTRY_KEYS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&["国家|国籍"]));

static COUNTRY_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r"(国籍：|国籍为|出生在|生于|，).{2,10}", r".{2,10}国籍"])
});

/// Unambiguous markers of Chinese citizenship in biography prose.
static CHINA_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new("中共党员|中国共产党|入党|书记|党委").expect("invalid built-in pattern"));

static NATION_EXTRACT: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"(民族).{2,10}", r".{2,10}族"]));

static BIRTHPLACE_KEYS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&["出生地", "籍贯", "祖籍"]));

static BIRTHPLACE_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r".{0,15}(出生).{0,15}", r"(生于).{2,10}", r".{2,10}人"])
});

/// Scan the first 2..=8 characters of a sentence for a vocabulary entry.
fn leading_entry(vocab: &Vocabulary, sentence: &str) -> Option<String> {
    let chars: Vec<char> = sentence.chars().collect();
    for i in 2..9.min(chars.len() + 1) {
        let head: String = chars[..i.min(chars.len())].iter().collect();
        if vocab.contains(&head) {
            return Some(head);
        }
    }
    None
}

/// 国籍 (country of citizenship).
pub struct Country {
    vocab: Arc<Vocabulary>,
}

impl Country {
    /// Create with the frozen country vocabulary.
    #[must_use]
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }
}

impl AttributeSpec for Country {
    fn name(&self) -> &'static str {
        "国籍"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&COUNTRY_KEYS)
    }

    /// Ambiguous strings (anything with separators or foreign
    /// characters) resolve to every vocabulary entry they contain, so
    /// multi-citizenship values label as much text as possible. Plain
    /// strings pass through when longer than one character and free of
    /// the possessive `的`.
    fn filter(&self, raw: &str) -> AttributeValue {
        if raw.is_empty() {
            return AttributeValue::None;
        }
        if !is_plain(raw) {
            let found: Vec<String> = self
                .vocab
                .entries_in(raw)
                .into_iter()
                .map(str::to_string)
                .collect();
            AttributeValue::from_tokens(found)
        } else if char_len(raw) > 1 && !raw.contains('的') {
            AttributeValue::Scalar(raw.to_string())
        } else {
            AttributeValue::None
        }
    }

    fn extract(&self, sentence: &str) -> Option<String> {
        if sentence.is_empty() {
            return None;
        }
        let sentence = normalize_width(sentence);
        for pattern in COUNTRY_EXTRACT.iter() {
            if let Some(m) = pattern.find(&sentence) {
                let window = m.as_str();
                if let Some(entry) = self.vocab.entries().iter().find(|e| window.contains(e.as_str()))
                {
                    return Some(entry.clone());
                }
            }
        }
        if let Some(head) = leading_entry(&self.vocab, &sentence) {
            return Some(head);
        }
        if CHINA_MARKERS.is_match(&sentence) {
            return Some("中国".to_string());
        }
        None
    }
}

/// 民族 (ethnic group). Canonical form always carries the `族` suffix;
/// single-character values are completed (`汉` -> `汉族`).
pub struct Nation {
    vocab: Arc<Vocabulary>,
}

impl Nation {
    /// Create with the frozen nation vocabulary.
    #[must_use]
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }
}

impl AttributeSpec for Nation {
    fn name(&self) -> &'static str {
        "民族"
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        let Some(mut s) = han_digits(raw) else {
            return AttributeValue::None;
        };
        if char_len(&s) == 1 {
            s.push('族');
        }
        if s.ends_with('族') {
            AttributeValue::Scalar(s)
        } else {
            AttributeValue::None
        }
    }

    /// Keep only values ending in the nation suffix, then take the
    /// majority.
    fn normalize(&self, values: &[String]) -> AttributeValue {
        let suffixed: Vec<String> = values
            .iter()
            .filter(|v| v.ends_with('族'))
            .cloned()
            .collect();
        AttributeValue::from_scalar(most_frequent(&suffixed))
    }

    fn extract(&self, sentence: &str) -> Option<String> {
        if sentence.is_empty() {
            return None;
        }
        let sentence = normalize_width(sentence);
        for pattern in NATION_EXTRACT.iter() {
            if let Some(m) = pattern.find(&sentence) {
                let window = m.as_str();
                if let Some(entry) = self.vocab.entries().iter().find(|e| window.contains(e.as_str()))
                {
                    return Some(entry.clone());
                }
            }
        }
        leading_entry(&self.vocab, &sentence)
    }
}

/// 出生地 (birthplace). Raw values wrap the place name in boilerplate
/// (`生于北京`, `山东人`); fixed edge tokens are stripped, longest
/// match first.
pub struct BirthPlace {
    vocab: Arc<Vocabulary>,
}

impl BirthPlace {
    /// Create with the frozen birthplace vocabulary.
    #[must_use]
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }
}

/// Boilerplate tokens stripped from value edges.
const EDGE_TOKENS: &[&str] = &["生于", "出生", "生", "人"];

impl AttributeSpec for BirthPlace {
    fn name(&self) -> &'static str {
        "出生地"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&BIRTHPLACE_KEYS)
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        if !is_plain(raw) {
            return AttributeValue::None;
        }
        let mut chars: Vec<char> = raw.chars().collect();
        for len in (1..=2).rev() {
            if chars.len() >= len {
                let prefix: String = chars[..len].iter().collect();
                if EDGE_TOKENS.contains(&prefix.as_str()) {
                    chars.drain(..len);
                }
            }
        }
        for len in (1..=2).rev() {
            if chars.len() >= len {
                let suffix: String = chars[chars.len() - len..].iter().collect();
                if EDGE_TOKENS.contains(&suffix.as_str()) {
                    chars.truncate(chars.len() - len);
                }
            }
        }
        let stripped: String = chars.into_iter().collect();
        AttributeValue::from_scalar(Some(stripped).filter(|s| !s.is_empty()))
    }

    fn normalize(&self, values: &[String]) -> AttributeValue {
        AttributeValue::from_scalar(cluster_by_substring(values.iter().cloned()))
    }

    fn extract(&self, sentence: &str) -> Option<String> {
        if sentence.is_empty() {
            return None;
        }
        let sentence = normalize_width(sentence);
        for pattern in BIRTHPLACE_EXTRACT.iter() {
            if let Some(m) = pattern.find(&sentence) {
                let window = m.as_str();
                if let Some(entry) = self.vocab.entries().iter().find(|e| window.contains(e.as_str()))
                {
                    return Some(entry.clone());
                }
            }
        }
        None
    }
}
