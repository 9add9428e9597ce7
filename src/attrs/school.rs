//! Education attributes: graduating institution and degree.

use super::{compile, AttributeSpec};
use crate::record::AttributeValue;
use crate::text::{is_plain, normalize_width};
use crate::vocab::Vocabulary;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static SCHOOL_KEYS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&["毕业院校|毕业学校"]));

/// Institution-name-boundary cascade, most specific first: branch
/// campuses and research institutes before generic school words, so a
/// second-level name (`清华大学深圳研究所`) is not truncated to its
/// parent institution.
static SCHOOL_BOUNDARY: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r".*(分校|学院|研究所)",
        r".*(学校|学院|学堂|学园|大学|院校|研究所|实验室)",
        r".*(女中|初中|高中|附中|[0-9一二三四五六七八九十]+中|[0-9一二三四五六七八九十]+小)",
        r".*(学|院|校)",
        r".*(大|专|师范|医科|班|堂|团|医药)",
    ])
});

static SCHOOL_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r".{0,20}(毕业).{0,20}", r".{0,20}(学位|学历|专业).{0,20}"])
});

static DEGREE_KEYS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&["学历", "学位", "文化程度", "学位学历"]));

static DEGREE_KEY_MATCH: Lazy<Regex> =
    Lazy::new(|| Regex::new("学历|学位").expect("invalid built-in pattern"));

static DEGREE_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r".{0,10}(学历|学位).{0,10}"]));

static DEGREE_FILTER: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        "(博士|本科|大专|硕士研究生|中专|学士|博士后|专科|EMBA|高中|初中|大本|中学|小学)",
        "(大学|硕士|研究生|MBA)",
        // Imperial-era degrees.
        "(案首|监生|生员|禀生|贡生|举人|解元|进士|探花|榜眼|状元)",
        "(工学|理学)",
    ])
});

/// Separators that delimit multiple institutions in one value. Only the
/// first one present is used for splitting.
const SCHOOL_SEPARATORS: &[char] = &['、', '，', ','];

/// How many canonical institutions `normalize` keeps.
const SCHOOL_KEEP: usize = 3;

/// 毕业院校 (graduating institution). Frequently multi-valued.
pub struct School {
    vocab: Arc<Vocabulary>,
}

impl School {
    /// Create with the frozen institution vocabulary.
    #[must_use]
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    /// Clean one candidate institution name: it must be a plain string
    /// ending at a recognized institution boundary, with any
    /// `毕业于`/`毕业` prefix stripped.
    fn filter_single(&self, s: &str) -> Option<String> {
        if !is_plain(s) {
            return None;
        }
        for pattern in SCHOOL_BOUNDARY.iter() {
            if let Some(m) = pattern.find(s) {
                let mut school = m.as_str();
                // Both strips apply in turn, so stacked boilerplate
                // (`毕业于毕业…`) comes off completely.
                if let Some(rest) = school.strip_prefix("毕业于") {
                    school = rest;
                }
                if let Some(rest) = school.strip_prefix("毕业") {
                    school = rest;
                }
                if school.is_empty() {
                    return None;
                }
                return Some(school.to_string());
            }
        }
        None
    }
}

impl AttributeSpec for School {
    fn name(&self) -> &'static str {
        "毕业院校"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&SCHOOL_KEYS)
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        if raw.is_empty() {
            return AttributeValue::None;
        }
        let tokens: Vec<String> = match SCHOOL_SEPARATORS.iter().find(|sep| raw.contains(**sep)) {
            Some(sep) => raw.split(*sep).map(str::to_string).collect(),
            None => vec![raw.to_string()],
        };
        let kept: Vec<String> = tokens
            .iter()
            .filter_map(|t| self.filter_single(t))
            .collect();
        AttributeValue::from_tokens(kept)
    }

    /// Keep the most frequent canonical institution names (at most
    /// three), re-filtering each observation first.
    fn normalize(&self, values: &[String]) -> AttributeValue {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for value in values {
            if let AttributeValue::Scalar(school) = self.filter(value) {
                match counts.iter_mut().find(|(v, _)| *v == school) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((school, 1)),
                }
            }
        }
        counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        AttributeValue::from_tokens(
            counts
                .into_iter()
                .take(SCHOOL_KEEP)
                .map(|(v, _)| v)
                .collect(),
        )
    }

    fn extract(&self, sentence: &str) -> Option<String> {
        if sentence.is_empty() {
            return None;
        }
        let sentence = normalize_width(sentence);
        for pattern in SCHOOL_EXTRACT.iter() {
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

/// 学历 (degree / education level).
pub struct Degree;

impl AttributeSpec for Degree {
    fn name(&self) -> &'static str {
        "学历"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&DEGREE_KEYS)
    }

    /// Any key mentioning 学历 or 学位 counts, whatever its exact form.
    fn find_key_in(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find(|k| DEGREE_KEY_MATCH.is_match(k))
            .map(|k| (*k).to_string())
    }

    fn filter_patterns(&self) -> Option<&[Regex]> {
        Some(&DEGREE_FILTER)
    }

    fn extract_patterns(&self) -> Option<&[Regex]> {
        Some(&DEGREE_EXTRACT)
    }
}
