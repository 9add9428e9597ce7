//! Canonical-value vocabularies (countries, birthplaces, schools, nations).
//!
//! A [`Vocabulary`] is a frozen set of short canonical strings with no
//! containment relation between entries. It is built once from corpus
//! statistics, cached as a JSON string array, and treated as immutable
//! for the rest of the run — there is no invalidation path.

use crate::record::PersonRecord;
use crate::text::{char_len, is_plain};
use crate::Result;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Thresholds for building a vocabulary from raw corpus values.
#[derive(Debug, Clone, Copy)]
pub struct VocabConfig {
    /// Minimum number of occurrences for a value to be kept.
    pub min_count: usize,
    /// Minimum length (in characters) for a value to be kept.
    pub min_len: usize,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            min_count: 2,
            min_len: 2,
        }
    }
}

/// A frozen set of canonical short strings.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<String>,
    set: HashSet<String>,
}

impl Vocabulary {
    /// Wrap an entry list (assumed already pruned).
    #[must_use]
    pub fn new(entries: Vec<String>) -> Self {
        let set = entries.iter().cloned().collect();
        Self { entries, set }
    }

    /// An empty vocabulary (membership tests never hit).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a JSON string-array cache file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let entries: Vec<String> = serde_json::from_str(&raw)?;
        Ok(Self::new(entries))
    }

    /// Persist as a JSON string array (pretty-printed, UTF-8).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load the cache if present, otherwise fall back to an empty
    /// vocabulary. Never writes — scoring paths that have no corpus to
    /// build from must not freeze an empty cache for later runs.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::empty())
        }
    }

    /// Read-through cache: load the file if it exists, otherwise build
    /// from `values`, persist, and freeze.
    pub fn load_or_build(
        path: impl AsRef<Path>,
        values: impl FnOnce() -> Vec<String>,
        config: VocabConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        log::info!("vocabulary cache {} missing, building", path.display());
        let vocab = Self::build(&values(), config);
        vocab.save(path)?;
        Ok(vocab)
    }

    /// Build a vocabulary from raw observed values.
    ///
    /// Values that contain non-Han/digit characters, fall below the
    /// length or frequency thresholds, or contain the possessive `的`
    /// are discarded. Survivors are ordered by descending frequency,
    /// then any value with a kept edge-substring (a prefix or suffix of
    /// length >= 2 already in the set) is purged, so no entry contains
    /// another. The result is sorted by ascending length.
    #[must_use]
    pub fn build(values: &[String], config: VocabConfig) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for value in values {
            if !is_plain(value) || char_len(value) < config.min_len || value.contains('的') {
                continue;
            }
            let entry = counts.entry(value.as_str()).or_insert(0);
            if *entry == 0 {
                order.push(value.as_str());
            }
            *entry += 1;
        }
        // Descending frequency, insertion order breaking ties.
        order.retain(|v| counts[v] >= config.min_count);
        order.sort_by_key(|v| std::cmp::Reverse(counts[v]));

        let mut kept: Vec<String> = Vec::new();
        let mut kept_set: HashSet<String> = HashSet::new();
        for value in order {
            let chars: Vec<char> = value.chars().collect();
            let mut shadowed = false;
            for i in 2..chars.len() {
                let prefix: String = chars[..i].iter().collect();
                let suffix: String = chars[chars.len() - i..].iter().collect();
                if kept_set.contains(&prefix) || kept_set.contains(&suffix) {
                    shadowed = true;
                    break;
                }
            }
            if !shadowed {
                kept_set.insert(value.to_string());
                kept.push(value.to_string());
            }
        }
        kept.sort_by_key(|v| char_len(v));
        Self::new(kept)
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, s: &str) -> bool {
        self.set.contains(s)
    }

    /// All entries contained verbatim in `s`.
    #[must_use]
    pub fn entries_in<'a>(&'a self, s: &str) -> Vec<&'a str> {
        self.entries
            .iter()
            .filter(|e| s.contains(e.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// The entry list, ascending by length.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collect all raw values whose infobox key matches `key_pattern`.
///
/// Multi-valued fields are flattened. This feeds [`Vocabulary::build`].
#[must_use]
pub fn collect_values(records: &[PersonRecord], key_pattern: &Regex) -> Vec<String> {
    let mut values = Vec::new();
    for record in records {
        for (key, value) in &record.infobox {
            if key_pattern.is_match(key) {
                for v in value.as_slice() {
                    values.push(v.to_string());
                }
            }
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn build_applies_thresholds() {
        let values = owned(&["汉族", "汉族", "回族", "回族", "苗族", "有的族", "A族", "A族"]);
        let vocab = Vocabulary::build(&values, VocabConfig::default());
        assert!(vocab.contains("汉族"));
        assert!(vocab.contains("回族"));
        // Below min_count.
        assert!(!vocab.contains("苗族"));
        // Possessive particle.
        assert!(!vocab.contains("有的族"));
        // Non-Han character.
        assert!(!vocab.contains("A族"));
    }

    #[test]
    fn build_purges_edge_substring_duplicates() {
        // "北京" is more frequent, so the longer "北京市" is shadowed.
        let values = owned(&["北京", "北京", "北京", "北京市", "北京市"]);
        let vocab = Vocabulary::build(&values, VocabConfig::default());
        assert!(vocab.contains("北京"));
        assert!(!vocab.contains("北京市"));
    }

    #[test]
    fn build_sorts_by_ascending_length() {
        let values = owned(&["清华大学", "清华大学", "北京", "北京"]);
        let vocab = Vocabulary::build(&values, VocabConfig::default());
        assert_eq!(vocab.entries(), &["北京".to_string(), "清华大学".to_string()]);
    }

    #[test]
    fn load_or_empty_never_creates_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("country.json");
        let vocab = Vocabulary::load_or_empty(&path).unwrap();
        assert!(vocab.is_empty());
        // A later build-capable run must still see a missing cache.
        assert!(!path.exists());
    }

    #[test]
    fn entries_in_finds_contained() {
        let vocab = Vocabulary::new(owned(&["中国", "美国"]));
        assert_eq!(vocab.entries_in("中国和美国"), vec!["中国", "美国"]);
        assert!(vocab.entries_in("法国").is_empty());
    }
}
