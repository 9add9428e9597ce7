//! Corpus file IO and dataset preparation.
//!
//! JSON in, JSON out: record batches are single JSON arrays, read and
//! written whole. Also hosts the pre-labeling record filter and the
//! ratio split used by the training exports.

use crate::attrs::AttributeSpec;
use crate::error::{Error, Result};
use crate::record::{EvalRecord, Infobox, PersonRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::dataset(format!("{}: {e}", path.display())))
}

/// Load a batch of raw person records.
pub fn load_records(path: &Path) -> Result<Vec<PersonRecord>> {
    load_json(path)
}

/// Load a batch of gold/predicted pairs for evaluation.
pub fn load_eval_records(path: &Path) -> Result<Vec<EvalRecord>> {
    load_json(path)
}

/// Write any serializable batch as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

/// Keep only records whose infobox covers at least `min_attributes` of
/// the registry, rewriting matched keys to their canonical labels.
/// Richest records first.
#[must_use]
pub fn filter_by_attribute_count(
    records: Vec<PersonRecord>,
    registry: &[Box<dyn AttributeSpec>],
    min_attributes: usize,
) -> Vec<PersonRecord> {
    let mut kept: Vec<PersonRecord> = records
        .into_iter()
        .filter_map(|record| {
            let keys: Vec<&str> = record.infobox.keys().map(String::as_str).collect();
            let mut canonical = Infobox::new();
            for spec in registry {
                if let Some(key) = spec.find_key_in(&keys) {
                    if let Some(value) = record.infobox.get(&key) {
                        canonical.insert(spec.name().to_string(), value.clone());
                    }
                }
            }
            if canonical.len() < min_attributes.max(1) {
                return None;
            }
            Some(PersonRecord {
                infobox: canonical,
                ..record
            })
        })
        .collect();
    kept.sort_by(|a, b| b.infobox.len().cmp(&a.infobox.len()));
    kept
}

/// Split a batch by ratios. Each part takes `floor(total * ratio)`
/// items in order; the last part absorbs the rounding remainder.
#[must_use]
pub fn split_ratios<T>(mut data: Vec<T>, ratios: &[f64]) -> Vec<Vec<T>> {
    let total = data.len();
    let mut parts = Vec::with_capacity(ratios.len());
    for (i, ratio) in ratios.iter().enumerate() {
        let amount = if i + 1 == ratios.len() {
            data.len()
        } else {
            ((total as f64 * ratio) as usize).min(data.len())
        };
        let rest = data.split_off(amount);
        parts.push(data);
        data = rest;
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::{registry, VocabularyStore};
    use crate::record::RawValue;
    use tempfile::tempdir;

    fn record(name: &str, entries: &[(&str, &str)]) -> PersonRecord {
        PersonRecord {
            name: name.to_string(),
            summary: None,
            paragraphs: Vec::new(),
            infobox: entries
                .iter()
                .map(|(k, v)| (k.to_string(), RawValue::from(*v)))
                .collect(),
        }
    }

    #[test]
    fn split_last_part_takes_remainder() {
        let parts = split_ratios((0..23).collect::<Vec<_>>(), &[0.8, 0.1, 0.1]);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 18);
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 3);
        assert_eq!(parts[0][0], 0);
        assert_eq!(parts[2][2], 22);
    }

    #[test]
    fn split_of_empty_batch_is_empty_parts() {
        let parts = split_ratios(Vec::<u8>::new(), &[0.8, 0.1, 0.1]);
        assert!(parts.iter().all(Vec::is_empty));
    }

    #[test]
    fn filter_rewrites_keys_and_sorts_richest_first() {
        let registry = registry(&VocabularyStore::default());
        let records = vec![
            record("甲", &[("中文名称", "张三")]),
            record("乙", &[("性别", "男"), ("出生日期", "2001年"), ("民族", "汉族")]),
        ];
        let kept = filter_by_attribute_count(records, &registry, 2);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "乙");
        assert!(kept[0].infobox.contains_key("性别"));
    }

    #[test]
    fn filter_canonicalizes_variant_keys() {
        let registry = registry(&VocabularyStore::default());
        let kept = filter_by_attribute_count(
            vec![record("甲", &[("中文名称", "张三")])],
            &registry,
            1,
        );
        assert_eq!(kept.len(), 1);
        assert!(kept[0].infobox.contains_key("姓名"));
        assert!(!kept[0].infobox.contains_key("中文名称"));
    }

    #[test]
    fn malformed_corpus_reports_dataset_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");
        let records = vec![record("甲", &[("性别", "男")])];
        save_json(&path, &records).unwrap();
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "甲");
    }
}
