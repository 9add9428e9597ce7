//! Machine-reading-comprehension style export.
//!
//! One block per (attribute, sentence) pair: a literal question
//! (`该人物的<Attr>是什么?`) followed by the BIOES-tagged sentence,
//! blocks separated by a blank line. The shuffled blocks split 80/10/10
//! into train/test/dev.

use super::bio::{tag_line, TagScheme};
use crate::corpus::split_ratios;
use crate::record::LabeledRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Sentences longer than this are truncated before tagging.
const MAX_SENTENCE_CHARS: usize = 1000;

/// The three output partitions.
#[derive(Debug)]
pub struct MrcSplit {
    /// 80% partition.
    pub train: String,
    /// 10% partition.
    pub test: String,
    /// 10% partition (remainder).
    pub dev: String,
}

/// The literal question string paired with each tagged passage.
#[must_use]
pub fn question(attribute: &str) -> String {
    format!("该人物的{attribute}是什么?")
}

/// Build the MRC export. The shuffle is seeded so identical inputs and
/// seeds produce identical files.
#[must_use]
pub fn export_mrc(records: &[LabeledRecord], scheme: TagScheme, seed: u64) -> MrcSplit {
    let mut blocks = Vec::new();
    for record in records {
        for (attribute, value) in &record.infobox {
            let values: Vec<String> = value.as_slice().iter().map(|s| s.to_string()).collect();
            let entry = vec![(attribute.clone(), values.clone())];
            // First supporting line containing any of the values wins.
            for line in &record.summary {
                let line: String = line.chars().take(MAX_SENTENCE_CHARS).collect();
                if values.iter().any(|v| line.contains(v.as_str())) {
                    let tagged = tag_line(&line, &entry, scheme).join("\n");
                    blocks.push(format!("{}\n{}", question(attribute), tagged));
                    break;
                }
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    blocks.shuffle(&mut rng);
    let mut parts = split_ratios(blocks, &[0.8, 0.1, 0.1]);
    let dev = parts.pop().unwrap_or_default().join("\n\n");
    let test = parts.pop().unwrap_or_default().join("\n\n");
    let train = parts.pop().unwrap_or_default().join("\n\n");
    MrcSplit { train, test, dev }
}
