//! Scoring predicted attribute sets against gold sets.
//!
//! # Metric naming warning
//!
//! The P/R naming here is **swapped** relative to the conventional
//! definitions and is preserved deliberately for comparability with
//! prior results: `P = right_count / gold_count` and
//! `R = right_count / predicted_count`. `R2` uses `exist_count` (the
//! predicted count restricted to records where gold is also present)
//! as its denominator. Do not "fix" this without renaming the output
//! fields.
//!
//! Matching is many-to-many: every (gold, predicted) pair is compared
//! with the attribute's fuzzy `equal`, so one predicted value matching
//! two gold values increments `right_count` twice. `right_count` is
//! intentionally uncapped — a known scoring property, not a bug.

use crate::attrs::AttributeSpec;
use crate::record::{AttributeValue, EvalRecord};
use serde::ser::Serializer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sentinel reported when `right_count == 0` and the ratios are
/// meaningless (avoids a division fault).
const SENTINEL: i64 = -1;

/// A reported metric: either the -1 sentinel or a truncated
/// percentage string such as `"85.71%"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// No correct matches; ratios undefined.
    Sentinel,
    /// A ratio in [0, 1], rendered as a percentage.
    Percent(f64),
}

impl Metric {
    /// Render the way reports expect: `-1` stays numeric, ratios become
    /// percentage strings truncated (not rounded) to two decimals.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Metric::Sentinel => SENTINEL.to_string(),
            Metric::Percent(v) => format_percent(*v),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Sentinel => serializer.serialize_i64(SENTINEL),
            Metric::Percent(v) => serializer.serialize_str(&format_percent(*v)),
        }
    }
}

/// Truncate a ratio to hundredths of a percent: `0.857142` -> `"85.71%"`,
/// `1.0` -> `"100.0%"`.
fn format_percent(v: f64) -> String {
    let hundredths = (v * 10000.0).floor() as i64;
    let percent = hundredths as f64 / 100.0;
    if hundredths % 10 == 0 {
        format!("{percent:.1}%")
    } else {
        format!("{percent:.2}%")
    }
}

/// Per-attribute score counters and finalized metrics.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeScore {
    /// Total gold values seen (gold is not normalized).
    pub gold_count: usize,
    /// Total predicted values seen, after normalization.
    pub predicted_count: usize,
    /// Fuzzy-equal (gold, predicted) pairs. May exceed
    /// `min(gold_count, predicted_count)`; see module docs.
    pub right_count: usize,
    /// Predicted values on records where gold was also present.
    pub exist_count: usize,
    /// right / gold (sic — see module docs).
    #[serde(rename = "P")]
    pub p: Metric,
    /// right / predicted (sic).
    #[serde(rename = "R")]
    pub r: Metric,
    /// right / exist.
    #[serde(rename = "R2")]
    pub r2: Metric,
    /// Harmonic mean of P and R.
    #[serde(rename = "F")]
    pub f: Metric,
    /// Harmonic mean of P and R2.
    #[serde(rename = "F2")]
    pub f2: Metric,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    gold: usize,
    predicted: usize,
    right: usize,
    exist: usize,
}

impl Counters {
    fn finalize(self) -> AttributeScore {
        let (p, r, r2, f, f2) = if self.right == 0 {
            (
                Metric::Sentinel,
                Metric::Sentinel,
                Metric::Sentinel,
                Metric::Sentinel,
                Metric::Sentinel,
            )
        } else {
            let p = self.right as f64 / self.gold as f64;
            let r = self.right as f64 / self.predicted as f64;
            let r2 = self.right as f64 / self.exist as f64;
            (
                Metric::Percent(p),
                Metric::Percent(r),
                Metric::Percent(r2),
                Metric::Percent(2.0 * p * r / (p + r)),
                Metric::Percent(2.0 * p * r2 / (p + r2)),
            )
        };
        AttributeScore {
            gold_count: self.gold,
            predicted_count: self.predicted,
            right_count: self.right,
            exist_count: self.exist,
            p,
            r,
            r2,
            f,
            f2,
        }
    }
}

/// Full result of one evaluation run.
#[derive(Debug, Serialize)]
pub struct EvalReport {
    /// Per-attribute scores, keyed by canonical attribute label.
    pub scores: BTreeMap<String, AttributeScore>,
    /// Every non-matching (gold, predicted) pair, for manual audit.
    pub mismatches: Vec<(String, String)>,
}

/// Compares predicted vs. gold attribute sets with per-attribute fuzzy
/// equality.
pub struct Evaluator {
    registry: Vec<Box<dyn AttributeSpec>>,
}

impl Evaluator {
    /// Create over a fixed attribute registry.
    #[must_use]
    pub fn new(registry: Vec<Box<dyn AttributeSpec>>) -> Self {
        Self { registry }
    }

    /// Score a batch of paired records. Counters are created fresh per
    /// run and finalized into metrics at the end.
    #[must_use]
    pub fn evaluate(&self, records: &[EvalRecord]) -> EvalReport {
        let mut counters: Vec<Counters> = vec![Counters::default(); self.registry.len()];
        let mut mismatches: Vec<(String, String)> = Vec::new();

        for record in records {
            for (spec, counter) in self.registry.iter().zip(counters.iter_mut()) {
                let gold: Vec<String> = record
                    .gold
                    .get(spec.name())
                    .map(|v| v.as_slice().iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default();
                counter.gold += gold.len();

                let predicted = record
                    .predicted
                    .get(spec.name())
                    .map(|v| {
                        v.as_slice()
                            .iter()
                            .filter(|s| !s.is_empty())
                            .map(|s| s.to_string())
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                // A model's repeated/duplicate predictions collapse
                // before counting: precision/recall are over normalized
                // predictions, not raw ones.
                let predicted: Vec<String> = if predicted.is_empty() {
                    Vec::new()
                } else {
                    match spec.normalize(&predicted) {
                        AttributeValue::None => Vec::new(),
                        AttributeValue::Scalar(s) => vec![s],
                        AttributeValue::List(l) => l,
                    }
                };
                counter.predicted += predicted.len();

                if gold.is_empty() || predicted.is_empty() {
                    continue;
                }
                counter.exist += predicted.len();
                for g in &gold {
                    for p in &predicted {
                        if spec.equal(g, p) {
                            counter.right += 1;
                        } else {
                            log::debug!("{} mismatch: gold={g} predicted={p}", spec.name());
                            mismatches.push((g.clone(), p.clone()));
                        }
                    }
                }
            }
        }

        let scores = self
            .registry
            .iter()
            .zip(counters)
            .map(|(spec, counter)| (spec.name().to_string(), counter.finalize()))
            .collect();
        EvalReport { scores, mismatches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::{registry, VocabularyStore};
    use crate::record::{Infobox, RawValue};

    fn evaluator() -> Evaluator {
        Evaluator::new(registry(&VocabularyStore::default()))
    }

    fn infobox(entries: &[(&str, RawValue)]) -> Infobox {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn exact_match_scores_full_marks() {
        let record = EvalRecord {
            gold: infobox(&[("性别", RawValue::from("男"))]),
            predicted: infobox(&[("性别", RawValue::List(vec!["男".to_string()]))]),
        };
        let report = evaluator().evaluate(&[record]);
        let score = &report.scores["性别"];
        assert_eq!(score.gold_count, 1);
        assert_eq!(score.predicted_count, 1);
        assert_eq!(score.right_count, 1);
        assert_eq!(score.p.render(), "100.0%");
        assert_eq!(score.r.render(), "100.0%");
        assert_eq!(score.f.render(), "100.0%");
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn zero_right_count_reports_sentinels() {
        let record = EvalRecord {
            gold: infobox(&[("出生地", RawValue::from("北京"))]),
            predicted: infobox(&[("出生地", RawValue::from("上海"))]),
        };
        let report = evaluator().evaluate(&[record]);
        let score = &report.scores["出生地"];
        assert_eq!(score.right_count, 0);
        assert_eq!(score.p, Metric::Sentinel);
        assert_eq!(score.r, Metric::Sentinel);
        assert_eq!(score.f, Metric::Sentinel);
        assert_eq!(score.p.render(), "-1");
        assert_eq!(report.mismatches, vec![("北京".to_string(), "上海".to_string())]);
    }

    #[test]
    fn duplicate_predictions_collapse_before_counting() {
        let record = EvalRecord {
            gold: infobox(&[("出生地", RawValue::from("北京"))]),
            predicted: infobox(&[(
                "出生地",
                RawValue::List(vec![
                    "北京".to_string(),
                    "北京".to_string(),
                    "北京市".to_string(),
                ]),
            )]),
        };
        let report = evaluator().evaluate(&[record]);
        let score = &report.scores["出生地"];
        // Substring clustering collapses all three into one value.
        assert_eq!(score.predicted_count, 1);
        assert_eq!(score.right_count, 1);
    }

    #[test]
    fn date_equality_is_granularity_tolerant() {
        let record = EvalRecord {
            gold: infobox(&[("出生日期", RawValue::from("2001年5月"))]),
            predicted: infobox(&[("出生日期", RawValue::from("2001年"))]),
        };
        let report = evaluator().evaluate(&[record]);
        assert_eq!(report.scores["出生日期"].right_count, 1);
    }

    #[test]
    fn missing_prediction_counts_gold_only() {
        let record = EvalRecord {
            gold: infobox(&[("性别", RawValue::from("男"))]),
            predicted: infobox(&[]),
        };
        let report = evaluator().evaluate(&[record]);
        let score = &report.scores["性别"];
        assert_eq!(score.gold_count, 1);
        assert_eq!(score.predicted_count, 0);
        assert_eq!(score.exist_count, 0);
        assert_eq!(score.p, Metric::Sentinel);
    }

    #[test]
    fn percent_formatting_truncates() {
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(6.0 / 7.0), "85.71%");
        assert_eq!(format_percent(0.857), "85.7%");
    }
}
