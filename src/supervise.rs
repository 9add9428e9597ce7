//! Distant supervision: align structured infobox values with text spans.
//!
//! For each record the supervisor walks the attribute registry in
//! order, cleans the raw infobox value, and searches the person's text
//! for it verbatim. The summary is checked first; paragraphs are
//! scanned in order, skipping trivial self references (a paragraph that
//! equals the value, is shorter than 3 characters, or merely restates
//! the infobox key as `属性名：…`). A record is retained when enough
//! attributes produced at least one match.
//!
//! Statistics are an explicit accumulator threaded through the run, so
//! the attribute specs stay stateless and reusable across runs.

use crate::attrs::AttributeSpec;
use crate::record::{
    AttributeValue, Infobox, LabeledRecord, MatchSource, PersonRecord, RawValue, SpanMatch,
};
use crate::text::{char_len, clean_line};
use serde::Serialize;

/// Paragraphs shorter than this are noise, not evidence.
const MIN_PARAGRAPH_CHARS: usize = 3;

/// Knobs for a supervision run.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Minimum number of attributes with at least one match for a
    /// record to be retained.
    pub min_attributes: usize,
    /// When no infobox key matches an attribute, fall back to
    /// `extract()` over the free text. Off in the primary pipeline.
    pub infer_from_text: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            min_attributes: 1,
            infer_from_text: false,
        }
    }
}

/// Per-attribute-type counters for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttributeStats {
    /// Canonical attribute label.
    pub attribute: String,
    /// Records where an infobox key was recognized for this attribute.
    pub recognized: usize,
    /// Recognized values that filtering rejected.
    pub invalid: usize,
    /// Values found in the summary.
    pub summary_matches: usize,
    /// Values found in a body paragraph.
    pub paragraph_matches: usize,
    /// Records where filtering produced a multi-valued result.
    pub multi_value: usize,
    /// Values inferred directly from free text (inference mode only).
    pub extracted: usize,
}

impl AttributeStats {
    fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            ..Self::default()
        }
    }
}

/// Output of a supervision run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Retained labeled records.
    pub records: Vec<LabeledRecord>,
    /// Per-attribute counters, in registry order.
    pub stats: Vec<AttributeStats>,
}

/// The labeling engine.
pub struct Supervisor {
    registry: Vec<Box<dyn AttributeSpec>>,
    config: SupervisorConfig,
}

impl Supervisor {
    /// Create from a registry and run configuration.
    #[must_use]
    pub fn new(registry: Vec<Box<dyn AttributeSpec>>, config: SupervisorConfig) -> Self {
        Self { registry, config }
    }

    /// Label a whole batch, in input order.
    #[must_use]
    pub fn run(&self, records: &[PersonRecord]) -> RunReport {
        let mut stats: Vec<AttributeStats> = self
            .registry
            .iter()
            .map(|spec| AttributeStats::new(spec.name()))
            .collect();
        let mut labeled = Vec::new();
        for record in records {
            if let Some(result) = self.supervise_record(record, &mut stats) {
                labeled.push(result);
            }
        }
        for s in &stats {
            log::info!(
                "{}: recognized={} invalid={} summary={} para={} multi={}",
                s.attribute,
                s.recognized,
                s.invalid,
                s.summary_matches,
                s.paragraph_matches,
                s.multi_value
            );
        }
        log::info!("retained {} of {} records", labeled.len(), records.len());
        RunReport {
            records: labeled,
            stats,
        }
    }

    /// Label one record. Returns `None` when it falls below the
    /// retention threshold or has no usable supporting text.
    pub fn supervise_record(
        &self,
        record: &PersonRecord,
        stats: &mut [AttributeStats],
    ) -> Option<LabeledRecord> {
        let mut infobox = Infobox::new();
        let mut supporting: Vec<String> = Vec::new();

        for (spec, stat) in self.registry.iter().zip(stats.iter_mut()) {
            let matches = self.match_attribute(spec.as_ref(), record, stat);
            if matches.is_empty() {
                continue;
            }
            let mut values = Vec::new();
            for m in matches {
                if let MatchSource::Paragraph(para) = &m.source {
                    if !supporting.contains(para) {
                        supporting.push(para.clone());
                    }
                }
                values.push(m.value);
            }
            let value = if values.len() == 1 {
                RawValue::Scalar(values.remove(0))
            } else {
                RawValue::List(values)
            };
            infobox.insert(spec.name().to_string(), value);
        }

        if infobox.len() < self.config.min_attributes.max(1) {
            return None;
        }

        let mut summary: Vec<String> = Vec::new();
        let lines = record.summary.iter().cloned().chain(supporting);
        for line in lines {
            if let Some(cleaned) = clean_line(&line) {
                if !summary.contains(&cleaned) {
                    summary.push(cleaned);
                }
            }
        }
        if summary.is_empty() {
            return None;
        }

        Some(LabeledRecord {
            name: record.name.clone(),
            infobox,
            summary,
        })
    }

    /// Find every span match for one attribute of one record.
    fn match_attribute(
        &self,
        spec: &dyn AttributeSpec,
        record: &PersonRecord,
        stat: &mut AttributeStats,
    ) -> Vec<SpanMatch> {
        let keys: Vec<&str> = record.infobox.keys().map(String::as_str).collect();
        let Some(key) = spec.find_key_in(&keys) else {
            if self.config.infer_from_text {
                return self.infer_from_text(spec, record, stat);
            }
            return Vec::new();
        };
        stat.recognized += 1;

        // Raw values may already be lists; filter element-wise and
        // flatten, preserving first-seen order.
        let raw = &record.infobox[&key];
        let mut tokens: Vec<String> = Vec::new();
        for element in raw.as_slice() {
            for v in spec.filter(element).values() {
                if !tokens.iter().any(|t| t == v) {
                    tokens.push(v.to_string());
                }
            }
        }

        match AttributeValue::from_tokens(tokens) {
            AttributeValue::None => {
                stat.invalid += 1;
                Vec::new()
            }
            AttributeValue::Scalar(value) => {
                search_value(spec.name(), &value, record, stat)
                    .into_iter()
                    .collect()
            }
            AttributeValue::List(values) => {
                stat.multi_value += 1;
                values
                    .into_iter()
                    .filter_map(|v| search_value(spec.name(), &v, record, stat))
                    .collect()
            }
        }
    }

    /// The dormant text-inference path: no infobox key matched, so try
    /// to extract a value directly from the text.
    fn infer_from_text(
        &self,
        spec: &dyn AttributeSpec,
        record: &PersonRecord,
        stat: &mut AttributeStats,
    ) -> Vec<SpanMatch> {
        if let Some(summary) = &record.summary {
            if let Some(value) = spec.extract(summary) {
                stat.extracted += 1;
                stat.summary_matches += 1;
                return vec![SpanMatch {
                    value,
                    source: MatchSource::Summary,
                }];
            }
        }
        let key_prefix = format!("{}：", spec.name());
        for para in &record.paragraphs {
            if para.starts_with(&key_prefix) {
                continue;
            }
            if let Some(value) = spec.extract(para) {
                stat.extracted += 1;
                stat.paragraph_matches += 1;
                return vec![SpanMatch {
                    value,
                    source: MatchSource::Paragraph(para.clone()),
                }];
            }
        }
        Vec::new()
    }
}

/// Search one candidate value in a record's text: summary first, then
/// paragraphs in order with the self-reference skip rules.
fn search_value(
    attribute: &str,
    value: &str,
    record: &PersonRecord,
    stat: &mut AttributeStats,
) -> Option<SpanMatch> {
    if let Some(summary) = &record.summary {
        if summary.contains(value) {
            stat.summary_matches += 1;
            return Some(SpanMatch {
                value: value.to_string(),
                source: MatchSource::Summary,
            });
        }
    }
    let key_prefix = format!("{attribute}：");
    for para in &record.paragraphs {
        if para == value || char_len(para) < MIN_PARAGRAPH_CHARS {
            continue;
        }
        if para.contains(value) && !para.starts_with(&key_prefix) {
            stat.paragraph_matches += 1;
            return Some(SpanMatch {
                value: value.to_string(),
                source: MatchSource::Paragraph(para.clone()),
            });
        }
    }
    None
}
