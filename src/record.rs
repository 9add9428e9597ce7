//! Record types for the labeling pipeline.
//!
//! A [`PersonRecord`] is one scraped biography: a semi-structured
//! infobox plus free text. The supervisor aligns the two and emits
//! [`LabeledRecord`]s; the evaluator consumes [`EvalRecord`]s pairing a
//! gold infobox with a model-predicted one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An infobox value as it appears in the source JSON: a scalar string
/// or a list of strings for multi-valued fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Single value.
    Scalar(String),
    /// Multi-valued field.
    List(Vec<String>),
}

impl RawValue {
    /// View the value as a list of strings (a scalar becomes a
    /// one-element list).
    #[must_use]
    pub fn as_slice(&self) -> Vec<&str> {
        match self {
            RawValue::Scalar(s) => vec![s.as_str()],
            RawValue::List(l) => l.iter().map(String::as_str).collect(),
        }
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Scalar(s)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Scalar(s.to_string())
    }
}

impl From<Vec<String>> for RawValue {
    fn from(l: Vec<String>) -> Self {
        RawValue::List(l)
    }
}

/// The semi-structured fact table of a record: attribute label to value.
pub type Infobox = BTreeMap<String, RawValue>;

/// One scraped person biography.
///
/// Owned by the batch pipeline; the core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Page title / person name.
    pub name: String,
    /// Lead biography paragraph, if any.
    #[serde(default)]
    pub summary: Option<String>,
    /// Additional body-text units, searched after the summary.
    #[serde(default, rename = "para")]
    pub paragraphs: Vec<String>,
    /// Attribute label to raw value.
    #[serde(default)]
    pub infobox: Infobox,
}

/// Result of filtering one raw infobox value into canonical form.
///
/// Invariants: a `Scalar` is never empty, a `List` is non-empty and
/// contains no empty/whitespace-only elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Nothing usable survived filtering.
    None,
    /// One canonical value.
    Scalar(String),
    /// Several canonical values (multi-valued attribute).
    List(Vec<String>),
}

impl AttributeValue {
    /// Build from a token list, collapsing to the invariant-respecting
    /// variant: empty -> `None`, one -> `Scalar`, many -> `List`.
    /// Empty and whitespace-only tokens are dropped first.
    #[must_use]
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let mut tokens: Vec<String> = tokens
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();
        match tokens.len() {
            0 => AttributeValue::None,
            1 => AttributeValue::Scalar(tokens.remove(0)),
            _ => AttributeValue::List(tokens),
        }
    }

    /// Build from an optional scalar.
    #[must_use]
    pub fn from_scalar(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => AttributeValue::Scalar(v),
            _ => AttributeValue::None,
        }
    }

    /// True when filtering yielded nothing.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, AttributeValue::None)
    }

    /// The values as a slice view (empty for `None`).
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            AttributeValue::None => Vec::new(),
            AttributeValue::Scalar(s) => vec![s.as_str()],
            AttributeValue::List(l) => l.iter().map(String::as_str).collect(),
        }
    }
}

/// Where a value was found in the record's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSource {
    /// Found in the lead summary.
    Summary,
    /// Found in a body paragraph (carries the paragraph text).
    Paragraph(String),
}

/// A value located verbatim inside a text span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMatch {
    /// The canonical attribute value that was found.
    pub value: String,
    /// The span it was found in.
    pub source: MatchSource,
}

/// One retained record of the labeled output: the canonicalized infobox
/// restricted to matched values, plus the supporting text that contains
/// them (original summary unioned with matched paragraphs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledRecord {
    /// Person name.
    pub name: String,
    /// Canonical attribute label to matched value(s).
    pub infobox: Infobox,
    /// Deduplicated supporting-text lines.
    pub summary: Vec<String>,
}

/// A gold/predicted infobox pair for one person, as emitted by a
/// downstream extraction model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRecord {
    /// Gold attribute set.
    pub gold: Infobox,
    /// Predicted attribute set.
    #[serde(rename = "predict", alias = "predicted")]
    pub predicted: Infobox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_value_deserializes_both_shapes() {
        let scalar: RawValue = serde_json::from_str("\"男\"").unwrap();
        assert_eq!(scalar, RawValue::Scalar("男".to_string()));
        let list: RawValue = serde_json::from_str("[\"清华大学\",\"北京大学\"]").unwrap();
        assert_eq!(
            list,
            RawValue::List(vec!["清华大学".to_string(), "北京大学".to_string()])
        );
    }

    #[test]
    fn attribute_value_collapses_tokens() {
        assert_eq!(AttributeValue::from_tokens(vec![]), AttributeValue::None);
        assert_eq!(
            AttributeValue::from_tokens(vec!["男".to_string(), "  ".to_string()]),
            AttributeValue::Scalar("男".to_string())
        );
        assert!(matches!(
            AttributeValue::from_tokens(vec!["a".to_string(), "b".to_string()]),
            AttributeValue::List(_)
        ));
    }

    #[test]
    fn person_record_tolerates_missing_fields() {
        let rec: PersonRecord =
            serde_json::from_str(r#"{"name":"张三","summary":null,"infobox":{}}"#).unwrap();
        assert!(rec.summary.is_none());
        assert!(rec.paragraphs.is_empty());
    }
}
