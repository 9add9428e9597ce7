//! Birth and death dates.
//!
//! Date values come in many granularities and scripts: era-qualified
//! years (`公元前221年`), full `Y年M月D日` forms, `Y-M-D`, bare 4-digit
//! years, and century/decade forms (`上个世纪80年代末`), in both ASCII
//! and Chinese numerals. One ordered filter cascade recognizes them
//! all; aggregation and comparison work on the numeric component tuple
//! rather than the surface string, so different granularities of the
//! same date still agree.

use super::cluster::{cluster_date_tuples, date_tuple, render_date, tuple_prefix_equal};
use super::{compile, AttributeSpec};
use crate::record::AttributeValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered date-shape cascade, most specific first.
static DATE_FILTER: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // Era-qualified year/decade/century.
        r"(公元前|公元)[0-9一二三四五六七八九十零〇]+(年|年代|世纪)(初|前期|中期|后期|末期|末)*",
        // Y M D (the month class also admits 正/如/初/元/腊 lunar months).
        r"[0-9一二三四五六七八九十零〇]+(年|\.)[0-9一二三四五六七八九十〇正如初元腊]+(月|\.)[0-9一二三四五六七八九十〇]+(日|号)",
        // Y M
        r"[0-9一二三四五六七八九十〇零]+(年|\.)[0-9一二三四五六七八九十〇]+(月)",
        // Y-M-D with dash variants.
        r"[0-9]{4}(-|—)[0-9]+((-|—)[0-9]+)*",
        // Bare year, at least three numerals.
        r"[0-9一二三四五六七八九十〇零][0-9一二三四五六七八九十〇零][0-9一二三四五六七八九十〇零][0-9一二三四五六七八九十〇零]*(年)*",
        // Century + decade.
        r"[0-9一二三四五六七八九十〇零上个]+(世纪)[0-9一二三四五六七八九十〇零]*(年|年代)(初|前期|中期|后期|末期|末)*",
        // Decade of the implied current century.
        r"[0-9一二三四五六七八九十〇零][十〇0零](年代)(初|前期|中期|后期|末期|末)*",
    ])
});

static BIRTH_NAME: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&["出生日期|出生年月|出生时间", "生日"]));

static BIRTH_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r".{4,12}(出生|生)",
        r"(出生|生于).{4,12}",
        r"（.{3,10}(-|—|~)",
    ])
});

static DEATH_NAME: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&["逝世日期|死亡日期|死亡时间|逝世时间|去世时间"]));

static DEATH_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r".{4,12}(逝世|去世|离世)",
        r"(死于).{4,12}",
        r"(-|—|~).{3,10}）",
    ])
});

/// Normalize by clustering numeric tuples: filter each observation,
/// tokenize to (year[, month[, day]]), merge prefix-compatible tuples
/// keeping the longer, then re-render the majority tuple.
fn normalize_dates(spec: &dyn AttributeSpec, values: &[String]) -> AttributeValue {
    let tuples = values.iter().filter_map(|v| match spec.filter(v) {
        AttributeValue::Scalar(s) => Some(date_tuple(&s)),
        _ => None,
    });
    match cluster_date_tuples(tuples) {
        Some(parts) => AttributeValue::Scalar(render_date(&parts)),
        None => AttributeValue::None,
    }
}

/// Tuple-prefix compatibility in either direction: `2001年` equals
/// `2001年5月`, but `2001年6月` does not.
fn dates_equal(a: &str, b: &str) -> bool {
    tuple_prefix_equal(&date_tuple(a), &date_tuple(b))
}

/// 出生日期 (birth date).
pub struct BirthDate;

impl AttributeSpec for BirthDate {
    fn name(&self) -> &'static str {
        "出生日期"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&BIRTH_NAME)
    }

    fn filter_patterns(&self) -> Option<&[Regex]> {
        Some(&DATE_FILTER)
    }

    fn extract_patterns(&self) -> Option<&[Regex]> {
        Some(&BIRTH_EXTRACT)
    }

    fn normalize(&self, values: &[String]) -> AttributeValue {
        normalize_dates(self, values)
    }

    fn equal(&self, a: &str, b: &str) -> bool {
        dates_equal(a, b)
    }
}

/// 逝世日期 (death date). Same value shapes as [`BirthDate`]; only the
/// key detection and free-text context patterns differ.
pub struct DeathDate;

impl AttributeSpec for DeathDate {
    fn name(&self) -> &'static str {
        "逝世日期"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&DEATH_NAME)
    }

    fn filter_patterns(&self) -> Option<&[Regex]> {
        Some(&DATE_FILTER)
    }

    fn extract_patterns(&self) -> Option<&[Regex]> {
        Some(&DEATH_EXTRACT)
    }

    fn normalize(&self, values: &[String]) -> AttributeValue {
        normalize_dates(self, values)
    }

    fn equal(&self, a: &str, b: &str) -> bool {
        dates_equal(a, b)
    }
}
