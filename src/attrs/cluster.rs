//! Aggregation algorithms shared by the attribute normalizers.
//!
//! Two clustering schemes collapse repeated observations of one value:
//!
//! - **Substring clustering** (names, birthplaces): observations where
//!   one string contains the other merge into one cluster keyed by the
//!   longer string, so `周树人` and `周树` agree and the representative
//!   stays maximal.
//! - **Date-tuple clustering** (dates): observations are tokenized to
//!   numeric component tuples and merged on prefix compatibility, so
//!   `2001年` and `2001年5月` agree and the more specific form wins.

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of date-numeral characters (ASCII and Chinese numerals).
static NUMERAL_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[0-9一二三四五六七八九十零〇]+").expect("invalid built-in pattern"));

/// First representative with the maximal count. A later candidate wins
/// only on a strictly greater count, so insertion order breaks ties.
fn first_max<T>(reps: Vec<(T, usize)>) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (value, count) in reps {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v)
}

/// The most frequent exact value; insertion order breaks ties.
#[must_use]
pub fn most_frequent(values: &[String]) -> Option<String> {
    let mut reps: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match reps.iter_mut().find(|(v, _)| *v == value.as_str()) {
            Some((_, count)) => *count += 1,
            None => reps.push((value.as_str(), 1)),
        }
    }
    first_max(reps).map(str::to_string)
}

/// Substring-containment clustering.
///
/// Each value is scanned against the current representatives in
/// insertion order: a value contained in a representative increments
/// that cluster; a value containing a representative replaces it
/// (carrying the count over) and increments; otherwise it starts a new
/// cluster. The representative with the maximum final count wins.
#[must_use]
pub fn cluster_by_substring<I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut reps: Vec<(String, usize)> = Vec::new();
    for value in values {
        let mut matched = false;
        for rep in reps.iter_mut() {
            if rep.0.contains(&value) {
                rep.1 += 1;
                matched = true;
                break;
            } else if value.contains(&rep.0) {
                rep.0 = value.clone();
                rep.1 += 1;
                matched = true;
                break;
            }
        }
        if !matched {
            reps.push((value, 1));
        }
    }
    first_max(reps)
}

/// Tokenize a date string into its numeric component runs
/// (year, month, day — in surface order).
#[must_use]
pub fn date_tuple(s: &str) -> Vec<String> {
    NUMERAL_RUN
        .find_iter(s)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Prefix compatibility in either direction: `(2001,)` agrees with
/// `(2001, 5)` and vice versa. An empty tuple trivially agrees with
/// anything.
#[must_use]
pub fn tuple_prefix_equal(a: &[String], b: &[String]) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Cluster date tuples on prefix compatibility, keeping the longer
/// (more specific) tuple as the representative. Tuples with more than 3
/// components or none at all are discarded before clustering.
#[must_use]
pub fn cluster_date_tuples<I>(tuples: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut reps: Vec<(Vec<String>, usize)> = Vec::new();
    for tuple in tuples {
        if tuple.is_empty() || tuple.len() > 3 {
            continue;
        }
        let mut matched = false;
        for rep in reps.iter_mut() {
            if rep.0 == tuple || rep.0.starts_with(&tuple) {
                rep.1 += 1;
                matched = true;
                break;
            } else if tuple.starts_with(&rep.0) {
                rep.0 = tuple.clone();
                rep.1 += 1;
                matched = true;
                break;
            }
        }
        if !matched {
            reps.push((tuple, 1));
        }
    }
    first_max(reps)
}

/// Re-render a clustered date tuple using only the components present:
/// `[Y]` stays bare, `[Y, M]` becomes `Y年M月`, `[Y, M, D]` becomes
/// `Y年M月D日`.
#[must_use]
pub fn render_date(parts: &[String]) -> String {
    match parts {
        [y] => y.clone(),
        [y, m] => format!("{y}年{m}月"),
        [y, m, d] => format!("{y}年{m}月{d}日"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn most_frequent_prefers_majority() {
        assert_eq!(
            most_frequent(&owned(&["男", "男", "女"])),
            Some("男".to_string())
        );
    }

    #[test]
    fn most_frequent_breaks_ties_by_insertion() {
        assert_eq!(
            most_frequent(&owned(&["女", "男"])),
            Some("女".to_string())
        );
        assert_eq!(most_frequent(&[]), None);
    }

    #[test]
    fn substring_clustering_keeps_longer_representative() {
        let values = owned(&["周树", "周树人", "周树"]);
        assert_eq!(cluster_by_substring(values), Some("周树人".to_string()));
    }

    #[test]
    fn substring_clustering_majority_wins_for_unrelated() {
        let values = owned(&["北京", "北京", "北京", "上海"]);
        assert_eq!(cluster_by_substring(values), Some("北京".to_string()));
    }

    #[test]
    fn substring_clustering_breaks_ties_by_insertion() {
        let values = owned(&["北京", "上海"]);
        assert_eq!(cluster_by_substring(values), Some("北京".to_string()));
    }

    #[test]
    fn date_tuples_tokenize_numeral_runs() {
        assert_eq!(date_tuple("2001年5月3日"), owned(&["2001", "5", "3"]));
        assert_eq!(date_tuple("一九九零年"), owned(&["一九九零"]));
        assert!(date_tuple("不详").is_empty());
    }

    #[test]
    fn date_clustering_merges_prefixes() {
        let tuples = vec![owned(&["2001"]), owned(&["2001", "5"]), owned(&["2001"])];
        assert_eq!(cluster_date_tuples(tuples), Some(owned(&["2001", "5"])));
    }

    #[test]
    fn date_clustering_breaks_ties_by_insertion() {
        let tuples = vec![owned(&["1990"]), owned(&["1991"])];
        assert_eq!(cluster_date_tuples(tuples), Some(owned(&["1990"])));
    }

    #[test]
    fn date_clustering_discards_overlong_tuples() {
        let tuples = vec![owned(&["1", "2", "3", "4"]), owned(&["1990"])];
        assert_eq!(cluster_date_tuples(tuples), Some(owned(&["1990"])));
    }

    #[test]
    fn render_uses_present_components_only() {
        assert_eq!(render_date(&owned(&["1990"])), "1990");
        assert_eq!(render_date(&owned(&["1990", "3"])), "1990年3月");
        assert_eq!(render_date(&owned(&["1990", "3", "7"])), "1990年3月7日");
    }
}
