//! Remaining attribute types: works list, belief, sport attributes,
//! political status, constellation.

use super::cluster::most_frequent;
use super::{colon_separated, compile, AttributeSpec};
use crate::record::AttributeValue;
use crate::text::is_plain;
use once_cell::sync::Lazy;
use regex::Regex;

static PRODUCTION_KEYS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&["代表作品", "登场作品", "主要作品"]));

/// Work titles inside Chinese title quotation marks.
static TITLE_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new("《.*?》").expect("invalid built-in pattern"));

static BELIEF_KEYS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&["信仰", "宗教信仰", "主要宗教"]));

static CONSTELLATION_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r".{2,3}星座.{2,3}"]));

/// Zodiac stems, matched literally. The canonical form omits `座`.
static CONSTELLATION_FILTER: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        "白羊", "金牛", "双子", "巨蟹", "狮子", "处女", "天秤", "天蝎", "人马", "摩羯",
        "宝瓶", "双鱼", "山羊", "牧羊", "射手", "水瓶", "蛇夫", "天平",
    ])
});

/// 作品 (representative works). Always effectively multi-valued.
pub struct Production;

impl AttributeSpec for Production {
    fn name(&self) -> &'static str {
        "作品"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&PRODUCTION_KEYS)
    }

    /// Bracket-delimited titles win when present; otherwise the value
    /// splits on enumerator separators with a trailing `等` (etc.)
    /// marker stripped.
    fn filter(&self, raw: &str) -> AttributeValue {
        if raw.is_empty() {
            return AttributeValue::None;
        }
        if raw.contains('《') || raw.contains('》') {
            let titles: Vec<String> = TITLE_BRACKETS
                .find_iter(raw)
                .map(|m| {
                    m.as_str()
                        .trim_start_matches('《')
                        .trim_end_matches('》')
                        .to_string()
                })
                .collect();
            return AttributeValue::from_tokens(titles);
        }
        let trimmed = raw.trim_end_matches('等');
        if trimmed.is_empty() {
            return AttributeValue::None;
        }
        let tokens = super::separator_tokens(trimmed, &["、", ",", "，", ";"]);
        AttributeValue::from_tokens(tokens)
    }

    /// The deduplicated set of all observed values, order preserved.
    fn normalize(&self, values: &[String]) -> AttributeValue {
        let mut seen = Vec::new();
        for value in values {
            if !seen.contains(value) {
                seen.push(value.clone());
            }
        }
        AttributeValue::from_tokens(seen)
    }

    /// Exact equality: one work title being a substring of another does
    /// not make them the same work.
    fn equal(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

/// 信仰 (belief / religion).
pub struct Belief;

impl AttributeSpec for Belief {
    fn name(&self) -> &'static str {
        "信仰"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&BELIEF_KEYS)
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        if is_plain(raw) {
            AttributeValue::Scalar(raw.to_string())
        } else {
            AttributeValue::None
        }
    }

    /// The literal `无` (none) is an explicit non-answer, not a belief.
    fn normalize(&self, values: &[String]) -> AttributeValue {
        let kept: Vec<String> = values.iter().filter(|v| *v != "无").cloned().collect();
        AttributeValue::from_scalar(most_frequent(&kept))
    }
}

/// 运动项目 (sport type).
pub struct SportType;

impl AttributeSpec for SportType {
    fn name(&self) -> &'static str {
        "运动项目"
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        colon_separated(raw, &["(", ")", "/", "、", "或者", "或", ","])
    }
}

/// 所属运动队 (sport team).
pub struct SportTeam;

impl AttributeSpec for SportTeam {
    fn name(&self) -> &'static str {
        "所属运动队"
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        colon_separated(raw, &["(", ")", "/", "、", ","])
    }
}

/// 场上位置 (position on the field).
pub struct SportPosition;

impl AttributeSpec for SportPosition {
    fn name(&self) -> &'static str {
        "场上位置"
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        colon_separated(raw, &["(", ")", "/", "、", ","])
    }
}

/// 政治面貌 (political status). Pure defaults; the surface forms are
/// too variable for a filter cascade.
pub struct PoliticsStatus;

impl AttributeSpec for PoliticsStatus {
    fn name(&self) -> &'static str {
        "政治面貌"
    }
}

/// 星座 (constellation). Canonical form is the bare zodiac stem.
pub struct Constellation;

impl AttributeSpec for Constellation {
    fn name(&self) -> &'static str {
        "星座"
    }

    fn filter_patterns(&self) -> Option<&[Regex]> {
        Some(&CONSTELLATION_FILTER)
    }

    fn extract_patterns(&self) -> Option<&[Regex]> {
        Some(&CONSTELLATION_EXTRACT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn production_extracts_bracketed_titles() {
        assert_eq!(
            Production.filter("《十万个冷笑话》《罗小黑战记》等"),
            AttributeValue::List(owned(&["十万个冷笑话", "罗小黑战记"]))
        );
        assert_eq!(
            Production.filter("《龙》"),
            AttributeValue::Scalar("龙".to_string())
        );
    }

    #[test]
    fn production_splits_unbracketed_enumeration() {
        assert_eq!(
            Production.filter("荷花壶、牡丹壶、金瓜壶等"),
            AttributeValue::List(owned(&["荷花壶", "牡丹壶", "金瓜壶"]))
        );
    }

    #[test]
    fn production_equal_is_exact() {
        assert!(Production.equal("龙", "龙"));
        assert!(!Production.equal("龙", "龙图"));
    }

    #[test]
    fn production_normalize_dedups() {
        assert_eq!(
            Production.normalize(&owned(&["龙", "凤", "龙"])),
            AttributeValue::List(owned(&["龙", "凤"]))
        );
    }

    #[test]
    fn belief_excludes_none_marker() {
        assert_eq!(
            Belief.normalize(&owned(&["无", "佛教", "佛教"])),
            AttributeValue::Scalar("佛教".to_string())
        );
        assert_eq!(Belief.normalize(&owned(&["无"])), AttributeValue::None);
    }

    #[test]
    fn sport_type_drops_over_structured_values() {
        assert_eq!(
            SportType.filter("田径（短跑：100米、200米）"),
            // One colon segment: the tail survives separator splitting.
            AttributeValue::List(owned(&["100米", "200米"]))
        );
        assert_eq!(
            SportType.filter("游泳"),
            AttributeValue::Scalar("游泳".to_string())
        );
    }

    #[test]
    fn sport_team_splits_enumeration() {
        assert_eq!(
            SportTeam.filter("河床，瓦斯科达迦马"),
            // Full-width comma converts to the half-width separator.
            AttributeValue::List(owned(&["河床", "瓦斯科达迦马"]))
        );
    }

    #[test]
    fn constellation_filter_matches_stem() {
        assert_eq!(
            Constellation.filter("处女座"),
            AttributeValue::Scalar("处女".to_string())
        );
        assert_eq!(Constellation.filter("未知"), AttributeValue::None);
    }
}
