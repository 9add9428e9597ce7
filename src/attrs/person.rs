//! Person identity attributes: name, foreign-script name, gender.

use super::cluster::{cluster_by_substring, most_frequent};
use super::{compile, separator_tokens, AttributeSpec};
use crate::record::AttributeValue;
use crate::text::{is_plain, to_halfwidth};
use once_cell::sync::Lazy;
use regex::Regex;

static NAME_KEYS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&["中文名|中文名称|姓名|名字"]));

static FOREIGN_KEYS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&["外文名", "英文名"]));

static GENDER_EXTRACT: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"(性别).{1,3}", r"，(男|女)性{0,1}，"]));

static GENDER_FILTER: Lazy<Vec<Regex>> = Lazy::new(|| compile(&["(男|女)"]));

/// 姓名 (Chinese name).
///
/// Raw values carry parenthesized scripts, slashes and romanization
/// alongside the name proper (`曺政奭（朝鲜汉字）`, `阚成友，男`); the
/// first separator-delimited token is the name.
pub struct Name;

impl AttributeSpec for Name {
    fn name(&self) -> &'static str {
        "姓名"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&NAME_KEYS)
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        if raw.is_empty() {
            return AttributeValue::None;
        }
        if is_plain(raw) {
            return AttributeValue::Scalar(raw.to_string());
        }
        let halfwidth = to_halfwidth(raw);
        let mut tokens = separator_tokens(&halfwidth, &["(", ")", "/", "、", ","]);
        if tokens.is_empty() {
            AttributeValue::None
        } else {
            AttributeValue::Scalar(tokens.remove(0))
        }
    }

    fn normalize(&self, values: &[String]) -> AttributeValue {
        AttributeValue::from_scalar(cluster_by_substring(values.iter().cloned()))
    }
}

/// 外文名 (foreign-script name).
///
/// Values mix scripts and romanizations (`문정희/Jeong-hieMun`,
/// `엄기준(UmKiJoon)`, `英语：MohammedDaoudKhan或者SardarMohammedDaoud`):
/// a leading script label before a colon is dropped, then separator
/// splitting keeps every variant.
pub struct ForeignName;

impl AttributeSpec for ForeignName {
    fn name(&self) -> &'static str {
        "外文名"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&FOREIGN_KEYS)
    }

    fn filter(&self, raw: &str) -> AttributeValue {
        super::colon_separated(raw, &["(", ")", "/", "、", "或者", "或", ","])
    }

    fn normalize(&self, values: &[String]) -> AttributeValue {
        AttributeValue::from_scalar(cluster_by_substring(values.iter().cloned()))
    }
}

/// 性别 (gender). A fixed single-marker pattern; anything that is not
/// 男 or 女 is invalid.
pub struct Gender;

impl AttributeSpec for Gender {
    fn name(&self) -> &'static str {
        "性别"
    }

    fn filter_patterns(&self) -> Option<&[Regex]> {
        Some(&GENDER_FILTER)
    }

    fn extract_patterns(&self) -> Option<&[Regex]> {
        Some(&GENDER_EXTRACT)
    }

    fn normalize(&self, values: &[String]) -> AttributeValue {
        let filtered: Vec<String> = values
            .iter()
            .filter_map(|v| match self.filter(v) {
                AttributeValue::Scalar(s) => Some(s),
                _ => None,
            })
            .collect();
        AttributeValue::from_scalar(most_frequent(&filtered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn name_passes_plain_values() {
        assert_eq!(
            Name.filter("周树人"),
            AttributeValue::Scalar("周树人".to_string())
        );
    }

    #[test]
    fn name_takes_first_token() {
        assert_eq!(
            Name.filter("曺政奭（朝鲜汉字）"),
            AttributeValue::Scalar("曺政奭".to_string())
        );
        assert_eq!(
            Name.filter("阚成友，男"),
            AttributeValue::Scalar("阚成友".to_string())
        );
    }

    #[test]
    fn foreign_name_drops_script_label() {
        assert_eq!(
            ForeignName.filter("英语：MohammedDaoudKhan或者SardarMohammedDaoud"),
            AttributeValue::List(owned(&["MohammedDaoudKhan", "SardarMohammedDaoud"]))
        );
    }

    #[test]
    fn foreign_name_rejects_multi_colon() {
        assert_eq!(
            ForeignName.filter("普什图文:Malalah,英文：MalalaYousafzai"),
            AttributeValue::None
        );
    }

    #[test]
    fn foreign_name_splits_variants() {
        assert_eq!(
            ForeignName.filter("HwangMiHee(HuangMiHee/HangMiHee)"),
            AttributeValue::List(owned(&["HwangMiHee", "HuangMiHee", "HangMiHee"]))
        );
    }

    #[test]
    fn gender_filter_extracts_marker() {
        assert_eq!(
            Gender.filter("性别为男"),
            AttributeValue::Scalar("男".to_string())
        );
        assert_eq!(Gender.filter("未知"), AttributeValue::None);
    }

    #[test]
    fn gender_normalize_majority() {
        assert_eq!(
            Gender.normalize(&owned(&["男", "男", "女"])),
            AttributeValue::Scalar("男".to_string())
        );
    }

    #[test]
    fn gender_extract_from_sentence() {
        assert_eq!(Gender.extract("性别：男，汉族"), Some("男".to_string()));
    }
}
