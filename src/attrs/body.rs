//! Physical measurements: height and weight.
//!
//! Values are only accepted with a recognizable unit or shape; bare
//! numbers are too often years or jersey numbers.

use super::{compile, AttributeSpec};
use once_cell::sync::Lazy;
use regex::Regex;

static HEIGHT_KEYS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&["身高|身长"]));

static HEIGHT_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"(身高|身长).{3,12}"]));

static HEIGHT_FILTER: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // Centimetres: 172cm, 一八零厘米.
        r"[0-9一二两三四五六七八九零十百.]+(cm|CM|Cm|cM|厘米|公分)",
        // Bare three-digit value in the human range: 172, 一七三.
        r"[1-2一二][0-9一二两三四五六七八九零][0-9一二两三四五六七八九零]",
        // Metres with a decimal point: 1.8米.
        r"[012](\.|．)[0-9]+(米|m|M)",
        // Digit + 米 + optional digits: 1米5.
        r"[零一二012](米|m|M)[0-9一二两三四五六七八九零]*",
        // Chinese feet and inches: 五尺三寸.
        r"[0-9一二两三四五六七八九](尺)[0-9一二两三四五六七八九]*(寸)*",
        // Imperial feet and inches.
        r"[0-9一二两三四五六七八九](英尺)[0-9一二两三四五六七八九]*(英寸)*",
    ])
});

static WEIGHT_EXTRACT: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"(体重|身高体重).{3,10}"]));

static WEIGHT_FILTER: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"[0-9一二两三四五六七八九零十百\.]+(kg|KG|Kg|kG|千克|公斤)",
        r"[0-9一二两三四五六七八九零十百\.]+斤",
        r"[0-9一二两三四五六七八九零十百\.]+磅",
    ])
});

/// 身高 (height).
pub struct Height;

impl AttributeSpec for Height {
    fn name(&self) -> &'static str {
        "身高"
    }

    fn name_patterns(&self) -> Option<&[Regex]> {
        Some(&HEIGHT_KEYS)
    }

    fn filter_patterns(&self) -> Option<&[Regex]> {
        Some(&HEIGHT_FILTER)
    }

    fn extract_patterns(&self) -> Option<&[Regex]> {
        Some(&HEIGHT_EXTRACT)
    }
}

/// 体重 (weight).
pub struct Weight;

impl AttributeSpec for Weight {
    fn name(&self) -> &'static str {
        "体重"
    }

    fn filter_patterns(&self) -> Option<&[Regex]> {
        Some(&WEIGHT_FILTER)
    }

    fn extract_patterns(&self) -> Option<&[Regex]> {
        Some(&WEIGHT_EXTRACT)
    }
}
