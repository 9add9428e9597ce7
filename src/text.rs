//! Text utilities for Chinese biography processing.
//!
//! Infobox values and body text mix full-width (double-byte) and
//! half-width renderings of digits and punctuation. Pattern tables are
//! written against one canonical rendering, so everything funnels
//! through the converters here before matching.

use regex::Regex;

/// Convert a string to half-width: full-width ASCII-range characters
/// (including the ideographic space U+3000) become their single-byte
/// equivalents; everything else passes through.
#[must_use]
pub fn to_halfwidth(s: &str) -> String {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if code == 0x3000 {
                return ' ';
            }
            match code.checked_sub(0xFEE0) {
                Some(half) if (0x20..=0x7E).contains(&half) => {
                    char::from_u32(half).unwrap_or(c)
                }
                _ => c,
            }
        })
        .collect()
}

/// Width-normalize a sentence for extraction patterns: ASCII
/// punctuation becomes full-width (the rendering the context patterns
/// are written in), while digits and letters stay half-width so value
/// shapes like `167cm` keep matching.
#[must_use]
pub fn normalize_width(s: &str) -> String {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if c.is_ascii_alphanumeric() {
                c
            } else if code == 0x20 {
                '\u{3000}'
            } else if (0x21..=0x7E).contains(&code) {
                char::from_u32(code + 0xFEE0).unwrap_or(c)
            } else if ('\u{FF10}'..='\u{FF19}').contains(&c)
                || ('\u{FF21}'..='\u{FF3A}').contains(&c)
                || ('\u{FF41}'..='\u{FF5A}').contains(&c)
            {
                // Full-width alphanumerics back to ASCII.
                char::from_u32(code - 0xFEE0).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Keep only Han characters and ASCII digits.
///
/// Returns `None` when nothing survives.
#[must_use]
pub fn han_digits(s: &str) -> Option<String> {
    let kept: String = s
        .chars()
        .filter(|c| is_han_digit(*c))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

/// True when the string is non-empty and consists solely of Han
/// characters and ASCII digits (no separators, no Latin, no punctuation).
#[must_use]
pub fn is_plain(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_han_digit)
}

fn is_han_digit(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c) || c.is_ascii_digit()
}

/// First-match-wins over an ordered pattern table: returns the matched
/// text of the first pattern that hits anywhere in `s`.
#[must_use]
pub fn first_match(patterns: &[Regex], s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    patterns
        .iter()
        .find_map(|p| p.find(s).map(|m| m.as_str().to_string()))
}

/// Strip stray whitespace from a supporting-text line.
///
/// Spaces and newlines are removed wherever they appear (Chinese prose
/// does not use them); a line that is nothing but whitespace drops out.
#[must_use]
pub fn clean_line(s: &str) -> Option<String> {
    let cleaned: String = s.chars().filter(|c| *c != ' ' && *c != '\n').collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Count characters (code points), the unit all span/length rules use.
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halfwidth_converts_punctuation_and_digits() {
        assert_eq!(to_halfwidth("１６７ｃｍ"), "167cm");
        assert_eq!(to_halfwidth("（田径）"), "(田径)");
        assert_eq!(to_halfwidth("身高：１．８米"), "身高:1.8米");
    }

    #[test]
    fn normalize_width_keeps_digits_halfwidth() {
        let s = normalize_width("身高167cm,体重60kg");
        assert!(s.contains("167"));
        assert!(s.contains('，'));
    }

    #[test]
    fn han_digits_strips_noise() {
        assert_eq!(han_digits("清华大学(北京)"), Some("清华大学北京".to_string()));
        assert_eq!(han_digits("ABC"), None);
    }

    #[test]
    fn plain_rejects_separators() {
        assert!(is_plain("清华大学"));
        assert!(!is_plain("清华大学、北京大学"));
        assert!(!is_plain(""));
    }

    #[test]
    fn clean_line_drops_blank() {
        assert_eq!(clean_line("  \n"), None);
        assert_eq!(clean_line("他 生于\n北京"), Some("他生于北京".to_string()));
    }
}
