//! Shared text helpers for the format parsers.

use regex::Regex;
use std::sync::LazyLock;

/// Currency glyphs accepted by the price scanners.
pub const CURRENCY_GLYPHS: [char; 2] = ['¥', '￥'];

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*)").expect("valid leading number regex"));

static FIRST_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("valid first number regex"));

/// Splits a blob into trimmed, non-blank lines.
pub fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether the trimmed text looks like a JSON document rather than prose.
pub fn is_json_shaped(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

/// Whether the text contains a currency glyph anywhere.
pub fn contains_currency_glyph(text: &str) -> bool {
    text.chars().any(|c| CURRENCY_GLYPHS.contains(&c))
}

/// Whether the line consists of nothing but a currency glyph.
pub fn is_lone_currency_glyph(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() == 1 && contains_currency_glyph(trimmed)
}

/// Whether the string contains any CJK ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c))
}

/// Parses a positive price figure from the start of a line.
///
/// Tolerates trailing text ("20.00 起" parses as 20.0) but rejects lines
/// that do not lead with a digit. Zero is treated as absent.
pub fn leading_positive_number(line: &str) -> Option<f64> {
    let caps = LEADING_NUMBER_RE.captures(line.trim())?;
    parse_positive(&caps[1])
}

/// First positive number appearing anywhere in the text.
pub fn first_positive_number(text: &str) -> Option<f64> {
    let caps = FIRST_NUMBER_RE.captures(text)?;
    parse_positive(&caps[1])
}

/// Parses a strictly positive, finite number.
pub fn parse_positive(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| *v > 0.0 && v.is_finite())
}

/// Formats an amount the way the catalog displays money: at most two
/// decimals, trailing zeros dropped ("185.18", "10").
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Difference rounded to two decimals, for synthesized reduction amounts.
pub fn round_to_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_lines() {
        let lines = non_blank_lines("  a  \n\n \n b\n");
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_is_json_shaped() {
        assert!(is_json_shaped(r#"{"key": 1}"#));
        assert!(is_json_shaped("  [1, 2]"));
        assert!(!is_json_shaped("产品名称"));
    }

    #[test]
    fn test_currency_glyph_detection() {
        assert!(contains_currency_glyph("¥ 30.00"));
        assert!(contains_currency_glyph("￥ 88.88"));
        assert!(!contains_currency_glyph("$ 30.00"));

        assert!(is_lone_currency_glyph("¥"));
        assert!(is_lone_currency_glyph(" ￥ "));
        assert!(!is_lone_currency_glyph("¥ 30.00"));
    }

    #[test]
    fn test_contains_cjk() {
        assert!(contains_cjk("高露洁"));
        assert!(contains_cjk("Colgate/高露洁"));
        assert!(!contains_cjk("Colgate"));
    }

    #[test]
    fn test_leading_positive_number() {
        assert_eq!(leading_positive_number("20.00"), Some(20.0));
        assert_eq!(leading_positive_number("16.8 起"), Some(16.8));
        assert_eq!(leading_positive_number("参数信息"), None);
        assert_eq!(leading_positive_number("0"), None);
    }

    #[test]
    fn test_first_positive_number() {
        assert_eq!(first_positive_number("券后 ¥8.9 优惠前 ¥12.37"), Some(8.9));
        assert_eq!(first_positive_number("no numbers"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(185.18), "185.18");
        assert_eq!(format_amount(10.0), "10");
        assert_eq!(format_amount(8.5), "8.5");
    }

    #[test]
    fn test_round_to_two() {
        assert_eq!(round_to_two(185.18000000000001), 185.18);
        assert_eq!(round_to_two(2.718), 2.72);
        assert_eq!(round_to_two(3.14159), 3.14);
    }
}
