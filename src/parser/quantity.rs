//! Quantity and unit extraction.
//!
//! Listings mention the net quantity either in a specification field
//! ("净含量: 500ml") or as a trailing token of the title ("Product 500ml
//! bottle"). The matcher recognizes a fixed Chinese/English unit vocabulary
//! and maps every token onto the closed [`Unit`] set; anything outside the
//! vocabulary is ignored rather than guessed at.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::Unit;

/// Specification keys that carry the net quantity.
const QUANTITY_LABELS: [&str; 4] = ["净含量", "规格", "容量", "重量"];

/// `number + unit-token` with the full unit vocabulary.
///
/// Multi-character tokens come first so "毫升" is not read as "升" and
/// "ml"/"kg" are not read as "l"/"g". Uppercase "G" is deliberately not
/// accepted: it collides with tokens like "5G" far more often than it means
/// grams.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(毫升|千克|公斤|克|斤|两|兩|升|[mM][lL]|[kK][gG]|[lL]|g)")
        .expect("valid quantity regex")
});

/// A quantity/unit match, with the byte range it occupied in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityMatch {
    pub quantity: f64,
    pub unit: Unit,
    pub start: usize,
    pub end: usize,
}

fn unit_from_token(token: &str) -> Option<Unit> {
    match token {
        "毫升" => Some(Unit::Ml),
        "升" => Some(Unit::L),
        "千克" | "公斤" => Some(Unit::Kg),
        "克" => Some(Unit::G),
        "斤" => Some(Unit::Jin),
        "两" | "兩" => Some(Unit::Liang),
        "g" => Some(Unit::G),
        _ => match token.to_ascii_lowercase().as_str() {
            "ml" => Some(Unit::Ml),
            "kg" => Some(Unit::Kg),
            "l" => Some(Unit::L),
            _ => None,
        },
    }
}

fn match_at(caps: &regex::Captures) -> Option<QuantityMatch> {
    let quantity = caps[1].parse::<f64>().ok()?;
    let unit = unit_from_token(&caps[2])?;
    let whole = caps.get(0)?;
    Some(QuantityMatch {
        quantity,
        unit,
        start: whole.start(),
        end: whole.end(),
    })
}

/// First quantity/unit mention in a text fragment.
pub fn find_first(text: &str) -> Option<QuantityMatch> {
    QUANTITY_RE
        .captures_iter(text)
        .find_map(|caps| match_at(&caps))
}

/// Last quantity/unit mention in a title.
///
/// Titles often repeat numbers ("2代", model names); the trailing quantity
/// mention is the most reliable one.
pub fn find_last(title: &str) -> Option<QuantityMatch> {
    QUANTITY_RE
        .captures_iter(title)
        .filter_map(|caps| match_at(&caps))
        .last()
}

/// Searches a newline-joined "key: value" specification for the quantity.
///
/// Only values of the known quantity-bearing keys are scanned, so a
/// "型号: XR-500g" model code cannot masquerade as a weight.
pub fn from_specification(specification: &str) -> Option<QuantityMatch> {
    for line in specification.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if QUANTITY_LABELS.iter().any(|label| key.contains(label)) {
            if let Some(found) = find_first(value) {
                return Some(found);
            }
        }
    }
    None
}

/// Searches ordered parameter pairs for the quantity.
pub fn from_parameters(parameters: &[(String, String)]) -> Option<QuantityMatch> {
    for (key, value) in parameters {
        if QUANTITY_LABELS.iter().any(|label| key.contains(label)) {
            if let Some(found) = find_first(value) {
                return Some(found);
            }
        }
    }
    None
}

/// Removes a matched quantity mention from a title.
pub fn strip_from_title(title: &str, found: &QuantityMatch) -> String {
    let mut cleaned = String::with_capacity(title.len());
    cleaned.push_str(&title[..found.start]);
    cleaned.push_str(&title[found.end..]);
    // Collapse the doubled space the removal can leave behind
    while cleaned.contains("  ") {
        cleaned = cleaned.replace("  ", " ");
    }
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod succeeds {
        use super::*;

        #[test]
        fn test_english_tokens() {
            let found = find_first("500ml").unwrap();
            assert_eq!(found.quantity, 500.0);
            assert_eq!(found.unit, Unit::Ml);

            assert_eq!(find_first("1.5L").unwrap().unit, Unit::L);
            assert_eq!(find_first("2kg").unwrap().unit, Unit::Kg);
            assert_eq!(find_first("250g").unwrap().unit, Unit::G);
            assert_eq!(find_first("750ML").unwrap().unit, Unit::Ml);
        }

        #[test]
        fn test_chinese_tokens() {
            assert_eq!(find_first("500克").unwrap().unit, Unit::G);
            assert_eq!(find_first("500毫升").unwrap().unit, Unit::Ml);
            assert_eq!(find_first("2升").unwrap().unit, Unit::L);
            assert_eq!(find_first("1千克").unwrap().unit, Unit::Kg);
            assert_eq!(find_first("2公斤").unwrap().unit, Unit::Kg);
            assert_eq!(find_first("3斤").unwrap().unit, Unit::Jin);
            assert_eq!(find_first("5两").unwrap().unit, Unit::Liang);
        }

        #[test]
        fn test_fractional_quantity() {
            let found = find_first("1.5斤装").unwrap();
            assert_eq!(found.quantity, 1.5);
            assert_eq!(found.unit, Unit::Jin);
        }

        #[test]
        fn test_find_last_prefers_trailing_mention() {
            let found = find_last("美汁源 果粒橙 300ml 12瓶 整箱装 450g").unwrap();
            assert_eq!(found.quantity, 450.0);
            assert_eq!(found.unit, Unit::G);
        }

        #[test]
        fn test_from_specification_scans_known_keys_only() {
            let spec = "型号: XR-500g\n净含量: 750ml";
            let found = from_specification(spec).unwrap();
            assert_eq!(found.quantity, 750.0);
            assert_eq!(found.unit, Unit::Ml);
        }

        #[test]
        fn test_from_specification_accepts_label_variants() {
            let spec = "总净含量: 1000ml";
            let found = from_specification(spec).unwrap();
            assert_eq!(found.quantity, 1000.0);

            let spec = "规格描述: 500克";
            assert_eq!(from_specification(spec).unwrap().unit, Unit::G);
        }

        #[test]
        fn test_from_parameters() {
            let params = vec![
                ("品牌".to_string(), "Brand".to_string()),
                ("净含量".to_string(), "120g".to_string()),
            ];
            let found = from_parameters(&params).unwrap();
            assert_eq!(found.quantity, 120.0);
            assert_eq!(found.unit, Unit::G);
        }

        #[test]
        fn test_strip_from_title() {
            let title = "Product 750ml Bottle";
            let found = find_last(title).unwrap();
            let cleaned = strip_from_title(title, &found);
            assert_eq!(cleaned, "Product Bottle");
            assert!(!cleaned.contains("750ml"));
        }

        #[test]
        fn test_strip_from_cjk_title() {
            let title = "酸梅汤浓缩汁500ml装";
            let found = find_last(title).unwrap();
            assert_eq!(strip_from_title(title, &found), "酸梅汤浓缩汁装");
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_no_unit_token() {
            assert_eq!(find_first("第2代智能手机"), None);
            assert_eq!(find_first("满300减30"), None);
        }

        #[test]
        fn test_uppercase_g_is_not_grams() {
            assert_eq!(find_first("华为5G手机"), None);
        }

        #[test]
        fn test_unknown_spec_keys_are_ignored() {
            assert_eq!(from_specification("货号: 500g"), None);
        }
    }
}
