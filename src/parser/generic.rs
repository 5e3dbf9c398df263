//! Generic plain-text parser.
//!
//! Handles product blurbs copy-pasted from arbitrary e-commerce pages:
//! a title line followed by price and promotion lines in no particular
//! layout. Everything is recovered by line-local pattern matching; the
//! first non-blank line doubles as the brand carrier.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{some_if_nonempty, DiscountOwner, ParseResult, ParsedProduct, Unit};
use crate::parser::text::{
    contains_currency_glyph, is_json_shaped, non_blank_lines, parse_positive,
};
use crate::parser::{discount, quantity};

/// Stable parser name for diagnostics and the supported-format listing.
pub const NAME: &str = "Plain text";

/// Characters whose presence marks promotion wording.
const DISCOUNT_TRIGGERS: [char; 3] = ['减', '折', '满'];

/// 华佗牌…, an explicit brand suffix marker.
static BRAND_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^牌]{2,6})牌(.+)").expect("valid brand marker regex"));

/// 三星（SAMSUNG）手机, a parenthesized alternate name after the brand.
static BRAND_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^（(]+)[（(]([^）)]+)[）)](.+)").expect("valid brand paren regex")
});

/// 格力 空调挂机, a short leading token set off by punctuation or space.
static BRAND_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\s，。、]{2,6})[，。、\s](.+)").expect("valid brand prefix regex")
});

/// ¥ 30.00 on the same line.
static SAME_LINE_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[¥￥]\s*(\d+\.?\d*)").expect("valid same-line price regex"));

/// A line that is purely a number.
static NUMERIC_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*)$").expect("valid numeric line regex"));

/// Plain text needs at least two non-blank lines and either a currency
/// glyph or promotion wording; JSON-shaped blobs are someone else's job.
pub fn sniff(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_json_shaped(trimmed) {
        return false;
    }

    if non_blank_lines(trimmed).len() < 2 {
        return false;
    }

    contains_currency_glyph(trimmed) || trimmed.chars().any(|c| DISCOUNT_TRIGGERS.contains(&c))
}

/// Extracts a product record from free-form listing text.
pub fn extract(text: &str) -> ParseResult {
    let lines = non_blank_lines(text);
    if lines.is_empty() {
        return ParseResult::failure("Empty input");
    }

    let mut warnings = Vec::new();

    let (brand, mut title) = split_brand_and_title(lines[0], &mut warnings);
    let (price, original_price) = extract_prices(&lines, &mut warnings);
    let discounts = scan_discounts(&lines);

    let found = quantity::find_last(&title);
    let (qty, unit) = found
        .as_ref()
        .map(|m| (m.quantity, m.unit))
        .unwrap_or((1.0, Unit::Piece));
    if let Some(found) = &found {
        title = quantity::strip_from_title(&title, found);
    }

    let product = ParsedProduct {
        title: some_if_nonempty(title),
        brand,
        price,
        original_price,
        quantity: Some(qty),
        unit: Some(unit),
        comparison_unit: Some(unit.default_comparison()),
        discounts,
        ..Default::default()
    };

    ParseResult::success(product, warnings)
}

/// Splits the first line into brand and title.
///
/// Three patterns, first match wins. Only the 牌-marker and parenthesized
/// forms are confident enough to shorten the title; the bare-prefix form
/// keeps the full line as the title since the split is a guess.
fn split_brand_and_title(first_line: &str, warnings: &mut Vec<String>) -> (Option<String>, String) {
    if let Some(caps) = BRAND_MARKER_RE.captures(first_line) {
        return (Some(caps[1].to_string()), caps[2].trim().to_string());
    }

    if let Some(caps) = BRAND_PAREN_RE.captures(first_line) {
        let brand = caps[1].trim().to_string();
        let title = format!("{}{}", &caps[1], &caps[3]).trim().to_string();
        return (Some(brand), title);
    }

    if let Some(caps) = BRAND_PREFIX_RE.captures(first_line) {
        return (Some(caps[1].to_string()), first_line.to_string());
    }

    warnings.push("Brand not extracted, please fill manually".to_string());
    (None, first_line.to_string())
}

/// Collects every advertised price and sorts out final versus original.
///
/// Same-line `¥ <number>` matches win; only when none exist anywhere does
/// the two-line form (a glyph-bearing line followed by a bare number) get a
/// chance. The minimum candidate is taken as the payable price, the maximum
/// as the original price when a strictly larger one exists.
fn extract_prices(lines: &[&str], warnings: &mut Vec<String>) -> (Option<f64>, Option<f64>) {
    let mut candidates = Vec::new();

    for line in lines {
        for caps in SAME_LINE_PRICE_RE.captures_iter(line) {
            if let Some(value) = parse_positive(&caps[1]) {
                candidates.push(value);
            }
        }
    }

    if candidates.is_empty() {
        for window in lines.windows(2) {
            let [current, next] = window else { continue };
            if !contains_currency_glyph(current) {
                continue;
            }
            if let Some(caps) = NUMERIC_LINE_RE.captures(next) {
                if let Some(value) = parse_positive(&caps[1]) {
                    candidates.push(value);
                }
            }
        }
    }

    candidates.sort_by(|a, b| a.partial_cmp(b).expect("prices are finite"));

    let price = candidates.first().copied();
    let original_price = match (candidates.first(), candidates.last()) {
        (Some(min), Some(max)) if max > min => Some(*max),
        _ => None,
    };

    if price.is_none() {
        warnings.push("Price not found".to_string());
    }

    (price, original_price)
}

/// Runs the three line-local discount rules over every line.
///
/// The rules are independent: one line may produce several records.
fn scan_discounts(lines: &[&str]) -> Vec<crate::model::DiscountRecord> {
    let mut records = Vec::new();

    for line in lines {
        if let Some(record) = discount::spend_threshold_reduction(line, DiscountOwner::Platform) {
            records.push(record);
        }
        if let Some(record) = discount::instant_reduction(line, DiscountOwner::Platform) {
            records.push(record);
        }
        if let Some(record) = discount::straight_percentage(line, DiscountOwner::Store) {
            records.push(record);
        }
    }

    records
}
