//! Marketplace plain-text parser.
//!
//! Handles listings copied from marketplace product pages, which are richer
//! than arbitrary plain text: prices hang off labeled lines (券后 for the
//! post-coupon price, 优惠前/新品促销 for the pre-discount price) with the
//! currency glyph on its own line, and a "参数信息" block lists product
//! attributes in alternating key/value lines.

use crate::model::{some_if_nonempty, DiscountOwner, ParseResult, ParsedProduct, Unit};
use crate::parser::params::{self, PARAMETERS_MARKER};
use crate::parser::text::{
    first_positive_number, is_json_shaped, is_lone_currency_glyph, leading_positive_number,
    non_blank_lines,
};
use crate::parser::{brand, discount, quantity};

/// Stable parser name for diagnostics and the supported-format listing.
pub const NAME: &str = "Marketplace text";

/// Label preceding the post-coupon (payable) price.
const POST_COUPON_MARKER: &str = "券后";
/// Labels preceding the pre-discount price.
const PRE_DISCOUNT_MARKER: &str = "优惠前";
const NEW_ARRIVAL_MARKER: &str = "新品促销";
/// Marketplace coin wording, a strong format signal on its own.
const COIN_MARKER: &str = "淘金币";

/// Marketplace text announces itself with its section markers.
pub fn sniff(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_json_shaped(trimmed) {
        return false;
    }

    trimmed.contains(PARAMETERS_MARKER)
        || trimmed.contains(PRE_DISCOUNT_MARKER)
        || trimmed.contains(COIN_MARKER)
        || (trimmed.contains(POST_COUPON_MARKER) && trimmed.contains(PARAMETERS_MARKER))
}

/// Extracts a product record from marketplace listing text.
pub fn extract(text: &str) -> ParseResult {
    let lines = non_blank_lines(text);
    if lines.is_empty() {
        return ParseResult::failure("Empty input");
    }

    let mut warnings = Vec::new();

    let mut title = lines[0].to_string();
    let (price, original_price) = extract_prices(&lines, &mut warnings);

    let parameters = params::extract_block(&lines)
        .map(|block| params::parse_block(&block))
        .unwrap_or_default();

    let brand = brand_from_parameters(&parameters, &mut warnings);
    let specification = if parameters.is_empty() {
        None
    } else {
        Some(params::pairs_to_specification(&parameters))
    };

    let from_parameters = quantity::from_parameters(&parameters);
    let from_title = if from_parameters.is_none() {
        quantity::find_last(&title)
    } else {
        None
    };
    if let Some(found) = &from_title {
        title = quantity::strip_from_title(&title, found);
    }
    let (qty, unit) = from_parameters
        .or(from_title)
        .map(|m| (m.quantity, m.unit))
        .unwrap_or((1.0, Unit::Piece));

    let discounts = scan_discounts(&lines);

    let product = ParsedProduct {
        title: some_if_nonempty(title),
        brand,
        price,
        original_price,
        specification,
        quantity: Some(qty),
        unit: Some(unit),
        comparison_unit: Some(unit.default_comparison()),
        discounts,
        ..Default::default()
    };

    ParseResult::success(product, warnings)
}

/// Line-pair price extraction.
///
/// A labeled line is normally followed by a lone currency-glyph line with
/// the figure two lines below; inline "券后 ¥8.9" variants are handled by
/// scanning the label line together with its successor. A bare glyph line
/// followed by a number is an unlabeled price marker: it fills the price
/// first and a later, distinct occurrence fills the original price instead
/// of overwriting. When only a price was found the original price is set
/// equal to it, so "no discount" is explicit rather than absent.
fn extract_prices(lines: &[&str], warnings: &mut Vec<String>) -> (Option<f64>, Option<f64>) {
    let mut price = None;
    let mut original_price = None;
    // Glyph lines consumed as part of a labeled pattern must not fire the
    // bare-glyph rule again
    let mut consumed = vec![false; lines.len()];

    for i in 0..lines.len().saturating_sub(1) {
        let current = lines[i];
        let next = lines[i + 1];

        if current.contains(POST_COUPON_MARKER) {
            if is_lone_currency_glyph(next) && i + 2 < lines.len() {
                if let Some(value) = leading_positive_number(lines[i + 2]) {
                    price = Some(value);
                    consumed[i + 1] = true;
                }
            } else if let Some(value) = first_positive_number(&format!("{} {}", current, next)) {
                price = Some(value);
            }
        }

        if current.contains(PRE_DISCOUNT_MARKER) || current.contains(NEW_ARRIVAL_MARKER) {
            if is_lone_currency_glyph(next) && i + 2 < lines.len() {
                if let Some(value) = leading_positive_number(lines[i + 2]) {
                    original_price = Some(value);
                    consumed[i + 1] = true;
                }
            } else if let Some(value) = first_positive_number(&format!("{} {}", current, next)) {
                original_price = Some(value);
            }
        }

        if is_lone_currency_glyph(current) && !consumed[i] {
            if let Some(value) = leading_positive_number(next) {
                match price {
                    None => price = Some(value),
                    Some(existing) if original_price.is_none() && value != existing => {
                        original_price = Some(value);
                    }
                    _ => {}
                }
            }
        }
    }

    if original_price.is_none() {
        original_price = price;
    }
    if price.is_none() {
        warnings.push("Price not found".to_string());
    }

    (price, original_price)
}

/// Brand from the 品牌 parameter, canonicalized to "Chinese/Latin" order.
fn brand_from_parameters(
    parameters: &[(String, String)],
    warnings: &mut Vec<String>,
) -> Option<String> {
    let value = parameters
        .iter()
        .find(|(key, _)| key == "品牌")
        .map(|(_, value)| brand::canonicalize_pair(value));

    if value.is_none() {
        warnings.push("Brand not found in parameters".to_string());
    }
    value
}

/// Runs the line-local discount rules over every line.
///
/// Categories are independent: one line can produce several records, but
/// each category fires at most once per line.
fn scan_discounts(lines: &[&str]) -> Vec<crate::model::DiscountRecord> {
    let mut records = Vec::new();

    for line in lines {
        if let Some(record) = discount::spend_threshold_reduction(line, DiscountOwner::Platform) {
            records.push(record);
        }
        if let Some(record) = discount::instant_reduction(line, DiscountOwner::Platform) {
            records.push(record);
        }
        if let Some(record) = discount::store_direct_reduction(line) {
            records.push(record);
        }
        if let Some(record) = discount::coin_reduction(line) {
            records.push(record);
        }
        if let Some(record) = discount::straight_percentage(line, DiscountOwner::Store) {
            records.push(record);
        }
    }

    records
}
