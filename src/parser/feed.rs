//! Structured vendor-feed parser.
//!
//! Parses the JSON blob some storefront pages embed for a product: a
//! metadata map (`wareInfoReadMap`), a price map with stacked price fields,
//! an optional promotion popup and an optional purchase-limit block. The
//! price fields form a strict priority cascade and the promotion fields feed
//! the discount sub-engine; both orders are business rules, not accidents.

use serde_derive::Deserialize;

use crate::model::{
    some_if_nonempty, DiscountOwner, DiscountRecord, ParseResult, ParsedProduct, Unit,
};
use crate::parser::text::{parse_positive, round_to_two};
use crate::parser::{brand, discount, quantity};

/// Stable parser name for diagnostics and the supported-format listing.
pub const NAME: &str = "Structured feed (JSON)";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedDocument {
    #[serde(rename = "wareInfoReadMap")]
    ware_info: Option<WareInfo>,
    price: Option<PriceInfo>,
    preference: Option<Preference>,
    #[serde(rename = "commonLimitInfo")]
    common_limit: Option<CommonLimitInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WareInfo {
    sku_name: Option<String>,
    cn_brand: Option<String>,
    product_id: Option<String>,
    /// Present when the listing is a third-party store rather than the
    /// platform's own retail
    vender_id: Option<String>,
    size: Option<String>,
    /// JSON-encoded array of sale attribute objects
    sale_attributes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PriceInfo {
    /// Current price
    p: Option<String>,
    /// Original list price
    op: Option<String>,
    #[serde(rename = "regularPrice")]
    regular_price: Option<String>,
    /// Price conditioned on buying multiple units
    #[serde(rename = "bulkPrice")]
    bulk_price: Option<String>,
    #[serde(rename = "finalPrice")]
    final_price: Option<FinalPrice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FinalPrice {
    /// Price after all subsidies
    price: Option<String>,
    /// Label describing the subsidy, e.g. "政府补贴价"
    #[serde(rename = "priceContent")]
    price_content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Preference {
    #[serde(rename = "preferencePopUp")]
    pop_up: Option<PreferencePopUp>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PreferencePopUp {
    #[serde(rename = "morePreference")]
    more_preference: Option<Vec<MorePreference>>,
    expression: Option<Expression>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MorePreference {
    text: Option<String>,
    value: Option<String>,
    tag: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Expression {
    #[serde(rename = "basePrice")]
    base_price: Option<String>,
    subtrahends: Option<Vec<Subtrahend>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Subtrahend {
    #[serde(rename = "preferenceAmount")]
    amount: Option<String>,
    #[serde(rename = "preferenceDesc")]
    description: Option<String>,
    #[serde(rename = "topDesc")]
    top_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaleAttribute {
    #[serde(rename = "saleName")]
    name: Option<String>,
    #[serde(rename = "saleValue")]
    value: Option<String>,
    #[serde(rename = "sequenceNo")]
    sequence: Option<i64>,
}

/// Which branch of the price cascade produced the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PriceSource {
    Bulk,
    Final,
    Current,
    Original,
}

/// A structured feed is a `{`-leading JSON object carrying at least one of
/// the two known top-level maps.
pub fn sniff(text: &str) -> bool {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return false;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value.get("wareInfoReadMap").is_some() || value.get("price").is_some(),
        Err(_) => false,
    }
}

/// Extracts a product record from a structured feed blob.
///
/// Malformed JSON is a structural failure; everything past that point is
/// best effort, with missing title/brand/price degraded to warnings.
pub fn extract(text: &str) -> ParseResult {
    let doc: FeedDocument = match serde_json::from_str(text.trim()) {
        Ok(doc) => doc,
        Err(err) => return ParseResult::failure(err.to_string()),
    };

    let mut warnings = Vec::new();

    let title = doc
        .ware_info
        .as_ref()
        .and_then(|w| w.sku_name.clone())
        .unwrap_or_default();
    if title.trim().is_empty() {
        warnings.push("Product name not found".to_string());
    }

    let brand = doc
        .ware_info
        .as_ref()
        .and_then(|w| w.cn_brand.as_deref())
        .and_then(|raw| brand::canonicalize_feed_brand(raw, &title));
    if brand.is_none() {
        warnings.push("Brand not found".to_string());
    }

    let (price, original_price) = select_prices(doc.price.as_ref());
    if price.is_none() {
        warnings.push("Price not found".to_string());
    }

    let specification = extract_specification(doc.ware_info.as_ref());

    // Specification fields are authoritative for the quantity; the title is
    // the fallback and is left uncleaned here, unlike in the text parsers.
    let found = specification
        .as_deref()
        .and_then(quantity::from_specification)
        .or_else(|| quantity::find_last(&title));
    let (qty, unit) = found
        .map(|m| (m.quantity, m.unit))
        .unwrap_or((1.0, Unit::Piece));

    let discounts = extract_discounts(&doc, price, original_price);

    let source_address = doc
        .ware_info
        .as_ref()
        .and_then(|w| w.product_id.as_deref())
        .filter(|id| !id.trim().is_empty())
        .map(|id| format!("https://item.jd.com/{}.html", id.trim()));

    let product = ParsedProduct {
        title: some_if_nonempty(title),
        brand,
        price,
        original_price,
        specification,
        quantity: Some(qty),
        unit: Some(unit),
        comparison_unit: Some(unit.default_comparison()),
        source_address,
        discounts,
    };

    ParseResult::success(product, warnings)
}

fn nonempty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Applies the four-way price priority and the branch-dependent
/// original-price selection.
///
/// Priority: multi-unit bulk price, then the post-subsidy final price, then
/// the current price, then the original price as a last resort. The original
/// price pairs with whichever branch fired: after a bulk price it is the
/// regular original price (showing the larger of the two possible discount
/// magnitudes), after a subsidized final price it is the pre-subsidy current
/// price.
fn select_prices(price_info: Option<&PriceInfo>) -> (Option<f64>, Option<f64>) {
    let Some(info) = price_info else {
        return (None, None);
    };

    let bulk = nonempty(&info.bulk_price);
    let final_price = info
        .final_price
        .as_ref()
        .and_then(|f| nonempty(&f.price));
    let current = nonempty(&info.p);
    let original = nonempty(&info.op);
    let regular = nonempty(&info.regular_price);

    let (price_str, source) = if bulk.is_some() {
        (bulk, PriceSource::Bulk)
    } else if final_price.is_some() {
        (final_price, PriceSource::Final)
    } else if current.is_some() {
        (current, PriceSource::Current)
    } else {
        (original, PriceSource::Original)
    };

    let original_str = match source {
        PriceSource::Bulk => original.or(current),
        PriceSource::Final => current.or(original),
        PriceSource::Current | PriceSource::Original => regular.or(original),
    };

    (
        price_str.and_then(parse_positive),
        original_str.and_then(parse_positive),
    )
}

/// Builds the specification from the sale-attributes array, sorted by
/// sequence number, falling back to the flat size field.
fn extract_specification(ware_info: Option<&WareInfo>) -> Option<String> {
    let ware = ware_info?;

    let from_attributes = ware
        .sale_attributes
        .as_deref()
        .and_then(|raw| serde_json::from_str::<Vec<SaleAttribute>>(raw).ok())
        .map(|mut attributes| {
            attributes.sort_by_key(|a| a.sequence.unwrap_or(0));
            attributes
                .iter()
                .filter_map(|attribute| {
                    let name = attribute.name.as_deref().unwrap_or("").trim();
                    let value = attribute.value.as_deref().unwrap_or("").trim();
                    if !name.is_empty() && !value.is_empty() {
                        Some(format!("{}: {}", name, value))
                    } else if !value.is_empty() {
                        Some(value.to_string())
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .and_then(some_if_nonempty);

    from_attributes.or_else(|| ware.size.clone().and_then(some_if_nonempty))
}

fn is_subsidy(subtrahend: &Subtrahend) -> bool {
    subtrahend.top_description.as_deref() == Some("补贴")
        || subtrahend
            .description
            .as_deref()
            .is_some_and(|d| d.contains("政府补贴"))
}

/// Runs the discount sub-engine over the structured promotion fields.
///
/// Rule priority, intentionally lossy: promotions from the popup expression
/// first, then a government subsidy (from the expression or, failing that,
/// the final-price block), then the purchase limit, and only when nothing
/// else explains a price gap a synthesized instant reduction for the raw
/// difference.
fn extract_discounts(
    doc: &FeedDocument,
    price: Option<f64>,
    original_price: Option<f64>,
) -> Vec<DiscountRecord> {
    let owner = infer_owner(doc);
    let expression = doc
        .preference
        .as_ref()
        .and_then(|p| p.pop_up.as_ref())
        .and_then(|p| p.expression.as_ref());

    let base_price = expression
        .and_then(|e| nonempty(&e.base_price))
        .and_then(parse_positive)
        .or(original_price);

    let mut discounts = Vec::new();
    let mut subtrahend_count = 0usize;
    let mut has_government = false;

    // First pass: vendor promotions, tracking the running price so a later
    // subsidy amount can be classified against the price it actually applies
    // to
    let mut price_after_promotions = base_price.unwrap_or(0.0);
    if let Some(subtrahends) = expression.and_then(|e| e.subtrahends.as_ref()) {
        for subtrahend in subtrahends {
            let Some(description) = subtrahend.description.as_deref() else {
                continue;
            };
            if is_subsidy(subtrahend) {
                continue;
            }
            if let Some(record) = discount::promotion_from_description(description, owner) {
                if let Some((quantity, rate)) = discount::quantity_percentage_terms(description)
                {
                    // A single unit already qualifies, so the rate applies
                    if quantity <= 1 {
                        price_after_promotions *= rate / 10.0;
                    }
                }
                discounts.push(record);
                subtrahend_count += 1;
            }
        }

        // Second pass: government subsidies, judged against the discounted
        // running price
        for subtrahend in subtrahends {
            if subtrahend.description.is_none() || !is_subsidy(subtrahend) {
                continue;
            }
            let Some(amount) = nonempty(&subtrahend.amount).and_then(parse_positive) else {
                continue;
            };
            discounts.push(discount::government_subsidy_from_amount(
                amount,
                price_after_promotions,
            ));
            subtrahend_count += 1;
            has_government = true;
        }
    }

    if !has_government {
        if let Some(record) = subsidy_from_final_price(doc) {
            discounts.push(record);
            has_government = true;
        }
    }

    let has_promotion = subtrahend_count > 0;

    let limit = if has_government || has_promotion {
        None
    } else {
        limited_purchase(doc, price, original_price, owner)
    };
    let has_limit = limit.is_some();
    discounts.extend(limit);

    // Last resort: an unexplained gap between price and original price
    // becomes a plain instant reduction
    if !has_limit && !has_government && !has_promotion {
        if let (Some(price), Some(original)) = (price, original_price) {
            if price < original {
                discounts.push(DiscountRecord::amount(
                    owner,
                    crate::model::DiscountKind::InstantReduction,
                    round_to_two(original - price),
                ));
            }
        }
    }

    discounts
}

fn infer_owner(doc: &FeedDocument) -> DiscountOwner {
    let has_vender = doc
        .ware_info
        .as_ref()
        .and_then(|w| nonempty(&w.vender_id))
        .is_some();
    if has_vender {
        DiscountOwner::Store
    } else {
        DiscountOwner::Platform
    }
}

/// Government subsidy recovered from the final-price block when the
/// promotion expression carried none.
fn subsidy_from_final_price(doc: &FeedDocument) -> Option<DiscountRecord> {
    let price_info = doc.price.as_ref()?;
    let final_price = price_info.final_price.as_ref()?;
    if !final_price
        .price_content
        .as_deref()
        .is_some_and(|c| c.contains("政府补贴"))
    {
        return None;
    }

    let subsidized = nonempty(&final_price.price).and_then(parse_positive)?;
    let current = nonempty(&price_info.p).and_then(parse_positive)?;
    discount::government_subsidy_from_prices(subsidized, current)
}

/// Purchase-limit discount, tried only when no other rule fired.
fn limited_purchase(
    doc: &FeedDocument,
    price: Option<f64>,
    original_price: Option<f64>,
    owner: DiscountOwner,
) -> Option<DiscountRecord> {
    use crate::model::DiscountKind::PurchaseLimit;
    use crate::parser::text::format_amount;
    use regex::Regex;
    use std::sync::LazyLock;

    static LIMIT_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"购买至少(\d+)件时可享受单件价￥([\d.]+)").expect("valid limit value regex")
    });
    static LIMIT_COUNT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\d+)件").expect("valid limit count regex"));

    // Newer marketing block
    let more = doc
        .preference
        .as_ref()
        .and_then(|p| p.pop_up.as_ref())
        .and_then(|p| p.more_preference.as_ref());
    if let Some(preference) = more.and_then(|entries| {
        entries
            .iter()
            .find(|p| p.text.as_deref() == Some("限购") && p.tag == Some(3))
    }) {
        if let Some(caps) = preference
            .value
            .as_deref()
            .and_then(|v| LIMIT_VALUE_RE.captures(v))
        {
            let limit: i64 = caps[1].parse().ok()?;
            let limit_price: f64 = caps[2].parse().ok()?;
            if let Some(original) = original_price {
                if limit_price < original {
                    let gap = round_to_two(original - limit_price);
                    return Some(DiscountRecord::text(
                        owner,
                        PurchaseLimit,
                        format!("{}-{}", limit, format_amount(gap)),
                    ));
                }
            }
        }
    }

    // Legacy limit text
    let limit_text = doc.common_limit.as_ref()?.limit_text.as_deref()?;
    let caps = LIMIT_COUNT_RE.captures(limit_text)?;
    let limit: i64 = caps[1].parse().ok()?;

    // Values like 9999 are effectively no limit at all
    if limit >= 100 {
        return None;
    }

    let value = match (price, original_price) {
        (Some(price), Some(original)) if price < original => {
            format!("{}-{}", limit, format_amount(round_to_two(original - price)))
        }
        _ => limit.to_string(),
    };

    Some(DiscountRecord::text(owner, PurchaseLimit, value))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommonLimitInfo {
    #[serde(rename = "limitText")]
    limit_text: Option<String>,
}
