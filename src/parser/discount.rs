//! Discount pattern rules.
//!
//! Each promotion pattern the parsers recognize is a named, independently
//! testable rule. The per-line rules feed the plain-text parsers; the
//! promotion-description cascade and the subsidy arithmetic feed the
//! structured-feed parser. Precedence inside the cascade is load-bearing:
//! "每满300减30" textually contains "满300减30", so the repeating rule must
//! run before the plain threshold rule.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{DiscountKind, DiscountOwner, DiscountRecord};

/// 满300减30: reduction above a spend threshold.
static SPEND_REDUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"满(\d+)减(\d+)").expect("valid spend reduction regex"));

/// 每满300减30: reduction repeating for every threshold reached.
static REPEATING_REDUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"每满(\d+)减(\d+)").expect("valid repeating reduction regex"));

/// 立减20元 / 超级立减4元: unconditional instant reduction.
static INSTANT_REDUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"立减(\d+\.?\d*)元?").expect("valid instant reduction regex"));

/// 8折 / 8.5折: flat percentage.
static STRAIGHT_PERCENTAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)折").expect("valid straight percentage regex"));

/// 直降5.79元: seller-funded price drop.
static STORE_DIRECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"直降(\d+\.?\d*)元?").expect("valid store direct regex"));

/// 淘金币已抵9.54元: marketplace coin redemption.
static COIN_REDUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"淘金币已抵(\d+\.?\d*)元?").expect("valid coin regex"));

/// 满1件8.5折 / 满1享9折: percentage above a quantity threshold.
static QUANTITY_PERCENTAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"满(\d+)(?:件|享)([\d.]+)折").expect("valid quantity pct regex"));

/// 满800元9.5折: percentage above a spend threshold.
static SPEND_PERCENTAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"满(\d+)元([\d.]+)折").expect("valid spend pct regex"));

/// 满1件减2: reduction above a quantity threshold.
static QUANTITY_REDUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"满(\d+)件减(\d+)").expect("valid quantity reduction regex"));

/// 首购礼金 2元: first-purchase gift amount.
static FIRST_PURCHASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"首购礼金\s+(\d+\.?\d*)元?").expect("valid first purchase regex"));

/// Subsidy amounts matching one of these ratios of the running price are
/// read as percentage discounts rather than flat reductions.
const COMMON_SUBSIDY_RATIOS: [f64; 9] = [0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45];

/// 满N减M on a promotion line, kept as its descriptive string.
pub fn spend_threshold_reduction(line: &str, owner: DiscountOwner) -> Option<DiscountRecord> {
    let caps = SPEND_REDUCTION_RE.captures(line)?;
    Some(DiscountRecord::text(
        owner,
        DiscountKind::SpendThresholdReduction,
        format!("满{}减{}", &caps[1], &caps[2]),
    ))
}

/// 立减N元 on a promotion line.
pub fn instant_reduction(line: &str, owner: DiscountOwner) -> Option<DiscountRecord> {
    let caps = INSTANT_REDUCTION_RE.captures(line)?;
    let amount = caps[1].parse::<f64>().ok()?;
    Some(DiscountRecord::amount(
        owner,
        DiscountKind::InstantReduction,
        amount,
    ))
}

/// N折 on a promotion line.
pub fn straight_percentage(line: &str, owner: DiscountOwner) -> Option<DiscountRecord> {
    let caps = STRAIGHT_PERCENTAGE_RE.captures(line)?;
    let rate = caps[1].parse::<f64>().ok()?;
    Some(DiscountRecord::amount(
        owner,
        DiscountKind::StraightPercentage,
        rate,
    ))
}

/// 直降N元 on a promotion line; a store-funded instant reduction.
pub fn store_direct_reduction(line: &str) -> Option<DiscountRecord> {
    let caps = STORE_DIRECT_RE.captures(line)?;
    let amount = caps[1].parse::<f64>().ok()?;
    Some(DiscountRecord::amount(
        DiscountOwner::Store,
        DiscountKind::InstantReduction,
        amount,
    ))
}

/// 淘金币已抵N元 on a promotion line; platform coins behave like an
/// instant reduction.
pub fn coin_reduction(line: &str) -> Option<DiscountRecord> {
    let caps = COIN_REDUCTION_RE.captures(line)?;
    let amount = caps[1].parse::<f64>().ok()?;
    Some(DiscountRecord::amount(
        DiscountOwner::Platform,
        DiscountKind::InstantReduction,
        amount,
    ))
}

/// Parses one promotion description from a structured feed.
///
/// Tries each known pattern in precedence order and normalizes the first hit.
/// Conditional promotions keep a canonical descriptive value; only the
/// first-purchase gift collapses to a single number.
pub fn promotion_from_description(desc: &str, owner: DiscountOwner) -> Option<DiscountRecord> {
    if let Some(caps) = QUANTITY_PERCENTAGE_RE.captures(desc) {
        let rate = caps[2].parse::<f64>().ok()?;
        return Some(DiscountRecord::text(
            owner,
            DiscountKind::QuantityThresholdPercentage,
            format!("满{}件{}折", &caps[1], rate),
        ));
    }

    if let Some(caps) = SPEND_PERCENTAGE_RE.captures(desc) {
        let rate = caps[2].parse::<f64>().ok()?;
        return Some(DiscountRecord::text(
            owner,
            DiscountKind::SpendThresholdPercentage,
            format!("满{}元{}折", &caps[1], rate),
        ));
    }

    if let Some(caps) = QUANTITY_REDUCTION_RE.captures(desc) {
        return Some(DiscountRecord::text(
            owner,
            DiscountKind::QuantityThresholdReduction,
            format!("满{}件减{}", &caps[1], &caps[2]),
        ));
    }

    if let Some(caps) = REPEATING_REDUCTION_RE.captures(desc) {
        return Some(DiscountRecord::text(
            owner,
            DiscountKind::PerThresholdRepeatingReduction,
            format!("每满{}减{}", &caps[1], &caps[2]),
        ));
    }

    if let Some(record) = spend_threshold_reduction(desc, owner) {
        return Some(record);
    }

    if let Some(caps) = FIRST_PURCHASE_RE.captures(desc) {
        let amount = caps[1].parse::<f64>().ok()?;
        return Some(DiscountRecord::amount(
            owner,
            DiscountKind::FirstPurchase,
            amount,
        ));
    }

    None
}

/// Quantity threshold and rate of a 满N件R折 promotion, for sequencing the
/// running price while stacking discounts.
pub fn quantity_percentage_terms(desc: &str) -> Option<(u32, f64)> {
    let caps = QUANTITY_PERCENTAGE_RE.captures(desc)?;
    let quantity = caps[1].parse::<u32>().ok()?;
    let rate = caps[2].parse::<f64>().ok()?;
    Some((quantity, rate))
}

/// Classifies a government subsidy amount against the running price.
///
/// When the amount lines up with a common percentage of the price the
/// subsidy is recorded as a percentage discount (e.g. a 15% subsidy on a
/// 100 yuan price becomes 8.5折); otherwise it stays a flat reduction.
pub fn government_subsidy_from_amount(amount: f64, price_after_other: f64) -> DiscountRecord {
    if price_after_other > 0.0 {
        let ratio = amount / price_after_other;
        let looks_like_percentage = COMMON_SUBSIDY_RATIOS
            .iter()
            .any(|pct| (ratio - pct).abs() < 0.01);

        if looks_like_percentage && ratio < 0.5 {
            let rate = ((1.0 - ratio) * 100.0).round() / 10.0;
            return DiscountRecord::amount(
                DiscountOwner::Government,
                DiscountKind::StraightPercentage,
                rate,
            );
        }
    }

    DiscountRecord::amount(
        DiscountOwner::Government,
        DiscountKind::InstantReduction,
        amount,
    )
}

/// Government subsidy expressed as a final-versus-current price pair.
///
/// 53.52 after subsidy on a 66.90 price is a 0.8 ratio, recorded as 8折.
pub fn government_subsidy_from_prices(final_price: f64, current: f64) -> Option<DiscountRecord> {
    if final_price > 0.0 && current > 0.0 && final_price < current {
        let rate = (final_price / current * 100.0).round() / 10.0;
        return Some(DiscountRecord::amount(
            DiscountOwner::Government,
            DiscountKind::StraightPercentage,
            rate,
        ));
    }
    None
}
