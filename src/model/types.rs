use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Measurement units recognized by the extraction subsystem.
///
/// Weight and volume units are all mutually convertible through 斤 (jin),
/// the internal base unit (1 jin = 500 g = 0.5 kg). Volume is approximated
/// as weight at 1 ml = 1 g. `Piece` is a count unit and never takes part in
/// weight/volume conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Milliliters (ml)
    Ml,
    /// Liters (l)
    L,
    /// Liang (兩) - traditional unit, 10 liang = 1 jin
    Liang,
    /// Jin (斤) - base unit, 500 g
    Jin,
    /// Kilograms (kg)
    Kg,
    /// Grams (g)
    G,
    /// Count unit for items sold by the piece
    Piece,
}

impl Unit {
    /// Every unit, in declaration order.
    pub const ALL: [Unit; 7] = [
        Unit::Ml,
        Unit::L,
        Unit::Liang,
        Unit::Jin,
        Unit::Kg,
        Unit::G,
        Unit::Piece,
    ];

    /// Canonical short name, also used for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Ml => "ml",
            Unit::L => "l",
            Unit::Liang => "liang",
            Unit::Jin => "jin",
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::Piece => "piece",
        }
    }

    /// Whether this unit takes part in weight/volume conversion.
    pub fn is_weight_or_volume(&self) -> bool {
        !matches!(self, Unit::Piece)
    }

    /// The unit a freshly extracted quantity is compared against by default:
    /// piece counts stay per piece, everything else is compared per jin.
    pub fn default_comparison(&self) -> Unit {
        match self {
            Unit::Piece => Unit::Piece,
            _ => Unit::Jin,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The party funding a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountOwner {
    /// Government subsidy programs
    Government,
    /// The marketplace platform
    Platform,
    /// The individual store/seller
    Store,
    /// A payment channel promotion
    Payment,
}

impl fmt::Display for DiscountOwner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiscountOwner::Government => write!(f, "government"),
            DiscountOwner::Platform => write!(f, "platform"),
            DiscountOwner::Store => write!(f, "store"),
            DiscountOwner::Payment => write!(f, "payment"),
        }
    }
}

/// The mechanism of a discount.
///
/// The set is closed: it covers exactly the promotion patterns the parsers
/// know how to recognize, not every discount a vendor could invent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountKind {
    /// Flat percentage off, e.g. 8折
    StraightPercentage,
    /// Percentage off above a spend threshold, e.g. 满800元9.5折
    SpendThresholdPercentage,
    /// Percentage off above a quantity threshold, e.g. 满1件8.5折
    QuantityThresholdPercentage,
    /// Fixed reduction above a spend threshold, e.g. 满300减30
    SpendThresholdReduction,
    /// Fixed reduction above a quantity threshold, e.g. 满1件减2
    QuantityThresholdReduction,
    /// Reduction repeating for every threshold reached, e.g. 每满300减30
    PerThresholdRepeatingReduction,
    /// Unconditional instant reduction, e.g. 立减20元
    InstantReduction,
    /// First-purchase gift amount, e.g. 首购礼金2元
    FirstPurchase,
    /// Discounted price limited to the first N units
    PurchaseLimit,
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DiscountKind::StraightPercentage => "straight-percentage",
            DiscountKind::SpendThresholdPercentage => "spend-threshold-percentage",
            DiscountKind::QuantityThresholdPercentage => "quantity-threshold-percentage",
            DiscountKind::SpendThresholdReduction => "spend-threshold-reduction",
            DiscountKind::QuantityThresholdReduction => "quantity-threshold-reduction",
            DiscountKind::PerThresholdRepeatingReduction => "per-threshold-repeating-reduction",
            DiscountKind::InstantReduction => "instant-reduction",
            DiscountKind::FirstPurchase => "first-purchase",
            DiscountKind::PurchaseLimit => "purchase-limit",
        };
        write!(f, "{}", name)
    }
}
