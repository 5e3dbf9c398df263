//! Unit conversion and per-unit price arithmetic.
//!
//! All weight and volume units convert through 斤 (jin) as the base unit
//! (1 jin = 500 g = 0.5 kg). Volume is deliberately approximated as weight
//! at 1 ml = 1 g, which is the convention the surrounding catalog uses for
//! liquids. `Piece` is a count unit and never converts.
//!
//! Every function here is pure and synchronous: no I/O, no shared state,
//! callable from any display collaborator.

use crate::model::Unit;

/// Conversion rate from the given unit to jin, or `None` for count units.
///
/// The table is fixed:
///
/// | unit  | rate to jin |
/// |-------|-------------|
/// | g     | 1/500       |
/// | kg    | 2           |
/// | jin   | 1           |
/// | liang | 0.1         |
/// | ml    | 1/500       |
/// | l     | 2           |
fn conversion_rate_to_jin(unit: Unit) -> Option<f64> {
    match unit {
        Unit::G => Some(1.0 / 500.0),
        Unit::Kg => Some(2.0),
        Unit::Jin => Some(1.0),
        Unit::Liang => Some(0.1),
        Unit::Ml => Some(1.0 / 500.0),
        Unit::L => Some(2.0),
        Unit::Piece => None,
    }
}

/// Whether a unit can be converted to jin.
pub fn is_convertible_to_jin(unit: Unit) -> bool {
    conversion_rate_to_jin(unit).is_some()
}

/// Converts a quantity to jin, or `None` when the unit is a count unit.
pub fn convert_to_jin(quantity: f64, unit: Unit) -> Option<f64> {
    conversion_rate_to_jin(unit).map(|rate| quantity * rate)
}

/// Converts a quantity between two units.
///
/// Equal units are an identity conversion, defined even for `Piece`.
/// Returns `None` when `Piece` meets any other unit; otherwise converts
/// through the jin base unit.
pub fn convert_unit(quantity: f64, from: Unit, to: Unit) -> Option<f64> {
    if from == to {
        return Some(quantity);
    }

    if from == Unit::Piece || to == Unit::Piece {
        return None;
    }

    let jin_quantity = convert_to_jin(quantity, from)?;
    let rate = conversion_rate_to_jin(to)?;
    Some(jin_quantity / rate)
}

/// Computes the price per `comparison_unit` for a product priced at `price`
/// for `quantity` of `unit`.
///
/// Returns `None` when the quantity is not positive or cannot be converted
/// into the comparison unit.
pub fn unit_price(price: f64, quantity: f64, unit: Unit, comparison_unit: Unit) -> Option<f64> {
    if quantity <= 0.0 {
        return None;
    }

    let converted = convert_unit(quantity, unit, comparison_unit)?;
    if converted == 0.0 {
        return None;
    }

    Some(price / converted)
}

/// Price per jin, the default comparison for legacy records.
pub fn price_per_jin(price: f64, quantity: f64, unit: Unit) -> Option<f64> {
    unit_price(price, quantity, unit, Unit::Jin)
}

/// Rounds up to two decimal places.
///
/// Displayed unit prices always round up, never down, so they never
/// understate the real cost.
pub fn ceil_to_two(value: f64) -> f64 {
    (value * 100.0).ceil() / 100.0
}
