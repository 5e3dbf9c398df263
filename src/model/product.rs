use serde_derive::{Deserialize, Serialize};

use super::types::{DiscountKind, DiscountOwner, Unit};

/// A single normalized discount extracted from vendor promotion text or
/// structured promotion fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRecord {
    /// The party funding the discount
    pub owner: DiscountOwner,
    /// The discount mechanism
    pub kind: DiscountKind,
    /// Numeric when the discount collapses to one number, descriptive text
    /// when the condition cannot be dropped without losing meaning
    pub value: DiscountValue,
}

/// Value of a discount record.
///
/// Conditional discounts ("spend 300 get 30 off") keep the vendor's original
/// descriptive string because reducing them to a single number would discard
/// the condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiscountValue {
    /// A single amount or percentage figure
    Amount(f64),
    /// A formatted descriptive string for conditional discounts
    Text(String),
}

impl DiscountRecord {
    /// Creates a record with a numeric value.
    pub fn amount(owner: DiscountOwner, kind: DiscountKind, value: f64) -> Self {
        Self {
            owner,
            kind,
            value: DiscountValue::Amount(value),
        }
    }

    /// Creates a record with a descriptive text value.
    pub fn text(owner: DiscountOwner, kind: DiscountKind, value: impl Into<String>) -> Self {
        Self {
            owner,
            kind,
            value: DiscountValue::Text(value.into()),
        }
    }
}

/// A best-effort product record recovered from one raw text blob.
///
/// Every field is optional: parsers fill in what they can recover and flag
/// the expected-but-missing fields through warnings on the surrounding
/// [`ParseResult`], never by failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Canonicalized as "Chinese/Latin" when both scripts are recoverable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// The final payable price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// The pre-discount list price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Newline-joined "key: value" attribute lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// The unit the per-unit price is displayed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_unit: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<DiscountRecord>,
}

/// Return envelope of a parse attempt.
///
/// Created fresh per call and never mutated after return. A failed parse
/// carries a human-readable `error`; a successful one carries the recovered
/// product plus warnings for any expected field that could not be extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ParsedProduct>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for ParseResult {
    fn default() -> Self {
        Self {
            success: false,
            data: None,
            warnings: Vec::new(),
            error: None,
        }
    }
}

impl ParseResult {
    /// Creates a successful result with the given product and warnings.
    pub fn success(data: ParsedProduct, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            warnings,
            error: None,
        }
    }

    /// Creates a failed result with a human-readable error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Returns `Some(s)` when the trimmed string is non-empty.
pub(crate) fn some_if_nonempty(s: impl Into<String>) -> Option<String> {
    let s = s.into();
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
