//! Personal price-tracking core.
//!
//! Users paste product listing text, HTML fragments or vendor JSON from
//! e-commerce sites; the extraction subsystem recovers a structured product
//! record (title, brand, prices, discounts, quantity and unit) and the
//! conversion engine turns it into a comparable per-unit price.
//!
//! # Architecture
//!
//! - [`parser`]: format-specific extractors behind a sniffing dispatcher
//! - [`convert`]: unit normalization and per-unit price arithmetic
//! - [`model`]: the shared product/discount data model
//! - [`store`] / [`csv`]: thin catalog persistence and interchange
//!   collaborators around the core
//!
//! Parsing and conversion are synchronous, side-effect free and reentrant;
//! every parse call is independent and the worst case for malformed input
//! is a `success: false` envelope, never a panic.

pub mod config;
pub mod convert;
pub mod csv;
pub mod error;
pub mod model;
pub mod parser;
pub mod store;

#[cfg(test)]
mod test_utils;
