//! Heterogeneous product-info extraction.
//!
//! One module per source format, each exposing the same three-operation
//! contract (`NAME`, `sniff`, `extract`), plus the shared heuristic
//! building blocks they are assembled from and the dispatcher that picks
//! the right parser for a blob.

mod brand;
mod discount;
mod dispatcher;
mod feed;
mod generic;
mod marketplace;
mod params;
mod quantity;
mod text;

pub use dispatcher::{Dispatcher, ParserEntry};
pub use feed::NAME as FEED_PARSER_NAME;
pub use generic::NAME as GENERIC_PARSER_NAME;
pub use marketplace::NAME as MARKETPLACE_PARSER_NAME;
