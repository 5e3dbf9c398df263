//! Parser selection and dispatch.
//!
//! The dispatcher owns an ordered list of format parsers as plain
//! `(name, sniff, extract)` entries. Registration order matters: sniff
//! predicates overlap (marketplace text also looks like generic plain
//! text), so the more specific formats are tried first. A positive sniff
//! is only a ranking signal: extraction may still fail, in which case the
//! scan simply continues with the next matching parser.

use crate::model::ParseResult;
use crate::parser::{feed, generic, marketplace};

/// One registered format parser.
#[derive(Clone, Copy)]
pub struct ParserEntry {
    /// Stable identifier for diagnostics and the supported-format listing
    pub name: &'static str,
    /// Cheap applicability predicate, side-effect free
    pub sniff: fn(&str) -> bool,
    /// Full extraction; never panics, failures come back in the envelope
    pub extract: fn(&str) -> ParseResult,
}

/// Ordered collection of format parsers.
pub struct Dispatcher {
    entries: Vec<ParserEntry>,
}

impl Dispatcher {
    /// Creates a dispatcher with the standard parser order: structured
    /// feed first, then marketplace text, then generic plain text.
    pub fn new() -> Self {
        Self::with_entries(vec![
            ParserEntry {
                name: feed::NAME,
                sniff: feed::sniff,
                extract: feed::extract,
            },
            ParserEntry {
                name: marketplace::NAME,
                sniff: marketplace::sniff,
                extract: marketplace::extract,
            },
            ParserEntry {
                name: generic::NAME,
                sniff: generic::sniff,
                extract: generic::extract,
            },
        ])
    }

    /// Creates a dispatcher over a custom parser list.
    pub fn with_entries(entries: Vec<ParserEntry>) -> Self {
        Self { entries }
    }

    /// Parses a raw text blob with the first parser that accepts it.
    ///
    /// Empty input fails immediately without consulting any parser. A
    /// parser whose extraction fails does not abort the dispatch; the scan
    /// moves on to the next sniff match. Only when every candidate has
    /// been exhausted does the dispatcher report the supported-format list.
    pub fn parse(&self, text: &str) -> ParseResult {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ParseResult::failure("Empty input");
        }

        for entry in &self.entries {
            if !(entry.sniff)(trimmed) {
                continue;
            }

            tracing::debug!(parser = entry.name, "parser selected");
            let result = (entry.extract)(trimmed);
            if result.success {
                return result;
            }

            tracing::warn!(
                parser = entry.name,
                error = result.error.as_deref().unwrap_or("unknown"),
                "extraction failed, trying next parser"
            );
        }

        ParseResult::failure(format!(
            "Unsupported format. Supported formats:\n{}",
            self.supported_formats()
        ))
    }

    /// Bullet list of registered parser names.
    pub fn supported_formats(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("- {}", entry.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Names of the registered parsers, in dispatch order.
    pub fn parser_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
