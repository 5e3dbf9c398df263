//! Error types for the price tracker.
//!
//! This module defines typed errors for the components surrounding the parsing
//! core. Extraction failures themselves never surface here: every parser folds
//! its own failures into the [`crate::model::ParseResult`] envelope, so the
//! types below cover configuration, catalog storage and CSV interchange only.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// Product catalog storage errors
    #[error("storage error")]
    Store(#[from] StoreError),

    /// CSV export/import errors
    #[error("csv error")]
    Csv(#[from] CsvError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Product catalog storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record with the given id does not exist
    #[error("no product with id {id}")]
    NotFound { id: i64 },
}

/// CSV export/import errors.
#[derive(Error, Debug)]
pub enum CsvError {
    /// Export was asked to serialize an empty record set
    #[error("no data to export")]
    Empty,

    /// A required column is absent from the import header
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// The import payload had no header row
    #[error("input has no header row")]
    MissingHeader,
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl StoreError {
    /// Creates a not-found error for the given record id.
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }
}
