//! Error types for the multi-index library.
//!
//! Queries never fail: unknown criteria types, missing keys and
//! non-enumerable indexes all degrade to a wider scan. These errors cover
//! the surfaces around the engine (configuration and CLI input).

use thiserror::Error;

/// All errors that can occur outside the query path.
#[derive(Error, Debug)]
pub enum MindexError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Cannot write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Record input could not be parsed.
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// Record input is valid JSON but not an array of flat objects.
    #[error("Invalid record at position {position}: {reason}")]
    InvalidRecord { position: usize, reason: String },

    /// A `FIELD=VALUE` filter could not be parsed.
    #[error("Invalid criteria expression: {0}")]
    InvalidCriteria(String),

    /// A filter names a field that is not present in any record.
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Convenience result type for multi-index operations.
pub type MindexResult<T> = Result<T, MindexError>;
