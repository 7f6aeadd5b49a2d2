//! Error types for JSONB document operations.

use thiserror::Error;

/// Errors that can occur while mutating, merging, or rebuilding a document.
#[derive(Error, Debug)]
pub enum JsonbError {
    /// A required argument is missing or has the wrong document kind.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A path element is not usable where it appears (null, or not an integer
    /// where an array index is required).
    #[error("Malformed path: {0}")]
    MalformedPath(String),

    /// The requested edit is not allowed on this document (mutating a scalar,
    /// redefining a key under insert semantics, out-of-range position under
    /// consistent-position semantics).
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Index arithmetic left the supported integer range.
    #[error("Range error: {0}")]
    Range(String),

    /// The token stream fed to a [`crate::Builder`] was not well nested.
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    /// The input text was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout jsonb-core.
pub type Result<T> = std::result::Result<T, JsonbError>;
