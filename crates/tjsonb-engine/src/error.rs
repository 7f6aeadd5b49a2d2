//! Error types for temporal operations.

use jsonb_core::JsonbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemporalError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A constructor (or deserializer) rejected the instants, bounds, or
    /// interpolation it was given.
    #[error("Invalid temporal value: {0}")]
    InvalidTemporal(String),

    /// Two temporal operands of a binary lift do not share a time domain.
    #[error("Domain mismatch: {0}")]
    DomainMismatch(String),

    #[error("Document error: {0}")]
    Document(#[from] JsonbError),
}

pub type Result<T> = std::result::Result<T, TemporalError>;
