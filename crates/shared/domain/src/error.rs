//! Domain-level errors.
//!
//! These errors represent argument and encoding failures in the record
//! types themselves. They are independent of storage concerns.

use thiserror::Error;

/// Domain-specific errors raised by record constructors and codecs.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// A required argument was missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A persisted value could not be decoded
    #[error("Format error: {0}")]
    Format(String),
}

impl DomainError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DomainError::InvalidArgument(msg.into())
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        DomainError::Format(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
