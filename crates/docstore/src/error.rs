//! Storage engine errors.

use thiserror::Error;

/// Errors raised by a document store engine.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Generic I/O error from the underlying engine
    #[error("I/O error: {0}")]
    Io(String),

    /// Document could not be marshalled to or from the engine's format
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Other engine errors
    #[error("Storage error: {0}")]
    Other(String),
}

impl StoreError {
    /// Create an I/O error
    pub fn io(msg: impl Into<String>) -> Self {
        StoreError::Io(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        StoreError::Serialization(msg.into())
    }

    /// Create a generic engine error
    pub fn other(msg: impl Into<String>) -> Self {
        StoreError::Other(msg.into())
    }
}
