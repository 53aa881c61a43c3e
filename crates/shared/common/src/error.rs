//! Unified error handling for the identity stores.
//!
//! Provides a single error type that store operations surface to
//! callers, with conversions from domain and storage errors.

use domain::DomainError;
use thiserror::Error;

/// Application error types surfaced by store operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required argument was missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested record does not exist
    #[error("Record not found")]
    NotFound,

    /// The operation was cancelled before reaching the store
    #[error("Operation cancelled")]
    Cancelled,

    /// A stored row could not be decoded into a record
    #[error("Decode error: {0}")]
    Decode(String),

    // External service errors
    #[cfg(feature = "store")]
    #[error("Storage error")]
    Storage(#[from] docstore::StoreError),
}

impl AppError {
    /// Get error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::NotFound => "NOT_FOUND",
            AppError::Cancelled => "CANCELLED",
            AppError::Decode(_) => "DECODE_ERROR",
            #[cfg(feature = "store")]
            AppError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            DomainError::Format(msg) => AppError::Decode(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        AppError::Decode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_or_not_found_passes_the_value_through() {
        let found = Some(42).ok_or_not_found();
        assert!(matches!(found, Ok(42)));
    }

    #[test]
    fn test_ok_or_not_found_maps_none_to_not_found() {
        let missing: AppResult<i32> = None.ok_or_not_found();
        let err = missing.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.to_string(), "Record not found");
    }

    #[test]
    fn test_domain_errors_convert_into_the_taxonomy() {
        let invalid = AppError::from(DomainError::invalid_argument("name must not be empty"));
        assert!(matches!(invalid, AppError::InvalidArgument(_)));
        assert_eq!(invalid.to_string(), "Invalid argument: name must not be empty");

        let format = AppError::from(DomainError::format("unparseable timestamp"));
        assert!(matches!(format, AppError::Decode(_)));
    }

    #[test]
    fn test_codes_identify_each_variant() {
        assert_eq!(AppError::NotFound.code(), "NOT_FOUND");
        assert_eq!(AppError::Cancelled.code(), "CANCELLED");
        assert_eq!(AppError::invalid_argument("user id").code(), "INVALID_ARGUMENT");
        assert_eq!(AppError::decode("truncated row").code(), "DECODE_ERROR");
    }

    #[cfg(feature = "store")]
    #[test]
    fn test_store_faults_convert_to_storage() {
        let err = AppError::from(docstore::StoreError::io("connection reset"));
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(err.code(), "STORAGE_ERROR");
    }
}
