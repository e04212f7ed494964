//! Error taxonomy for record store and query operations.
//!
//! Every operation reports one of four kinds. The core never picks transport
//! status codes; callers translate [`ErrorKind`] into whatever their wire
//! protocol needs.

use std::fmt;
use thiserror::Error;

use crate::model::ValidationError;

/// Main error type for roster-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed, missing or out-of-range field
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Identifier already present on create
    #[error("employee '{id}' already exists")]
    Conflict { id: String },

    /// Operation targets an identifier that is not stored
    #[error("employee '{id}' not found")]
    NotFound { id: String },

    /// Underlying store unreachable or the statement failed
    #[error("storage unavailable: {reason}")]
    StorageUnavailable { reason: String },
}

/// Result type alias for roster-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stable classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    NotFound,
    StorageUnavailable,
}

impl ErrorKind {
    /// Snake-case name used in error bodies and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::StorageUnavailable => "storage_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a conflict error for an identifier
    pub fn conflict(id: impl Into<String>) -> Self {
        Self::Conflict { id: id.into() }
    }

    /// Create a not found error for an identifier
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a storage error
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Self::storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::conflict("E001");
        assert_eq!(err.to_string(), "employee 'E001' already exists");

        let err = Error::not_found("E404");
        assert_eq!(err.to_string(), "employee 'E404' not found");

        let err: Error = ValidationError::Negative { field: "salary" }.into();
        assert_eq!(err.to_string(), "invalid input: salary must not be negative");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::conflict("a").kind(), ErrorKind::Conflict);
        assert_eq!(Error::not_found("a").kind(), ErrorKind::NotFound);
        assert_eq!(Error::storage("down").kind().as_str(), "storage_unavailable");
        assert_eq!(
            Error::from(ValidationError::NoFields).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, Error::StorageUnavailable { .. }));
    }
}
