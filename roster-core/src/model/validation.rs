//! Validation error types

use std::fmt;

/// Validation error for employee fields and patches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value doesn't match the required format
    InvalidFormat { field: &'static str, reason: String },

    /// Numeric field is below zero
    Negative { field: &'static str },

    /// Required field absent or explicitly null
    Missing { field: &'static str },

    /// Patch names a field the record does not have
    UnknownField { name: String },

    /// Patch tries to change a field that is fixed at creation
    Immutable { field: &'static str },

    /// Patch carries nothing to change
    NoFields,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::Negative { field } => write!(f, "{} must not be negative", field),
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::UnknownField { name } => write!(f, "unknown field '{}'", name),
            Self::Immutable { field } => write!(f, "{} cannot be changed", field),
            Self::NoFields => write!(f, "no fields provided for update"),
        }
    }
}

impl std::error::Error for ValidationError {}
