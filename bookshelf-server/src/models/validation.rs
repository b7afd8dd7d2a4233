//! Validation error types

use std::fmt;

/// Validation error for request fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is absent, null or empty
    Missing { field: &'static str },

    /// Several required fields are missing; reported with one message
    MissingAny { message: &'static str },

    /// Password and its confirmation differ
    Mismatch,

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Identifier is not a positive integer
    InvalidId { field: &'static str, value: String },

    /// Request body could not be decoded as JSON
    MalformedBody { reason: String },

    /// Field refers to a record that does not exist
    Unknown { message: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::MissingAny { message } => f.write_str(message),
            Self::Mismatch => f.write_str("Passwords do not match"),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidId { field, value } => {
                write!(f, "invalid {}: '{}' is not a positive integer", field, value)
            }
            Self::MalformedBody { reason } => write!(f, "invalid request body: {}", reason),
            Self::Unknown { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Treat absent and empty strings alike, as the mobile client sends both.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
