//! Journal error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when building journal postings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JournalError {
    /// Journal amounts must be strictly positive.
    #[error("Journal amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
        }
    }
}
