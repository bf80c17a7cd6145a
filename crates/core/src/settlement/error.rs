//! Settlement error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during settlement operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    /// A reversal would drive `total_paid` below zero.
    ///
    /// This is a data-integrity fault, not a user error: it indicates a
    /// duplicate reversal or corrupted prior state and requires manual
    /// reconciliation. The operation must abort; the entry is never
    /// silently clamped.
    #[error(
        "Reversal would drive total paid below zero (total paid {total_paid}, delta {delta}); \
         entry requires manual reconciliation"
    )]
    NegativeTotalPaid {
        /// The entry's total paid before the delta.
        total_paid: Decimal,
        /// The signed delta that was applied.
        delta: Decimal,
    },
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeTotalPaid { .. } => "NEGATIVE_TOTAL_PAID",
        }
    }

    /// Returns true if this error is a data-integrity fault that must be
    /// surfaced to operators rather than the generic error path.
    #[must_use]
    pub const fn is_integrity_fault(&self) -> bool {
        matches!(self, Self::NegativeTotalPaid { .. })
    }
}
