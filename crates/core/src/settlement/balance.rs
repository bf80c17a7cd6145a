//! Ledger balance updates for outstanding AR/AP entries.
//!
//! An outstanding-balance entry tracks how much of an invoice or bill has
//! been settled. All mutations go through [`BalanceUpdater::apply_delta`]
//! so the derived fields stay consistent with the stored totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use daftar_shared::types::money::clamp_to_zero;

use super::error::SettlementError;

/// Payment status of an outstanding-balance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing has been paid.
    Unpaid,
    /// Partially settled.
    Partial,
    /// Fully settled (total paid covers the amount).
    Paid,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Parses a payment status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The balance-relevant state of an outstanding entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementState {
    /// Original amount (immutable).
    pub amount: Decimal,
    /// Total settled so far.
    pub total_paid: Decimal,
}

/// Result of applying a delta: the new stored values for the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementUpdate {
    /// New total settled.
    pub total_paid: Decimal,
    /// New remaining balance, floored at zero.
    pub remaining_balance: Decimal,
    /// New derived payment status.
    pub payment_status: PaymentStatus,
}

/// Stateless service applying signed payment deltas to an entry.
pub struct BalanceUpdater;

impl BalanceUpdater {
    /// Apply a signed delta to an entry's settled total.
    ///
    /// Positive deltas settle more of the balance (cashing, endorsement
    /// receipt); negative deltas reverse a prior settlement.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::NegativeTotalPaid`] when the delta would
    /// drive the settled total below zero. This fails fast rather than
    /// clamping: a negative total indicates a duplicate reversal or
    /// corrupted prior state.
    pub fn apply_delta(
        state: &SettlementState,
        delta: Decimal,
    ) -> Result<SettlementUpdate, SettlementError> {
        let total_paid = state.total_paid + delta;
        if total_paid < Decimal::ZERO {
            return Err(SettlementError::NegativeTotalPaid {
                total_paid: state.total_paid,
                delta,
            });
        }

        Ok(SettlementUpdate {
            total_paid,
            remaining_balance: clamp_to_zero(state.amount - total_paid),
            payment_status: Self::derive_status(state.amount, total_paid),
        })
    }

    /// Derive the payment status from an amount and its settled total.
    #[must_use]
    pub fn derive_status(amount: Decimal, total_paid: Decimal) -> PaymentStatus {
        if total_paid >= amount {
            PaymentStatus::Paid
        } else if total_paid > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}
