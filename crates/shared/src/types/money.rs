//! Money helpers with fixed decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` throughout, held at two decimal
//! places with banker's rounding. The ledger is single-currency, so there
//! is no currency tag on amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places carried by every stored amount.
pub const MONEY_DP: u32 = 2;

/// Errors produced when validating a raw amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The input could not be parsed as a decimal number.
    #[error("Amount is not a number: {0}")]
    NotANumber(String),

    /// The amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    NotPositive(Decimal),
}

/// Rounds an amount to the stored precision using banker's rounding.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Floors a computed amount at zero.
///
/// Used for derived quantities (remaining balances, unallocated remainders)
/// that must never be displayed or stored negative.
#[must_use]
pub fn clamp_to_zero(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Parses a user-supplied amount string into a positive, rounded `Decimal`.
///
/// # Errors
///
/// Returns [`MoneyError::NotANumber`] for unparseable input and
/// [`MoneyError::NotPositive`] for zero or negative amounts.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let trimmed = input.trim();
    let parsed: Decimal = trimmed
        .parse()
        .map_err(|_| MoneyError::NotANumber(trimmed.to_string()))?;
    validate_positive(parsed)
}

/// Validates that an amount is strictly positive, rounding it to the
/// stored precision.
///
/// # Errors
///
/// Returns [`MoneyError::NotPositive`] for zero or negative amounts.
pub fn validate_positive(amount: Decimal) -> Result<Decimal, MoneyError> {
    let rounded = round_amount(amount);
    if rounded <= Decimal::ZERO {
        return Err(MoneyError::NotPositive(rounded));
    }
    Ok(rounded)
}
