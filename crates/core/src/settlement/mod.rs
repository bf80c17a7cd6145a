//! AR/AP settlement logic.
//!
//! This module implements the two pure engines behind cheque settlement:
//!
//! - `balance` - the ledger balance updater: applies signed payment deltas
//!   to an outstanding-balance entry and derives its payment status
//! - `allocation` - FIFO distribution of a cheque amount across a party's
//!   open transactions, with clamped manual overrides

pub mod allocation;
pub mod balance;
pub mod error;

#[cfg(test)]
mod allocation_props;
#[cfg(test)]
mod balance_props;

pub use allocation::{
    Allocation, AllocationEngine, AllocationOutcome, ManualAllocation, OpenTransaction,
};
pub use balance::{BalanceUpdater, PaymentStatus, SettlementState, SettlementUpdate};
pub use error::SettlementError;
