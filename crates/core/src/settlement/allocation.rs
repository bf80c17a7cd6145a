//! FIFO allocation of a cheque amount across open transactions.
//!
//! One cheque can settle several outstanding invoices or bills at once.
//! The engine distributes the face amount oldest-due-date-first, or accepts
//! a manually overridden distribution with each figure clamped to the
//! transaction's remaining balance. Under- and over-allocation are both
//! legal states surfaced to the caller, never errors: an unallocated
//! remainder is an advance, an excess is a credit.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use daftar_shared::types::money::clamp_to_zero;

/// An open transaction eligible for allocation.
///
/// Callers supply these sorted oldest-due-date-first; the engine walks the
/// list in the given order.
#[derive(Debug, Clone)]
pub struct OpenTransaction {
    /// Business key of the outstanding ledger entry.
    pub transaction_ref: String,
    /// Due date, used for FIFO ordering.
    pub due_date: NaiveDate,
    /// Remaining unsettled balance.
    pub remaining_balance: Decimal,
}

/// A manual allocation figure supplied by the caller.
#[derive(Debug, Clone)]
pub struct ManualAllocation {
    /// Business key of the outstanding ledger entry.
    pub transaction_ref: String,
    /// Requested allocation amount.
    pub amount: Decimal,
}

/// One computed allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Business key of the outstanding ledger entry.
    pub transaction_ref: String,
    /// Amount allocated to that entry.
    pub amount: Decimal,
}

/// Summary of an allocation set against a cheque amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    /// Allocations with a non-zero amount.
    pub allocations: Vec<Allocation>,
    /// Sum of all allocations.
    pub allocated_total: Decimal,
    /// Cheque amount not allocated to any transaction (an advance).
    pub unallocated: Decimal,
    /// Allocation beyond the cheque amount (a credit).
    pub excess: Decimal,
}

/// Stateless allocation engine.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Distribute an amount FIFO across open transactions.
    ///
    /// Walks the list in order, allocating
    /// `min(remaining_payment, remaining_balance)` to each transaction and
    /// stopping once the payment is exhausted. Transactions after that
    /// point receive zero. The returned list is positionally parallel to
    /// the input.
    #[must_use]
    pub fn distribute_fifo(amount: Decimal, open: &[OpenTransaction]) -> Vec<Allocation> {
        let mut remaining_payment = clamp_to_zero(amount);

        open.iter()
            .map(|txn| {
                let allocated = remaining_payment.min(clamp_to_zero(txn.remaining_balance));
                remaining_payment -= allocated;
                Allocation {
                    transaction_ref: txn.transaction_ref.clone(),
                    amount: allocated,
                }
            })
            .collect()
    }

    /// Apply manually overridden allocation figures.
    ///
    /// Each figure is clamped to `[0, remaining_balance]` of its
    /// transaction; figures for unknown transactions are ignored and
    /// transactions without a figure receive zero. The engine does not
    /// force the sum to equal the cheque amount.
    #[must_use]
    pub fn apply_overrides(
        open: &[OpenTransaction],
        overrides: &[ManualAllocation],
    ) -> Vec<Allocation> {
        open.iter()
            .map(|txn| {
                let requested = overrides
                    .iter()
                    .find(|o| o.transaction_ref == txn.transaction_ref)
                    .map_or(Decimal::ZERO, |o| o.amount);
                let ceiling = clamp_to_zero(txn.remaining_balance);
                Allocation {
                    transaction_ref: txn.transaction_ref.clone(),
                    amount: clamp_to_zero(requested).min(ceiling),
                }
            })
            .collect()
    }

    /// Summarize an allocation set against the cheque amount.
    ///
    /// Zero allocations are dropped from the outcome; under- and
    /// over-allocation are reported as `unallocated` and `excess`.
    #[must_use]
    pub fn summarize(cheque_amount: Decimal, allocations: &[Allocation]) -> AllocationOutcome {
        let allocated_total: Decimal = allocations.iter().map(|a| a.amount).sum();

        AllocationOutcome {
            allocations: allocations
                .iter()
                .filter(|a| a.amount > Decimal::ZERO)
                .cloned()
                .collect(),
            allocated_total,
            unallocated: clamp_to_zero(cheque_amount - allocated_total),
            excess: clamp_to_zero(allocated_total - cheque_amount),
        }
    }
}
