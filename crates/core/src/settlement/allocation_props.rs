//! Property tests for the allocation engine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::{AllocationEngine, ManualAllocation, OpenTransaction};

fn open_transactions_strategy(max_len: usize) -> impl Strategy<Value = Vec<OpenTransaction>> {
    prop::collection::vec(0i64..50_000, 1..=max_len).prop_map(|balances| {
        balances
            .into_iter()
            .enumerate()
            .map(|(i, n)| OpenTransaction {
                transaction_ref: format!("TXN-{i}"),
                due_date: NaiveDate::from_ymd_opt(2026, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                remaining_balance: Decimal::new(n, 2),
            })
            .collect()
    })
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// FIFO never allocates more than the cheque amount in total, and
    /// never more than any transaction's remaining balance.
    #[test]
    fn prop_fifo_respects_bounds(
        amount in amount_strategy(),
        open in open_transactions_strategy(8),
    ) {
        let allocations = AllocationEngine::distribute_fifo(amount, &open);
        prop_assert_eq!(allocations.len(), open.len());

        let total: Decimal = allocations.iter().map(|a| a.amount).sum();
        prop_assert!(total <= amount);

        for (allocation, txn) in allocations.iter().zip(open.iter()) {
            prop_assert!(allocation.amount >= Decimal::ZERO);
            prop_assert!(allocation.amount <= txn.remaining_balance.max(Decimal::ZERO));
        }
    }

    /// FIFO exhausts the cheque whenever the open balances can absorb it.
    #[test]
    fn prop_fifo_exhausts_when_possible(
        amount in amount_strategy(),
        open in open_transactions_strategy(8),
    ) {
        let capacity: Decimal = open
            .iter()
            .map(|t| t.remaining_balance.max(Decimal::ZERO))
            .sum();
        let allocations = AllocationEngine::distribute_fifo(amount, &open);
        let total: Decimal = allocations.iter().map(|a| a.amount).sum();

        prop_assert_eq!(total, amount.min(capacity));
    }

    /// Once the payment is exhausted, every later transaction receives zero.
    #[test]
    fn prop_fifo_is_prefix_greedy(
        amount in amount_strategy(),
        open in open_transactions_strategy(8),
    ) {
        let allocations = AllocationEngine::distribute_fifo(amount, &open);
        let mut exhausted = false;
        for (allocation, txn) in allocations.iter().zip(open.iter()) {
            if exhausted {
                prop_assert_eq!(allocation.amount, Decimal::ZERO);
            }
            if allocation.amount < txn.remaining_balance.max(Decimal::ZERO) {
                // This transaction was not fully covered; the payment ran dry.
                exhausted = true;
            }
        }
    }

    /// Manual overrides are always clamped into `[0, remaining_balance]`.
    #[test]
    fn prop_overrides_clamped(
        open in open_transactions_strategy(6),
        figures in prop::collection::vec(-50_000i64..100_000, 6),
    ) {
        let overrides: Vec<ManualAllocation> = figures
            .iter()
            .enumerate()
            .map(|(i, n)| ManualAllocation {
                transaction_ref: format!("TXN-{i}"),
                amount: Decimal::new(*n, 2),
            })
            .collect();

        let allocations = AllocationEngine::apply_overrides(&open, &overrides);
        for (allocation, txn) in allocations.iter().zip(open.iter()) {
            prop_assert!(allocation.amount >= Decimal::ZERO);
            prop_assert!(allocation.amount <= txn.remaining_balance.max(Decimal::ZERO));
        }
    }

    /// Summarize conserves value: allocated + unallocated - excess equals
    /// the cheque amount whenever the allocation is not over-committed.
    #[test]
    fn prop_summary_conserves_value(
        amount in amount_strategy(),
        open in open_transactions_strategy(8),
    ) {
        let allocations = AllocationEngine::distribute_fifo(amount, &open);
        let outcome = AllocationEngine::summarize(amount, &allocations);

        prop_assert_eq!(outcome.excess, Decimal::ZERO);
        prop_assert_eq!(outcome.allocated_total + outcome.unallocated, amount);
    }
}
