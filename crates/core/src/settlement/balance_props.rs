//! Property tests for the ledger balance updater.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{BalanceUpdater, PaymentStatus, SettlementState};
use super::error::SettlementError;

/// Amounts between 0.01 and 1,000.00 at two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|n| Decimal::new(n, 2))
}

/// Signed deltas between -1,000.00 and 1,000.00.
fn delta_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000i64..100_000).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A committed delta never leaves a negative total paid, and
    /// remaining balance is always floored at zero.
    #[test]
    fn prop_committed_totals_in_range(
        amount in amount_strategy(),
        paid in (0i64..100_000).prop_map(|n| Decimal::new(n, 2)),
        delta in delta_strategy(),
    ) {
        let state = SettlementState { amount, total_paid: paid };
        if let Ok(update) = BalanceUpdater::apply_delta(&state, delta) {
            prop_assert!(update.total_paid >= Decimal::ZERO);
            prop_assert!(update.remaining_balance >= Decimal::ZERO);
            prop_assert_eq!(
                update.payment_status,
                BalanceUpdater::derive_status(amount, update.total_paid)
            );
        }
    }

    /// A delta that would drive the total negative fails with the
    /// data-integrity fault and reports the exact inputs.
    #[test]
    fn prop_negative_total_fails_fast(
        amount in amount_strategy(),
        paid in (0i64..100_000).prop_map(|n| Decimal::new(n, 2)),
        overshoot in (1i64..100_000).prop_map(|n| Decimal::new(n, 2)),
    ) {
        let state = SettlementState { amount, total_paid: paid };
        let delta = -(paid + overshoot);
        prop_assert_eq!(
            BalanceUpdater::apply_delta(&state, delta),
            Err(SettlementError::NegativeTotalPaid { total_paid: paid, delta })
        );
    }

    /// Applying a delta and then its negation restores the original totals.
    #[test]
    fn prop_apply_reverse_round_trip(
        amount in amount_strategy(),
        paid in (0i64..100_000).prop_map(|n| Decimal::new(n, 2)),
        delta in (0i64..100_000).prop_map(|n| Decimal::new(n, 2)),
    ) {
        let original = SettlementState { amount, total_paid: paid };
        let applied = BalanceUpdater::apply_delta(&original, delta).unwrap();
        let reversed = BalanceUpdater::apply_delta(
            &SettlementState { amount, total_paid: applied.total_paid },
            -delta,
        ).unwrap();

        prop_assert_eq!(reversed.total_paid, original.total_paid);
        prop_assert_eq!(
            reversed.payment_status,
            BalanceUpdater::derive_status(amount, original.total_paid)
        );
    }

    /// The status partitions are consistent: unpaid means zero paid,
    /// paid means fully covered, partial is strictly in between.
    #[test]
    fn prop_status_partitions(
        amount in amount_strategy(),
        paid in (0i64..200_000).prop_map(|n| Decimal::new(n, 2)),
    ) {
        match BalanceUpdater::derive_status(amount, paid) {
            PaymentStatus::Unpaid => prop_assert_eq!(paid, Decimal::ZERO),
            PaymentStatus::Partial => {
                prop_assert!(paid > Decimal::ZERO);
                prop_assert!(paid < amount);
            }
            PaymentStatus::Paid => prop_assert!(paid >= amount),
        }
    }
}
