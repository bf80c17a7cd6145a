//! Property tests for the cheque state machine.

use proptest::prelude::*;

use super::error::ChequeError;
use super::machine::ChequeStateMachine;
use super::types::ChequeStatus;

fn status_strategy() -> impl Strategy<Value = ChequeStatus> {
    prop_oneof![
        Just(ChequeStatus::Pending),
        Just(ChequeStatus::Cashed),
        Just(ChequeStatus::Bounced),
        Just(ChequeStatus::Endorsed),
        Just(ChequeStatus::Cancelled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// `validate_transition` accepts exactly the pairs `is_valid_transition`
    /// accepts, and the error always carries the offending pair.
    #[test]
    fn prop_validate_matches_table(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        let validated = ChequeStateMachine::validate_transition(from, to);
        if ChequeStateMachine::is_valid_transition(from, to) {
            prop_assert!(validated.is_ok());
        } else {
            prop_assert_eq!(
                validated,
                Err(ChequeError::InvalidTransition { from, to })
            );
        }
    }

    /// No transition ever maps a status onto itself.
    #[test]
    fn prop_no_self_transition(status in status_strategy()) {
        prop_assert!(!ChequeStateMachine::is_valid_transition(status, status));
    }

    /// Cancelled is terminal: no outgoing transition exists.
    #[test]
    fn prop_cancelled_terminal(to in status_strategy()) {
        prop_assert!(!ChequeStateMachine::is_valid_transition(
            ChequeStatus::Cancelled,
            to
        ));
    }

    /// Settlement and reversal classifications only apply to valid transitions.
    #[test]
    fn prop_classification_implies_validity(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        if ChequeStateMachine::requires_settlement(from, to)
            || ChequeStateMachine::requires_reversal(from, to)
        {
            prop_assert!(ChequeStateMachine::is_valid_transition(from, to));
        }
    }

    /// A settlement transition is never also a reversal.
    #[test]
    fn prop_settlement_and_reversal_disjoint(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        prop_assert!(
            !(ChequeStateMachine::requires_settlement(from, to)
                && ChequeStateMachine::requires_reversal(from, to))
        );
    }
}
