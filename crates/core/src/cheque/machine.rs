//! Cheque state transition logic.
//!
//! This module implements the core state machine for the cheque
//! lifecycle. It is pure: no I/O, no storage. The orchestrator calls
//! these validators before constructing any write.

use crate::cheque::error::ChequeError;
use crate::cheque::types::{ChequeDirection, ChequeStatus};

/// Stateless service validating cheque status transitions.
///
/// The transition table (direction-independent unless noted):
///
/// | From | To | |
/// |---|---|---|
/// | pending | cashed / bounced / cancelled | allowed |
/// | pending | endorsed | incoming cheques only |
/// | cashed | pending / bounced | allowed (full reversal) |
/// | bounced | pending / cashed | allowed |
/// | endorsed | pending | allowed (cancel endorsement) |
/// | any | same status | rejected — a no-op is not a transition |
/// | cancelled | anything | rejected — terminal |
pub struct ChequeStateMachine;

impl ChequeStateMachine {
    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: ChequeStatus, to: ChequeStatus) -> bool {
        matches!(
            (from, to),
            (
                ChequeStatus::Pending,
                ChequeStatus::Cashed
                    | ChequeStatus::Bounced
                    | ChequeStatus::Endorsed
                    | ChequeStatus::Cancelled
            ) | (
                ChequeStatus::Cashed,
                ChequeStatus::Pending | ChequeStatus::Bounced
            ) | (
                ChequeStatus::Bounced,
                ChequeStatus::Pending | ChequeStatus::Cashed
            ) | (ChequeStatus::Endorsed, ChequeStatus::Pending)
        )
    }

    /// Validate a requested status transition.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::InvalidTransition` for any pair not in the
    /// transition table, including same-status no-ops.
    pub fn validate_transition(from: ChequeStatus, to: ChequeStatus) -> Result<(), ChequeError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(ChequeError::InvalidTransition { from, to })
        }
    }

    /// Validate an endorsement request.
    ///
    /// Endorsement is the pending → endorsed transition, restricted to
    /// incoming cheques.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::EndorsementRequiresIncoming` for outgoing
    /// cheques, or `ChequeError::InvalidTransition` when the cheque is not
    /// pending.
    pub fn validate_endorsement(
        direction: ChequeDirection,
        from: ChequeStatus,
    ) -> Result<(), ChequeError> {
        if direction != ChequeDirection::Incoming {
            return Err(ChequeError::EndorsementRequiresIncoming);
        }
        Self::validate_transition(from, ChequeStatus::Endorsed)
    }

    /// Validate that a cheque may be hard-deleted.
    ///
    /// Only pending cheques may be deleted. A cheque with financial side
    /// effects must be reverted to pending (which reverses those effects)
    /// before deletion.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::DeletionNotAllowed` for any non-pending status.
    pub fn validate_deletion(status: ChequeStatus) -> Result<(), ChequeError> {
        if status == ChequeStatus::Pending {
            Ok(())
        } else {
            Err(ChequeError::DeletionNotAllowed(status))
        }
    }

    /// Validate an edit against a cashed cheque's frozen fields.
    ///
    /// Amount and linked transaction are frozen while a cheque is cashed;
    /// an edit must go through explicit reversal first.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::EditFrozen` naming the offending field.
    pub fn validate_cashed_edit(
        status: ChequeStatus,
        amount_changed: bool,
        linked_transaction_changed: bool,
    ) -> Result<(), ChequeError> {
        if status != ChequeStatus::Cashed {
            return Ok(());
        }
        if amount_changed {
            return Err(ChequeError::EditFrozen { field: "amount" });
        }
        if linked_transaction_changed {
            return Err(ChequeError::EditFrozen {
                field: "linked transaction",
            });
        }
        Ok(())
    }

    /// Returns true if the transition settles money (creates payment,
    /// journal entry, and AR/AP deltas).
    #[must_use]
    pub fn requires_settlement(from: ChequeStatus, to: ChequeStatus) -> bool {
        matches!(
            (from, to),
            (
                ChequeStatus::Pending | ChequeStatus::Bounced,
                ChequeStatus::Cashed
            )
        )
    }

    /// Returns true if the transition reverses a prior settlement
    /// (deletes payment and allocations, restores AR/AP balances).
    #[must_use]
    pub fn requires_reversal(from: ChequeStatus, to: ChequeStatus) -> bool {
        matches!(
            (from, to),
            (
                ChequeStatus::Cashed,
                ChequeStatus::Pending | ChequeStatus::Bounced
            )
        )
    }
}
