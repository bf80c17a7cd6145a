//! Cheque error types for lifecycle management.

use thiserror::Error;

use crate::cheque::types::ChequeStatus;

/// Errors that can occur during cheque lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChequeError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ChequeStatus,
        /// The attempted target status.
        to: ChequeStatus,
    },

    /// Only incoming cheques can be endorsed.
    #[error("Only incoming cheques can be endorsed")]
    EndorsementRequiresIncoming,

    /// The cheque already has a payment linked to it.
    #[error("Cheque already has a linked payment; it must be reverted before cashing again")]
    AlreadyProcessed,

    /// Only pending cheques may be deleted.
    #[error("Cannot delete a {0} cheque; revert it to pending first")]
    DeletionNotAllowed(ChequeStatus),

    /// A field frozen on cashed cheques was edited.
    #[error("Cannot edit {field} on a cashed cheque; revert it to pending first")]
    EditFrozen {
        /// The frozen field name.
        field: &'static str,
    },

    /// The endorsement target name is missing.
    #[error("Endorsement requires a holder name")]
    HolderNameRequired,
}

impl ChequeError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::EndorsementRequiresIncoming => "ENDORSEMENT_REQUIRES_INCOMING",
            Self::AlreadyProcessed => "ALREADY_PROCESSED",
            Self::DeletionNotAllowed(_) => "DELETION_NOT_ALLOWED",
            Self::EditFrozen { .. } => "EDIT_FROZEN",
            Self::HolderNameRequired => "HOLDER_NAME_REQUIRED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = ChequeError::InvalidTransition {
            from: ChequeStatus::Cancelled,
            to: ChequeStatus::Cashed,
        };
        assert_eq!(
            err.to_string(),
            "Invalid status transition from cancelled to cashed"
        );
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_deletion_not_allowed_display() {
        let err = ChequeError::DeletionNotAllowed(ChequeStatus::Cashed);
        assert!(err.to_string().contains("cashed"));
        assert_eq!(err.error_code(), "DELETION_NOT_ALLOWED");
    }

    #[test]
    fn test_edit_frozen_display() {
        let err = ChequeError::EditFrozen { field: "amount" };
        assert!(err.to_string().contains("amount"));
        assert_eq!(err.error_code(), "EDIT_FROZEN");
    }

    #[test]
    fn test_already_processed_code() {
        assert_eq!(
            ChequeError::AlreadyProcessed.error_code(),
            "ALREADY_PROCESSED"
        );
    }
}
