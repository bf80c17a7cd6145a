//! Journal posting construction and reversal-by-posting.

use rust_decimal::Decimal;

use daftar_shared::types::JournalEntryId;

use super::error::JournalError;
use super::types::{
    JournalAccount, JournalLegs, JournalPosting, PostedEntry, PostingInput, PostingKind,
};

/// Stateless service building journal postings.
pub struct PostingService;

impl PostingService {
    /// Determine the debit/credit legs for a payment event.
    ///
    /// - receipt: debit Cash / credit Accounts Receivable
    /// - disbursement: debit Accounts Payable / credit Cash
    ///
    /// Bookkeeping-only endorsement payments move AR/AP without cash, so
    /// the cash leg is replaced by the endorsed-cheques clearing account.
    /// The clearing account nets to zero across an endorsement pair.
    #[must_use]
    pub fn legs_for(kind: PostingKind, no_cash_movement: bool) -> JournalLegs {
        let cash_leg = if no_cash_movement {
            JournalAccount::ChequesEndorsed
        } else {
            JournalAccount::Cash
        };

        match kind {
            PostingKind::Receipt => JournalLegs {
                debit: cash_leg,
                credit: JournalAccount::AccountsReceivable,
            },
            PostingKind::Disbursement => JournalLegs {
                debit: JournalAccount::AccountsPayable,
                credit: cash_leg,
            },
        }
    }

    /// Build the journal posting for a payment event.
    ///
    /// The posting must be appended in the same atomic batch as the
    /// payment write: a payment can never exist without its entry.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::NonPositiveAmount`] for zero or negative
    /// amounts.
    pub fn build(input: &PostingInput) -> Result<JournalPosting, JournalError> {
        if input.amount <= Decimal::ZERO {
            return Err(JournalError::NonPositiveAmount(input.amount));
        }

        Ok(JournalPosting {
            id: JournalEntryId::new(),
            payment_id: Some(input.payment_id),
            legs: Self::legs_for(input.kind, input.no_cash_movement),
            amount: input.amount,
            entry_date: input.entry_date,
            linked_transaction_ref: input.linked_transaction_ref.clone(),
            description: input.description.clone(),
            reversal_of: None,
        })
    }

    /// Build the offsetting posting that reverses an existing entry.
    ///
    /// The original is never edited or deleted; the reversal carries the
    /// same amount with legs swapped and a reference to the original.
    #[must_use]
    pub fn build_reversal(original: &PostedEntry, reason: &str) -> JournalPosting {
        JournalPosting {
            id: JournalEntryId::new(),
            payment_id: original.payment_id,
            legs: original.legs.swapped(),
            amount: original.amount,
            entry_date: original.entry_date,
            linked_transaction_ref: None,
            description: format!("Reversal: {}. Reason: {reason}", original.description),
            reversal_of: Some(original.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use daftar_shared::types::PaymentId;
    use rust_decimal_macros::dec;

    fn input(kind: PostingKind, no_cash_movement: bool, amount: Decimal) -> PostingInput {
        PostingInput {
            payment_id: PaymentId::new(),
            amount,
            kind,
            no_cash_movement,
            entry_date: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
            linked_transaction_ref: Some("INV-42".to_string()),
            description: "Cheque 1001 cashed".to_string(),
        }
    }

    #[test]
    fn test_receipt_legs() {
        let legs = PostingService::legs_for(PostingKind::Receipt, false);
        assert_eq!(legs.debit, JournalAccount::Cash);
        assert_eq!(legs.credit, JournalAccount::AccountsReceivable);
    }

    #[test]
    fn test_disbursement_legs() {
        let legs = PostingService::legs_for(PostingKind::Disbursement, false);
        assert_eq!(legs.debit, JournalAccount::AccountsPayable);
        assert_eq!(legs.credit, JournalAccount::Cash);
    }

    #[test]
    fn test_no_cash_movement_uses_clearing_account() {
        let receipt = PostingService::legs_for(PostingKind::Receipt, true);
        assert_eq!(receipt.debit, JournalAccount::ChequesEndorsed);
        assert_eq!(receipt.credit, JournalAccount::AccountsReceivable);

        let disbursement = PostingService::legs_for(PostingKind::Disbursement, true);
        assert_eq!(disbursement.debit, JournalAccount::AccountsPayable);
        assert_eq!(disbursement.credit, JournalAccount::ChequesEndorsed);
    }

    #[test]
    fn test_build_posting() {
        let input = input(PostingKind::Receipt, false, dec!(150));
        let posting = PostingService::build(&input).unwrap();

        assert_eq!(posting.payment_id, Some(input.payment_id));
        assert_eq!(posting.amount, dec!(150));
        assert_eq!(posting.legs.debit, JournalAccount::Cash);
        assert_eq!(posting.linked_transaction_ref.as_deref(), Some("INV-42"));
        assert!(posting.reversal_of.is_none());
    }

    #[test]
    fn test_build_rejects_non_positive_amounts() {
        assert_eq!(
            PostingService::build(&input(PostingKind::Receipt, false, dec!(0))),
            Err(JournalError::NonPositiveAmount(dec!(0)))
        );
        assert!(PostingService::build(&input(PostingKind::Receipt, false, dec!(-10))).is_err());
    }

    #[test]
    fn test_build_reversal_swaps_legs() {
        let input = input(PostingKind::Disbursement, false, dec!(80));
        let posting = PostingService::build(&input).unwrap();

        let posted = PostedEntry {
            id: posting.id,
            payment_id: posting.payment_id,
            legs: posting.legs,
            amount: posting.amount,
            entry_date: posting.entry_date,
            description: posting.description.clone(),
        };
        let reversal = PostingService::build_reversal(&posted, "cheque bounced");

        assert_ne!(reversal.id, posted.id);
        assert_eq!(reversal.reversal_of, Some(posted.id));
        assert_eq!(reversal.amount, posted.amount);
        assert_eq!(reversal.legs.debit, JournalAccount::Cash);
        assert_eq!(reversal.legs.credit, JournalAccount::AccountsPayable);
        assert!(reversal.description.starts_with("Reversal: "));
        assert!(reversal.description.contains("cheque bounced"));
    }
}
