//! Journal domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use daftar_shared::types::{JournalEntryId, PaymentId};

/// The accounts journal legs are posted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalAccount {
    /// Cash and bank.
    Cash,
    /// Amounts owed by clients.
    AccountsReceivable,
    /// Amounts owed to suppliers.
    AccountsPayable,
    /// Clearing account for endorsed cheques (no cash movement).
    ChequesEndorsed,
}

impl JournalAccount {
    /// Returns the string representation of the account.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::AccountsReceivable => "accounts_receivable",
            Self::AccountsPayable => "accounts_payable",
            Self::ChequesEndorsed => "cheques_endorsed",
        }
    }
}

impl fmt::Display for JournalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of cash-equivalent event being journaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingKind {
    /// Money received (incoming cheque cashed).
    Receipt,
    /// Money paid out (outgoing cheque cashed).
    Disbursement,
}

/// A debit/credit leg pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalLegs {
    /// The debited account.
    pub debit: JournalAccount,
    /// The credited account.
    pub credit: JournalAccount,
}

impl JournalLegs {
    /// Returns the pair with debit and credit swapped.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            debit: self.credit,
            credit: self.debit,
        }
    }
}

/// Input for building a journal posting.
#[derive(Debug, Clone)]
pub struct PostingInput {
    /// The payment this posting records.
    pub payment_id: PaymentId,
    /// Posted amount (must be positive).
    pub amount: Decimal,
    /// Receipt or disbursement.
    pub kind: PostingKind,
    /// True for bookkeeping-only endorsement payments.
    pub no_cash_movement: bool,
    /// Posting date.
    pub entry_date: NaiveDate,
    /// Business key of the ledger entry settled, if any.
    pub linked_transaction_ref: Option<String>,
    /// Human-readable description.
    pub description: String,
}

/// A journal posting ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalPosting {
    /// Entry identifier.
    pub id: JournalEntryId,
    /// The payment this posting records, if any.
    pub payment_id: Option<PaymentId>,
    /// Debit/credit legs.
    pub legs: JournalLegs,
    /// Posted amount.
    pub amount: Decimal,
    /// Posting date.
    pub entry_date: NaiveDate,
    /// Business key of the ledger entry settled, if any.
    pub linked_transaction_ref: Option<String>,
    /// Human-readable description.
    pub description: String,
    /// The entry this posting offsets, for reversals.
    pub reversal_of: Option<JournalEntryId>,
}

/// A journal entry as stored, used as reversal input.
#[derive(Debug, Clone)]
pub struct PostedEntry {
    /// Entry identifier.
    pub id: JournalEntryId,
    /// The payment the entry recorded, if any.
    pub payment_id: Option<PaymentId>,
    /// Debit/credit legs as posted.
    pub legs: JournalLegs,
    /// Posted amount.
    pub amount: Decimal,
    /// Posting date.
    pub entry_date: NaiveDate,
    /// Description as posted.
    pub description: String,
}
