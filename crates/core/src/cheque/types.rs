//! Cheque domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cheque lifecycle status.
///
/// A cheque starts pending and moves through the lifecycle:
/// - pending → cashed (payment + journal + AR/AP settlement)
/// - pending → bounced (no balance effect)
/// - pending → endorsed (incoming cheques only)
/// - pending → cancelled (terminal)
/// - cashed → pending / bounced (full reversal)
/// - bounced → pending / cashed
/// - endorsed → pending (cancel endorsement)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    /// Cheque is held, awaiting clearing.
    Pending,
    /// Cheque has been cashed; a payment and journal entry exist.
    Cashed,
    /// Cheque was returned unpaid.
    Bounced,
    /// Incoming cheque re-issued to a third party.
    Endorsed,
    /// Cheque was cancelled before clearing (terminal).
    Cancelled,
}

impl ChequeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cashed => "cashed",
            Self::Bounced => "bounced",
            Self::Endorsed => "endorsed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    ///
    /// Legacy aliases from imported records are normalized here, once, at
    /// the read boundary: `cleared` → cashed, `returned` → bounced.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "cashed" | "cleared" => Some(Self::Cashed),
            "bounced" | "returned" => Some(Self::Bounced),
            "endorsed" => Some(Self::Endorsed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the status carries financial side effects.
    ///
    /// Cheques in these states may not be hard-deleted; they must be
    /// reverted to pending first, which reverses those effects.
    #[must_use]
    pub fn has_financial_effect(&self) -> bool {
        matches!(self, Self::Cashed | Self::Endorsed)
    }

    /// Returns true if no further transitions are allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for ChequeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a cheque relative to the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeDirection {
    /// Received from a client (settles receivables when cashed).
    Incoming,
    /// Issued to a supplier (settles payables when cashed).
    Outgoing,
}

impl ChequeDirection {
    /// Returns the string representation of the direction.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for ChequeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cheque kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeKind {
    /// Ordinary cheque.
    Normal,
    /// Part of an endorsement: either the endorsed incoming cheque or the
    /// synthetic outgoing cheque created for the new holder.
    Endorsed,
}

impl ChequeKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Endorsed => "endorsed",
        }
    }
}

/// Input form for creating or editing a cheque.
///
/// Descriptive fields are owned by the caller; status and linking fields
/// are owned by the orchestrator once the cheque has financial effects.
#[derive(Debug, Clone)]
pub struct ChequeForm {
    /// Business-facing cheque number (not guaranteed globally unique).
    pub cheque_number: String,
    /// Incoming or outgoing.
    pub direction: ChequeDirection,
    /// Face amount.
    pub amount: Decimal,
    /// Client (incoming) or supplier (outgoing) name.
    pub party_name: String,
    /// Issuing bank.
    pub bank_name: Option<String>,
    /// Date written on the cheque.
    pub issue_date: NaiveDate,
    /// Date the cheque becomes payable.
    pub due_date: NaiveDate,
    /// Requested lifecycle status.
    pub status: ChequeStatus,
    /// Business key of the single ledger entry this cheque settles.
    pub linked_transaction_ref: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Object-storage key of the scanned cheque image.
    pub image_key: Option<String>,
}
