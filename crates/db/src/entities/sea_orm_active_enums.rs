//! `SeaORM` active enums stored as canonical strings.
//!
//! Storage writes canonical values only; legacy aliases are normalized at
//! the read boundary by the core parsers, never re-checked at call sites.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cheque lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    /// Held, awaiting clearing.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Cashed; payment and journal entry exist.
    #[sea_orm(string_value = "cashed")]
    Cashed,
    /// Returned unpaid.
    #[sea_orm(string_value = "bounced")]
    Bounced,
    /// Re-issued to a third party.
    #[sea_orm(string_value = "endorsed")]
    Endorsed,
    /// Cancelled before clearing.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Cheque direction relative to the business.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ChequeDirection {
    /// Received from a client.
    #[sea_orm(string_value = "incoming")]
    Incoming,
    /// Issued to a supplier.
    #[sea_orm(string_value = "outgoing")]
    Outgoing,
}

/// Cheque kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ChequeKind {
    /// Ordinary cheque.
    #[sea_orm(string_value = "normal")]
    Normal,
    /// Part of an endorsement.
    #[sea_orm(string_value = "endorsed")]
    Endorsed,
}

/// Payment kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Money received.
    #[sea_orm(string_value = "receipt")]
    Receipt,
    /// Money paid out.
    #[sea_orm(string_value = "disbursement")]
    Disbursement,
}

/// Payment method.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Settled by cheque.
    #[sea_orm(string_value = "cheque")]
    Cheque,
    /// Settled in cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Settled by bank transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// Kind of outstanding-balance ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LedgerEntryKind {
    /// Owed by a client.
    #[sea_orm(string_value = "receivable")]
    Receivable,
    /// Owed to a supplier.
    #[sea_orm(string_value = "payable")]
    Payable,
}

/// Payment status of an outstanding-balance entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Partially settled.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Journal account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum JournalAccount {
    /// Cash and bank.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Amounts owed by clients.
    #[sea_orm(string_value = "accounts_receivable")]
    AccountsReceivable,
    /// Amounts owed to suppliers.
    #[sea_orm(string_value = "accounts_payable")]
    AccountsPayable,
    /// Clearing account for endorsed cheques.
    #[sea_orm(string_value = "cheques_endorsed")]
    ChequesEndorsed,
}

// ============================================================================
// Conversions between storage enums and core domain enums
// ============================================================================

impl From<daftar_core::cheque::ChequeStatus> for ChequeStatus {
    fn from(status: daftar_core::cheque::ChequeStatus) -> Self {
        use daftar_core::cheque::ChequeStatus as Core;
        match status {
            Core::Pending => Self::Pending,
            Core::Cashed => Self::Cashed,
            Core::Bounced => Self::Bounced,
            Core::Endorsed => Self::Endorsed,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

impl From<&ChequeStatus> for daftar_core::cheque::ChequeStatus {
    fn from(status: &ChequeStatus) -> Self {
        match status {
            ChequeStatus::Pending => Self::Pending,
            ChequeStatus::Cashed => Self::Cashed,
            ChequeStatus::Bounced => Self::Bounced,
            ChequeStatus::Endorsed => Self::Endorsed,
            ChequeStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<daftar_core::cheque::ChequeDirection> for ChequeDirection {
    fn from(direction: daftar_core::cheque::ChequeDirection) -> Self {
        use daftar_core::cheque::ChequeDirection as Core;
        match direction {
            Core::Incoming => Self::Incoming,
            Core::Outgoing => Self::Outgoing,
        }
    }
}

impl From<&ChequeDirection> for daftar_core::cheque::ChequeDirection {
    fn from(direction: &ChequeDirection) -> Self {
        match direction {
            ChequeDirection::Incoming => Self::Incoming,
            ChequeDirection::Outgoing => Self::Outgoing,
        }
    }
}

impl From<daftar_core::cheque::ChequeKind> for ChequeKind {
    fn from(kind: daftar_core::cheque::ChequeKind) -> Self {
        use daftar_core::cheque::ChequeKind as Core;
        match kind {
            Core::Normal => Self::Normal,
            Core::Endorsed => Self::Endorsed,
        }
    }
}

impl From<daftar_core::settlement::PaymentStatus> for PaymentStatus {
    fn from(status: daftar_core::settlement::PaymentStatus) -> Self {
        use daftar_core::settlement::PaymentStatus as Core;
        match status {
            Core::Unpaid => Self::Unpaid,
            Core::Partial => Self::Partial,
            Core::Paid => Self::Paid,
        }
    }
}

impl From<daftar_core::journal::JournalAccount> for JournalAccount {
    fn from(account: daftar_core::journal::JournalAccount) -> Self {
        use daftar_core::journal::JournalAccount as Core;
        match account {
            Core::Cash => Self::Cash,
            Core::AccountsReceivable => Self::AccountsReceivable,
            Core::AccountsPayable => Self::AccountsPayable,
            Core::ChequesEndorsed => Self::ChequesEndorsed,
        }
    }
}

impl From<&JournalAccount> for daftar_core::journal::JournalAccount {
    fn from(account: &JournalAccount) -> Self {
        match account {
            JournalAccount::Cash => Self::Cash,
            JournalAccount::AccountsReceivable => Self::AccountsReceivable,
            JournalAccount::AccountsPayable => Self::AccountsPayable,
            JournalAccount::ChequesEndorsed => Self::ChequesEndorsed,
        }
    }
}

impl From<daftar_core::journal::PostingKind> for PaymentKind {
    fn from(kind: daftar_core::journal::PostingKind) -> Self {
        use daftar_core::journal::PostingKind as Core;
        match kind {
            Core::Receipt => Self::Receipt,
            Core::Disbursement => Self::Disbursement,
        }
    }
}

impl From<&PaymentKind> for daftar_core::journal::PostingKind {
    fn from(kind: &PaymentKind) -> Self {
        match kind {
            PaymentKind::Receipt => Self::Receipt,
            PaymentKind::Disbursement => Self::Disbursement,
        }
    }
}
