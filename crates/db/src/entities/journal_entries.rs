//! `SeaORM` Entity for the journal_entries table.
//!
//! Append-only. Rows are never updated or deleted; a reversal is a new
//! row with the legs swapped and `reversal_of` pointing at the original.
//! `payment_id` is a soft reference: the payment may have been deleted by
//! a later reversal while its journal history remains.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::JournalAccount;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payment_id: Option<Uuid>,
    pub debit_account: JournalAccount,
    pub credit_account: JournalAccount,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub entry_date: Date,
    pub linked_transaction_ref: Option<String>,
    pub description: String,
    /// The entry this row offsets, for reversals.
    pub reversal_of: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
