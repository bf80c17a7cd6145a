//! `SeaORM` Entity for the payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentKind, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: PaymentKind,
    pub method: PaymentMethod,
    pub party_name: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub payment_date: Date,
    /// The cheque whose lifecycle event created this payment.
    pub linked_cheque_id: Option<Uuid>,
    /// Business key of the single ledger entry this payment settles.
    pub linked_transaction_ref: Option<String>,
    /// Correlates the two bookkeeping payments of one endorsement to the
    /// endorsed incoming cheque.
    pub endorsement_cheque_id: Option<Uuid>,
    pub is_endorsement: bool,
    /// Bookkeeping-only: moves AR/AP without cash.
    pub no_cash_movement: bool,
    /// The journal entry was appended in the same atomic batch.
    pub journal_posted: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cheques::Entity",
        from = "Column::LinkedChequeId",
        to = "super::cheques::Column::Id"
    )]
    Cheques,
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
}

impl Related<super::cheques::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cheques.def()
    }
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
