//! `SeaORM` Entity for the cheques table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ChequeDirection, ChequeKind, ChequeStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cheques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cheque_number: String,
    pub direction: ChequeDirection,
    pub kind: ChequeKind,
    pub status: ChequeStatus,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub party_name: String,
    pub bank_name: Option<String>,
    pub issue_date: Date,
    pub due_date: Date,
    /// Set while the cheque is cashed; cleared on reversal.
    pub cleared_date: Option<Date>,
    /// Business key of the single ledger entry this cheque settles.
    pub linked_transaction_ref: Option<String>,
    /// Idempotency guard: present iff a payment exists for this cheque.
    pub linked_payment_id: Option<Uuid>,
    /// JSON array of ledger-entry refs settled by a multi-allocation cashing.
    pub paid_transaction_refs: Option<Json>,
    pub endorsed_to: Option<String>,
    pub endorsed_date: Option<Date>,
    /// The synthetic outgoing cheque created when this cheque was endorsed.
    pub endorsed_to_outgoing_id: Option<Uuid>,
    pub notes: Option<String>,
    pub image_key: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
