//! `SeaORM` entity definitions.

pub mod activity_log;
pub mod cheques;
pub mod journal_entries;
pub mod ledger_entries;
pub mod payment_allocations;
pub mod payments;
pub mod sea_orm_active_enums;
