//! Ledger entry repository for outstanding AR/AP balances.
//!
//! Read layer over the outstanding-balance records the cheque engine
//! settles. Balance mutations happen inside the orchestrator's atomic
//! transactions; this repository covers creation and queries.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use daftar_core::settlement::OpenTransaction;
use daftar_shared::types::{LedgerEntryId, PageRequest, PageResponse};

use crate::entities::{
    ledger_entries,
    sea_orm_active_enums::{LedgerEntryKind, PaymentStatus},
};

/// Error types for ledger entry operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerEntryError {
    /// Ledger entry not found by business reference.
    #[error("Ledger entry not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an outstanding-balance entry.
#[derive(Debug, Clone)]
pub struct CreateLedgerEntryInput {
    /// Business key; must be unique.
    pub transaction_ref: String,
    /// The client or supplier the balance belongs to.
    pub party_name: String,
    /// Receivable or payable.
    pub entry_kind: LedgerEntryKind,
    /// Optional description.
    pub description: Option<String>,
    /// Original amount.
    pub amount: Decimal,
    /// Due date, used for FIFO ordering.
    pub due_date: NaiveDate,
}

/// Ledger entry repository.
#[derive(Debug, Clone)]
pub struct LedgerEntryRepository {
    db: DatabaseConnection,
}

impl LedgerEntryRepository {
    /// Creates a new ledger entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an outstanding-balance entry with nothing settled yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a duplicate
    /// `transaction_ref`).
    pub async fn create_entry(
        &self,
        input: CreateLedgerEntryInput,
    ) -> Result<ledger_entries::Model, LedgerEntryError> {
        let now = Utc::now().into();
        let entry = ledger_entries::ActiveModel {
            id: Set(LedgerEntryId::new().into_inner()),
            transaction_ref: Set(input.transaction_ref),
            party_name: Set(input.party_name),
            entry_kind: Set(input.entry_kind),
            description: Set(input.description),
            amount: Set(input.amount),
            total_paid: Set(Decimal::ZERO),
            remaining_balance: Set(input.amount),
            payment_status: Set(PaymentStatus::Unpaid),
            due_date: Set(input.due_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(entry.insert(&self.db).await?)
    }

    /// Finds an entry by its business reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_ref(
        &self,
        transaction_ref: &str,
    ) -> Result<Option<ledger_entries::Model>, LedgerEntryError> {
        let entry = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::TransactionRef.eq(transaction_ref))
            .one(&self.db)
            .await?;
        Ok(entry)
    }

    /// Gets an entry by its business reference.
    ///
    /// # Errors
    ///
    /// Returns `LedgerEntryError::NotFound` if no entry matches.
    pub async fn get_by_ref(
        &self,
        transaction_ref: &str,
    ) -> Result<ledger_entries::Model, LedgerEntryError> {
        self.find_by_ref(transaction_ref)
            .await?
            .ok_or_else(|| LedgerEntryError::NotFound(transaction_ref.to_string()))
    }

    /// Gets an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerEntryError::NotFound` if no entry matches.
    pub async fn get_by_id(&self, id: Uuid) -> Result<ledger_entries::Model, LedgerEntryError> {
        ledger_entries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerEntryError::NotFound(id.to_string()))
    }

    /// Returns a party's open transactions, oldest due date first.
    ///
    /// This is the FIFO allocation input: entries that are not yet fully
    /// settled, in the order the allocation engine walks them.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn open_transactions(
        &self,
        party_name: &str,
        entry_kind: LedgerEntryKind,
    ) -> Result<Vec<OpenTransaction>, LedgerEntryError> {
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::PartyName.eq(party_name))
            .filter(ledger_entries::Column::EntryKind.eq(entry_kind))
            .filter(ledger_entries::Column::PaymentStatus.ne(PaymentStatus::Paid))
            .order_by_asc(ledger_entries::Column::DueDate)
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(entries
            .into_iter()
            .map(|e| OpenTransaction {
                transaction_ref: e.transaction_ref,
                due_date: e.due_date,
                remaining_balance: e.remaining_balance,
            })
            .collect())
    }

    /// Lists a party's entries, newest first, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_party(
        &self,
        party_name: &str,
        page: &PageRequest,
    ) -> Result<PageResponse<ledger_entries::Model>, LedgerEntryError> {
        let query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::PartyName.eq(party_name));

        let total = query.clone().count(&self.db).await?;

        let entries = query
            .order_by_desc(ledger_entries::Column::DueDate)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }
}
