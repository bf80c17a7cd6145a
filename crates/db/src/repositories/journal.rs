//! Journal repository for the append-only journal.
//!
//! Journal creation happens inside the orchestrator's atomic
//! transactions. Reversal-by-posting runs here *after* a money-affecting
//! batch commits: it appends offsetting entries and never mutates or
//! deletes posted rows.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use daftar_core::journal::{JournalPosting, PostedEntry, PostingService};
use daftar_shared::types::{JournalEntryId, PageRequest, PageResponse, PaymentId};

use crate::entities::{journal_entries, sea_orm_active_enums::JournalAccount};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalOpError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the journal entries recorded for a payment, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn entries_for_payment(
        &self,
        payment_id: Uuid,
    ) -> Result<Vec<journal_entries::Model>, JournalOpError> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::PaymentId.eq(payment_id))
            .order_by_asc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// Appends offsetting entries for every un-reversed entry of a payment.
    ///
    /// Called after the money-affecting batch has committed; the caller
    /// treats failures as post-commit reconciliation failures (logged,
    /// never rolled back). Entries that already have a reversal are
    /// skipped, so the call is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or insert fails.
    pub async fn reverse_for_payment(
        &self,
        payment_id: Uuid,
        reason: &str,
    ) -> Result<Vec<journal_entries::Model>, JournalOpError> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::PaymentId.eq(payment_id))
            .filter(journal_entries::Column::ReversalOf.is_null())
            .all(&self.db)
            .await?;

        // Originals that already have an offsetting entry.
        let already_reversed: Vec<Uuid> = journal_entries::Entity::find()
            .filter(journal_entries::Column::PaymentId.eq(payment_id))
            .filter(journal_entries::Column::ReversalOf.is_not_null())
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|e| e.reversal_of)
            .collect();

        let mut reversals = Vec::new();
        for entry in entries {
            if already_reversed.contains(&entry.id) {
                continue;
            }

            let posted = PostedEntry {
                id: JournalEntryId::from_uuid(entry.id),
                payment_id: entry.payment_id.map(PaymentId::from_uuid),
                legs: daftar_core::journal::JournalLegs {
                    debit: (&entry.debit_account).into(),
                    credit: (&entry.credit_account).into(),
                },
                amount: entry.amount,
                entry_date: entry.entry_date,
                description: entry.description.clone(),
            };
            let posting = PostingService::build_reversal(&posted, reason);

            let inserted = active_model_from_posting(&posting).insert(&self.db).await?;
            reversals.push(inserted);
        }

        Ok(reversals)
    }

    /// Lists journal entries, newest first, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<journal_entries::Model>, JournalOpError> {
        let total = journal_entries::Entity::find().count(&self.db).await?;

        let entries = journal_entries::Entity::find()
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }
}

/// Builds the row for a core journal posting.
///
/// Shared with the orchestrator, which appends postings inside its atomic
/// transactions.
pub(crate) fn active_model_from_posting(posting: &JournalPosting) -> journal_entries::ActiveModel {
    journal_entries::ActiveModel {
        id: Set(posting.id.into_inner()),
        payment_id: Set(posting.payment_id.map(daftar_shared::types::PaymentId::into_inner)),
        debit_account: Set(JournalAccount::from(posting.legs.debit)),
        credit_account: Set(JournalAccount::from(posting.legs.credit)),
        amount: Set(posting.amount),
        entry_date: Set(posting.entry_date),
        linked_transaction_ref: Set(posting.linked_transaction_ref.clone()),
        description: Set(posting.description.clone()),
        reversal_of: Set(posting.reversal_of.map(JournalEntryId::into_inner)),
        created_at: Set(Utc::now().into()),
    }
}

/// Appends a posting on any connection (pooled or in-transaction).
///
/// # Errors
///
/// Returns an error if the insert fails.
pub(crate) async fn append_posting<C: ConnectionTrait>(
    conn: &C,
    posting: &JournalPosting,
) -> Result<journal_entries::Model, DbErr> {
    active_model_from_posting(posting).insert(conn).await
}
