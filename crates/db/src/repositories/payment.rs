//! Payment repository for cash-movement records.
//!
//! Payments are created and deleted inside the orchestrator's atomic
//! transactions; this repository is the query surface, including the
//! direct and fallback lookups the reversal paths rely on.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use daftar_shared::types::{PageRequest, PageResponse};

use crate::entities::{
    payment_allocations, payments,
    sea_orm_active_enums::PaymentMethod,
};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a payment by id.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NotFound` if no payment matches.
    pub async fn get_payment(&self, id: Uuid) -> Result<payments::Model, PaymentError> {
        payments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PaymentError::NotFound(id))
    }

    /// Finds the payments created for a cheque.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_for_cheque(
        &self,
        cheque_id: Uuid,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        let found = payments::Entity::find()
            .filter(payments::Column::LinkedChequeId.eq(cheque_id))
            .all(&self.db)
            .await?;
        Ok(found)
    }

    /// Fallback lookup when the direct cheque link is missing: match by
    /// settled transaction reference, method, and amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_fallback(
        &self,
        transaction_ref: &str,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<Option<payments::Model>, PaymentError> {
        let found = payments::Entity::find()
            .filter(payments::Column::LinkedTransactionRef.eq(transaction_ref))
            .filter(payments::Column::Method.eq(method))
            .filter(payments::Column::Amount.eq(amount))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    /// Finds the bookkeeping payments of an endorsement, correlated by the
    /// endorsed incoming cheque.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_for_endorsement(
        &self,
        endorsement_cheque_id: Uuid,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        let found = payments::Entity::find()
            .filter(payments::Column::EndorsementChequeId.eq(endorsement_cheque_id))
            .all(&self.db)
            .await?;
        Ok(found)
    }

    /// Legacy fallback: payments whose notes mention a cheque number.
    ///
    /// Retained only for records predating the direct `linked_cheque_id`
    /// link.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_referencing_number(
        &self,
        cheque_number: &str,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        let found = payments::Entity::find()
            .filter(payments::Column::Notes.contains(cheque_number))
            .all(&self.db)
            .await?;
        Ok(found)
    }

    /// Returns a payment's allocation sub-records.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn allocations_for(
        &self,
        payment_id: Uuid,
    ) -> Result<Vec<payment_allocations::Model>, PaymentError> {
        let found = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::PaymentId.eq(payment_id))
            .all(&self.db)
            .await?;
        Ok(found)
    }

    /// Lists payments, newest first, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<payments::Model>, PaymentError> {
        let total = payments::Entity::find().count(&self.db).await?;

        let found = payments::Entity::find()
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(found, page.page, page.per_page, total))
    }
}
