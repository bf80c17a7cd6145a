//! Cheque repository: the atomic lifecycle coordinator.
//!
//! Every cheque lifecycle command passes through here. Each command reads
//! the affected rows, validates the requested transition with the core
//! state machine, and applies the cheque update, payment write, AR/AP
//! balance deltas, and journal entry inside one database transaction —
//! either everything commits or nothing does. Post-commit steps (journal
//! reversal, activity log) are best-effort and never undo the committed
//! batch.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use daftar_core::cheque::types::ChequeStatus as CoreStatus;
use daftar_core::cheque::{ChequeError, ChequeForm, ChequeStateMachine};
use daftar_core::journal::{JournalError, PostingInput, PostingService};
use daftar_core::settlement::{
    Allocation, AllocationEngine, BalanceUpdater, ManualAllocation, OpenTransaction,
    SettlementError, SettlementState,
};
use daftar_shared::types::money::{MoneyError, clamp_to_zero, validate_positive};
use daftar_shared::types::{AllocationId, ChequeId, PageRequest, PageResponse, PaymentId};
use rust_decimal::Decimal;

use crate::entities::{
    cheques, ledger_entries, payment_allocations, payments,
    sea_orm_active_enums::{
        ChequeDirection, ChequeKind, ChequeStatus, LedgerEntryKind, PaymentKind, PaymentMethod,
        PaymentStatus,
    },
};

use super::activity::ActivityLogRepository;
use super::journal::{JournalRepository, append_posting};

/// Error types for cheque lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ChequeOpError {
    /// Cheque not found.
    #[error("Cheque not found: {0}")]
    NotFound(Uuid),

    /// The linked ledger entry does not exist.
    #[error("Ledger entry not found: {0}")]
    LedgerEntryNotFound(String),

    /// No payment could be located for a reversal.
    #[error("No payment found to reverse for cheque {0}")]
    PaymentNotFound(Uuid),

    /// State machine rejection.
    #[error(transparent)]
    Cheque(#[from] ChequeError),

    /// Settlement rejection, including the data-integrity fault.
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// Journal posting rejection.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Malformed amount input.
    #[error("Invalid amount: {0}")]
    Amount(#[from] MoneyError),

    /// Database error. Nothing was committed; the command is retryable.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing cheques.
#[derive(Debug, Clone, Default)]
pub struct ChequeFilter {
    /// Filter by status.
    pub status: Option<ChequeStatus>,
    /// Filter by direction.
    pub direction: Option<ChequeDirection>,
    /// Filter by party name.
    pub party_name: Option<String>,
}

/// Cheque repository and lifecycle coordinator.
#[derive(Debug, Clone)]
pub struct ChequeRepository {
    db: DatabaseConnection,
}

impl ChequeRepository {
    /// Creates a new cheque repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Gets a cheque by id.
    ///
    /// # Errors
    ///
    /// Returns `ChequeOpError::NotFound` if no cheque matches.
    pub async fn get_cheque(&self, id: Uuid) -> Result<cheques::Model, ChequeOpError> {
        cheques::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ChequeOpError::NotFound(id))
    }

    /// Lists cheques with optional filters, newest due date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_cheques(
        &self,
        filter: ChequeFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<cheques::Model>, ChequeOpError> {
        let mut query = cheques::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(cheques::Column::Status.eq(status));
        }
        if let Some(direction) = filter.direction {
            query = query.filter(cheques::Column::Direction.eq(direction));
        }
        if let Some(party_name) = filter.party_name {
            query = query.filter(cheques::Column::PartyName.eq(party_name));
        }

        let total = query.clone().count(&self.db).await?;

        let found = query
            .order_by_desc(cheques::Column::DueDate)
            .order_by_desc(cheques::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(found, page.page, page.per_page, total))
    }

    // ========================================================================
    // Submit (create / edit)
    // ========================================================================

    /// Creates a cheque or edits an existing one.
    ///
    /// A requested status differing from the current one dispatches to the
    /// cash or reversal flow inside the same transaction as the field
    /// edits. Amount and linked-transaction edits on a cashed cheque are
    /// rejected; the cheque must be reverted first.
    ///
    /// # Errors
    ///
    /// Returns validation, transition, settlement, or database errors. On
    /// error nothing is persisted.
    pub async fn submit_cheque(
        &self,
        form: ChequeForm,
        existing: Option<Uuid>,
        payment_date: Option<NaiveDate>,
    ) -> Result<Uuid, ChequeOpError> {
        let amount = validate_positive(form.amount)?;
        match existing {
            None => self.create_cheque(form, amount, payment_date).await,
            Some(id) => self.update_cheque(id, form, amount, payment_date).await,
        }
    }

    async fn create_cheque(
        &self,
        form: ChequeForm,
        amount: Decimal,
        payment_date: Option<NaiveDate>,
    ) -> Result<Uuid, ChequeOpError> {
        let requested = form.status;
        if requested != CoreStatus::Pending {
            // New cheques enter the machine at pending; any other submitted
            // status is the pending -> X transition applied atomically with
            // the insert.
            ChequeStateMachine::validate_transition(CoreStatus::Pending, requested)?;
        }
        if requested == CoreStatus::Endorsed {
            // Endorsement carries a holder name and goes through endorse_cheque.
            return Err(ChequeError::HolderNameRequired.into());
        }

        let cheque_id = ChequeId::new().into_inner();
        let now = Utc::now().into();
        let initial_status = match requested {
            CoreStatus::Cashed => ChequeStatus::Pending,
            other => other.into(),
        };

        let txn = self.db.begin().await?;

        let inserted = cheques::ActiveModel {
            id: Set(cheque_id),
            cheque_number: Set(form.cheque_number),
            direction: Set(form.direction.into()),
            kind: Set(ChequeKind::Normal),
            status: Set(initial_status),
            amount: Set(amount),
            party_name: Set(form.party_name),
            bank_name: Set(form.bank_name),
            issue_date: Set(form.issue_date),
            due_date: Set(form.due_date),
            cleared_date: Set(None),
            linked_transaction_ref: Set(form.linked_transaction_ref),
            linked_payment_id: Set(None),
            paid_transaction_refs: Set(None),
            endorsed_to: Set(None),
            endorsed_date: Set(None),
            endorsed_to_outgoing_id: Set(None),
            notes: Set(form.notes),
            image_key: Set(form.image_key),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if requested == CoreStatus::Cashed {
            let date = payment_date.unwrap_or_else(|| Utc::now().date_naive());
            Self::settle_cash(&txn, &inserted, date).await?;
        }

        txn.commit().await?;

        info!(cheque_id = %cheque_id, status = %requested, "cheque submitted");
        self.log_activity(
            "submit_cheque",
            format!(
                "Cheque {} for {} submitted as {requested}",
                inserted.cheque_number, inserted.party_name
            ),
        )
        .await;

        Ok(cheque_id)
    }

    async fn update_cheque(
        &self,
        id: Uuid,
        form: ChequeForm,
        amount: Decimal,
        payment_date: Option<NaiveDate>,
    ) -> Result<Uuid, ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        let current: CoreStatus = (&cheque.status).into();
        let requested = form.status;

        let amount_changed = cheque.amount != amount;
        let linked_changed = cheque.linked_transaction_ref != form.linked_transaction_ref;
        // Cashed cheques are edit-frozen on amount and linked transaction,
        // whether or not a status change rides along in the same request.
        ChequeStateMachine::validate_cashed_edit(current, amount_changed, linked_changed)?;

        if requested == current {
            Self::apply_form_edits(&self.db, &cheque, &form, amount).await?;
            self.log_activity(
                "submit_cheque",
                format!("Cheque {} updated", cheque.cheque_number),
            )
            .await;
            return Ok(id);
        }

        ChequeStateMachine::validate_transition(current, requested)?;

        match (current, requested) {
            (_, CoreStatus::Cashed) => {
                if cheque.linked_payment_id.is_some() {
                    return Err(ChequeError::AlreadyProcessed.into());
                }
                let date = payment_date.unwrap_or_else(|| Utc::now().date_naive());
                let txn = self.db.begin().await?;
                let edited = Self::apply_form_edits(&txn, &cheque, &form, amount).await?;
                Self::settle_cash(&txn, &edited, date).await?;
                txn.commit().await?;

                info!(cheque_id = %id, "cheque cashed via submit");
                self.log_activity(
                    "cash_cheque",
                    format!("Cheque {} cashed for {amount}", edited.cheque_number),
                )
                .await;
                Ok(id)
            }
            (CoreStatus::Cashed, _) => {
                let txn = self.db.begin().await?;
                let payment_uuid = Self::reverse_cash(&txn, &cheque).await?;
                let edited = Self::apply_form_edits(&txn, &cheque, &form, amount).await?;
                let mut active: cheques::ActiveModel = edited.into();
                active.status = Set(requested.into());
                active.cleared_date = Set(None);
                active.linked_payment_id = Set(None);
                active.paid_transaction_refs = Set(None);
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await?;
                txn.commit().await?;

                self.reverse_journal_best_effort(
                    payment_uuid,
                    &format!("cheque {} reverted to {requested}", cheque.cheque_number),
                )
                .await;
                info!(cheque_id = %id, to = %requested, "cashed cheque reverted via submit");
                self.log_activity(
                    "revert_cheque",
                    format!("Cheque {} reverted to {requested}", cheque.cheque_number),
                )
                .await;
                Ok(id)
            }
            (CoreStatus::Endorsed, CoreStatus::Pending) => {
                self.cancel_endorsement(id).await?;
                Ok(id)
            }
            (_, CoreStatus::Endorsed) => Err(ChequeError::HolderNameRequired.into()),
            _ => {
                // pending -> bounced / cancelled, bounced -> pending: a plain
                // status change with no financial side effects.
                let txn = self.db.begin().await?;
                let edited = Self::apply_form_edits(&txn, &cheque, &form, amount).await?;
                let mut active: cheques::ActiveModel = edited.into();
                active.status = Set(requested.into());
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await?;
                txn.commit().await?;

                info!(cheque_id = %id, to = %requested, "cheque status updated");
                self.log_activity(
                    "submit_cheque",
                    format!("Cheque {} marked {requested}", cheque.cheque_number),
                )
                .await;
                Ok(id)
            }
        }
    }

    // ========================================================================
    // Cash
    // ========================================================================

    /// Cashes a cheque in single-link mode.
    ///
    /// One transaction: cheque update (status, cleared date, linked payment
    /// id), payment insert, settlement delta on the linked ledger entry if
    /// present, journal entry.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::AlreadyProcessed` if a payment already exists
    /// for this cheque; transition, settlement, or database errors
    /// otherwise. On error nothing is persisted.
    pub async fn cash_cheque(
        &self,
        id: Uuid,
        payment_date: Option<NaiveDate>,
    ) -> Result<(), ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        if cheque.linked_payment_id.is_some() {
            return Err(ChequeError::AlreadyProcessed.into());
        }
        ChequeStateMachine::validate_transition((&cheque.status).into(), CoreStatus::Cashed)?;

        let date = payment_date.unwrap_or_else(|| Utc::now().date_naive());
        let txn = self.db.begin().await?;
        let payment_id = Self::settle_cash(&txn, &cheque, date).await?;
        txn.commit().await?;

        info!(cheque_id = %id, payment_id = %payment_id, "cheque cashed");
        self.log_activity(
            "cash_cheque",
            format!(
                "Cheque {} cashed for {} ({})",
                cheque.cheque_number, cheque.amount, cheque.party_name
            ),
        )
        .await;
        Ok(())
    }

    /// Cashes a cheque by settling several open transactions at once.
    ///
    /// An empty `allocations` list distributes the cheque amount FIFO
    /// (oldest due date first) over the party's open transactions; manual
    /// figures are clamped to each transaction's remaining balance. The
    /// settled refs are stored on the cheque. Returns the payment id.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::cash_cheque`]. On error nothing is
    /// persisted.
    pub async fn cash_cheque_with_allocation(
        &self,
        id: Uuid,
        allocations: Vec<ManualAllocation>,
        payment_date: Option<NaiveDate>,
    ) -> Result<PaymentId, ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        if cheque.linked_payment_id.is_some() {
            return Err(ChequeError::AlreadyProcessed.into());
        }
        ChequeStateMachine::validate_transition((&cheque.status).into(), CoreStatus::Cashed)?;

        let date = payment_date.unwrap_or_else(|| Utc::now().date_naive());
        let entry_kind = match cheque.direction {
            ChequeDirection::Incoming => LedgerEntryKind::Receivable,
            ChequeDirection::Outgoing => LedgerEntryKind::Payable,
        };

        let txn = self.db.begin().await?;

        // Re-read inside the transaction: the idempotency check and the
        // writes must share one atomic read-modify-write sequence.
        let cheque = cheques::Entity::find_by_id(cheque.id)
            .one(&txn)
            .await?
            .ok_or(ChequeOpError::NotFound(cheque.id))?;
        if cheque.linked_payment_id.is_some() {
            return Err(ChequeError::AlreadyProcessed.into());
        }

        let open = Self::open_transactions_txn(&txn, &cheque.party_name, entry_kind).await?;
        let computed = if allocations.is_empty() {
            AllocationEngine::distribute_fifo(cheque.amount, &open)
        } else {
            AllocationEngine::apply_overrides(&open, &allocations)
        };
        let outcome = AllocationEngine::summarize(cheque.amount, &computed);

        let payment_id = PaymentId::new();
        let now = Utc::now().into();
        let settled_refs: Vec<String> = outcome
            .allocations
            .iter()
            .map(|a| a.transaction_ref.clone())
            .collect();

        let mut active: cheques::ActiveModel = cheque.clone().into();
        active.status = Set(ChequeStatus::Cashed);
        active.cleared_date = Set(Some(date));
        active.linked_payment_id = Set(Some(payment_id.into_inner()));
        active.paid_transaction_refs = Set(Some(serde_json::json!(settled_refs)));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        let kind = match cheque.direction {
            ChequeDirection::Incoming => PaymentKind::Receipt,
            ChequeDirection::Outgoing => PaymentKind::Disbursement,
        };
        payments::ActiveModel {
            id: Set(payment_id.into_inner()),
            kind: Set(kind.clone()),
            method: Set(PaymentMethod::Cheque),
            party_name: Set(cheque.party_name.clone()),
            amount: Set(cheque.amount),
            payment_date: Set(date),
            linked_cheque_id: Set(Some(cheque.id)),
            linked_transaction_ref: Set(None),
            endorsement_cheque_id: Set(None),
            is_endorsement: Set(false),
            no_cash_movement: Set(false),
            journal_posted: Set(true),
            notes: Set(Some(format!(
                "Cheque {} cashed ({} transactions settled)",
                cheque.cheque_number,
                outcome.allocations.len()
            ))),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        for allocation in &outcome.allocations {
            payment_allocations::ActiveModel {
                id: Set(AllocationId::new().into_inner()),
                payment_id: Set(payment_id.into_inner()),
                transaction_ref: Set(allocation.transaction_ref.clone()),
                amount: Set(allocation.amount),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            Self::apply_settlement_delta(&txn, &allocation.transaction_ref, allocation.amount)
                .await?;
        }

        let posting = PostingService::build(&PostingInput {
            payment_id,
            amount: cheque.amount,
            kind: (&kind).into(),
            no_cash_movement: false,
            entry_date: date,
            linked_transaction_ref: None,
            description: format!(
                "Cheque {} cashed for {}",
                cheque.cheque_number, cheque.party_name
            ),
        })?;
        append_posting(&txn, &posting).await?;

        txn.commit().await?;

        if outcome.unallocated > Decimal::ZERO {
            info!(
                cheque_id = %id,
                unallocated = %outcome.unallocated,
                "cheque cashed with unallocated remainder (advance)"
            );
        }
        info!(cheque_id = %id, payment_id = %payment_id, settled = outcome.allocations.len(), "cheque cashed with allocation");
        self.log_activity(
            "cash_cheque",
            format!(
                "Cheque {} cashed; {} transactions settled",
                cheque.cheque_number,
                outcome.allocations.len()
            ),
        )
        .await;

        Ok(payment_id)
    }

    // ========================================================================
    // Bounce / revert
    // ========================================================================

    /// Marks a cheque bounced. For a cashed cheque the prior settlement is
    /// fully reversed in the same transaction first.
    ///
    /// # Errors
    ///
    /// Returns transition, settlement, or database errors. On error nothing
    /// is persisted.
    pub async fn bounce_cheque(&self, id: Uuid) -> Result<(), ChequeOpError> {
        self.transition_with_reversal(id, CoreStatus::Bounced, "bounce_cheque")
            .await
    }

    /// Reverts a cheque to pending, undoing its financial side effects:
    /// full reversal for a cashed cheque, endorsement cancellation for an
    /// endorsed one.
    ///
    /// # Errors
    ///
    /// Returns transition, settlement, or database errors. On error nothing
    /// is persisted.
    pub async fn revert_to_pending(&self, id: Uuid) -> Result<(), ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        if cheque.status == ChequeStatus::Endorsed {
            return self.cancel_endorsement(id).await;
        }
        self.transition_with_reversal(id, CoreStatus::Pending, "revert_cheque")
            .await
    }

    async fn transition_with_reversal(
        &self,
        id: Uuid,
        target: CoreStatus,
        action: &str,
    ) -> Result<(), ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        let current: CoreStatus = (&cheque.status).into();
        ChequeStateMachine::validate_transition(current, target)?;

        let reversed_payment = if ChequeStateMachine::requires_reversal(current, target) {
            let txn = self.db.begin().await?;
            let payment_uuid = Self::reverse_cash(&txn, &cheque).await?;

            let mut active: cheques::ActiveModel = cheque.clone().into();
            active.status = Set(target.into());
            active.cleared_date = Set(None);
            active.linked_payment_id = Set(None);
            active.paid_transaction_refs = Set(None);
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?;
            txn.commit().await?;
            Some(payment_uuid)
        } else {
            let mut active: cheques::ActiveModel = cheque.clone().into();
            active.status = Set(target.into());
            active.updated_at = Set(Utc::now().into());
            active.update(&self.db).await?;
            None
        };

        if let Some(payment_uuid) = reversed_payment {
            // The money-affecting batch is committed; journal reversal is
            // two-phase by design and must not roll it back.
            self.reverse_journal_best_effort(
                payment_uuid,
                &format!("cheque {} marked {target}", cheque.cheque_number),
            )
            .await;
        }

        info!(cheque_id = %id, to = %target, "cheque transitioned");
        self.log_activity(
            action,
            format!("Cheque {} marked {target}", cheque.cheque_number),
        )
        .await;
        Ok(())
    }

    // ========================================================================
    // Endorsement
    // ========================================================================

    /// Endorses a pending incoming cheque to a new holder.
    ///
    /// One transaction creates the endorsed incoming cheque, a synthetic
    /// outgoing cheque for the new holder, and two bookkeeping-only
    /// payments (no cash movement) that settle the client's receivables
    /// and the holder's payables independently. The allocation engine runs
    /// once per side; the sides share only the face amount as an upper
    /// bound.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::EndorsementRequiresIncoming` for outgoing
    /// cheques, transition errors when not pending, or settlement /
    /// database errors. On error nothing is persisted.
    pub async fn endorse_cheque(
        &self,
        id: Uuid,
        new_holder: &str,
        transaction_ref: Option<String>,
    ) -> Result<(), ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        if new_holder.trim().is_empty() {
            return Err(ChequeError::HolderNameRequired.into());
        }
        ChequeStateMachine::validate_endorsement(
            (&cheque.direction).into(),
            (&cheque.status).into(),
        )?;

        let today = Utc::now().date_naive();
        let outgoing_id = ChequeId::new().into_inner();
        let now = Utc::now().into();

        let txn = self.db.begin().await?;

        // Client side: reduce what the client owes.
        let client_allocations: Vec<Allocation> = if let Some(ref tref) = transaction_ref {
            let entry = ledger_entries::Entity::find()
                .filter(ledger_entries::Column::TransactionRef.eq(tref.as_str()))
                .one(&txn)
                .await?
                .ok_or_else(|| ChequeOpError::LedgerEntryNotFound(tref.clone()))?;
            vec![Allocation {
                transaction_ref: tref.clone(),
                amount: cheque.amount.min(clamp_to_zero(entry.remaining_balance)),
            }]
        } else {
            let open =
                Self::open_transactions_txn(&txn, &cheque.party_name, LedgerEntryKind::Receivable)
                    .await?;
            AllocationEngine::distribute_fifo(cheque.amount, &open)
        };
        let client_outcome = AllocationEngine::summarize(cheque.amount, &client_allocations);

        // Holder side: reduce what is owed to the new holder.
        let supplier_open =
            Self::open_transactions_txn(&txn, new_holder, LedgerEntryKind::Payable).await?;
        let supplier_allocations = AllocationEngine::distribute_fifo(cheque.amount, &supplier_open);
        let supplier_outcome = AllocationEngine::summarize(cheque.amount, &supplier_allocations);

        let mut active: cheques::ActiveModel = cheque.clone().into();
        active.status = Set(ChequeStatus::Endorsed);
        active.kind = Set(ChequeKind::Endorsed);
        active.endorsed_to = Set(Some(new_holder.to_string()));
        active.endorsed_date = Set(Some(today));
        active.endorsed_to_outgoing_id = Set(Some(outgoing_id));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        cheques::ActiveModel {
            id: Set(outgoing_id),
            cheque_number: Set(cheque.cheque_number.clone()),
            direction: Set(ChequeDirection::Outgoing),
            kind: Set(ChequeKind::Endorsed),
            status: Set(ChequeStatus::Pending),
            amount: Set(cheque.amount),
            party_name: Set(new_holder.to_string()),
            bank_name: Set(cheque.bank_name.clone()),
            issue_date: Set(cheque.issue_date),
            due_date: Set(cheque.due_date),
            cleared_date: Set(None),
            linked_transaction_ref: Set(None),
            linked_payment_id: Set(None),
            paid_transaction_refs: Set(None),
            endorsed_to: Set(None),
            endorsed_date: Set(None),
            endorsed_to_outgoing_id: Set(None),
            notes: Set(Some(format!(
                "Endorsed from cheque {} ({})",
                cheque.cheque_number, cheque.party_name
            ))),
            image_key: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        Self::insert_endorsement_payment(
            &txn,
            &cheque,
            PaymentKind::Receipt,
            &cheque.party_name,
            cheque.id,
            transaction_ref.clone(),
            &client_outcome.allocations,
            today,
            format!(
                "Cheque {} endorsed to {new_holder}",
                cheque.cheque_number
            ),
        )
        .await?;

        Self::insert_endorsement_payment(
            &txn,
            &cheque,
            PaymentKind::Disbursement,
            new_holder,
            outgoing_id,
            None,
            &supplier_outcome.allocations,
            today,
            format!(
                "Cheque {} received by endorsement from {}",
                cheque.cheque_number, cheque.party_name
            ),
        )
        .await?;

        txn.commit().await?;

        info!(
            cheque_id = %id,
            outgoing_id = %outgoing_id,
            endorsed_to = new_holder,
            "cheque endorsed"
        );
        self.log_activity(
            "endorse_cheque",
            format!(
                "Cheque {} endorsed to {new_holder} for {}",
                cheque.cheque_number, cheque.amount
            ),
        )
        .await;
        Ok(())
    }

    /// Cancels an endorsement, reverting the incoming cheque to pending.
    ///
    /// One transaction deletes the synthetic outgoing cheque and both
    /// bookkeeping payments (matched by the endorsement correlation),
    /// restoring the AR/AP balances they had settled.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::InvalidTransition` unless the cheque is
    /// endorsed; settlement or database errors otherwise. On error nothing
    /// is persisted.
    pub async fn cancel_endorsement(&self, id: Uuid) -> Result<(), ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        if cheque.status != ChequeStatus::Endorsed {
            return Err(ChequeError::InvalidTransition {
                from: (&cheque.status).into(),
                to: CoreStatus::Pending,
            }
            .into());
        }

        let txn = self.db.begin().await?;

        let endorsement_payments = payments::Entity::find()
            .filter(payments::Column::EndorsementChequeId.eq(cheque.id))
            .all(&txn)
            .await?;
        let payment_ids: Vec<Uuid> = endorsement_payments.iter().map(|p| p.id).collect();

        for payment in &endorsement_payments {
            Self::reverse_payment(&txn, payment).await?;
        }

        if let Some(outgoing_id) = cheque.endorsed_to_outgoing_id {
            cheques::Entity::delete_by_id(outgoing_id).exec(&txn).await?;
        }

        let mut active: cheques::ActiveModel = cheque.clone().into();
        active.status = Set(ChequeStatus::Pending);
        active.kind = Set(ChequeKind::Normal);
        active.endorsed_to = Set(None);
        active.endorsed_date = Set(None);
        active.endorsed_to_outgoing_id = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        txn.commit().await?;

        for payment_uuid in payment_ids {
            self.reverse_journal_best_effort(
                payment_uuid,
                &format!("endorsement of cheque {} cancelled", cheque.cheque_number),
            )
            .await;
        }

        info!(cheque_id = %id, "endorsement cancelled");
        self.log_activity(
            "cancel_endorsement",
            format!("Endorsement of cheque {} cancelled", cheque.cheque_number),
        )
        .await;
        Ok(())
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Hard-deletes a pending cheque.
    ///
    /// Cheques with financial side effects must be reverted first. The
    /// transaction also removes any payments referencing the cheque —
    /// directly linked, or (for legacy rows) mentioning its number in
    /// their notes — reversing any balance deltas those payments applied.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::DeletionNotAllowed` for non-pending cheques;
    /// settlement or database errors otherwise. On error nothing is
    /// persisted.
    pub async fn delete_cheque(&self, id: Uuid) -> Result<(), ChequeOpError> {
        let cheque = self.get_cheque(id).await?;
        ChequeStateMachine::validate_deletion((&cheque.status).into())?;

        let txn = self.db.begin().await?;

        let mut condition =
            Condition::any().add(payments::Column::LinkedChequeId.eq(cheque.id));
        if !cheque.cheque_number.trim().is_empty() {
            condition =
                condition.add(payments::Column::Notes.contains(cheque.cheque_number.as_str()));
        }
        let linked_payments = payments::Entity::find().filter(condition).all(&txn).await?;
        let payment_ids: Vec<Uuid> = linked_payments.iter().map(|p| p.id).collect();

        for payment in &linked_payments {
            Self::reverse_payment(&txn, payment).await?;
        }

        cheques::Entity::delete_by_id(cheque.id).exec(&txn).await?;
        txn.commit().await?;

        for payment_uuid in payment_ids {
            self.reverse_journal_best_effort(
                payment_uuid,
                &format!("cheque {} deleted", cheque.cheque_number),
            )
            .await;
        }

        info!(cheque_id = %id, "cheque deleted");
        self.log_activity(
            "delete_cheque",
            format!("Cheque {} deleted", cheque.cheque_number),
        )
        .await;
        Ok(())
    }

    // ========================================================================
    // Transaction building blocks
    // ========================================================================

    /// Applies the settlement side of a cashing inside `txn`: cheque
    /// update, payment insert, single-link balance delta, journal entry.
    async fn settle_cash(
        txn: &DatabaseTransaction,
        cheque: &cheques::Model,
        payment_date: NaiveDate,
    ) -> Result<PaymentId, ChequeOpError> {
        // Re-read inside the transaction: the idempotency check and the
        // writes must share one atomic read-modify-write sequence.
        let cheque = cheques::Entity::find_by_id(cheque.id)
            .one(txn)
            .await?
            .ok_or(ChequeOpError::NotFound(cheque.id))?;
        if cheque.linked_payment_id.is_some() {
            return Err(ChequeError::AlreadyProcessed.into());
        }

        let payment_id = PaymentId::new();
        let now = Utc::now().into();

        let mut active: cheques::ActiveModel = cheque.clone().into();
        active.status = Set(ChequeStatus::Cashed);
        active.cleared_date = Set(Some(payment_date));
        active.linked_payment_id = Set(Some(payment_id.into_inner()));
        active.updated_at = Set(now);
        active.update(txn).await?;

        let kind = match cheque.direction {
            ChequeDirection::Incoming => PaymentKind::Receipt,
            ChequeDirection::Outgoing => PaymentKind::Disbursement,
        };
        payments::ActiveModel {
            id: Set(payment_id.into_inner()),
            kind: Set(kind.clone()),
            method: Set(PaymentMethod::Cheque),
            party_name: Set(cheque.party_name.clone()),
            amount: Set(cheque.amount),
            payment_date: Set(payment_date),
            linked_cheque_id: Set(Some(cheque.id)),
            linked_transaction_ref: Set(cheque.linked_transaction_ref.clone()),
            endorsement_cheque_id: Set(None),
            is_endorsement: Set(false),
            no_cash_movement: Set(false),
            journal_posted: Set(true),
            notes: Set(Some(format!("Cheque {} cashed", cheque.cheque_number))),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        if let Some(ref transaction_ref) = cheque.linked_transaction_ref {
            Self::apply_settlement_delta(txn, transaction_ref, cheque.amount).await?;
        }

        let posting = PostingService::build(&PostingInput {
            payment_id,
            amount: cheque.amount,
            kind: (&kind).into(),
            no_cash_movement: false,
            entry_date: payment_date,
            linked_transaction_ref: cheque.linked_transaction_ref.clone(),
            description: format!(
                "Cheque {} cashed for {}",
                cheque.cheque_number, cheque.party_name
            ),
        })?;
        append_posting(txn, &posting).await?;

        Ok(payment_id)
    }

    /// Locates and reverses the payment behind a cashed cheque.
    ///
    /// Lookup order: the stored `linked_payment_id`, the payment's
    /// `linked_cheque_id` back-reference, then the legacy fallback of
    /// matching settled ref, method, and amount.
    async fn reverse_cash(
        txn: &DatabaseTransaction,
        cheque: &cheques::Model,
    ) -> Result<Uuid, ChequeOpError> {
        let mut payment = match cheque.linked_payment_id {
            Some(payment_uuid) => payments::Entity::find_by_id(payment_uuid).one(txn).await?,
            None => None,
        };

        if payment.is_none() {
            payment = payments::Entity::find()
                .filter(payments::Column::LinkedChequeId.eq(cheque.id))
                .one(txn)
                .await?;
        }

        if payment.is_none() {
            if let Some(ref transaction_ref) = cheque.linked_transaction_ref {
                payment = payments::Entity::find()
                    .filter(payments::Column::LinkedTransactionRef.eq(transaction_ref.as_str()))
                    .filter(payments::Column::Method.eq(PaymentMethod::Cheque))
                    .filter(payments::Column::Amount.eq(cheque.amount))
                    .one(txn)
                    .await?;
            }
        }

        let payment = payment.ok_or(ChequeOpError::PaymentNotFound(cheque.id))?;
        Self::reverse_payment(txn, &payment).await?;
        Ok(payment.id)
    }

    /// Negates a payment's balance effects and deletes it with its
    /// allocation sub-records.
    async fn reverse_payment(
        txn: &DatabaseTransaction,
        payment: &payments::Model,
    ) -> Result<(), ChequeOpError> {
        let allocations = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::PaymentId.eq(payment.id))
            .all(txn)
            .await?;

        if allocations.is_empty() {
            if let Some(ref transaction_ref) = payment.linked_transaction_ref {
                Self::apply_settlement_delta(txn, transaction_ref, -payment.amount).await?;
            }
        } else {
            for allocation in &allocations {
                Self::apply_settlement_delta(txn, &allocation.transaction_ref, -allocation.amount)
                    .await?;
            }
            payment_allocations::Entity::delete_many()
                .filter(payment_allocations::Column::PaymentId.eq(payment.id))
                .exec(txn)
                .await?;
        }

        payments::Entity::delete_by_id(payment.id).exec(txn).await?;
        Ok(())
    }

    /// Applies a signed settlement delta to the ledger entry with the
    /// given business reference.
    async fn apply_settlement_delta(
        txn: &DatabaseTransaction,
        transaction_ref: &str,
        delta: Decimal,
    ) -> Result<(), ChequeOpError> {
        let entry = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::TransactionRef.eq(transaction_ref))
            .one(txn)
            .await?
            .ok_or_else(|| ChequeOpError::LedgerEntryNotFound(transaction_ref.to_string()))?;

        let update = BalanceUpdater::apply_delta(
            &SettlementState {
                amount: entry.amount,
                total_paid: entry.total_paid,
            },
            delta,
        )
        .inspect_err(|e| {
            if e.is_integrity_fault() {
                error!(
                    transaction_ref,
                    delta = %delta,
                    "data-integrity fault during settlement; aborting transaction"
                );
            }
        })?;

        let mut active: ledger_entries::ActiveModel = entry.into();
        active.total_paid = Set(update.total_paid);
        active.remaining_balance = Set(update.remaining_balance);
        active.payment_status = Set(update.payment_status.into());
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;
        Ok(())
    }

    /// Inserts one bookkeeping-only endorsement payment with its
    /// allocations, balance deltas, and clearing-account journal entry.
    #[allow(clippy::too_many_arguments)]
    async fn insert_endorsement_payment(
        txn: &DatabaseTransaction,
        cheque: &cheques::Model,
        kind: PaymentKind,
        party_name: &str,
        linked_cheque_id: Uuid,
        linked_transaction_ref: Option<String>,
        allocations: &[Allocation],
        payment_date: NaiveDate,
        description: String,
    ) -> Result<PaymentId, ChequeOpError> {
        let payment_id = PaymentId::new();
        let now = Utc::now().into();

        payments::ActiveModel {
            id: Set(payment_id.into_inner()),
            kind: Set(kind.clone()),
            method: Set(PaymentMethod::Cheque),
            party_name: Set(party_name.to_string()),
            amount: Set(cheque.amount),
            payment_date: Set(payment_date),
            linked_cheque_id: Set(Some(linked_cheque_id)),
            linked_transaction_ref: Set(linked_transaction_ref.clone()),
            endorsement_cheque_id: Set(Some(cheque.id)),
            is_endorsement: Set(true),
            no_cash_movement: Set(true),
            journal_posted: Set(true),
            notes: Set(Some(description.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        for allocation in allocations {
            if allocation.amount <= Decimal::ZERO {
                continue;
            }
            payment_allocations::ActiveModel {
                id: Set(AllocationId::new().into_inner()),
                payment_id: Set(payment_id.into_inner()),
                transaction_ref: Set(allocation.transaction_ref.clone()),
                amount: Set(allocation.amount),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;
            Self::apply_settlement_delta(txn, &allocation.transaction_ref, allocation.amount)
                .await?;
        }

        let posting = PostingService::build(&PostingInput {
            payment_id,
            amount: cheque.amount,
            kind: (&kind).into(),
            no_cash_movement: true,
            entry_date: payment_date,
            linked_transaction_ref,
            description,
        })?;
        append_posting(txn, &posting).await?;

        Ok(payment_id)
    }

    /// Applies descriptive field edits from a submit form.
    async fn apply_form_edits<C: ConnectionTrait>(
        conn: &C,
        cheque: &cheques::Model,
        form: &ChequeForm,
        amount: Decimal,
    ) -> Result<cheques::Model, DbErr> {
        let mut active: cheques::ActiveModel = cheque.clone().into();
        active.cheque_number = Set(form.cheque_number.clone());
        active.party_name = Set(form.party_name.clone());
        active.bank_name = Set(form.bank_name.clone());
        active.issue_date = Set(form.issue_date);
        active.due_date = Set(form.due_date);
        active.amount = Set(amount);
        active.linked_transaction_ref = Set(form.linked_transaction_ref.clone());
        active.notes = Set(form.notes.clone());
        active.image_key = Set(form.image_key.clone());
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await
    }

    /// Reads a party's open transactions inside a transaction, oldest due
    /// date first.
    async fn open_transactions_txn(
        txn: &DatabaseTransaction,
        party_name: &str,
        entry_kind: LedgerEntryKind,
    ) -> Result<Vec<OpenTransaction>, DbErr> {
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::PartyName.eq(party_name))
            .filter(ledger_entries::Column::EntryKind.eq(entry_kind))
            .filter(ledger_entries::Column::PaymentStatus.ne(PaymentStatus::Paid))
            .order_by_asc(ledger_entries::Column::DueDate)
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .all(txn)
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

    // ========================================================================
    // Post-commit best-effort steps
    // ========================================================================

    /// Reverses a payment's journal entries after the main batch committed.
    /// Failures are logged for reconciliation, never propagated.
    async fn reverse_journal_best_effort(&self, payment_id: Uuid, reason: &str) {
        let journal = JournalRepository::new(self.db.clone());
        if let Err(e) = journal.reverse_for_payment(payment_id, reason).await {
            error!(
                error = %e,
                payment_id = %payment_id,
                "journal reversal failed after commit; journal requires manual reconciliation"
            );
        }
    }

    /// Records an activity entry. Failures are logged and swallowed.
    async fn log_activity(&self, action: &str, description: String) {
        let activity = ActivityLogRepository::new(self.db.clone());
        if let Err(e) = activity.record(action, description).await {
            warn!(error = %e, action, "failed to record activity entry");
        }
    }
}
