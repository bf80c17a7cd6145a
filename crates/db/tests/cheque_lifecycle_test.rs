//! Integration tests for the cheque lifecycle coordinator.
//!
//! These tests run the real migrations against an in-memory SQLite
//! database and drive the orchestrator end-to-end: cashing, reversal,
//! idempotency, atomicity, and the deletion guard.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use daftar_core::cheque::types::{ChequeDirection, ChequeStatus};
use daftar_core::cheque::{ChequeError, ChequeForm};
use daftar_db::entities::sea_orm_active_enums as db_enums;
use daftar_db::entities::{journal_entries, payments};
use daftar_db::migration::{Migrator, MigratorTrait};
use daftar_db::repositories::cheque::ChequeOpError;
use daftar_db::repositories::{ChequeRepository, CreateLedgerEntryInput, LedgerEntryRepository};

async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn form(
    number: &str,
    direction: ChequeDirection,
    amount: Decimal,
    party: &str,
    linked: Option<&str>,
) -> ChequeForm {
    ChequeForm {
        cheque_number: number.to_string(),
        direction,
        amount,
        party_name: party.to_string(),
        bank_name: Some("First National".to_string()),
        issue_date: date(2026, 3, 1),
        due_date: date(2026, 4, 1),
        status: ChequeStatus::Pending,
        linked_transaction_ref: linked.map(str::to_string),
        notes: None,
        image_key: None,
    }
}

async fn seed_receivable(
    db: &DatabaseConnection,
    transaction_ref: &str,
    party: &str,
    amount: Decimal,
    due_day: u32,
) {
    LedgerEntryRepository::new(db.clone())
        .create_entry(CreateLedgerEntryInput {
            transaction_ref: transaction_ref.to_string(),
            party_name: party.to_string(),
            entry_kind: db_enums::LedgerEntryKind::Receivable,
            description: Some(format!("Invoice {transaction_ref}")),
            amount,
            due_date: date(2026, 3, due_day),
        })
        .await
        .expect("seed ledger entry");
}

#[tokio::test]
async fn test_cash_and_reverse_round_trip() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());
    let ledger = LedgerEntryRepository::new(db.clone());

    seed_receivable(&db, "INV-1", "Globex", dec!(100), 5).await;
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1001", ChequeDirection::Incoming, dec!(100), "Globex", Some("INV-1")),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    cheques_repo
        .cash_cheque(cheque_id, Some(date(2026, 4, 2)))
        .await
        .expect("cash cheque");

    let cashed = cheques_repo.get_cheque(cheque_id).await.expect("get cheque");
    assert_eq!(cashed.status, db_enums::ChequeStatus::Cashed);
    assert_eq!(cashed.cleared_date, Some(date(2026, 4, 2)));
    assert!(cashed.linked_payment_id.is_some());

    let entry = ledger.get_by_ref("INV-1").await.expect("get entry");
    assert_eq!(entry.total_paid, dec!(100));
    assert_eq!(entry.remaining_balance, dec!(0));
    assert_eq!(entry.payment_status, db_enums::PaymentStatus::Paid);

    cheques_repo
        .revert_to_pending(cheque_id)
        .await
        .expect("revert cheque");

    // The cheque and the ledger entry are back to their exact pre-cash state.
    let reverted = cheques_repo.get_cheque(cheque_id).await.expect("get cheque");
    assert_eq!(reverted.status, db_enums::ChequeStatus::Pending);
    assert_eq!(reverted.cleared_date, None);
    assert_eq!(reverted.linked_payment_id, None);

    let entry = ledger.get_by_ref("INV-1").await.expect("get entry");
    assert_eq!(entry.total_paid, dec!(0));
    assert_eq!(entry.remaining_balance, dec!(100));
    assert_eq!(entry.payment_status, db_enums::PaymentStatus::Unpaid);

    let remaining_payments = payments::Entity::find().all(&db).await.expect("payments");
    assert!(remaining_payments.is_empty());
}

#[tokio::test]
async fn test_journal_reversal_by_posting() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    seed_receivable(&db, "INV-1", "Globex", dec!(80), 5).await;
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1002", ChequeDirection::Incoming, dec!(80), "Globex", Some("INV-1")),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    cheques_repo.cash_cheque(cheque_id, None).await.expect("cash");

    let entries = journal_entries::Entity::find().all(&db).await.expect("journal");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].debit_account, db_enums::JournalAccount::Cash);
    assert_eq!(
        entries[0].credit_account,
        db_enums::JournalAccount::AccountsReceivable
    );
    assert_eq!(entries[0].amount, dec!(80));

    cheques_repo.revert_to_pending(cheque_id).await.expect("revert");

    // The original entry is untouched; a second entry offsets it.
    let entries = journal_entries::Entity::find().all(&db).await.expect("journal");
    assert_eq!(entries.len(), 2);
    let original = entries.iter().find(|e| e.reversal_of.is_none()).unwrap();
    let reversal = entries.iter().find(|e| e.reversal_of.is_some()).unwrap();
    assert_eq!(reversal.reversal_of, Some(original.id));
    assert_eq!(reversal.amount, original.amount);
    assert_eq!(reversal.debit_account, original.credit_account);
    assert_eq!(reversal.credit_account, original.debit_account);
    assert!(reversal.description.starts_with("Reversal: "));
}

#[tokio::test]
async fn test_double_cash_is_rejected() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    seed_receivable(&db, "INV-1", "Globex", dec!(50), 5).await;
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1003", ChequeDirection::Incoming, dec!(50), "Globex", Some("INV-1")),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    cheques_repo.cash_cheque(cheque_id, None).await.expect("first cash");

    let second = cheques_repo.cash_cheque(cheque_id, None).await;
    assert!(matches!(
        second,
        Err(ChequeOpError::Cheque(ChequeError::AlreadyProcessed))
    ));

    // Exactly one payment exists.
    let all_payments = payments::Entity::find().all(&db).await.expect("payments");
    assert_eq!(all_payments.len(), 1);
}

#[tokio::test]
async fn test_atomicity_failing_settlement_rolls_back() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    // The linked ledger entry does not exist, so the settlement step fails
    // mid-transaction after the cheque update and payment insert.
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1004", ChequeDirection::Incoming, dec!(75), "Globex", Some("MISSING")),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    let result = cheques_repo.cash_cheque(cheque_id, None).await;
    assert!(matches!(
        result,
        Err(ChequeOpError::LedgerEntryNotFound(ref r)) if r == "MISSING"
    ));

    // Nothing was persisted: no status change, no payment, no journal entry.
    let cheque = cheques_repo.get_cheque(cheque_id).await.expect("get cheque");
    assert_eq!(cheque.status, db_enums::ChequeStatus::Pending);
    assert_eq!(cheque.linked_payment_id, None);
    assert!(payments::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(journal_entries::Entity::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected_without_writes() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    let cheque_id = cheques_repo
        .submit_cheque(
            form("1005", ChequeDirection::Incoming, dec!(20), "Globex", None),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    cheques_repo.bounce_cheque(cheque_id).await.expect("bounce");

    // Same-state transition is a rejected no-op.
    let again = cheques_repo.bounce_cheque(cheque_id).await;
    assert!(matches!(
        again,
        Err(ChequeOpError::Cheque(ChequeError::InvalidTransition {
            from: ChequeStatus::Bounced,
            to: ChequeStatus::Bounced,
        }))
    ));

    // Cancelled is terminal.
    let mut cancel = form("1005", ChequeDirection::Incoming, dec!(20), "Globex", None);
    cancel.status = ChequeStatus::Cancelled;
    let unreachable = cheques_repo.submit_cheque(cancel, Some(cheque_id), None).await;
    assert!(matches!(
        unreachable,
        Err(ChequeOpError::Cheque(ChequeError::InvalidTransition { .. }))
    ));
}

#[tokio::test]
async fn test_cash_without_linked_entry_moves_no_balance() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    let cheque_id = cheques_repo
        .submit_cheque(
            form("1006", ChequeDirection::Outgoing, dec!(40), "Initech", None),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    cheques_repo.cash_cheque(cheque_id, None).await.expect("cash");

    let all_payments = payments::Entity::find().all(&db).await.expect("payments");
    assert_eq!(all_payments.len(), 1);
    assert_eq!(all_payments[0].kind, db_enums::PaymentKind::Disbursement);
    assert_eq!(all_payments[0].linked_transaction_ref, None);

    // An outgoing cash journal entry: debit AP, credit cash.
    let entries = journal_entries::Entity::find().all(&db).await.expect("journal");
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].debit_account,
        db_enums::JournalAccount::AccountsPayable
    );
    assert_eq!(entries[0].credit_account, db_enums::JournalAccount::Cash);
}

#[tokio::test]
async fn test_bounce_cashed_cheque_restores_ledger() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());
    let ledger = LedgerEntryRepository::new(db.clone());

    seed_receivable(&db, "INV-9", "Globex", dec!(60), 5).await;
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1007", ChequeDirection::Incoming, dec!(60), "Globex", Some("INV-9")),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    cheques_repo.cash_cheque(cheque_id, None).await.expect("cash");
    cheques_repo.bounce_cheque(cheque_id).await.expect("bounce");

    let cheque = cheques_repo.get_cheque(cheque_id).await.expect("get cheque");
    assert_eq!(cheque.status, db_enums::ChequeStatus::Bounced);
    assert_eq!(cheque.linked_payment_id, None);

    let entry = ledger.get_by_ref("INV-9").await.expect("entry");
    assert_eq!(entry.total_paid, dec!(0));
    assert_eq!(entry.payment_status, db_enums::PaymentStatus::Unpaid);
}

#[tokio::test]
async fn test_deletion_guard() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    seed_receivable(&db, "INV-1", "Globex", dec!(30), 5).await;
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1008", ChequeDirection::Incoming, dec!(30), "Globex", Some("INV-1")),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    cheques_repo.cash_cheque(cheque_id, None).await.expect("cash");

    let denied = cheques_repo.delete_cheque(cheque_id).await;
    assert!(matches!(
        denied,
        Err(ChequeOpError::Cheque(ChequeError::DeletionNotAllowed(
            ChequeStatus::Cashed
        )))
    ));
    assert!(cheques_repo.get_cheque(cheque_id).await.is_ok());

    // Revert first, then deletion is allowed.
    cheques_repo.revert_to_pending(cheque_id).await.expect("revert");
    cheques_repo.delete_cheque(cheque_id).await.expect("delete");
    assert!(matches!(
        cheques_repo.get_cheque(cheque_id).await,
        Err(ChequeOpError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_removes_notes_referenced_payments() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    let cheque_id = cheques_repo
        .submit_cheque(
            form("7777", ChequeDirection::Incoming, dec!(25), "Globex", None),
            None,
            None,
        )
        .await
        .expect("submit cheque");

    // A legacy payment with no direct link, correlated only through notes.
    let now = chrono::Utc::now().into();
    payments::ActiveModel {
        id: Set(Uuid::now_v7()),
        kind: Set(db_enums::PaymentKind::Receipt),
        method: Set(db_enums::PaymentMethod::Cheque),
        party_name: Set("Globex".to_string()),
        amount: Set(dec!(25)),
        payment_date: Set(date(2026, 3, 20)),
        linked_cheque_id: Set(None),
        linked_transaction_ref: Set(None),
        endorsement_cheque_id: Set(None),
        is_endorsement: Set(false),
        no_cash_movement: Set(false),
        journal_posted: Set(false),
        notes: Set(Some("Received cheque 7777 from Globex".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .expect("insert legacy payment");

    cheques_repo.delete_cheque(cheque_id).await.expect("delete");

    let leftovers = payments::Entity::find()
        .filter(payments::Column::PartyName.eq("Globex"))
        .all(&db)
        .await
        .expect("payments");
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_cashed_cheque_amount_is_frozen() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    seed_receivable(&db, "INV-1", "Globex", dec!(90), 5).await;
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1009", ChequeDirection::Incoming, dec!(90), "Globex", Some("INV-1")),
            None,
            None,
        )
        .await
        .expect("submit cheque");
    cheques_repo.cash_cheque(cheque_id, None).await.expect("cash");

    // Editing the amount of a cashed cheque is frozen.
    let mut edited = form("1009", ChequeDirection::Incoming, dec!(95), "Globex", Some("INV-1"));
    edited.status = ChequeStatus::Cashed;
    let result = cheques_repo.submit_cheque(edited, Some(cheque_id), None).await;
    assert!(matches!(
        result,
        Err(ChequeOpError::Cheque(ChequeError::EditFrozen { field: "amount" }))
    ));

    // So is re-linking it, even when a revert rides along in the request.
    let mut relinked = form("1009", ChequeDirection::Incoming, dec!(90), "Globex", Some("INV-2"));
    relinked.status = ChequeStatus::Pending;
    let result = cheques_repo.submit_cheque(relinked, Some(cheque_id), None).await;
    assert!(matches!(
        result,
        Err(ChequeOpError::Cheque(ChequeError::EditFrozen { .. }))
    ));

    // Descriptive edits stay open.
    let mut notes_only = form("1009", ChequeDirection::Incoming, dec!(90), "Globex", Some("INV-1"));
    notes_only.status = ChequeStatus::Cashed;
    notes_only.notes = Some("post-dated".to_string());
    cheques_repo
        .submit_cheque(notes_only, Some(cheque_id), None)
        .await
        .expect("descriptive edit");
}

#[tokio::test]
async fn test_submit_as_cashed_is_one_atomic_operation() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());
    let ledger = LedgerEntryRepository::new(db.clone());

    seed_receivable(&db, "INV-1", "Globex", dec!(45), 5).await;
    let mut cashed_form = form("1010", ChequeDirection::Incoming, dec!(45), "Globex", Some("INV-1"));
    cashed_form.status = ChequeStatus::Cashed;

    let cheque_id = cheques_repo
        .submit_cheque(cashed_form, None, Some(date(2026, 4, 3)))
        .await
        .expect("submit cashed cheque");

    let cheque = cheques_repo.get_cheque(cheque_id).await.expect("get cheque");
    assert_eq!(cheque.status, db_enums::ChequeStatus::Cashed);
    assert_eq!(cheque.cleared_date, Some(date(2026, 4, 3)));

    let entry = ledger.get_by_ref("INV-1").await.expect("entry");
    assert_eq!(entry.payment_status, db_enums::PaymentStatus::Paid);
    assert_eq!(payments::Entity::find().all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_settlement_status() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());
    let ledger = LedgerEntryRepository::new(db.clone());

    // A cheque smaller than the invoice leaves it partially paid.
    seed_receivable(&db, "INV-1", "Globex", dec!(100), 5).await;
    let cheque_id = cheques_repo
        .submit_cheque(
            form("1011", ChequeDirection::Incoming, dec!(40), "Globex", Some("INV-1")),
            None,
            None,
        )
        .await
        .expect("submit cheque");
    cheques_repo.cash_cheque(cheque_id, None).await.expect("cash");

    let entry = ledger.get_by_ref("INV-1").await.expect("entry");
    assert_eq!(entry.total_paid, dec!(40));
    assert_eq!(entry.remaining_balance, dec!(60));
    assert_eq!(entry.payment_status, db_enums::PaymentStatus::Partial);
}

#[tokio::test]
async fn test_cash_unknown_cheque_not_found() {
    let db = setup_db().await;
    let cheques_repo = ChequeRepository::new(db.clone());

    let missing = Uuid::now_v7();
    assert!(matches!(
        cheques_repo.cash_cheque(missing, None).await,
        Err(ChequeOpError::NotFound(id)) if id == missing
    ));
}
