//! Initial database migration.
//!
//! Creates the cheque ledger tables: cheques, payments, payment
//! allocations, outstanding-balance ledger entries, the append-only
//! journal, and the activity log. Written against the portable schema
//! builder so the same migration runs on Postgres and on the SQLite
//! database used by the integration tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cheques::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cheques::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cheques::ChequeNumber).string_len(64).not_null())
                    .col(ColumnDef::new(Cheques::Direction).string_len(16).not_null())
                    .col(ColumnDef::new(Cheques::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Cheques::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Cheques::Amount).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(Cheques::PartyName).string_len(255).not_null())
                    .col(ColumnDef::new(Cheques::BankName).string_len(255))
                    .col(ColumnDef::new(Cheques::IssueDate).date().not_null())
                    .col(ColumnDef::new(Cheques::DueDate).date().not_null())
                    .col(ColumnDef::new(Cheques::ClearedDate).date())
                    .col(ColumnDef::new(Cheques::LinkedTransactionRef).string_len(64))
                    .col(ColumnDef::new(Cheques::LinkedPaymentId).uuid())
                    .col(ColumnDef::new(Cheques::PaidTransactionRefs).json())
                    .col(ColumnDef::new(Cheques::EndorsedTo).string_len(255))
                    .col(ColumnDef::new(Cheques::EndorsedDate).date())
                    .col(ColumnDef::new(Cheques::EndorsedToOutgoingId).uuid())
                    .col(ColumnDef::new(Cheques::Notes).text())
                    .col(ColumnDef::new(Cheques::ImageKey).string_len(512))
                    .col(
                        ColumnDef::new(Cheques::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cheques::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cheques-status")
                    .table(Cheques::Table)
                    .col(Cheques::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cheques-party-name")
                    .table(Cheques::Table)
                    .col(Cheques::PartyName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Payments::Method).string_len(16).not_null())
                    .col(ColumnDef::new(Payments::PartyName).string_len(255).not_null())
                    .col(ColumnDef::new(Payments::Amount).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(Payments::PaymentDate).date().not_null())
                    .col(ColumnDef::new(Payments::LinkedChequeId).uuid())
                    .col(ColumnDef::new(Payments::LinkedTransactionRef).string_len(64))
                    .col(ColumnDef::new(Payments::EndorsementChequeId).uuid())
                    .col(
                        ColumnDef::new(Payments::IsEndorsement)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Payments::NoCashMovement)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Payments::JournalPosted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Payments::Notes).text())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-linked-cheque-id")
                    .table(Payments::Table)
                    .col(Payments::LinkedChequeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-endorsement-cheque-id")
                    .table(Payments::Table)
                    .col(Payments::EndorsementChequeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentAllocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentAllocations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentAllocations::PaymentId).uuid().not_null())
                    .col(
                        ColumnDef::new(PaymentAllocations::TransactionRef)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentAllocations::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentAllocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment-allocations-payment-id")
                            .from(PaymentAllocations::Table, PaymentAllocations::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment-allocations-payment-id")
                    .table(PaymentAllocations::Table)
                    .col(PaymentAllocations::PaymentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::TransactionRef)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::PartyName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::EntryKind).string_len(16).not_null())
                    .col(ColumnDef::new(LedgerEntries::Description).text())
                    .col(
                        ColumnDef::new(LedgerEntries::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::TotalPaid)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::RemainingBalance)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::PaymentStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger-entries-party")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::PartyName)
                    .col(LedgerEntries::EntryKind)
                    .col(LedgerEntries::PaymentStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Soft reference: the payment may be deleted by a later
                    // reversal while its journal history remains.
                    .col(ColumnDef::new(JournalEntries::PaymentId).uuid())
                    .col(
                        ColumnDef::new(JournalEntries::DebitAccount)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::CreditAccount)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::LinkedTransactionRef).string_len(64))
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::ReversalOf).uuid())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journal-entries-payment-id")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::PaymentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLog::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLog::Action).string_len(64).not_null())
                    .col(ColumnDef::new(ActivityLog::Description).text().not_null())
                    .col(
                        ColumnDef::new(ActivityLog::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentAllocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cheques::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Cheques {
    Table,
    Id,
    ChequeNumber,
    Direction,
    Kind,
    Status,
    Amount,
    PartyName,
    BankName,
    IssueDate,
    DueDate,
    ClearedDate,
    LinkedTransactionRef,
    LinkedPaymentId,
    PaidTransactionRefs,
    EndorsedTo,
    EndorsedDate,
    EndorsedToOutgoingId,
    Notes,
    ImageKey,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    Kind,
    Method,
    PartyName,
    Amount,
    PaymentDate,
    LinkedChequeId,
    LinkedTransactionRef,
    EndorsementChequeId,
    IsEndorsement,
    NoCashMovement,
    JournalPosted,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentAllocations {
    Table,
    Id,
    PaymentId,
    TransactionRef,
    Amount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LedgerEntries {
    Table,
    Id,
    TransactionRef,
    PartyName,
    EntryKind,
    Description,
    Amount,
    TotalPaid,
    RemainingBalance,
    PaymentStatus,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    PaymentId,
    DebitAccount,
    CreditAccount,
    Amount,
    EntryDate,
    LinkedTransactionRef,
    Description,
    ReversalOf,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ActivityLog {
    Table,
    Id,
    Action,
    Description,
    RecordedAt,
}
