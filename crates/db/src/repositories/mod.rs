//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. The cheque repository doubles as the atomic lifecycle
//! coordinator; the others are the query/read surface around it.

pub mod activity;
pub mod cheque;
pub mod journal;
pub mod ledger_entry;
pub mod payment;

pub use activity::ActivityLogRepository;
pub use cheque::{ChequeFilter, ChequeOpError, ChequeRepository};
pub use journal::{JournalOpError, JournalRepository};
pub use ledger_entry::{CreateLedgerEntryInput, LedgerEntryError, LedgerEntryRepository};
pub use payment::{PaymentError, PaymentRepository};
