//! Immutable journal postings.
//!
//! Every payment or disbursement event appends a double-entry journal
//! record. Posted entries are never edited or deleted: undoing an event
//! posts an offsetting entry with the legs swapped and a reference to the
//! original.
//!
//! # Modules
//!
//! - `types` - Journal accounts, posting kinds, leg pairs
//! - `error` - Journal-specific error types
//! - `posting` - Posting construction and reversal-by-posting

pub mod error;
pub mod posting;
pub mod types;

pub use error::JournalError;
pub use posting::PostingService;
pub use types::{JournalAccount, JournalLegs, JournalPosting, PostedEntry, PostingInput, PostingKind};
