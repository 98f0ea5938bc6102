//! Accounting module (chart of accounts + double-entry journal).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns. The
//! engine crate drives these types through its transaction boundary.

pub mod account;
pub mod error;
pub mod journal;

pub use account::{Account, AccountType};
pub use error::LedgerError;
pub use journal::{
    EntryTotals, JournalEntry, Posting, Side, SourceRef, validate_postings,
};
