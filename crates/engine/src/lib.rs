//! `tradebook-engine` — services and the persistence seam.
//!
//! The domain crates are pure; this crate drives them through an injected
//! transaction boundary ([`store::Store`]):
//!
//! - [`ledger::LedgerService`] — chart of accounts + journal posting.
//! - [`inventory::InventoryService`] — stock movements over the catalog.
//! - [`commerce::CommerceService`] — the order/inventory coordinator that
//!   ties lifecycle transitions to ledger postings and stock effects.
//!
//! Every operation commits or fails as one unit; no caller ever observes a
//! half-applied journal entry or a transitioned order without its audit row.

pub mod commerce;
pub mod inventory;
pub mod ledger;
pub mod store;

pub use commerce::{CommerceConfig, CommerceError, CommerceService, OrderLine};
pub use inventory::InventoryService;
pub use ledger::{LedgerService, TrialBalance, TrialBalanceRow};
pub use store::{InMemoryStore, Store, StoreState};
