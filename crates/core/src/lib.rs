//! `tradebook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod error;
pub mod id;
pub mod money;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::StoreError;
pub use id::{AccountId, CustomerId, JournalEntryId, MovementId, OrderId, ProductId, UserId};
pub use money::Money;
