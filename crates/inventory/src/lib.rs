//! Inventory domain module (products + stock movement ledger).
//!
//! This crate contains business rules for stock, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). The movement
//! log is the inventory analogue of the accounting journal: replaying all
//! movements for a product reproduces its current stock quantity.

pub mod error;
pub mod movement;
pub mod product;

pub use error::StockError;
pub use movement::{MovementType, StockMovement, replay_stock};
pub use product::{Product, ProductKind};
