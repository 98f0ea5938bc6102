//! Orders domain module (order lifecycle state machine + order entity).
//!
//! This crate contains business rules for orders, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Side effects of
//! lifecycle changes (ledger postings, stock restoration) belong to the
//! engine's coordinator, not to the state machine.

pub mod error;
pub mod order;
pub mod status;

pub use error::OrderError;
pub use order::{Order, OrderItem, OrderSource, OrderStateTransition, PricingTerms};
pub use status::{OrderStatus, allowed_transitions, can_transition};
