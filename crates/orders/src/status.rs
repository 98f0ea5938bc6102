//! Order lifecycle states and the static transition table.
//!
//! The table is the single source of truth for what an order may do next;
//! no other code compares statuses to decide legality.

use serde::{Deserialize, Serialize};

/// Order status lifecycle (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    PendingPayment,
    PaymentSubmitted,
    Confirmed,
    Processing,
    Dispatched,
    Completed,
    Cancelled,
    Expired,
}

/// Every status, for exhaustive table checks.
pub const ALL_STATUSES: [OrderStatus; 9] = [
    OrderStatus::Draft,
    OrderStatus::PendingPayment,
    OrderStatus::PaymentSubmitted,
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Dispatched,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
    OrderStatus::Expired,
];

/// Legal transitions out of `from`.
pub const fn allowed_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Draft => &[PendingPayment, Cancelled],
        PendingPayment => &[PaymentSubmitted, Cancelled, Expired],
        PaymentSubmitted => &[Confirmed, Cancelled],
        Confirmed => &[Processing, Cancelled],
        Processing => &[Dispatched, Cancelled],
        Dispatched => &[Completed],
        Completed | Cancelled | Expired => &[],
    }
}

/// Pure lookup: is `from -> to` in the transition table?
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

impl OrderStatus {
    /// Terminal states have no outgoing transitions.
    pub const fn is_terminal(&self) -> bool {
        allowed_transitions(*self).is_empty()
    }

    /// States in which an order may still time out waiting for payment.
    pub const fn is_awaiting_payment(&self) -> bool {
        matches!(
            self,
            OrderStatus::PendingPayment | OrderStatus::PaymentSubmitted
        )
    }
}
