use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tradebook_core::{CustomerId, Money, OrderId, ProductId, UserId};

use crate::error::OrderError;
use crate::status::{OrderStatus, can_transition};

/// Where an order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
    Web,
    Whatsapp,
    Manual,
}

/// Immutable snapshot of product data at order-creation time.
///
/// Later product price changes never affect historical orders. Owned
/// exclusively by its order and destroyed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl OrderItem {
    pub fn snapshot(
        product_id: ProductId,
        product_name: impl Into<String>,
        product_sku: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Result<Self, OrderError> {
        if quantity <= 0 {
            return Err(OrderError::validation("quantity must be positive"));
        }
        if !unit_price.is_positive() {
            return Err(OrderError::validation("unit_price must be positive"));
        }
        let subtotal = unit_price
            .checked_mul(quantity)
            .ok_or_else(|| OrderError::validation("line subtotal overflowed"))?;
        Ok(Self {
            product_id,
            product_name: product_name.into(),
            product_sku: product_sku.into(),
            quantity,
            unit_price,
            subtotal,
        })
    }
}

/// Tax/discount amounts computed by an external pricing collaborator.
///
/// The engine owns no tax rules; it only validates that the resulting total
/// is non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTerms {
    pub tax_amount: Money,
    pub discount_amount: Money,
}

/// Append-only audit record: one row per state transition, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStateTransition {
    pub order_id: OrderId,
    pub from_state: OrderStatus,
    pub to_state: OrderStatus,
    pub reason: Option<String>,
    pub performed_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// An order and its line items.
///
/// `status` only changes through [`Order::transition`]; `total_amount` is
/// always `subtotal + tax_amount - discount_amount` and never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub source: OrderSource,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub total_amount: Money,
    pub payment_reference: Option<String>,
    pub payment_confirmed_at: Option<DateTime<Utc>>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Only meaningful while the order is awaiting payment.
    pub expires_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn generate_order_number(date: chrono::NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("ORD-{}-{}", date.format("%Y%m%d"), suffix)
}

impl Order {
    /// Create a draft order from snapshotted line items.
    ///
    /// Totals are computed here and nowhere else. A pricing result that
    /// would drive the total negative is a caller error.
    pub fn try_new(
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        source: OrderSource,
        pricing: PricingTerms,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::validation("order must have at least one item"));
        }

        let mut subtotal = Money::ZERO;
        for item in &items {
            subtotal = subtotal
                .checked_add(item.subtotal)
                .ok_or_else(|| OrderError::validation("order subtotal overflowed"))?;
        }

        let total_amount = subtotal
            .checked_add(pricing.tax_amount)
            .and_then(|t| t.checked_sub(pricing.discount_amount))
            .ok_or_else(|| OrderError::validation("order total overflowed"))?;
        if total_amount.is_negative() {
            return Err(OrderError::validation("total_amount cannot be negative"));
        }

        Ok(Self {
            id: OrderId::new(),
            order_number: generate_order_number(created_at.date_naive()),
            customer_id,
            status: OrderStatus::Draft,
            source,
            subtotal,
            tax_amount: pricing.tax_amount,
            discount_amount: pricing.discount_amount,
            total_amount,
            payment_reference: None,
            payment_confirmed_at: None,
            dispatched_at: None,
            completed_at: None,
            expires_at: None,
            items,
            created_at,
            updated_at: created_at,
        })
    }

    /// Move to `to` if the transition table allows it.
    ///
    /// Mutates status, stamps lifecycle timestamps, and returns the audit
    /// row the caller must persist in the same atomic unit. Ledger postings
    /// and stock restoration are the coordinator's job, not the FSM's.
    pub fn transition(
        &mut self,
        to: OrderStatus,
        performed_by: UserId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<OrderStateTransition, OrderError> {
        let from = self.status;
        if !can_transition(from, to) {
            return Err(OrderError::InvalidTransition { from, to });
        }

        self.status = to;
        self.updated_at = now;
        match to {
            OrderStatus::Confirmed => self.payment_confirmed_at = Some(now),
            OrderStatus::Dispatched => self.dispatched_at = Some(now),
            OrderStatus::Completed => self.completed_at = Some(now),
            _ => {}
        }
        if !to.is_awaiting_payment() {
            // Expiry deadlines only apply pre-confirmation.
            self.expires_at = None;
        }

        Ok(OrderStateTransition {
            order_id: self.id,
            from_state: from,
            to_state: to,
            reason,
            performed_by,
            occurred_at: now,
        })
    }

    /// Whether the payment window has lapsed as of `now`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.status.is_awaiting_payment()
            && self.expires_at.is_some_and(|deadline| deadline < now)
    }

    /// Line items referring to the given product.
    pub fn items_for(&self, product_id: ProductId) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(move |i| i.product_id == product_id)
    }
}
