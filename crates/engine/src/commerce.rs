//! Order/inventory coordinator.
//!
//! Ties the order state machine to its side effects: stock decremented at
//! creation, the sale journal entry at payment confirmation, stock returns
//! and ledger reversals on cancellation, expiry sweeps for unpaid orders.
//! Every operation is one transaction; a failure anywhere aborts the lot.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradebook_accounting::{LedgerError, Posting, SourceRef};
use tradebook_core::{AccountId, Clock, CustomerId, Money, OrderId, ProductId, StoreError, UserId};
use tradebook_inventory::{MovementType, StockError, StockMovement};
use tradebook_orders::{
    Order, OrderError, OrderItem, OrderSource, OrderStateTransition, OrderStatus, PricingTerms,
};

use crate::inventory::record_movement;
use crate::ledger::{post_entry, post_prepared};
use crate::store::{Store, StoreState};

/// Failures of coordinated operations; composes the domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommerceError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Stock(#[from] StockError),
}

// The domain errors each wrap StoreError themselves; route the bare infra
// failure through the order arm so `with_transaction` can lift it.
impl From<StoreError> for CommerceError {
    fn from(e: StoreError) -> Self {
        CommerceError::Order(OrderError::Store(e))
    }
}

/// Requested order line; prices are snapshotted from the catalog, never
/// supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Fixed wiring for the coordinator: which accounts absorb sales, how long
/// payment windows stay open, and who signs automated transitions.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    pub order_ttl: Duration,
    pub cash_account: AccountId,
    pub revenue_account: AccountId,
    pub system_user: UserId,
}

/// Order lifecycle operations over a [`Store`].
pub struct CommerceService<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    config: CommerceConfig,
}

/// Return-type movements for every physical line of an order.
fn restore_stock(
    state: &mut StoreState,
    order: &Order,
    performed_by: UserId,
    now: DateTime<Utc>,
) -> Result<(), CommerceError> {
    for item in &order.items {
        let physical = state
            .product(item.product_id)
            .is_some_and(|p| p.is_physical());
        if physical {
            let movement = StockMovement::new(
                item.product_id,
                MovementType::Return,
                item.quantity,
                performed_by,
                now,
            )?
            .with_reference(order.order_number.clone());
            record_movement(state, movement)?;
        }
    }
    Ok(())
}

impl<S: Store, C: Clock> CommerceService<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>, config: CommerceConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Create an order in `pending_payment` and decrement physical stock.
    ///
    /// Prices are snapshotted from the catalog at this moment. Any failure
    /// (unknown or inactive product, insufficient stock) aborts everything;
    /// no order, audit row, or movement survives.
    pub fn create_order(
        &self,
        customer_id: CustomerId,
        lines: Vec<OrderLine>,
        source: OrderSource,
        pricing: PricingTerms,
        performed_by: UserId,
    ) -> Result<Order, CommerceError> {
        let now = self.clock.now();
        let ttl = self.config.order_ttl;

        self.store.with_transaction(|state| {
            let mut items = Vec::with_capacity(lines.len());
            for line in &lines {
                let product = state
                    .product(line.product_id)
                    .ok_or(StockError::ProductNotFound(line.product_id))?;
                if !product.is_active {
                    return Err(OrderError::validation(format!(
                        "product {} is not active",
                        product.sku
                    ))
                    .into());
                }
                items.push(OrderItem::snapshot(
                    product.id,
                    product.name.clone(),
                    product.sku.clone(),
                    line.quantity,
                    product.selling_price,
                )?);
            }

            let mut order = Order::try_new(customer_id, items, source, pricing, now)?;
            let audit = order.transition(OrderStatus::PendingPayment, performed_by, None, now)?;
            order.expires_at = Some(now + ttl);

            for item in &order.items {
                let physical = state
                    .product(item.product_id)
                    .is_some_and(|p| p.is_physical());
                if physical {
                    let movement = StockMovement::new(
                        item.product_id,
                        MovementType::Sale,
                        item.quantity,
                        performed_by,
                        now,
                    )?
                    .with_reference(order.order_number.clone());
                    record_movement(state, movement)?;
                }
            }

            state.push_order_transition(audit);
            state.put_order(order.clone());
            tracing::info!(
                order_id = %order.id,
                order_number = %order.order_number,
                total = %order.total_amount,
                "order created"
            );
            Ok(order)
        })
    }

    /// Record that the customer claims to have paid.
    pub fn submit_payment(
        &self,
        order_id: OrderId,
        payment_reference: impl Into<String>,
        performed_by: UserId,
    ) -> Result<Order, CommerceError> {
        let now = self.clock.now();
        let payment_reference = payment_reference.into();
        self.store.with_transaction(|state| {
            let mut order = state
                .order(order_id)
                .cloned()
                .ok_or(OrderError::OrderNotFound(order_id))?;
            let audit = order.transition(OrderStatus::PaymentSubmitted, performed_by, None, now)?;
            order.payment_reference = Some(payment_reference.clone());
            state.push_order_transition(audit);
            state.put_order(order.clone());
            Ok(order)
        })
    }

    /// Confirm payment: transition to `confirmed` and post the sale entry
    /// (debit cash, credit revenue) in the same transaction.
    ///
    /// A zero-total order transitions without a journal entry; there is
    /// nothing to post.
    pub fn confirm_payment(
        &self,
        order_id: OrderId,
        payment_reference: Option<String>,
        performed_by: UserId,
    ) -> Result<Order, CommerceError> {
        let now = self.clock.now();
        let cash = self.config.cash_account;
        let revenue = self.config.revenue_account;

        self.store.with_transaction(|state| {
            let mut order = state
                .order(order_id)
                .cloned()
                .ok_or(OrderError::OrderNotFound(order_id))?;
            let audit = order.transition(OrderStatus::Confirmed, performed_by, None, now)?;
            if payment_reference.is_some() {
                order.payment_reference = payment_reference.clone();
            }

            if !order.total_amount.is_zero() {
                post_entry(
                    state,
                    vec![
                        Posting::debit(cash, order.total_amount),
                        Posting::credit(revenue, order.total_amount),
                    ],
                    format!("Sale for order {}", order.order_number),
                    Some(order.order_number.clone()),
                    Some(SourceRef::order(order.id)),
                    performed_by,
                    now,
                )?;
            }

            state.push_order_transition(audit);
            state.put_order(order.clone());
            tracing::info!(
                order_id = %order.id,
                order_number = %order.order_number,
                "payment confirmed"
            );
            Ok(order)
        })
    }

    /// Cancel an order: restore physical stock and, if payment had been
    /// confirmed, post the mirror-image reversal of its sale entry.
    pub fn cancel_order(
        &self,
        order_id: OrderId,
        reason: Option<String>,
        performed_by: UserId,
    ) -> Result<Order, CommerceError> {
        let now = self.clock.now();
        self.store.with_transaction(|state| {
            let mut order = state
                .order(order_id)
                .cloned()
                .ok_or(OrderError::OrderNotFound(order_id))?;
            let was_paid = order.payment_confirmed_at.is_some();
            let audit = order.transition(OrderStatus::Cancelled, performed_by, reason.clone(), now)?;

            restore_stock(state, &order, performed_by, now)?;

            if was_paid && !order.total_amount.is_zero() {
                let source = SourceRef::order(order.id);
                let original = state
                    .journal_entry_for_source(&source)
                    .cloned()
                    .ok_or_else(|| {
                        LedgerError::EntryNotFound(format!("order {}", order.order_number))
                    })?;
                let reversal = original.reversal(performed_by, now);
                post_prepared(state, reversal)?;
            }

            state.push_order_transition(audit);
            state.put_order(order.clone());
            tracing::info!(
                order_id = %order.id,
                order_number = %order.order_number,
                was_paid,
                "order cancelled"
            );
            Ok(order)
        })
    }

    /// Generic transition, persisted with its audit row.
    ///
    /// Confirmation and cancellation are routed to their dedicated
    /// operations so the books always move with the order.
    pub fn transition_order(
        &self,
        order_id: OrderId,
        to: OrderStatus,
        performed_by: UserId,
        reason: Option<String>,
    ) -> Result<Order, CommerceError> {
        match to {
            OrderStatus::Confirmed => self.confirm_payment(order_id, None, performed_by),
            OrderStatus::Cancelled => self.cancel_order(order_id, reason, performed_by),
            _ => {
                let now = self.clock.now();
                self.store.with_transaction(|state| {
                    let mut order = state
                        .order(order_id)
                        .cloned()
                        .ok_or(OrderError::OrderNotFound(order_id))?;
                    let audit = order.transition(to, performed_by, reason.clone(), now)?;
                    if to == OrderStatus::Expired {
                        restore_stock(state, &order, performed_by, now)?;
                    }
                    state.push_order_transition(audit);
                    state.put_order(order.clone());
                    Ok(order)
                })
            }
        }
    }

    /// Expire every order whose payment window has lapsed.
    ///
    /// Re-reads status inside the transaction, so a second sweep finds
    /// nothing to do. Returns the number of orders expired. Expiry releases
    /// the stock the order was holding.
    pub fn expire_stale_orders(&self) -> Result<usize, CommerceError> {
        let now = self.clock.now();
        let user = self.config.system_user;

        self.store.with_transaction(|state| {
            let stale: Vec<OrderId> = state
                .orders()
                .filter(|o| o.is_stale(now))
                .map(|o| o.id)
                .collect();

            for id in &stale {
                let mut order = state
                    .order(*id)
                    .cloned()
                    .ok_or(OrderError::OrderNotFound(*id))?;
                let audit = order.transition(
                    OrderStatus::Expired,
                    user,
                    Some("payment window lapsed".to_string()),
                    now,
                )?;
                restore_stock(state, &order, user, now)?;
                state.push_order_transition(audit);
                state.put_order(order);
            }

            if !stale.is_empty() {
                tracing::info!(expired = stale.len(), "stale order sweep");
            }
            Ok(stale.len())
        })
    }

    pub fn get_order(&self, order_id: OrderId) -> Result<Order, CommerceError> {
        self.store.read(|state| {
            state
                .order(order_id)
                .cloned()
                .ok_or_else(|| OrderError::OrderNotFound(order_id).into())
        })
    }

    /// Full audit trail of an order, in transition order.
    pub fn order_history(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderStateTransition>, CommerceError> {
        self.store.read(|state| {
            if state.order(order_id).is_none() {
                return Err(OrderError::OrderNotFound(order_id).into());
            }
            Ok(state.transitions_for(order_id).cloned().collect())
        })
    }

    /// Record a movement outside the order flow (goods received, counts).
    pub fn record_stock_movement(
        &self,
        product_id: ProductId,
        movement_type: MovementType,
        quantity: i64,
        unit_cost: Option<Money>,
        reference: Option<String>,
        performed_by: UserId,
    ) -> Result<StockMovement, CommerceError> {
        let mut movement = StockMovement::new(
            product_id,
            movement_type,
            quantity,
            performed_by,
            self.clock.now(),
        )?;
        if let Some(cost) = unit_cost {
            movement = movement.with_unit_cost(cost);
        }
        if let Some(r) = reference {
            movement = movement.with_reference(r);
        }
        self.store
            .with_transaction(|state| Ok(record_movement(state, movement)?))
    }

    pub fn get_current_stock(&self, product_id: ProductId) -> Result<i64, CommerceError> {
        self.store.read(|state| {
            state
                .product(product_id)
                .map(|p| p.stock_quantity)
                .ok_or_else(|| StockError::ProductNotFound(product_id).into())
        })
    }
}
