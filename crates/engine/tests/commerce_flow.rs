//! End-to-end lifecycle tests: orders, stock, and the ledger moving
//! together through one store.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};

use tradebook_accounting::AccountType;
use tradebook_core::{AccountId, Clock, CustomerId, FixedClock, Money, ProductId, UserId};
use tradebook_engine::{
    CommerceConfig, CommerceError, CommerceService, InMemoryStore, InventoryService,
    LedgerService, OrderLine,
};
use tradebook_inventory::{ProductKind, StockError};
use tradebook_orders::{OrderError, OrderSource, OrderStatus, PricingTerms};

struct Fixture {
    ledger: LedgerService<InMemoryStore, FixedClock>,
    inventory: InventoryService<InMemoryStore, FixedClock>,
    commerce: CommerceService<InMemoryStore, FixedClock>,
    clock: Arc<FixedClock>,
    cash: AccountId,
    revenue: AccountId,
    product: ProductId,
    user: UserId,
    customer: CustomerId,
}

/// One store, one clock, a two-account chart, and a widget with 10 in stock
/// at 25.00 selling price.
fn fixture() -> Fixture {
    tradebook_observability::init();
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    ));
    let user = UserId::new();

    let ledger = LedgerService::new(store.clone(), clock.clone());
    let cash = ledger
        .create_account("1000", "Cash", AccountType::Asset, None)
        .unwrap();
    let revenue = ledger
        .create_account("4000", "Sales Revenue", AccountType::Income, None)
        .unwrap();

    let inventory = InventoryService::new(store.clone(), clock.clone());
    let product = inventory
        .register_product("SKU-W", "Widget", ProductKind::Physical, Money::from_minor(2500))
        .unwrap();
    inventory
        .record_purchase(product.id, 10, Money::from_minor(1500), user)
        .unwrap();

    let commerce = CommerceService::new(
        store,
        clock.clone(),
        CommerceConfig {
            order_ttl: Duration::hours(24),
            cash_account: cash.id,
            revenue_account: revenue.id,
            system_user: user,
        },
    );

    Fixture {
        ledger,
        inventory,
        commerce,
        clock,
        cash: cash.id,
        revenue: revenue.id,
        product: product.id,
        user,
        customer: CustomerId::new(),
    }
}

fn two_widgets(f: &Fixture) -> Vec<OrderLine> {
    vec![OrderLine {
        product_id: f.product,
        quantity: 2,
    }]
}

#[test]
fn creating_an_order_reserves_stock_and_opens_the_payment_window() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Web,
        PricingTerms::default(),
        f.user,
    )?;

    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.total_amount, Money::from_minor(5000));
    assert_eq!(order.expires_at, Some(f.clock.now() + Duration::hours(24)));
    assert_eq!(f.inventory.get_current_stock(f.product)?, 8);

    let history = f.commerce.order_history(order.id)?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_state, OrderStatus::Draft);
    assert_eq!(history[0].to_state, OrderStatus::PendingPayment);
    Ok(())
}

#[test]
fn confirming_payment_posts_a_balanced_sale_entry() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Web,
        PricingTerms::default(),
        f.user,
    )?;
    f.commerce.submit_payment(order.id, "TXN-123", f.user)?;
    let order = f.commerce.confirm_payment(order.id, None, f.user)?;

    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_reference.as_deref(), Some("TXN-123"));
    assert_eq!(order.payment_confirmed_at, Some(f.clock.now()));
    assert_eq!(order.expires_at, None);

    assert_eq!(f.ledger.get_balance(f.cash)?, Money::from_minor(5000));
    assert_eq!(f.ledger.get_balance(f.revenue)?, Money::from_minor(5000));

    let tb = f.ledger.trial_balance()?;
    assert!(tb.is_balanced());
    assert_eq!(tb.total_debits, 5000);
    Ok(())
}

#[test]
fn cancelling_an_unpaid_order_restores_stock_without_touching_the_books() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Web,
        PricingTerms::default(),
        f.user,
    )?;
    assert_eq!(f.inventory.get_current_stock(f.product)?, 8);

    let order = f
        .commerce
        .cancel_order(order.id, Some("changed mind".to_string()), f.user)?;

    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(f.inventory.get_current_stock(f.product)?, 10);
    assert_eq!(f.ledger.get_balance(f.cash)?, Money::ZERO);
    assert_eq!(f.ledger.get_balance(f.revenue)?, Money::ZERO);
    Ok(())
}

#[test]
fn cancelling_a_paid_order_reverses_the_sale_entry() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Whatsapp,
        PricingTerms::default(),
        f.user,
    )?;
    f.commerce.submit_payment(order.id, "TXN-42", f.user)?;
    f.commerce.confirm_payment(order.id, None, f.user)?;
    assert_eq!(f.ledger.get_balance(f.cash)?, Money::from_minor(5000));

    f.commerce
        .cancel_order(order.id, Some("refund requested".to_string()), f.user)?;

    assert_eq!(f.inventory.get_current_stock(f.product)?, 10);
    assert_eq!(f.ledger.get_balance(f.cash)?, Money::ZERO);
    assert_eq!(f.ledger.get_balance(f.revenue)?, Money::ZERO);
    assert!(f.ledger.trial_balance()?.is_balanced());
    Ok(())
}

#[test]
fn insufficient_stock_aborts_the_whole_order() -> Result<()> {
    let f = fixture();
    let err = f
        .commerce
        .create_order(
            f.customer,
            vec![OrderLine {
                product_id: f.product,
                quantity: 11,
            }],
            OrderSource::Web,
            PricingTerms::default(),
            f.user,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        CommerceError::Stock(StockError::InsufficientStock { available: 10, requested: 11, .. })
    ));
    // Nothing survives the rollback: stock, movement log, audit trail.
    assert_eq!(f.inventory.get_current_stock(f.product)?, 10);
    assert_eq!(f.inventory.movements_for(f.product)?.len(), 1); // the purchase
    Ok(())
}

#[test]
fn unknown_product_is_rejected_at_order_creation() {
    let f = fixture();
    let ghost = ProductId::new();
    let err = f
        .commerce
        .create_order(
            f.customer,
            vec![OrderLine {
                product_id: ghost,
                quantity: 1,
            }],
            OrderSource::Manual,
            PricingTerms::default(),
            f.user,
        )
        .unwrap_err();
    assert_eq!(err, CommerceError::Stock(StockError::ProductNotFound(ghost)));
}

#[test]
fn expiry_sweep_is_idempotent_and_releases_stock() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Web,
        PricingTerms::default(),
        f.user,
    )?;
    assert_eq!(f.inventory.get_current_stock(f.product)?, 8);

    // Inside the window: nothing to do.
    assert_eq!(f.commerce.expire_stale_orders()?, 0);

    f.clock.advance(Duration::hours(25));
    assert_eq!(f.commerce.expire_stale_orders()?, 1);
    assert_eq!(f.commerce.expire_stale_orders()?, 0);

    let order = f.commerce.get_order(order.id)?;
    assert_eq!(order.status, OrderStatus::Expired);
    assert_eq!(f.inventory.get_current_stock(f.product)?, 10);
    Ok(())
}

#[test]
fn fulfilment_proceeds_through_the_transition_table() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Web,
        PricingTerms::default(),
        f.user,
    )?;
    f.commerce.submit_payment(order.id, "TXN-9", f.user)?;
    f.commerce
        .transition_order(order.id, OrderStatus::Confirmed, f.user, None)?;
    f.commerce
        .transition_order(order.id, OrderStatus::Processing, f.user, None)?;
    f.commerce
        .transition_order(order.id, OrderStatus::Dispatched, f.user, None)?;
    let order = f
        .commerce
        .transition_order(order.id, OrderStatus::Completed, f.user, None)?;

    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.payment_confirmed_at.is_some());
    assert!(order.dispatched_at.is_some());
    assert!(order.completed_at.is_some());
    // Routing through transition_order still posted the sale entry.
    assert_eq!(f.ledger.get_balance(f.cash)?, Money::from_minor(5000));

    // A completed order cannot move again.
    let err = f
        .commerce
        .transition_order(order.id, OrderStatus::Processing, f.user, None)
        .unwrap_err();
    assert!(matches!(
        err,
        CommerceError::Order(OrderError::InvalidTransition { .. })
    ));

    let history = f.commerce.order_history(order.id)?;
    assert_eq!(history.len(), 6);
    Ok(())
}

#[test]
fn fully_discounted_order_confirms_without_a_journal_entry() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Manual,
        PricingTerms {
            tax_amount: Money::ZERO,
            discount_amount: Money::from_minor(5000),
        },
        f.user,
    )?;
    assert!(order.total_amount.is_zero());

    f.commerce.submit_payment(order.id, "TXN-0", f.user)?;
    let order = f.commerce.confirm_payment(order.id, None, f.user)?;
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(f.ledger.get_balance(f.cash)?, Money::ZERO);
    assert_eq!(f.ledger.get_balance(f.revenue)?, Money::ZERO);
    Ok(())
}

#[test]
fn denormalized_views_agree_with_their_logs_after_mixed_activity() -> Result<()> {
    let f = fixture();
    let order = f.commerce.create_order(
        f.customer,
        two_widgets(&f),
        OrderSource::Web,
        PricingTerms::default(),
        f.user,
    )?;
    f.commerce.submit_payment(order.id, "TXN-7", f.user)?;
    f.commerce.confirm_payment(order.id, None, f.user)?;

    let second = f.commerce.create_order(
        f.customer,
        vec![OrderLine {
            product_id: f.product,
            quantity: 3,
        }],
        OrderSource::Web,
        PricingTerms::default(),
        f.user,
    )?;
    f.commerce.cancel_order(second.id, None, f.user)?;

    for account in [f.cash, f.revenue] {
        assert_eq!(
            f.ledger.get_balance(account)?,
            f.ledger.recompute_balance(account)?
        );
    }
    assert_eq!(
        f.inventory.get_current_stock(f.product)?,
        f.inventory.replayed_stock(f.product)?
    );
    Ok(())
}
