//! Catalog and stock service.
//!
//! Stock levels only change through [`record_movement`]: the movement row
//! and the `stock_quantity` update land in the same transaction, so the
//! movement log always replays to the stored level.

use std::sync::Arc;

use tradebook_core::{Clock, Money, ProductId, UserId};
use tradebook_inventory::{
    MovementType, Product, ProductKind, StockError, StockMovement, replay_stock,
};

use crate::store::{Store, StoreState};

/// Apply a movement to its product and append it to the log.
///
/// Must run inside a transaction; a failure after the stock mutation relies
/// on the transaction rollback.
pub(crate) fn record_movement(
    state: &mut StoreState,
    movement: StockMovement,
) -> Result<StockMovement, StockError> {
    let product = state
        .product_mut(movement.product_id)
        .ok_or(StockError::ProductNotFound(movement.product_id))?;
    movement.apply_to(product)?;
    let stock = product.stock_quantity;
    state.push_stock_movement(movement.clone());
    tracing::info!(
        product_id = %movement.product_id,
        movement_type = ?movement.movement_type,
        quantity = movement.quantity,
        stock,
        "stock movement recorded"
    );
    Ok(movement)
}

/// Catalog and stock operations over a [`Store`].
pub struct InventoryService<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S: Store, C: Clock> InventoryService<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Add a product to the catalog; SKUs are unique.
    pub fn register_product(
        &self,
        sku: impl Into<String>,
        name: impl Into<String>,
        kind: ProductKind,
        selling_price: Money,
    ) -> Result<Product, StockError> {
        let sku = sku.into();
        let name = name.into();
        let now = self.clock.now();
        self.store.with_transaction(|state| {
            if state.product_by_sku(&sku).is_some() {
                return Err(StockError::DuplicateSku(sku.clone()));
            }
            let product = Product::new(sku.clone(), name.clone(), kind, selling_price, now);
            state.insert_product(product.clone());
            tracing::info!(product_id = %product.id, sku = %product.sku, "product registered");
            Ok(product)
        })
    }

    pub fn get_product(&self, product_id: ProductId) -> Result<Product, StockError> {
        self.store.read(|state| {
            state
                .product(product_id)
                .cloned()
                .ok_or(StockError::ProductNotFound(product_id))
        })
    }

    /// Record an arbitrary movement against a product.
    pub fn record_stock_movement(
        &self,
        product_id: ProductId,
        movement_type: MovementType,
        quantity: i64,
        performed_by: UserId,
    ) -> Result<StockMovement, StockError> {
        let movement = StockMovement::new(
            product_id,
            movement_type,
            quantity,
            performed_by,
            self.clock.now(),
        )?;
        self.store
            .with_transaction(|state| record_movement(state, movement))
    }

    /// Goods received: add stock and remember the unit cost paid.
    pub fn record_purchase(
        &self,
        product_id: ProductId,
        quantity: i64,
        unit_cost: Money,
        performed_by: UserId,
    ) -> Result<StockMovement, StockError> {
        let movement = StockMovement::new(
            product_id,
            MovementType::Purchase,
            quantity,
            performed_by,
            self.clock.now(),
        )?
        .with_unit_cost(unit_cost);
        self.store
            .with_transaction(|state| record_movement(state, movement))
    }

    /// Manual correction after a physical count; `delta` is signed.
    pub fn adjust_stock(
        &self,
        product_id: ProductId,
        delta: i64,
        reason: impl Into<String>,
        performed_by: UserId,
    ) -> Result<StockMovement, StockError> {
        let movement = StockMovement::new(
            product_id,
            MovementType::Adjustment,
            delta,
            performed_by,
            self.clock.now(),
        )?
        .with_reference(reason);
        self.store
            .with_transaction(|state| record_movement(state, movement))
    }

    pub fn get_current_stock(&self, product_id: ProductId) -> Result<i64, StockError> {
        Ok(self.get_product(product_id)?.stock_quantity)
    }

    pub fn movements_for(&self, product_id: ProductId) -> Result<Vec<StockMovement>, StockError> {
        self.store.read(|state| {
            if state.product(product_id).is_none() {
                return Err(StockError::ProductNotFound(product_id));
            }
            Ok(state.movements_for(product_id).cloned().collect())
        })
    }

    /// Audit path: replay the movement log instead of trusting the stored
    /// level. Must agree with [`Self::get_current_stock`].
    pub fn replayed_stock(&self, product_id: ProductId) -> Result<i64, StockError> {
        self.store.read(|state| {
            if state.product(product_id).is_none() {
                return Err(StockError::ProductNotFound(product_id));
            }
            Ok(replay_stock(state.movements_for(product_id)))
        })
    }

    /// Active physical products at or below their reorder threshold.
    pub fn products_needing_reorder(&self) -> Result<Vec<Product>, StockError> {
        self.store.read(|state| {
            Ok(state
                .products()
                .filter(|p| p.is_active && p.needs_reorder())
                .cloned()
                .collect())
        })
    }
}
