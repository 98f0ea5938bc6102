use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradebook_core::{Money, MovementId, ProductId, UserId};

use crate::error::StockError;
use crate::product::Product;

/// Quantity-affecting event types on a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Purchase,
    Sale,
    Adjustment,
    Return,
    Damage,
}

impl MovementType {
    /// Whether this type removes stock (and must therefore never overdraw).
    pub const fn is_outbound(&self) -> bool {
        matches!(self, MovementType::Sale | MovementType::Damage)
    }
}

/// One stock movement: the inventory analogue of a ledger posting.
///
/// Append-only. `quantity` is strictly positive for every type except
/// `Adjustment`, which is signed (and non-zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub unit_cost: Option<Money>,
    pub reference: Option<String>,
    pub performed_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn new(
        product_id: ProductId,
        movement_type: MovementType,
        quantity: i64,
        performed_by: UserId,
        occurred_at: DateTime<Utc>,
    ) -> Result<Self, StockError> {
        match movement_type {
            MovementType::Adjustment if quantity == 0 => return Err(StockError::ZeroAdjustment),
            MovementType::Adjustment => {}
            _ if quantity <= 0 => return Err(StockError::NonPositiveQuantity),
            _ => {}
        }
        Ok(Self {
            id: MovementId::new(),
            product_id,
            movement_type,
            quantity,
            unit_cost: None,
            reference: None,
            performed_by,
            occurred_at,
        })
    }

    pub fn with_unit_cost(mut self, unit_cost: Money) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Signed effect on `stock_quantity`.
    pub fn signed_effect(&self) -> i64 {
        match self.movement_type {
            MovementType::Purchase | MovementType::Return => self.quantity,
            MovementType::Sale | MovementType::Damage => -self.quantity,
            MovementType::Adjustment => self.quantity,
        }
    }

    /// Apply this movement's effect to the product's stock.
    ///
    /// Fails without mutating if the product is non-physical, if an
    /// outbound movement would overdraw, or if a negative adjustment would
    /// drive stock below zero.
    pub fn apply_to(&self, product: &mut Product) -> Result<(), StockError> {
        if !product.is_physical() {
            return Err(StockError::NotPhysical(product.id));
        }

        let new_stock = product
            .stock_quantity
            .checked_add(self.signed_effect())
            .ok_or(StockError::StockOverflow)?;

        if new_stock < 0 {
            return Err(StockError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock_quantity,
                requested: self.signed_effect().unsigned_abs() as i64,
            });
        }

        product.stock_quantity = new_stock;
        Ok(())
    }
}

/// Audit helper: fold all movements for a product (in creation order) into
/// the stock level they imply. Must reproduce `Product::stock_quantity`.
pub fn replay_stock<'a, I>(movements: I) -> i64
where
    I: IntoIterator<Item = &'a StockMovement>,
{
    movements.into_iter().map(|m| m.signed_effect()).sum()
}
