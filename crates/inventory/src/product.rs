use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradebook_core::{Money, ProductId};

/// What kind of thing is being sold.
///
/// Only physical products carry a meaningful `stock_quantity`; digital and
/// service products are never stock-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Physical,
    Digital,
    Service,
}

/// Catalog product with its denormalized stock level.
///
/// `stock_quantity` is owned by the coordinator: it changes only through
/// stock movements, inside the same transaction that records them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub kind: ProductKind,
    pub selling_price: Money,
    pub cost_price: Money,
    pub stock_quantity: i64,
    pub reorder_level: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        kind: ProductKind,
        selling_price: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            sku: sku.into(),
            name: name.into(),
            kind,
            selling_price,
            cost_price: Money::ZERO,
            stock_quantity: 0,
            reorder_level: 0,
            is_active: true,
            created_at,
        }
    }

    pub fn is_physical(&self) -> bool {
        self.kind == ProductKind::Physical
    }

    /// Reorder alert condition (stock at or below the configured threshold).
    pub fn needs_reorder(&self) -> bool {
        self.is_physical() && self.stock_quantity <= self.reorder_level
    }
}
