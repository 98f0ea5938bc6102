//! Stock error model.

use thiserror::Error;

use tradebook_core::{ProductId, StoreError};

/// Typed failures of stock operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("only physical products carry stock: {0}")]
    NotPhysical(ProductId),

    /// Resource conflict; the caller may retry once stock is replenished.
    #[error("insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    #[error("product sku already exists: {0}")]
    DuplicateSku(String),

    #[error("movement quantity must be positive")]
    NonPositiveQuantity,

    #[error("adjustment quantity cannot be zero")]
    ZeroAdjustment,

    #[error("stock quantity overflowed")]
    StockOverflow,

    #[error(transparent)]
    Store(#[from] StoreError),
}
