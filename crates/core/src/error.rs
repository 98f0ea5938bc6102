//! Infrastructure error model.
//!
//! Business-rule failures live in the domain crates (typed per module).
//! This type covers the storage/transaction-boundary failures that must be
//! propagated unchanged — swallowing one could silently drop a posting.

use thiserror::Error;

/// Storage / transaction-boundary failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not serve the transaction (e.g. poisoned lock,
    /// connection loss in a real backend).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A caller-supplied deadline elapsed before the transaction committed.
    /// No partial effects survive.
    #[error("operation timed out")]
    Timeout,
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
