//! Ledger error model.

use thiserror::Error;

use tradebook_core::{AccountId, StoreError};

/// Typed failures of chart-of-accounts and journal operations.
///
/// Validation variants are caller-fixable and never retried automatically;
/// `Store` wraps infrastructure failures and is propagated unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("journal entry must have at least one posting")]
    EmptyEntry,

    #[error("unbalanced entry: debits {debits} != credits {credits}")]
    UnbalancedEntry { debits: i128, credits: i128 },

    #[error("posting amounts must be positive")]
    NonPositiveAmount,

    #[error("unknown account referenced by posting: {0}")]
    UnknownAccount(AccountId),

    #[error("account is inactive: {0}")]
    InactiveAccount(AccountId),

    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("account code already exists: {0}")]
    DuplicateCode(String),

    #[error("account has postings and cannot be deleted: {0}")]
    HasTransactions(AccountId),

    #[error("setting this parent would create a cycle at account {0}")]
    ParentCycle(AccountId),

    #[error("journal entry not found: {0}")]
    EntryNotFound(String),

    #[error("account balance overflowed")]
    BalanceOverflow,

    #[error(transparent)]
    Store(#[from] StoreError),
}
