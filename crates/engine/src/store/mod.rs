//! Persistence seam: the injected transaction boundary.
//!
//! The engine makes no storage assumptions. Anything that can run a closure
//! against the full data set with atomic commit-or-rollback semantics
//! satisfies [`Store`]; the in-memory implementation here backs tests and
//! embedded use, a relational backend would satisfy it with a database
//! transaction.

mod in_memory;
mod state;

pub use in_memory::InMemoryStore;
pub use state::StoreState;

use tradebook_core::StoreError;

/// Transactional access to the engine's data set.
///
/// `with_transaction` runs `f` against a mutable view of the state. If `f`
/// returns `Ok`, every write it made commits as one unit; if it returns
/// `Err`, none of them survive. Conflicting operations are serialized by
/// the implementation, so check-then-act sequences inside one transaction
/// cannot race (e.g. the stock sufficiency check and decrement).
pub trait Store: Send + Sync {
    fn with_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut StoreState) -> Result<T, E>,
        E: From<StoreError>;

    /// Read-only access; must observe only committed state.
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&StoreState) -> Result<T, E>,
        E: From<StoreError>;
}
