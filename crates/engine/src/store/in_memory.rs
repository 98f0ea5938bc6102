use std::sync::Mutex;

use tradebook_core::StoreError;

use super::state::StoreState;
use super::Store;

/// In-memory transactional store.
///
/// Transactions are serialized behind one mutex; commit-or-rollback is
/// implemented by snapshotting the state before running the closure and
/// restoring the snapshot on error. Intended for tests and embedded use —
/// correctness over throughput.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn with_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut StoreState) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|_| E::from(StoreError::unavailable("state lock poisoned")))?;

        let snapshot = state.clone();
        match f(&mut state) {
            Ok(value) => Ok(value),
            Err(e) => {
                // Roll back: nothing from a failed transaction survives.
                *state = snapshot;
                Err(e)
            }
        }
    }

    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&StoreState) -> Result<T, E>,
        E: From<StoreError>,
    {
        let state = self
            .state
            .lock()
            .map_err(|_| E::from(StoreError::unavailable("state lock poisoned")))?;
        f(&state)
    }
}
