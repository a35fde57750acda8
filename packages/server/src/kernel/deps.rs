//! Server dependencies for domain actions (using traits for testability)
//!
//! Actions receive `&ServerDeps` and reach storage only through the
//! [`BaseStore`] port, so tests swap in [`MemoryStore`](super::MemoryStore).

use std::sync::Arc;

use super::traits::BaseStore;
use crate::domains::matches::transitions::TransitionGuard;

/// Shared, cheaply clonable dependency container.
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseStore>,
    /// Which match status changes `update_match` accepts.
    pub transition_guard: TransitionGuard,
}

impl ServerDeps {
    pub fn new(store: Arc<dyn BaseStore>, transition_guard: TransitionGuard) -> Self {
        Self {
            store,
            transition_guard,
        }
    }

    pub fn store(&self) -> &dyn BaseStore {
        &*self.store
    }
}
