//! Session-scoped holder of the latest sort outcome.

use std::sync::{Arc, PoisonError, RwLock};

use bucket_model::SortOutcome;

/// Shared handle to the most recent successful sort.
///
/// Clones share the same slot. A new session gets a new store; nothing here
/// is persisted.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    latest: Arc<RwLock<Option<SortOutcome>>>,
}

impl ResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest outcome, if any sort has succeeded this session.
    pub fn latest(&self) -> Option<SortOutcome> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Replace the held outcome. Last write wins.
    pub(crate) fn put(&self, outcome: SortOutcome) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
    }
}
