//! Shared catalog snapshot with atomic replace.

use crate::catalog::entry::Waypoint;
use std::sync::{Arc, Mutex};

/// Holds the current immutable catalog snapshot.
///
/// The mutex guards only the `Arc` swap; readers clone the `Arc` and iterate
/// without holding the lock. A reader that obtained a snapshot keeps it even
/// if a reload swaps in a newer one mid-iteration, so no reader ever
/// observes a partially replaced list.
pub struct CatalogStore {
    snapshot: Mutex<Arc<Vec<Waypoint>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(Arc::new(Vec::new())),
        }
    }

    /// Atomically swap in a freshly parsed snapshot.
    pub fn replace(&self, waypoints: Vec<Waypoint>) {
        *self.snapshot.lock().unwrap() = Arc::new(waypoints);
    }

    /// Current snapshot; safe to iterate without further locking.
    pub fn all(&self) -> Arc<Vec<Waypoint>> {
        Arc::clone(&self.snapshot.lock().unwrap())
    }

    /// Number of entries in the current snapshot.
    pub fn count(&self) -> usize {
        self.snapshot.lock().unwrap().len()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
