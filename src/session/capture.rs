//! Pending search-query capture, keyed by user.
//!
//! The capture workflow collects one line of free text from a user. Between
//! composing the text and confirming it there is a window where the value
//! sits server-side; this table owns that window and guarantees at-most-once
//! delivery. Abandoning the input or disconnecting clears the slot so
//! nothing leaks across sessions.

use ahash::AHashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Per-user pending query values. All operations are atomic read-modify-write
/// under one lock, so a commit racing a consume never duplicates delivery.
#[derive(Debug, Default)]
pub struct CaptureTable {
    pending: Mutex<AHashMap<Uuid, String>>,
}

impl CaptureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the capture workflow for a user, dropping any stale uncommitted
    /// value from an earlier attempt.
    pub fn begin(&self, user: Uuid) {
        self.pending.lock().unwrap().remove(&user);
    }

    /// Store `text` as the user's pending query, overwriting any previous
    /// uncommitted value.
    pub fn commit(&self, user: Uuid, text: impl Into<String>) {
        self.pending.lock().unwrap().insert(user, text.into());
    }

    /// Read and remove the pending query. `None` means nothing was pending;
    /// callers treat that as "do nothing", not as an error.
    pub fn consume(&self, user: Uuid) -> Option<String> {
        self.pending.lock().unwrap().remove(&user)
    }

    /// Discard the pending query without returning it. Used both when the
    /// user closes the input uncommitted and when they disconnect.
    pub fn abandon(&self, user: Uuid) {
        self.pending.lock().unwrap().remove(&user);
    }

    /// Number of users with a pending value.
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_is_at_most_once() {
        let table = CaptureTable::new();
        let user = Uuid::new_v4();

        table.commit(user, "castle");
        assert_eq!(table.consume(user).as_deref(), Some("castle"));
        assert_eq!(table.consume(user), None);
    }

    #[test]
    fn commit_overwrites_prior_uncommitted_value() {
        let table = CaptureTable::new();
        let user = Uuid::new_v4();

        table.commit(user, "first");
        table.commit(user, "second");
        assert_eq!(table.consume(user).as_deref(), Some("second"));
    }

    #[test]
    fn abandon_discards_without_delivery() {
        let table = CaptureTable::new();
        let user = Uuid::new_v4();

        table.commit(user, "lost");
        table.abandon(user);
        assert_eq!(table.consume(user), None);
        assert!(table.is_empty());
    }

    #[test]
    fn begin_clears_stale_state_only_for_that_user() {
        let table = CaptureTable::new();
        let stale = Uuid::new_v4();
        let other = Uuid::new_v4();

        table.commit(stale, "old");
        table.commit(other, "kept");
        table.begin(stale);

        assert_eq!(table.consume(stale), None);
        assert_eq!(table.consume(other).as_deref(), Some("kept"));
    }

    #[test]
    fn users_are_independent() {
        let table = CaptureTable::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        table.commit(a, "alpha");
        table.commit(b, "beta");
        assert_eq!(table.consume(a).as_deref(), Some("alpha"));
        assert_eq!(table.consume(b).as_deref(), Some("beta"));
    }
}
