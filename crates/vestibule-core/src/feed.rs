//! Bounded, ordered, thread-safe history of recent actor actions.
//!
//! The feed is the one structure in the crate that may be touched from
//! multiple independent trigger call sites, so it guards its state with a
//! `Mutex` and hands out defensive snapshots on read. Newest entry first.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

// ---------------------------------------------------------------------------
// FeedEvent
// ---------------------------------------------------------------------------

/// One recorded actor action. Immutable once appended.
#[derive(Debug, Clone)]
pub struct FeedEvent {
    pub label: String,
    pub actor_name: String,
    pub at: DateTime<Local>,
}

// ---------------------------------------------------------------------------
// FeedStore
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Inner {
    entries: VecDeque<FeedEvent>,
    capacity: usize,
    enabled: bool,
}

#[derive(Debug)]
pub struct FeedStore {
    inner: Mutex<Inner>,
}

impl FeedStore {
    /// Capacity below 1 is corrected to 1 with a warning.
    pub fn new(capacity: usize, enabled: bool) -> Self {
        let capacity = clamp_capacity(capacity);
        FeedStore {
            inner: Mutex::new(Inner {
                entries: VecDeque::with_capacity(capacity),
                capacity,
                enabled,
            }),
        }
    }

    /// Record an action at the head of the feed, evicting from the tail while
    /// over capacity. No-op while the feed is administratively disabled.
    pub fn append(&self, label: &str, actor_name: &str) {
        let mut inner = self.lock();
        if !inner.enabled {
            return;
        }
        inner.entries.push_front(FeedEvent {
            label: label.to_string(),
            actor_name: actor_name.to_string(),
            at: Local::now(),
        });
        while inner.entries.len() > inner.capacity {
            inner.entries.pop_back();
        }
    }

    /// Snapshot of the `min(n, len)` most recent entries, newest first.
    /// The snapshot is isolated from later appends.
    pub fn recent(&self, n: usize) -> Vec<FeedEvent> {
        let inner = self.lock();
        inner.entries.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Apply a new capacity (config reload), evicting overflow immediately.
    pub fn set_capacity(&self, capacity: usize) {
        let capacity = clamp_capacity(capacity);
        let mut inner = self.lock();
        inner.capacity = capacity;
        while inner.entries.len() > capacity {
            inner.entries.pop_back();
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a panicking reader; the data is still
        // a consistent snapshot, so recover rather than propagate.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn clamp_capacity(capacity: usize) -> usize {
    if capacity < 1 {
        tracing::warn!(capacity, "feed capacity must be at least 1, using 1");
        1
    } else {
        capacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_is_first() {
        let feed = FeedStore::new(10, true);
        feed.append("joined", "Ann");
        feed.append("joined", "Ben");
        let recent = feed.recent(10);
        assert_eq!(recent[0].actor_name, "Ben");
        assert_eq!(recent[1].actor_name, "Ann");
    }

    #[test]
    fn capacity_evicts_oldest() {
        let feed = FeedStore::new(3, true);
        for name in ["a", "b", "c", "d"] {
            feed.append("joined", name);
        }
        assert_eq!(feed.len(), 3);
        let recent = feed.recent(3);
        assert_eq!(recent[0].actor_name, "d");
        assert_eq!(recent[2].actor_name, "b");
    }

    #[test]
    fn recent_clamps_to_available() {
        let feed = FeedStore::new(10, true);
        feed.append("joined", "Ann");
        assert_eq!(feed.recent(50).len(), 1);
    }

    #[test]
    fn disabled_feed_ignores_appends() {
        let feed = FeedStore::new(10, false);
        feed.append("joined", "Ann");
        assert!(feed.is_empty());
        feed.set_enabled(true);
        feed.append("joined", "Ann");
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn snapshot_is_isolated_from_later_appends() {
        let feed = FeedStore::new(10, true);
        feed.append("joined", "Ann");
        let snapshot = feed.recent(10);
        feed.append("joined", "Ben");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].actor_name, "Ann");
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let feed = FeedStore::new(0, true);
        feed.append("joined", "Ann");
        feed.append("joined", "Ben");
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn shrinking_capacity_evicts() {
        let feed = FeedStore::new(5, true);
        for name in ["a", "b", "c", "d"] {
            feed.append("joined", name);
        }
        feed.set_capacity(2);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.recent(2)[0].actor_name, "d");
    }
}
