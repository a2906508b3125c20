//! In-memory local tier.

use super::{LocalStore, LocalValue};
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

struct LocalEntry {
    value: LocalValue,
    expires_at: Instant,
}

impl LocalEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-wide in-memory store backing the local tier.
///
/// Cloning is cheap and every clone shares the same entries, so one store
/// can serve arbitrarily many coordinators. Expired entries are dropped
/// lazily on read; call [`spawn_sweeper`](Self::spawn_sweeper) to also
/// reclaim entries nobody reads again.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tier_cache::store::{InMemoryLocalStore, LocalStore};
///
/// let store = InMemoryLocalStore::new();
/// store.set("k", Arc::new(42u64), Duration::from_secs(60)).expect("set failed");
/// assert!(store.get("k").expect("get failed").is_some());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryLocalStore {
    entries: Arc<DashMap<String, LocalEntry>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        InMemoryLocalStore {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    /// Spawn a background task that purges expired entries every `interval`.
    ///
    /// Returns the task handle; abort it during shutdown. Must be called
    /// from within a tokio runtime.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // First tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = store.purge_expired();
                if removed > 0 {
                    debug!("✓ local sweep removed {} expired entries", removed);
                }
            }
        })
    }
}

impl LocalStore for InMemoryLocalStore {
    fn get(&self, key: &str) -> Result<Option<LocalValue>> {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) => {
                if entry.is_expired(now) {
                    true
                } else {
                    return Ok(Some(entry.value.clone()));
                }
            }
        };

        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: LocalValue, retention: Duration) -> Result<()> {
        if retention.is_zero() {
            // Nothing to keep; make sure no stale copy survives either.
            self.entries.remove(key);
            return Ok(());
        }

        self.entries.insert(
            key.to_string(),
            LocalEntry {
                value,
                expires_at: Instant::now() + retention,
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
