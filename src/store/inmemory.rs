//! In-memory distributed tier.
//!
//! A dashmap-backed [`DistributedStore`] with full absolute/relative/sliding
//! expiry semantics. Useful as the backing store for tests, benches, and
//! single-process deployments where "distributed" is simply "shared across
//! the process".

use super::{DistributedEntry, DistributedStore};
use crate::error::Result;
use crate::options::CacheEntryOptions;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

struct StoredEntry {
    payload: Vec<u8>,
    /// Hard ceiling from absolute or relative expiry. Sliding refreshes
    /// never push past this.
    absolute_limit: Option<SystemTime>,
    sliding: Option<Duration>,
    expires_at: Option<SystemTime>,
}

impl StoredEntry {
    fn is_expired(&self, now: SystemTime) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    /// Restart the sliding window, bounded by the absolute limit.
    fn touch(&mut self, now: SystemTime) {
        if let Some(window) = self.sliding {
            let refreshed = now + window;
            self.expires_at = Some(match self.absolute_limit {
                Some(limit) => limit.min(refreshed),
                None => refreshed,
            });
        }
    }

    /// Remaining expiry reported back to the coordinator for retention
    /// reconciliation.
    fn reported_options(&self) -> Option<CacheEntryOptions> {
        let mut options = CacheEntryOptions::new();
        if let Some(deadline) = self.expires_at {
            options = options.expire_at(deadline);
        }
        if let Some(window) = self.sliding {
            options = options.sliding(window);
        }
        if options.is_unbounded() {
            None
        } else {
            Some(options)
        }
    }
}

/// Shared in-memory backing store.
///
/// Clones share the same entries. Expired entries are dropped lazily on
/// read.
#[derive(Clone, Default)]
pub struct InMemoryDistributedStore {
    entries: Arc<DashMap<String, StoredEntry>>,
}

impl InMemoryDistributedStore {
    pub fn new() -> Self {
        InMemoryDistributedStore {
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DistributedStore for InMemoryDistributedStore {
    async fn get(&self, key: &str) -> Result<Option<DistributedEntry>> {
        let now = SystemTime::now();

        let expired = match self.entries.get_mut(key) {
            None => return Ok(None),
            Some(mut entry) => {
                if entry.is_expired(now) {
                    true
                } else {
                    entry.touch(now);
                    debug!("✓ memory GET {} -> HIT", key);
                    return Ok(Some(DistributedEntry {
                        payload: entry.payload.clone(),
                        options: entry.reported_options(),
                    }));
                }
            }
        };

        if expired {
            self.entries.remove(key);
        }
        debug!("✗ memory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set(&self, key: &str, payload: Vec<u8>, options: &CacheEntryOptions) -> Result<()> {
        let now = SystemTime::now();

        let absolute_limit = options
            .absolute_expiration()
            .or_else(|| options.relative_expiration().map(|relative| now + relative));
        let sliding = options.sliding_expiration();

        let expires_at = match (absolute_limit, sliding) {
            (Some(limit), Some(window)) => Some(limit.min(now + window)),
            (Some(limit), None) => Some(limit),
            (None, Some(window)) => Some(now + window),
            (None, None) => None,
        };

        self.entries.insert(
            key.to_string(),
            StoredEntry {
                payload,
                absolute_limit,
                sliding,
                expires_at,
            },
        );
        debug!("✓ memory SET {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        debug!("✓ memory DEL {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryDistributedStore::new();

        store
            .set("k", b"\"v\"".to_vec(), &CacheEntryOptions::new())
            .await
            .expect("Failed to set");

        let entry = store
            .get("k")
            .await
            .expect("Failed to get")
            .expect("Entry missing");
        assert_eq!(entry.payload, b"\"v\"");
        // Unbounded entry reports no expiry to reconcile against.
        assert!(entry.options.is_none());

        store.remove("k").await.expect("Failed to remove");
        assert!(store.get("k").await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_relative_expiry_lapses() {
        let store = InMemoryDistributedStore::new();
        let options = CacheEntryOptions::new().expire_after(Duration::from_millis(20));

        store
            .set("k", b"1".to_vec(), &options)
            .await
            .expect("Failed to set");
        assert!(store.get("k").await.expect("Failed to get").is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.get("k").await.expect("Failed to get").is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_reported_remaining_expiry() {
        let store = InMemoryDistributedStore::new();
        let options = CacheEntryOptions::new().expire_after(Duration::from_secs(600));

        store
            .set("k", b"1".to_vec(), &options)
            .await
            .expect("Failed to set");

        let entry = store
            .get("k")
            .await
            .expect("Failed to get")
            .expect("Entry missing");
        let reported = entry.options.expect("Expiry not reported");
        let remaining = reported
            .remaining(SystemTime::now())
            .expect("Remaining not computed");

        // Freshly written: essentially the full window left.
        assert!(remaining <= Duration::from_secs(600));
        assert!(remaining >= Duration::from_secs(595));
    }

    #[tokio::test]
    async fn test_sliding_window_refreshes_on_read() {
        let store = InMemoryDistributedStore::new();
        let options = CacheEntryOptions::new().sliding(Duration::from_millis(200));

        store
            .set("k", b"1".to_vec(), &options)
            .await
            .expect("Failed to set");

        // Keep touching inside the window; the entry stays alive well past
        // the original deadline.
        for _ in 0..4 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(store.get("k").await.expect("Failed to get").is_some());
        }

        // Stop touching; the window lapses.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.get("k").await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_sliding_never_outlives_absolute_limit() {
        let store = InMemoryDistributedStore::new();
        let options = CacheEntryOptions::new()
            .expire_at(SystemTime::now() + Duration::from_millis(400))
            .sliding(Duration::from_millis(300));

        store
            .set("k", b"1".to_vec(), &options)
            .await
            .expect("Failed to set");

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(store.get("k").await.expect("Failed to get").is_some());

        // The read refreshed the slide, but the absolute limit still wins.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.get("k").await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let store = InMemoryDistributedStore::new();
        store.remove("missing").await.expect("Failed to remove");
    }
}
