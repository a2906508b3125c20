//! Two-tier cache coordinator - main entry point for cache operations.

use crate::error::Result;
use crate::key::KeyBuilder;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::options::CacheEntryOptions;
use crate::retention::RetentionPolicy;
use crate::serialization::{self, CacheValue};
use crate::store::{DistributedStore, LocalStore, LocalValue};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Core two-tier coordinator: a read-through/write-through cache over a
/// distributed backing store and an in-process local store.
///
/// Reads hit the local tier first and fall back to the distributed tier on
/// miss, at most one distributed round trip per call; a distributed hit is
/// copied into the local tier so repeat reads within a short window stay
/// in-process. Writes go to the distributed tier (the source of truth)
/// first, then to the local tier.
///
/// A cache must never be the reason a request fails: every tier interaction
/// is guarded, and any tier failure degrades into the same observable shape
/// as a miss. Callers must treat all operations as best-effort and never
/// rely on them for correctness.
///
/// The coordinator holds no mutable state - just the two store handles, the
/// retention policy, and metrics - so a shared reference can be used from
/// any number of tasks concurrently.
///
/// # Example
///
/// ```ignore
/// use tier_cache::{TieredCache, store::{InMemoryDistributedStore, InMemoryLocalStore}};
///
/// let cache = TieredCache::new(InMemoryDistributedStore::new(), InMemoryLocalStore::new());
/// let user = cache.get::<User>("user:42").await;
/// ```
pub struct TieredCache<D: DistributedStore, L: LocalStore> {
    distributed: D,
    local: L,
    keys: KeyBuilder,
    retention: RetentionPolicy,
    metrics: Box<dyn CacheMetrics>,
}

impl<D: DistributedStore, L: LocalStore> TieredCache<D, L> {
    /// Create a new coordinator over the given tiers with default retention.
    pub fn new(distributed: D, local: L) -> Self {
        TieredCache {
            distributed,
            local,
            keys: KeyBuilder::new(),
            retention: RetentionPolicy::default(),
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Create a builder for configured construction.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let cache = TieredCache::builder(distributed, local)
    ///     .with_default_retention_secs(3600)
    ///     .with_namespace("checkout")
    ///     .build();
    /// ```
    pub fn builder(distributed: D, local: L) -> crate::builder::TieredCacheBuilder<D, L> {
        crate::builder::TieredCacheBuilder::new(distributed, local)
    }

    /// Set custom retention policy.
    pub fn with_retention_policy(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Namespace every key (`"{namespace}:{key}"`, applied to both tiers).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.keys = KeyBuilder::with_namespace(namespace);
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub(crate) fn from_parts(
        distributed: D,
        local: L,
        keys: KeyBuilder,
        retention: RetentionPolicy,
        metrics: Box<dyn CacheMetrics>,
    ) -> Self {
        TieredCache {
            distributed,
            local,
            keys,
            retention,
            metrics,
        }
    }

    /// The retention policy in effect.
    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    /// Get distributed store reference (for advanced use).
    pub fn distributed(&self) -> &D {
        &self.distributed
    }

    /// Get local store reference (for advanced use).
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Fetch a value.
    ///
    /// Checks the local tier first; on local miss performs at most one
    /// distributed round trip and, on a hit there, repopulates the local
    /// tier under the reconciled retention. Returns `None` on a genuine
    /// miss, an undecodable payload, or a tier failure - all three collapse
    /// into the same shape by design.
    ///
    /// Dropping the returned future aborts any in-flight distributed call;
    /// a cancelled get yields no value and records neither hit nor miss.
    pub async fn get<T: CacheValue>(&self, key: &str) -> Option<T> {
        let timer = Instant::now();
        let cache_key = self.keys.build(key);

        if let Some(value) = self.local_lookup::<T>(&cache_key) {
            debug!("✓ local hit for {}", cache_key);
            self.metrics.record_hit(&cache_key, timer.elapsed());
            return Some(value);
        }

        let entry = self
            .degrade("get", &cache_key, self.distributed.get(&cache_key).await)
            .flatten();

        let Some(entry) = entry else {
            debug!("✗ miss for {}", cache_key);
            self.metrics.record_miss(&cache_key, timer.elapsed());
            return None;
        };

        let Some(value) = serialization::decode::<T>(&entry.payload) else {
            // Undecodable payloads read as absent; expected under schema
            // evolution, so not an error.
            self.metrics.record_miss(&cache_key, timer.elapsed());
            return None;
        };

        let retention = self.retention.effective(entry.options.as_ref());
        self.local_fill(&cache_key, &value, retention);

        debug!("✓ distributed hit for {}", cache_key);
        self.metrics.record_hit(&cache_key, timer.elapsed());
        Some(value)
    }

    /// Store a value under the given expiry options.
    ///
    /// The distributed write happens first so that an interruption between
    /// the two writes leaves the source of truth correct; the local copy is
    /// then written under the reconciled retention. The two writes are not
    /// atomic with each other, and either may individually degrade to a
    /// no-op. Returns the value for fluent call patterns.
    pub async fn set<T: CacheValue>(&self, key: &str, value: T, options: CacheEntryOptions) -> T {
        let cache_key = self.keys.build(key);

        match serialization::encode(&value) {
            Ok(payload) => {
                self.degrade(
                    "set",
                    &cache_key,
                    self.distributed.set(&cache_key, payload, &options).await,
                );
            }
            Err(e) => {
                warn!("✗ cache set skipped distributed tier for {}: {}", cache_key, e);
                self.metrics.record_error(&cache_key, &e.to_string());
            }
        }

        let retention = self.retention.effective(Some(&options));
        self.local_fill(&cache_key, &value, retention);

        value
    }

    /// Fetch a value, producing and storing it on miss.
    ///
    /// The factory returns the value together with the expiry options to
    /// persist it under. No single-flight de-duplication is performed:
    /// concurrent callers that all miss will each invoke their factory and
    /// each write the result (last write wins). Callers needing stampede
    /// protection must provide it themselves.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let profile = cache
    ///     .get_or_create("profile:42", || async {
    ///         let profile = load_profile(42).await;
    ///         (profile, CacheEntryOptions::new().expire_after(Duration::from_secs(600)))
    ///     })
    ///     .await;
    /// ```
    pub async fn get_or_create<T, F, Fut>(&self, key: &str, factory: F) -> T
    where
        T: CacheValue,
        F: FnOnce() -> Fut,
        Fut: Future<Output = (T, CacheEntryOptions)>,
    {
        if let Some(value) = self.get::<T>(key).await {
            return value;
        }

        let (value, options) = factory().await;
        self.set(key, value, options).await
    }

    /// Remove entries from both tiers.
    ///
    /// Failures are isolated per key and per tier: one failing key never
    /// prevents removal attempts on the others.
    pub async fn remove<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let removals = keys.into_iter().map(|key| {
            let cache_key = self.keys.build(key.as_ref());
            async move {
                self.degrade(
                    "remove",
                    &cache_key,
                    self.distributed.remove(&cache_key).await,
                );
                self.degrade("local remove", &cache_key, self.local.remove(&cache_key));
            }
        });

        futures::future::join_all(removals).await;
    }

    /// Failure-isolation guard shared by every operation: a tier failure is
    /// logged with the offending key and degrades to miss/no-op instead of
    /// reaching the caller.
    fn degrade<V>(&self, operation: &str, cache_key: &str, result: Result<V>) -> Option<V> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("✗ cache {} degraded to miss for {}: {}", operation, cache_key, e);
                self.metrics.record_error(cache_key, &e.to_string());
                None
            }
        }
    }

    fn local_lookup<T: CacheValue>(&self, cache_key: &str) -> Option<T> {
        let slot = self
            .degrade("local get", cache_key, self.local.get(cache_key))
            .flatten()?;

        // A blob stored under another type reads as a miss.
        match slot.downcast::<T>() {
            Ok(value) => Some((*value).clone()),
            Err(_) => None,
        }
    }

    fn local_fill<T: CacheValue>(&self, cache_key: &str, value: &T, retention: Duration) {
        if retention.is_zero() {
            return;
        }
        let slot: LocalValue = Arc::new(value.clone());
        self.degrade(
            "local set",
            cache_key,
            self.local.set(cache_key, slot, retention),
        );
    }
}
