//! Builder pattern for coordinator construction.

use crate::key::KeyBuilder;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::retention::RetentionPolicy;
use crate::store::{DistributedStore, LocalStore};
use crate::TieredCache;
use std::time::Duration;

/// Fluent builder for a [`TieredCache`].
///
/// Everything configured here is fixed at construction: the coordinator
/// holds no mutable configuration afterwards.
///
/// # Example
///
/// ```ignore
/// let cache = TieredCache::builder(distributed, local)
///     .with_default_retention_secs(3600)
///     .with_namespace("checkout")
///     .with_metrics(Box::new(statsd))
///     .build();
/// ```
pub struct TieredCacheBuilder<D: DistributedStore, L: LocalStore> {
    distributed: D,
    local: L,
    retention: RetentionPolicy,
    keys: KeyBuilder,
    metrics: Box<dyn CacheMetrics>,
}

impl<D: DistributedStore, L: LocalStore> TieredCacheBuilder<D, L> {
    /// Create a new builder with default settings.
    pub(crate) fn new(distributed: D, local: L) -> Self {
        Self {
            distributed,
            local,
            retention: RetentionPolicy::default(),
            keys: KeyBuilder::new(),
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set the default local retention.
    pub fn with_default_retention(mut self, retention: Duration) -> Self {
        self.retention = RetentionPolicy::new(retention);
        self
    }

    /// Set the default local retention from the conventional
    /// "seconds" configuration value.
    pub fn with_default_retention_secs(mut self, retention_secs: u64) -> Self {
        self.retention = RetentionPolicy::from_secs(retention_secs);
        self
    }

    /// Namespace every key (`"{namespace}:{key}"`, both tiers).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.keys = KeyBuilder::with_namespace(namespace);
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Build the coordinator.
    pub fn build(self) -> TieredCache<D, L> {
        TieredCache::from_parts(
            self.distributed,
            self.local,
            self.keys,
            self.retention,
            self.metrics,
        )
    }
}
