//! Metrics hooks for cache operations.

use std::time::Duration;

/// Receiver for cache operation outcomes.
///
/// Implement this to feed hits, misses, and degraded operations into your
/// metrics system. `record_error` fires whenever a tier failure was
/// swallowed into a miss, so error rates stay observable even though callers
/// never see the failure.
///
/// # Example
///
/// ```ignore
/// struct StatsdMetrics { client: statsd::Client }
///
/// impl CacheMetrics for StatsdMetrics {
///     fn record_hit(&self, key: &str, duration: Duration) {
///         self.client.incr("cache.hit");
///     }
///
///     fn record_miss(&self, key: &str, duration: Duration) {
///         self.client.incr("cache.miss");
///     }
/// }
/// ```
pub trait CacheMetrics: Send + Sync {
    /// A get found a value in either tier.
    fn record_hit(&self, key: &str, duration: Duration);

    /// A get came up empty in both tiers.
    fn record_miss(&self, key: &str, duration: Duration);

    /// A tier failure was degraded into a miss/no-op.
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Default metrics handler: discards everything.
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
}
