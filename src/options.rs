//! Expiry options for cache entries.

use std::time::{Duration, SystemTime};

/// Requested expiry for a distributed-tier entry.
///
/// At most one of the three windows governs TTL computation, with precedence
/// absolute > relative > sliding. Options are passed by value into the
/// coordinator and never retained beyond the call.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tier_cache::CacheEntryOptions;
///
/// let options = CacheEntryOptions::new().expire_after(Duration::from_secs(600));
/// assert_eq!(options.relative_expiration(), Some(Duration::from_secs(600)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntryOptions {
    absolute_expiration: Option<SystemTime>,
    relative_expiration: Option<Duration>,
    sliding_expiration: Option<Duration>,
}

impl CacheEntryOptions {
    /// Options with no expiry; the distributed store applies its own default.
    pub fn new() -> Self {
        CacheEntryOptions::default()
    }

    /// Expire at a fixed point in time.
    pub fn expire_at(mut self, deadline: SystemTime) -> Self {
        self.absolute_expiration = Some(deadline);
        self
    }

    /// Expire a fixed duration after the write.
    pub fn expire_after(mut self, duration: Duration) -> Self {
        self.relative_expiration = Some(duration);
        self
    }

    /// Expire after a period of inactivity; each read restarts the window.
    pub fn sliding(mut self, window: Duration) -> Self {
        self.sliding_expiration = Some(window);
        self
    }

    pub fn absolute_expiration(&self) -> Option<SystemTime> {
        self.absolute_expiration
    }

    pub fn relative_expiration(&self) -> Option<Duration> {
        self.relative_expiration
    }

    pub fn sliding_expiration(&self) -> Option<Duration> {
        self.sliding_expiration
    }

    /// True when no expiry window is set at all.
    pub fn is_unbounded(&self) -> bool {
        self.absolute_expiration.is_none()
            && self.relative_expiration.is_none()
            && self.sliding_expiration.is_none()
    }

    /// Remaining lifetime as seen at `now`.
    ///
    /// Applies the absolute > relative > sliding precedence. An absolute
    /// deadline already in the past yields `Duration::ZERO`, not `None`.
    /// Returns `None` when no window is set.
    pub fn remaining(&self, now: SystemTime) -> Option<Duration> {
        if let Some(deadline) = self.absolute_expiration {
            return Some(deadline.duration_since(now).unwrap_or(Duration::ZERO));
        }
        if let Some(duration) = self.relative_expiration {
            return Some(duration);
        }
        self.sliding_expiration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_window_has_no_remaining() {
        let options = CacheEntryOptions::new();
        assert!(options.is_unbounded());
        assert_eq!(options.remaining(SystemTime::now()), None);
    }

    #[test]
    fn test_relative_remaining() {
        let options = CacheEntryOptions::new().expire_after(Duration::from_secs(120));
        assert_eq!(
            options.remaining(SystemTime::now()),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn test_sliding_remaining() {
        let options = CacheEntryOptions::new().sliding(Duration::from_secs(30));
        assert_eq!(
            options.remaining(SystemTime::now()),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_absolute_takes_precedence() {
        let now = SystemTime::now();
        let options = CacheEntryOptions::new()
            .expire_at(now + Duration::from_secs(10))
            .expire_after(Duration::from_secs(1000))
            .sliding(Duration::from_secs(2000));

        let remaining = options.remaining(now).expect("Remaining not computed");
        assert_eq!(remaining, Duration::from_secs(10));
    }

    #[test]
    fn test_relative_beats_sliding() {
        let options = CacheEntryOptions::new()
            .expire_after(Duration::from_secs(100))
            .sliding(Duration::from_secs(999));

        assert_eq!(
            options.remaining(SystemTime::now()),
            Some(Duration::from_secs(100))
        );
    }

    #[test]
    fn test_expired_absolute_is_zero_not_none() {
        let now = SystemTime::now();
        let options = CacheEntryOptions::new().expire_at(now - Duration::from_secs(5));
        assert_eq!(options.remaining(now), Some(Duration::ZERO));
    }
}
