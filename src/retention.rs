//! Local-tier retention policy.

use crate::options::CacheEntryOptions;
use std::time::{Duration, SystemTime};

/// Default local retention when none is configured: one day.
pub const DEFAULT_LOCAL_RETENTION_SECS: u64 = 86_400;

/// Computes how long the local tier may keep a copy of an entry.
///
/// The local tier must never outlive the distributed entry, or it would serve
/// data past the caller's expiry contract. When the distributed entry has
/// less lifetime left than the configured default, the local copy gets half
/// of that remainder: the halving covers clock skew and the race where the
/// distributed entry vanishes moments after the local copy was refreshed
/// from it.
///
/// Fixed at coordinator construction; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    default_retention: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy::new(Duration::from_secs(DEFAULT_LOCAL_RETENTION_SECS))
    }
}

impl RetentionPolicy {
    pub fn new(default_retention: Duration) -> Self {
        RetentionPolicy { default_retention }
    }

    /// Build from the conventional "seconds" configuration value.
    pub fn from_secs(default_retention_secs: u64) -> Self {
        RetentionPolicy::new(Duration::from_secs(default_retention_secs))
    }

    pub fn default_retention(&self) -> Duration {
        self.default_retention
    }

    /// Effective local retention for an entry written or read back with
    /// `options`.
    ///
    /// 1. No options, or options with no expiry window: the default.
    /// 2. Otherwise take the remaining distributed lifetime
    ///    (absolute > relative > sliding precedence).
    /// 3. `remaining >= default`: the default.
    /// 4. Else `remaining / 2`.
    pub fn effective(&self, options: Option<&CacheEntryOptions>) -> Duration {
        let Some(options) = options else {
            return self.default_retention;
        };

        match options.remaining(SystemTime::now()) {
            None => self.default_retention,
            Some(remaining) if remaining >= self.default_retention => self.default_retention,
            Some(remaining) => remaining / 2,
        }
    }
}
