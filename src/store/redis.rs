//! Redis distributed tier.

use super::{DistributedEntry, DistributedStore};
use crate::error::{Error, Result};
use crate::options::CacheEntryOptions;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default Redis connection pool size.
/// Formula: (CPU cores × 2) + 1
/// For 8-core systems: 16 connections is optimal
/// Override with REDIS_POOL_SIZE environment variable
const DEFAULT_POOL_SIZE: usize = 16;

/// Hash fields per entry: the payload plus expiry metadata, so sliding
/// windows can refresh on read and remaining lifetime stays retrievable.
const FIELD_DATA: &str = "data";
const FIELD_ABSEXP: &str = "absexp";
const FIELD_SLDEXP: &str = "sldexp";

/// "No value" marker for the numeric expiry fields.
const NOT_SET: i64 = -1;

/// Configuration for the Redis backend.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String, // e.g., "redis://cache1:6379/0"
    pub connection_timeout: Duration,
    pub pool_size: usize,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            connection_timeout: Duration::from_secs(5),
            pool_size: 10,
        }
    }
}

/// Redis backend with connection pooling and async operations.
///
/// Each entry is stored as a hash `{data, absexp, sldexp}` with a
/// server-side expiry. `absexp` is the absolute deadline in unix seconds,
/// `sldexp` the sliding window in seconds; `-1` means not set. A read under
/// a sliding window re-arms the server-side expiry, never past `absexp`.
///
/// # Example
///
/// ```no_run
/// # use tier_cache::store::{RedisStore, RedisConfig, DistributedStore};
/// # use tier_cache::{CacheEntryOptions, Result};
/// # async fn example() -> Result<()> {
/// let store = RedisStore::new(RedisConfig::default())?;
/// store.set("key", b"\"value\"".to_vec(), &CacheEntryOptions::new()).await?;
/// let entry = store.get("key").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    /// Create a new Redis backend from configuration.
    ///
    /// # Errors
    /// Returns `Err` if the connection pool cannot be built
    pub fn new(config: RedisConfig) -> Result<Self> {
        let pool = Config::from_url(config.url.clone())
            .builder()
            .map_err(|e| Error::ConfigError(format!("Invalid Redis configuration: {}", e)))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create connection pool: {}", e)))?;

        info!(
            "✓ Redis backend initialized with server: {} (pool size: {})",
            config.url, config.pool_size
        );

        Ok(RedisStore { pool })
    }

    /// Create from a connection URL directly.
    ///
    /// Pool size is determined by:
    /// 1. `REDIS_POOL_SIZE` environment variable (if set)
    /// 2. `DEFAULT_POOL_SIZE` constant (16)
    ///
    /// # Errors
    /// Returns `Err` if the connection pool cannot be built
    pub fn from_url(url: impl Into<String>) -> Result<Self> {
        let pool_size = std::env::var("REDIS_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        let config = RedisConfig {
            url: url.into(),
            pool_size,
            ..Default::default()
        };
        Self::new(config)
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| Error::BackendError(format!("Failed to get Redis connection: {}", e)))
    }

    /// Verify the server answers PING.
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(_) => return Ok(false),
        };

        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(reply) => Ok(reply == "PONG"),
            Err(_) => Ok(false),
        }
    }
}

/// Server-side expiry for a freshly written entry: the sliding window,
/// bounded by the remaining absolute lifetime.
fn write_expiry(
    absolute_limit: Option<SystemTime>,
    sliding: Option<Duration>,
    now: SystemTime,
) -> Option<Duration> {
    let remaining =
        absolute_limit.map(|deadline| deadline.duration_since(now).unwrap_or(Duration::ZERO));

    match (remaining, sliding) {
        (Some(remaining), Some(window)) => Some(remaining.min(window)),
        (Some(remaining), None) => Some(remaining),
        (None, Some(window)) => Some(window),
        (None, None) => None,
    }
}

fn unix_secs(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl DistributedStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<DistributedEntry>> {
        let mut conn = self.connection().await?;

        let (absexp, sldexp, data): (Option<i64>, Option<i64>, Option<Vec<u8>>) = conn
            .hget(key, &[FIELD_ABSEXP, FIELD_SLDEXP, FIELD_DATA])
            .await
            .map_err(|e| {
                Error::BackendError(format!("Redis GET failed for key {}: {}", key, e))
            })?;

        let Some(payload) = data else {
            debug!("✗ Redis GET {} -> MISS", key);
            return Ok(None);
        };

        let absexp = absexp.filter(|v| *v != NOT_SET);
        let sldexp = sldexp.filter(|v| *v != NOT_SET);

        // Re-arm the sliding window, never past the absolute deadline.
        if let Some(window) = sldexp {
            let refresh = match absexp {
                Some(deadline) => {
                    let now = unix_secs(SystemTime::now());
                    window.min((deadline - now).max(0))
                }
                None => window,
            };
            conn.expire::<_, ()>(key, refresh).await.map_err(|e| {
                Error::BackendError(format!("Redis EXPIRE failed for key {}: {}", key, e))
            })?;
        }

        let mut options = CacheEntryOptions::new();
        if let Some(deadline) = absexp {
            options = options.expire_at(UNIX_EPOCH + Duration::from_secs(deadline.max(0) as u64));
        }
        if let Some(window) = sldexp {
            options = options.sliding(Duration::from_secs(window.max(0) as u64));
        }

        debug!("✓ Redis GET {} -> HIT", key);
        Ok(Some(DistributedEntry {
            payload,
            options: if options.is_unbounded() {
                None
            } else {
                Some(options)
            },
        }))
    }

    async fn set(&self, key: &str, payload: Vec<u8>, options: &CacheEntryOptions) -> Result<()> {
        let mut conn = self.connection().await?;
        let now = SystemTime::now();

        let absolute_limit = options
            .absolute_expiration()
            .or_else(|| options.relative_expiration().map(|relative| now + relative));
        let sliding = options.sliding_expiration();

        let absexp = absolute_limit.map(unix_secs).unwrap_or(NOT_SET);
        let sldexp = sliding.map(|d| d.as_secs() as i64).unwrap_or(NOT_SET);

        redis::pipe()
            .hset(key, FIELD_DATA, payload.as_slice())
            .ignore()
            .hset(key, FIELD_ABSEXP, absexp)
            .ignore()
            .hset(key, FIELD_SLDEXP, sldexp)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::BackendError(format!("Redis SET failed for key {}: {}", key, e)))?;

        match write_expiry(absolute_limit, sliding, now) {
            Some(expiry) => {
                conn.pexpire::<_, ()>(key, expiry.as_millis() as i64)
                    .await
                    .map_err(|e| {
                        Error::BackendError(format!("Redis PEXPIRE failed for key {}: {}", key, e))
                    })?;
                debug!("✓ Redis SET {} (TTL: {:?})", key, expiry);
            }
            None => {
                // Overwrites of an expiring entry must not inherit its TTL.
                conn.persist::<_, ()>(key).await.map_err(|e| {
                    Error::BackendError(format!("Redis PERSIST failed for key {}: {}", key, e))
                })?;
                debug!("✓ Redis SET {}", key);
            }
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(key).await.map_err(|e| {
            Error::BackendError(format!("Redis DEL failed for key {}: {}", key, e))
        })?;

        debug!("✓ Redis DEL {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_default() {
        let config = RedisConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.pool_size, 10);
    }

    #[test]
    fn test_write_expiry_sliding_bounded_by_absolute() {
        let now = SystemTime::now();
        let expiry = write_expiry(
            Some(now + Duration::from_secs(30)),
            Some(Duration::from_secs(120)),
            now,
        );
        assert_eq!(expiry, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_write_expiry_sliding_only() {
        let expiry = write_expiry(None, Some(Duration::from_secs(120)), SystemTime::now());
        assert_eq!(expiry, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_write_expiry_unbounded() {
        assert_eq!(write_expiry(None, None, SystemTime::now()), None);
    }

    #[test]
    fn test_write_expiry_past_deadline_is_zero() {
        let now = SystemTime::now();
        let expiry = write_expiry(Some(now - Duration::from_secs(5)), None, now);
        assert_eq!(expiry, Some(Duration::ZERO));
    }
}
