//! Cache tier stores.
//!
//! The coordinator is generic over two collaborators: a [`DistributedStore`]
//! (shared, out-of-process, the source of truth, with its own expiry) and a
//! [`LocalStore`] (in-process, absorbs repeat reads within a short window).
//! Both are assumed internally thread-safe; the coordinator adds no locking.

pub mod inmemory;
pub mod local;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryDistributedStore;
pub use local::InMemoryLocalStore;
#[cfg(feature = "redis")]
pub use redis::{RedisConfig, RedisStore};

use crate::error::Result;
use crate::options::CacheEntryOptions;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// A native value held by the local tier.
///
/// The local tier stores values as-is, without serialization; a read
/// downcasts back to the caller's type, and a type mismatch reads as a miss.
pub type LocalValue = Arc<dyn Any + Send + Sync>;

/// A payload read back from the distributed tier.
#[derive(Debug, Clone)]
pub struct DistributedEntry {
    /// The serialized (JSON text) value.
    pub payload: Vec<u8>,

    /// Remaining expiry as reported by the store, when it can report one.
    /// Used to reconcile the local copy's retention; absent means the
    /// default retention applies.
    pub options: Option<CacheEntryOptions>,
}

/// The shared, out-of-process backing store.
///
/// Implementations own their expiry mechanics entirely: an entry written
/// with `options` must stop being returned by `get` once its window lapses.
/// Network-facing implementations should pool their own connections.
#[allow(async_fn_in_trait)]
pub trait DistributedStore: Send + Sync {
    /// Fetch an entry. `Ok(None)` is a miss; `Err` means the tier is
    /// unavailable.
    async fn get(&self, key: &str) -> Result<Option<DistributedEntry>>;

    /// Write an entry under the caller's expiry options.
    async fn set(&self, key: &str, payload: Vec<u8>, options: &CacheEntryOptions) -> Result<()>;

    /// Delete an entry. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// The in-process store.
///
/// Holds native values for at most `retention` per entry; eviction on expiry
/// is the store's own responsibility.
pub trait LocalStore: Send + Sync {
    /// Fetch a live entry. `Ok(None)` is a miss (absent, expired, or
    /// evicted).
    fn get(&self, key: &str) -> Result<Option<LocalValue>>;

    /// Store a value for at most `retention`.
    fn set(&self, key: &str, value: LocalValue, retention: Duration) -> Result<()>;

    /// Delete an entry. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
