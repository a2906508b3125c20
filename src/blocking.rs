//! Blocking forms of the cache operations.

use crate::error::{Error, Result};
use crate::options::CacheEntryOptions;
use crate::serialization::CacheValue;
use crate::store::{DistributedStore, LocalStore};
use crate::TieredCache;

/// Blocking facade over [`TieredCache`].
///
/// Owns a single-threaded tokio runtime and drives the async coordinator to
/// completion on the calling thread. Intended for synchronous callers
/// (CLIs, batch jobs, non-async services); do not construct or call one
/// from inside an async runtime.
///
/// # Example
///
/// ```
/// use tier_cache::blocking::BlockingTieredCache;
/// use tier_cache::store::{InMemoryDistributedStore, InMemoryLocalStore};
/// use tier_cache::{CacheEntryOptions, TieredCache};
///
/// let cache = TieredCache::new(InMemoryDistributedStore::new(), InMemoryLocalStore::new());
/// let cache = BlockingTieredCache::new(cache).expect("runtime build failed");
///
/// cache.set("answer", 42u64, CacheEntryOptions::new());
/// assert_eq!(cache.get::<u64>("answer"), Some(42));
/// ```
pub struct BlockingTieredCache<D: DistributedStore, L: LocalStore> {
    inner: TieredCache<D, L>,
    runtime: tokio::runtime::Runtime,
}

impl<D: DistributedStore, L: LocalStore> BlockingTieredCache<D, L> {
    /// Wrap an async coordinator.
    ///
    /// # Errors
    /// Returns `Err` if the runtime cannot be built
    pub fn new(inner: TieredCache<D, L>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build runtime: {}", e)))?;

        Ok(BlockingTieredCache { inner, runtime })
    }

    /// Blocking [`TieredCache::get`].
    pub fn get<T: CacheValue>(&self, key: &str) -> Option<T> {
        self.runtime.block_on(self.inner.get(key))
    }

    /// Blocking [`TieredCache::set`].
    pub fn set<T: CacheValue>(&self, key: &str, value: T, options: CacheEntryOptions) -> T {
        self.runtime.block_on(self.inner.set(key, value, options))
    }

    /// Blocking [`TieredCache::get_or_create`] with a synchronous factory.
    pub fn get_or_create<T, F>(&self, key: &str, factory: F) -> T
    where
        T: CacheValue,
        F: FnOnce() -> (T, CacheEntryOptions),
    {
        self.runtime
            .block_on(self.inner.get_or_create(key, || async { factory() }))
    }

    /// Blocking [`TieredCache::remove`].
    pub fn remove<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.runtime.block_on(self.inner.remove(keys))
    }

    /// The wrapped async coordinator.
    pub fn inner(&self) -> &TieredCache<D, L> {
        &self.inner
    }
}
