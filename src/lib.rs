//! # tier-cache
//!
//! A two-tier (in-process + distributed) read-through/write-through cache
//! coordinator for Rust.
//!
//! ## Features
//!
//! - **Two Tiers, One API:** a local in-process tier absorbs repeat reads; a
//!   distributed backing store stays the source of truth
//! - **TTL Reconciliation:** the local copy never outlives the distributed
//!   entry - short-lived entries keep only half their remaining lifetime
//!   locally
//! - **Failure Isolation:** a tier failure degrades to a cache miss; cache
//!   operations never fail the caller
//! - **Backend Agnostic:** bring any [`store::DistributedStore`] /
//!   [`store::LocalStore`]; in-memory stores ship in-tree, Redis behind the
//!   `redis` feature
//! - **Async and Blocking:** a tokio-native API plus a blocking facade for
//!   synchronous callers
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use tier_cache::{CacheEntryOptions, TieredCache};
//! use tier_cache::store::{InMemoryDistributedStore, InMemoryLocalStore};
//!
//! #[derive(Clone, serde::Serialize, serde::Deserialize)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! let cache = TieredCache::builder(InMemoryDistributedStore::new(), InMemoryLocalStore::new())
//!     .with_default_retention_secs(3600)
//!     .build();
//!
//! // Write through both tiers.
//! cache.set(
//!     "user:42",
//!     User { id: "42".into(), name: "alice".into() },
//!     CacheEntryOptions::new().expire_after(Duration::from_secs(600)),
//! ).await;
//!
//! // Read: local tier first, distributed fallback.
//! let user = cache.get::<User>("user:42").await;
//!
//! // Miss-then-populate.
//! let user = cache.get_or_create("user:43", || async {
//!     let user = load_user("43").await;
//!     (user, CacheEntryOptions::new().expire_after(Duration::from_secs(600)))
//! }).await;
//! ```
//!
//! Cache operations are best-effort by contract: every tier failure is
//! logged and collapsed into the same observable shape as a miss, so a
//! broken cache can slow a request down but never fail it.

#[macro_use]
extern crate log;

pub mod blocking;
pub mod builder;
pub mod coordinator;
pub mod error;
pub mod key;
pub mod observability;
pub mod options;
pub mod retention;
pub mod serialization;
pub mod store;

// Re-exports for convenience
pub use blocking::BlockingTieredCache;
pub use builder::TieredCacheBuilder;
pub use coordinator::TieredCache;
pub use error::{Error, Result};
pub use key::KeyBuilder;
pub use observability::{CacheMetrics, NoOpMetrics};
pub use options::CacheEntryOptions;
pub use retention::RetentionPolicy;
pub use serialization::CacheValue;
pub use store::{DistributedEntry, DistributedStore, LocalStore, LocalValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
