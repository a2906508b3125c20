//! Coordinator benchmarks over the in-memory tiers.

use criterion::{criterion_group, criterion_main, Criterion};
use std::time::Duration;
use tier_cache::store::{InMemoryDistributedStore, InMemoryLocalStore};
use tier_cache::{CacheEntryOptions, LocalStore, TieredCache};

fn bench_two_tier(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    let cache = TieredCache::new(InMemoryDistributedStore::new(), InMemoryLocalStore::new());

    rt.block_on(async {
        cache
            .set(
                "hot",
                "cached payload".to_string(),
                CacheEntryOptions::new(),
            )
            .await;
    });

    c.bench_function("get_local_hit", |b| {
        b.to_async(&rt)
            .iter(|| async { cache.get::<String>("hot").await });
    });

    c.bench_function("get_miss_both_tiers", |b| {
        b.to_async(&rt)
            .iter(|| async { cache.get::<String>("cold").await });
    });

    c.bench_function("set_write_through", |b| {
        b.to_async(&rt).iter(|| async {
            cache
                .set(
                    "write",
                    "fresh payload".to_string(),
                    CacheEntryOptions::new().expire_after(Duration::from_secs(600)),
                )
                .await
        });
    });

    // Distributed-tier hits: drop the local copy before every read.
    let local = InMemoryLocalStore::new();
    let distributed_cache = TieredCache::new(InMemoryDistributedStore::new(), local.clone());
    rt.block_on(async {
        distributed_cache
            .set(
                "promote",
                "cached payload".to_string(),
                CacheEntryOptions::new(),
            )
            .await;
    });

    c.bench_function("get_distributed_hit_with_promotion", |b| {
        b.to_async(&rt).iter(|| async {
            local.remove("promote").expect("Failed to evict");
            distributed_cache.get::<String>("promote").await
        });
    });
}

criterion_group!(benches, bench_two_tier);
criterion_main!(benches);
