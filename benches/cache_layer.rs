//! Composite cache benchmarks
//!
//! Measures the two-layer read path (bloom existence filter in front of
//! the moka object cache) and the cost of filter rebuilds.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gotolink::cache::existence_filter::BloomExistenceFilter;
use gotolink::cache::object_cache::MokaObjectCache;
use gotolink::cache::{CacheResult, CompositeCache, CompositeCacheTrait};
use gotolink::storage::ShortUrl;
use std::sync::Arc;
use std::time::Duration;

fn test_url(uid: &str) -> ShortUrl {
    ShortUrl {
        uid: uid.to_string(),
        path: "d/abc/dashboard?orgId=1".to_string(),
        created_by: 1,
        created_at: chrono::Utc::now(),
        last_seen_at: None,
    }
}

fn build_composite() -> Arc<CompositeCache> {
    let l1 = Arc::new(BloomExistenceFilter::new().unwrap());
    let l2 = Arc::new(MokaObjectCache::new(10_000, Duration::from_secs(60)));
    Arc::new(CompositeCache::new(l1, l2))
}

// ============== read path ==============

fn bench_composite_get_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cache = build_composite();

    rt.block_on(async {
        for i in 0..1000 {
            let uid = format!("key_{}", i);
            cache.insert(uid.clone(), test_url(&uid)).await;
        }
    });

    c.bench_function("composite/get_hit", |b| {
        b.to_async(&rt).iter(|| {
            let cache = Arc::clone(&cache);
            async move {
                let result = cache.get("key_500").await;
                assert!(matches!(result, CacheResult::Found(_)));
            }
        });
    });
}

fn bench_composite_get_filtered_miss(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cache = build_composite();

    rt.block_on(async {
        for i in 0..1000 {
            let uid = format!("key_{}", i);
            cache.insert(uid.clone(), test_url(&uid)).await;
        }
    });

    // The filter rules the key out; the object cache is never consulted
    c.bench_function("composite/get_filtered_miss", |b| {
        b.to_async(&rt).iter(|| {
            let cache = Arc::clone(&cache);
            async move {
                let result = cache.get("nonexistent_key").await;
                assert!(matches!(result, CacheResult::NotFound));
            }
        });
    });
}

fn bench_composite_get_cold_object(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cache = build_composite();

    // Keys known to the filter but never inserted into the object cache,
    // the pattern right after a filter rebuild
    rt.block_on(async {
        let keys: Vec<String> = (0..1000).map(|i| format!("cold_{}", i)).collect();
        cache.rebuild_filter(&keys, 0.001).await.unwrap();
    });

    c.bench_function("composite/get_cold_object", |b| {
        b.to_async(&rt).iter(|| {
            let cache = Arc::clone(&cache);
            async move {
                let result = cache.get("cold_500").await;
                assert!(matches!(result, CacheResult::ExistsButNoValue));
            }
        });
    });
}

// ============== write path ==============

fn bench_composite_insert(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cache = build_composite();
    let counter = std::sync::atomic::AtomicU64::new(0);

    c.bench_function("composite/insert", |b| {
        b.to_async(&rt).iter(|| {
            let cache = Arc::clone(&cache);
            let i = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            let uid = format!("insert_{}", i);
            let url = test_url(&uid);
            async move {
                cache.insert(uid, url).await;
            }
        });
    });
}

// ============== filter rebuild ==============

fn bench_filter_rebuild(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("composite/rebuild_filter");

    for size in [1_000usize, 10_000] {
        let keys: Vec<String> = (0..size).map(|i| format!("uid_{:08}", i)).collect();
        let cache = build_composite();

        group.bench_with_input(BenchmarkId::new("keys", size), &keys, |b, keys| {
            b.to_async(&rt).iter(|| {
                let cache = Arc::clone(&cache);
                async move {
                    cache.rebuild_filter(keys, 0.001).await.unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_composite_get_hit,
    bench_composite_get_filtered_miss,
    bench_composite_get_cold_object,
    bench_composite_insert,
    bench_filter_rebuild,
);
criterion_main!(benches);
