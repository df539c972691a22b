//! Benchmarks for level and hierarchy operations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tiercache::{CacheLevel, EvictionPolicy, TieredCache};

fn bench_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("CacheLevel");

    for policy in [EvictionPolicy::Recency, EvictionPolicy::Frequency] {
        group.bench_with_input(BenchmarkId::new("get_hit", policy), &policy, |b, &policy| {
            let level = CacheLevel::new(1_000, policy).unwrap();
            for i in 0..1_000u64 {
                level.put(i, i);
            }
            b.iter(|| black_box(level.get(black_box(&500))))
        });

        // Every put misses and evicts; frequency eviction scans the level
        group.bench_with_input(
            BenchmarkId::new("put_evict", policy),
            &policy,
            |b, &policy| {
                let level = CacheLevel::new(1_000, policy).unwrap();
                let mut next = 0u64;
                b.iter(|| {
                    next += 1;
                    black_box(level.put(next, next))
                })
            },
        );
    }

    group.finish();
}

fn bench_hierarchy(c: &mut Criterion) {
    let mut group = c.benchmark_group("TieredCache");

    group.bench_function("get_first_level_hit", |b| {
        let cache = TieredCache::new();
        cache.add_level(100, EvictionPolicy::Recency).unwrap();
        cache.add_level(10_000, EvictionPolicy::Frequency).unwrap();
        cache.put(1u64, 1u64);

        b.iter(|| black_box(cache.get(black_box(&1))))
    });

    group.bench_function("get_deep_hit_with_promotion", |b| {
        let cache = TieredCache::new();
        cache.add_level(16, EvictionPolicy::Recency).unwrap();
        cache.add_level(10_000, EvictionPolicy::Recency).unwrap();
        let deep = cache.level(1).unwrap();
        for i in 0..10_000u64 {
            deep.put(i, i);
        }

        let mut next = 0u64;
        b.iter(|| {
            next = (next + 17) % 10_000;
            black_box(cache.get(&next))
        })
    });

    group.bench_function("miss", |b| {
        let cache = TieredCache::<u64, u64>::new();
        cache.add_level(100, EvictionPolicy::Recency).unwrap();
        cache.add_level(1_000, EvictionPolicy::Frequency).unwrap();

        b.iter(|| black_box(cache.get(black_box(&42))))
    });

    group.finish();
}

criterion_group!(benches, bench_level, bench_hierarchy);
criterion_main!(benches);
