//! Behavioral properties of the tiered cache under mixed workloads.
//!
//! Run: cargo test -p tiered-cache --test tiered_cache_properties

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tiered_cache::{CacheKey, TierLevel, TieredCache, TieredCacheConfig};

fn cache(hot: usize, warm: usize, cold: usize) -> TieredCache<u64> {
    let config = TieredCacheConfig {
        cleanup_interval_ms: 0,
        ..TieredCacheConfig::with_capacities(hot, warm, cold)
    };
    TieredCache::new(config).expect("valid config")
}

fn key(i: u64) -> CacheKey {
    CacheKey::from_content(&format!("key-{}", i))
}

/// Deterministic xorshift sequence so failures reproduce.
struct Ops(u64);

impl Ops {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

#[test]
fn containment_and_capacity_hold_under_random_workload() {
    let cache = cache(3, 5, 8);
    let config = cache.config().clone();
    let mut ops = Ops(0x9e37_79b9_7f4a_7c15);

    for step in 0..5_000 {
        let roll = ops.next();
        let k = key(roll % 24);
        match roll % 10 {
            0..=5 => {
                let _ = cache.get(&k);
            }
            6..=8 => cache.set(k, step, None),
            _ => {
                cache.delete(&k);
            }
        }

        let sizes = cache.tier_sizes();
        assert!(sizes.hot <= config.hot_capacity, "step {}: {:?}", step, sizes);
        assert!(sizes.warm <= config.warm_capacity, "step {}: {:?}", step, sizes);
        assert!(sizes.cold <= config.cold_capacity, "step {}: {:?}", step, sizes);
        if let Err(e) = cache.verify_invariants() {
            panic!("step {}: {}", step, e);
        }
    }

    let snap = cache.metrics();
    println!("AFTER 5000 ops: {:?}", snap);
    assert_eq!(snap.total_hits() + snap.total_misses, snap.total_queries);
    assert!(snap.promotions > 0);
    assert!(snap.demotions > 0);
}

#[test]
fn set_then_get_roundtrips_latest_value() {
    let cache = cache(2, 4, 16);

    for i in 0..16 {
        cache.set(key(i), i * 10, None);
    }
    for i in 0..16 {
        assert_eq!(cache.get(&key(i)), Some(i * 10));
    }

    cache.set(key(3), 999, None);
    assert_eq!(cache.get(&key(3)), Some(999));
}

#[test]
fn end_to_end_promotion_path() {
    let cache = cache(1, 2, 5);
    let a = CacheKey::from_content("a");
    cache.set(a, 1, None);
    assert_eq!(cache.tier_of(&a), Some(TierLevel::Cold));

    let mut served = Vec::new();
    for _ in 0..8 {
        let (value, level) = cache.get_with_tier(&a).expect("present");
        assert_eq!(value, 1);
        served.push(level);
    }
    println!("AFTER 8 gets: served from {:?}", served);

    assert_eq!(
        served,
        vec![
            TierLevel::Cold,
            TierLevel::Cold,
            TierLevel::Warm,
            TierLevel::Warm,
            TierLevel::Warm,
            TierLevel::Warm,
            TierLevel::Hot,
            TierLevel::Hot,
        ]
    );

    let snap = cache.metrics();
    assert_eq!(snap.tier3_hits, 2);
    assert_eq!(snap.tier2_hits, 4);
    assert_eq!(snap.tier1_hits, 2);
    assert_eq!(snap.promotions, 2);
}

#[test]
fn hot_key_survives_burst_of_one_off_writes() {
    let cache = cache(1, 2, 4);
    let hot = CacheKey::from_content("hot");
    cache.set(hot, 7, None);
    for _ in 0..8 {
        let _ = cache.get(&hot);
    }
    assert_eq!(cache.tier_of(&hot), Some(TierLevel::Hot));

    for i in 0..100 {
        cache.set(key(i), i, None);
    }

    assert_eq!(cache.tier_of(&hot), Some(TierLevel::Hot));
    assert_eq!(cache.get(&hot), Some(7));
}

#[test]
fn expired_entries_never_served() {
    let cache = cache(2, 2, 8);
    for i in 0..4 {
        cache.set(key(i), i, Some(Duration::from_millis(20)));
    }
    for i in 4..8 {
        cache.set(key(i), i, None);
    }

    std::thread::sleep(Duration::from_millis(50));

    for i in 0..4 {
        assert_eq!(cache.get(&key(i)), None);
    }
    for i in 4..8 {
        assert_eq!(cache.get(&key(i)), Some(i));
    }
    assert_eq!(cache.len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_on_one_key_leave_one_copy() {
    let cache = Arc::new(cache(2, 2, 4));
    let shared = CacheKey::from_content("shared");

    let writers = (0..32u64).map(|i| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache.set(shared, i, None);
            let _ = cache.get(&shared);
        })
    });
    for result in join_all(writers).await {
        result.expect("writer task panicked");
    }

    let sizes = cache.tier_sizes();
    println!("AFTER 32 writers: {:?}", sizes);
    assert_eq!(sizes.total(), 1);
    assert!(cache.get(&shared).is_some_and(|v| v < 32));
    cache.verify_invariants().expect("invariants hold");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mixed_traffic_keeps_metrics_consistent() {
    let cache = Arc::new(cache(4, 8, 32));

    let workers = (0..8u64).map(|w| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            for i in 0..200u64 {
                let k = key((w * 7 + i) % 40);
                if i % 3 == 0 {
                    cache.set(k, i, None);
                } else {
                    let _ = cache.get(&k);
                }
            }
        })
    });
    for result in join_all(workers).await {
        result.expect("worker task panicked");
    }

    let snap = cache.metrics();
    let gets_per_worker = (0..200u64).filter(|i| i % 3 != 0).count() as u64;
    assert_eq!(snap.total_queries, 8 * gets_per_worker);
    assert_eq!(snap.total_hits() + snap.total_misses, snap.total_queries);
    cache.verify_invariants().expect("invariants hold");
}
