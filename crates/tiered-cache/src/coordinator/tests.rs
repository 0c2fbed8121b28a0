//! Tests for the tiered cache coordinator.

use std::time::Duration;

use super::*;
use crate::config::TieredCacheConfig;
use crate::error::{BoxError, CacheError};
use crate::types::{CacheKey, TierLevel};

fn cache(hot: usize, warm: usize, cold: usize) -> TieredCache<u64> {
    let config = TieredCacheConfig {
        cleanup_interval_ms: 0,
        ..TieredCacheConfig::with_capacities(hot, warm, cold)
    };
    TieredCache::new(config).unwrap()
}

fn key(name: &str) -> CacheKey {
    CacheKey::from_content(name)
}

/// Read `name` until it is served from `level`.
fn read_until(cache: &TieredCache<u64>, name: &str, level: TierLevel) {
    for _ in 0..16 {
        if let Some((_, served)) = cache.get_with_tier(&key(name)) {
            if served == level {
                return;
            }
        }
    }
    panic!("{} never reached {}", name, level);
}

#[test]
fn test_rejects_zero_capacity() {
    let result = TieredCache::<u64>::new(TieredCacheConfig::with_capacities(0, 2, 5));
    assert!(matches!(result, Err(CacheError::ConfigError { .. })));
}

#[test]
fn test_set_get_roundtrip() {
    let cache = cache(2, 2, 4);

    cache.set(key("a"), 42, None);

    assert_eq!(cache.get(&key("a")), Some(42));
    assert_eq!(cache.get(&key("missing")), None);
}

#[test]
fn test_set_always_lands_in_cold() {
    let cache = cache(2, 2, 4);
    cache.set(key("a"), 1, None);
    read_until(&cache, "a", TierLevel::Warm);
    assert_eq!(cache.tier_of(&key("a")), Some(TierLevel::Warm));

    // Rewriting a promoted key starts it over in cold.
    cache.set(key("a"), 2, None);

    let sizes = cache.tier_sizes();
    println!("AFTER rewrite: {:?}", sizes);
    assert_eq!(cache.tier_of(&key("a")), Some(TierLevel::Cold));
    assert_eq!(sizes.hot + sizes.warm, 0);
    assert_eq!(sizes.cold, 1);
}

#[test]
fn test_fifth_read_served_from_warm() {
    let cache = cache(1, 2, 5);
    cache.set(key("a"), 1, None);

    for _ in 0..4 {
        assert_eq!(cache.get(&key("a")), Some(1));
    }
    let before = cache.metrics().tier2_hits;
    println!("BEFORE 5th get: tier2_hits = {}", before);

    let (value, served) = cache.get_with_tier(&key("a")).unwrap();
    let after = cache.metrics().tier2_hits;
    println!("AFTER 5th get: served from {}, tier2_hits = {}", served, after);

    assert_eq!(value, 1);
    assert_eq!(served, TierLevel::Warm);
    assert_eq!(after, before + 1);
}

#[test]
fn test_warm_entry_promoted_after_threshold_hits() {
    let cache = cache(1, 2, 5);
    cache.set(key("a"), 1, None);

    // Two cold hits, the second moves it to warm.
    let _ = cache.get(&key("a"));
    let _ = cache.get(&key("a"));
    assert_eq!(cache.tier_of(&key("a")), Some(TierLevel::Warm));

    // Four warm hits: the fourth exceeds the threshold of 3.
    for n in 1..=4 {
        let (_, served) = cache.get_with_tier(&key("a")).unwrap();
        assert_eq!(served, TierLevel::Warm, "warm hit {}", n);
    }

    let (_, served) = cache.get_with_tier(&key("a")).unwrap();
    assert_eq!(served, TierLevel::Hot);
    assert_eq!(cache.metrics().promotions, 2);
}

#[test]
fn test_hot_eviction_cascades_into_warm() {
    let cache = cache(1, 1, 2);
    cache.set(key("a"), 1, None);
    read_until(&cache, "a", TierLevel::Hot);

    cache.set(key("b"), 2, None);
    println!("BEFORE: a in {:?}, b in {:?}", cache.tier_of(&key("a")), cache.tier_of(&key("b")));
    read_until(&cache, "b", TierLevel::Hot);
    println!("AFTER: a in {:?}, b in {:?}", cache.tier_of(&key("a")), cache.tier_of(&key("b")));

    assert_eq!(cache.tier_of(&key("b")), Some(TierLevel::Hot));
    assert_eq!(cache.tier_of(&key("a")), Some(TierLevel::Warm));
    assert_eq!(cache.metrics().demotions, 1);
    cache.verify_invariants().unwrap();
}

#[test]
fn test_cold_overflow_drops_oldest() {
    let cache = cache(1, 1, 2);
    cache.set(key("a"), 1, None);
    cache.set(key("b"), 2, None);
    cache.set(key("c"), 3, None);

    assert!(!cache.contains(&key("a")));
    assert!(cache.contains(&key("b")));
    assert!(cache.contains(&key("c")));
    assert_eq!(cache.metrics().evictions, 1);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_ttl_expiry_removes_entry() {
    let cache = cache(2, 2, 4);
    cache.set(key("short"), 1, Some(Duration::from_millis(30)));
    cache.set(key("long"), 2, None);
    assert_eq!(cache.get(&key("short")), Some(1));

    std::thread::sleep(Duration::from_millis(60));

    assert!(!cache.contains(&key("short")));
    assert_eq!(cache.get(&key("short")), None);
    assert_eq!(cache.get(&key("long")), Some(2));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.metrics().expirations, 1);
}

#[test]
fn test_default_ttl_applies_when_none_given() {
    let config = TieredCacheConfig {
        cleanup_interval_ms: 0,
        default_ttl_seconds: Some(1),
        ..TieredCacheConfig::with_capacities(2, 2, 4)
    };
    let cache = TieredCache::new(config).unwrap();
    cache.set(key("a"), 1u64, None);
    cache.set(key("b"), 2u64, Some(Duration::from_secs(3_600)));

    std::thread::sleep(Duration::from_millis(1_100));

    assert_eq!(cache.purge_expired(), 1);
    assert!(!cache.contains(&key("a")));
    assert!(cache.contains(&key("b")));
}

#[test]
fn test_delete_is_idempotent() {
    let cache = cache(2, 2, 4);
    cache.set(key("a"), 1, None);
    read_until(&cache, "a", TierLevel::Warm);

    assert!(cache.delete(&key("a")));
    assert!(!cache.delete(&key("a")));
    assert!(cache.is_empty());
}

#[test]
fn test_clear_resets_tiers_and_metrics() {
    let cache = cache(2, 2, 4);
    cache.set(key("a"), 1, None);
    let _ = cache.get(&key("a"));
    let _ = cache.get(&key("b"));

    cache.clear();

    let snap = cache.metrics();
    assert!(cache.is_empty());
    assert_eq!(snap.total_queries, 0);
    assert_eq!(snap.average_response_time_ms, 0.0);
    assert_eq!(snap.memory_usage_bytes, 0);
}

#[test]
fn test_metrics_match_query_mix() {
    let cache = cache(1, 2, 5);
    cache.set(key("a"), 1, None);
    read_until(&cache, "a", TierLevel::Hot);
    let served_before = cache.metrics().total_queries;

    for _ in 0..6 {
        let _ = cache.get(&key("a"));
    }
    for _ in 0..2 {
        let _ = cache.get(&key("missing"));
    }

    let snap = cache.metrics();
    let ratios = cache.hit_ratios();
    println!("AFTER: {:?} {:?}", snap, ratios);

    let n = served_before + 8;
    assert_eq!(snap.total_queries, n);
    assert_eq!(snap.total_misses, 2);
    assert_eq!(snap.total_hits() + snap.total_misses, n);
    assert!((ratios.tier1 - snap.tier1_hits as f64 / n as f64).abs() < 1e-12);
    assert!(snap.average_response_time_ms >= 0.0);
    assert!(snap.memory_usage_bytes > 0);
}

#[test]
fn test_fresh_cache_reports_zero_ratios() {
    let cache = cache(1, 1, 1);
    let ratios = cache.hit_ratios();
    let status = cache.performance_status();

    assert_eq!(ratios.overall, 0.0);
    assert!(!status.tier1_performance);
    assert!(!status.overall_health);
}

#[test]
fn test_concurrent_sets_leave_one_copy() {
    let cache = cache(2, 2, 4);

    std::thread::scope(|scope| {
        for i in 0..8u64 {
            let cache = &cache;
            scope.spawn(move || {
                for _ in 0..50 {
                    cache.set(key("shared"), i, None);
                    let _ = cache.get(&key("shared"));
                }
            });
        }
    });

    assert_eq!(cache.len(), 1);
    let value = cache.get(&key("shared")).unwrap();
    assert!(value < 8);
    cache.verify_invariants().unwrap();
}

#[test]
fn test_no_runtime_runs_without_sweep() {
    let cache = TieredCache::<u64>::new(TieredCacheConfig::default()).unwrap();

    assert!(!cache.is_cleanup_running());
    cache.set(key("a"), 1, None);
    assert_eq!(cache.get(&key("a")), Some(1));
}

#[tokio::test]
async fn test_sweep_removes_expired_without_reads() {
    let config = TieredCacheConfig {
        cleanup_interval_ms: 20,
        ..TieredCacheConfig::with_capacities(2, 2, 4)
    };
    let cache = TieredCache::<u64>::new(config).unwrap();
    assert!(cache.is_cleanup_running());

    cache.set(key("a"), 1, Some(Duration::from_millis(10)));
    cache.set(key("b"), 2, None);
    println!("BEFORE sweep: len = {}", cache.len());

    tokio::time::sleep(Duration::from_millis(120)).await;
    println!("AFTER sweep: len = {}", cache.len());

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.metrics().total_queries, 0);

    cache.shutdown();
    cache.shutdown();
    assert!(!cache.is_cleanup_running());
}

#[tokio::test]
async fn test_warm_up_stores_into_cold() {
    let cache = cache(2, 2, 4);
    let producer = |input: String| async move {
        if input == "bad" {
            Err::<u64, BoxError>("producer offline".into())
        } else {
            Ok(input.len() as u64)
        }
    };

    let report = cache.warm_up(["abc", "bad", "hello"], &producer).await;

    assert_eq!(report.loaded, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(cache.tier_of(&key("hello")), Some(TierLevel::Cold));
    assert_eq!(cache.get(&key("abc")), Some(3));
}
