//! Tests for metrics recording and derived ratios.

use std::time::Duration;

use super::*;
use crate::types::TierLevel;

#[test]
fn test_each_query_counts_exactly_once() {
    let metrics = MetricsRecorder::new();

    metrics.record_hit(TierLevel::Hot);
    metrics.record_hit(TierLevel::Hot);
    metrics.record_hit(TierLevel::Warm);
    metrics.record_hit(TierLevel::Cold);
    metrics.record_miss();

    let snap = metrics.snapshot(0);
    println!("AFTER: {:?}", snap);

    assert_eq!(snap.tier1_hits, 2);
    assert_eq!(snap.tier2_hits, 1);
    assert_eq!(snap.tier3_hits, 1);
    assert_eq!(snap.total_misses, 1);
    assert_eq!(snap.total_queries, 5);
    assert_eq!(snap.total_hits() + snap.total_misses, snap.total_queries);
}

#[test]
fn test_running_mean_latency() {
    let metrics = MetricsRecorder::new();

    for ms in [2u64, 4, 6] {
        metrics.record_miss();
        metrics.record_latency(Duration::from_millis(ms));
    }

    let avg = metrics.average_response_ms();
    println!("AFTER: average = {}", avg);
    assert!((avg - 4.0).abs() < 1e-9);
}

#[test]
fn test_hit_ratios_zero_queries() {
    let snap = MetricsRecorder::new().snapshot(0);
    assert_eq!(snap.hit_ratios(), HitRatios::default());
}

#[test]
fn test_hit_ratios_fractions() {
    let metrics = MetricsRecorder::new();
    metrics.record_hit(TierLevel::Hot);
    metrics.record_hit(TierLevel::Warm);
    metrics.record_hit(TierLevel::Warm);
    metrics.record_miss();

    let ratios = metrics.snapshot(0).hit_ratios();

    assert!((ratios.tier1 - 0.25).abs() < 1e-12);
    assert!((ratios.tier2 - 0.5).abs() < 1e-12);
    assert_eq!(ratios.tier3, 0.0);
    assert!((ratios.overall - 0.75).abs() < 1e-12);
}

#[test]
fn test_performance_status_targets() {
    let healthy = MetricsSnapshot {
        tier1_hits: 8,
        tier2_hits: 1,
        tier3_hits: 0,
        total_misses: 1,
        total_queries: 10,
        average_response_time_ms: 0.5,
        ..MetricsSnapshot::default()
    };
    let status = healthy.performance_status();
    assert!(status.tier1_performance);
    assert!(!status.tier2_performance);
    assert!(status.tier3_performance);
    assert!(status.overall_health);

    let slow = MetricsSnapshot {
        average_response_time_ms: 250.0,
        ..healthy
    };
    let status = slow.performance_status();
    assert!(!status.tier1_performance);
    assert!(!status.tier3_performance);
    assert!(!status.overall_health);
}

#[test]
fn test_empty_snapshot_status() {
    let status = MetricsSnapshot::default().performance_status();
    assert!(!status.tier1_performance);
    assert!(!status.tier2_performance);
    assert!(status.tier3_performance);
    assert!(!status.overall_health);
}

#[test]
fn test_reset_zeroes_everything() {
    let metrics = MetricsRecorder::new();
    metrics.record_hit(TierLevel::Cold);
    metrics.record_latency(Duration::from_millis(3));
    metrics.record_evictions(2);
    metrics.record_promotion();
    metrics.record_demotions(1);
    metrics.record_expirations(4);

    metrics.reset();

    assert_eq!(metrics.snapshot(0), MetricsSnapshot::default());
}

#[test]
fn test_snapshot_serializes() {
    let snap = MetricsSnapshot {
        tier1_hits: 3,
        ..MetricsSnapshot::default()
    };
    let toml = toml::to_string(&snap).unwrap();
    assert!(toml.contains("tier1_hits = 3"));
}
