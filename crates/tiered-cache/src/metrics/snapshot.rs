//! Plain, serializable metric views.

use serde::{Deserialize, Serialize};

use crate::config::constants::targets;

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub tier1_hits: u64,
    pub tier2_hits: u64,
    pub tier3_hits: u64,
    pub total_misses: u64,
    pub total_queries: u64,
    /// Running mean of `get()` latency, milliseconds
    pub average_response_time_ms: f64,
    /// Sum of estimated entry sizes across all tiers
    pub memory_usage_bytes: usize,
    /// Entries dropped from the coldest tier for capacity
    pub evictions: u64,
    pub promotions: u64,
    /// Entries moved to a colder tier by a cascade
    pub demotions: u64,
    /// Entries removed for TTL, lazily or by the sweep
    pub expirations: u64,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn total_hits(&self) -> u64 {
        self.tier1_hits + self.tier2_hits + self.tier3_hits
    }

    /// Per-tier and overall hit fractions of all queries.
    ///
    /// Every ratio is 0 when no query has been recorded.
    #[must_use]
    pub fn hit_ratios(&self) -> HitRatios {
        if self.total_queries == 0 {
            return HitRatios::default();
        }
        let total = self.total_queries as f64;
        HitRatios {
            tier1: self.tier1_hits as f64 / total,
            tier2: self.tier2_hits as f64 / total,
            tier3: self.tier3_hits as f64 / total,
            overall: self.total_hits() as f64 / total,
        }
    }

    /// Compare observed ratios and latency against the dashboard targets.
    #[must_use]
    pub fn performance_status(&self) -> PerformanceStatus {
        let ratios = self.hit_ratios();
        let avg = self.average_response_time_ms;
        PerformanceStatus {
            tier1_performance: ratios.tier1 > targets::TIER1_MIN_HIT_RATIO
                && avg < targets::TIER1_MAX_AVG_MS,
            tier2_performance: ratios.tier2 > targets::TIER2_MIN_HIT_RATIO
                && avg < targets::TIER2_MAX_AVG_MS,
            tier3_performance: avg < targets::TIER3_MAX_AVG_MS,
            overall_health: ratios.overall > targets::OVERALL_MIN_HIT_RATIO
                && avg < targets::OVERALL_MAX_AVG_MS,
        }
    }
}

/// Hit fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitRatios {
    pub tier1: f64,
    pub tier2: f64,
    pub tier3: f64,
    pub overall: f64,
}

/// Dashboard verdicts. Heuristics only; nothing enforces them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceStatus {
    pub tier1_performance: bool,
    pub tier2_performance: bool,
    pub tier3_performance: bool,
    pub overall_health: bool,
}
