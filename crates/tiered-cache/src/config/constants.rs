//! Centralized defaults and operational targets.
//!
//! Every magic number used by the cache lives here so configuration
//! defaults, validation and the performance dashboard agree.

/// Tier sizing and promotion defaults.
pub mod tiering {
    /// Default hot tier capacity (entries).
    pub const HOT_CAPACITY: usize = 100;

    /// Default warm tier capacity (entries).
    pub const WARM_CAPACITY: usize = 500;

    /// Default cold tier capacity (entries).
    pub const COLD_CAPACITY: usize = 2_000;

    /// Warm → hot promotion happens once hits while resident in warm exceed this.
    pub const WARM_PROMOTION_THRESHOLD: u32 = 3;

    /// Cold → warm promotion happens once the total access count exceeds this.
    pub const COLD_PROMOTION_THRESHOLD: u32 = 2;
}

/// Background sweep defaults.
pub mod cleanup {
    /// Default expiry sweep interval: 5 minutes.
    pub const INTERVAL_MS: u64 = 5 * 60 * 1000;
}

/// Single-tier TTL cache defaults.
pub mod ttl_cache {
    /// Default entry bound.
    pub const MAX_ENTRIES: usize = 1_000;

    /// Default byte budget: 64 MiB.
    pub const MAX_BYTES: usize = 64 * 1024 * 1024;

    /// Default time-to-live: 1 hour.
    pub const TTL_SECONDS: u64 = 3_600;
}

/// Dashboard targets for [`crate::metrics::PerformanceStatus`].
///
/// Latencies are milliseconds. These are heuristics, not enforced SLAs.
pub mod targets {
    /// Hot tier is healthy above this share of all queries...
    pub const TIER1_MIN_HIT_RATIO: f64 = 0.3;
    /// ...and below this mean latency.
    pub const TIER1_MAX_AVG_MS: f64 = 1.0;

    pub const TIER2_MIN_HIT_RATIO: f64 = 0.4;
    pub const TIER2_MAX_AVG_MS: f64 = 50.0;

    /// Cold tier has a latency target only.
    pub const TIER3_MAX_AVG_MS: f64 = 200.0;

    pub const OVERALL_MIN_HIT_RATIO: f64 = 0.7;
    pub const OVERALL_MAX_AVG_MS: f64 = 100.0;
}

/// Fixed per-entry metadata overhead added to payload size estimates
/// (key + two instants + counters + optional ttl + sequence).
pub const ENTRY_METADATA_SIZE: usize = 8 + 16 + 16 + 4 + 4 + 24 + 8;
