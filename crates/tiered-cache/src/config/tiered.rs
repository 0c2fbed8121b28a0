//! Configuration for the three-tier coordinator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

use super::constants::{cleanup, tiering};

/// Static configuration for [`crate::TieredCache`].
///
/// Supplied at construction only; there is no reconfiguration API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TieredCacheConfig {
    /// Maximum entries in the hot tier.
    pub hot_capacity: usize,
    /// Maximum entries in the warm tier.
    pub warm_capacity: usize,
    /// Maximum entries in the cold tier.
    pub cold_capacity: usize,
    /// TTL applied by `set()` when the caller passes none. `None` = never expire.
    pub default_ttl_seconds: Option<u64>,
    /// Expiry sweep interval in milliseconds. 0 disables the sweep.
    pub cleanup_interval_ms: u64,
    /// T1: warm → hot once hits while in warm exceed this.
    pub warm_promotion_threshold: u32,
    /// T2: cold → warm once the access count exceeds this.
    pub cold_promotion_threshold: u32,
}

impl Default for TieredCacheConfig {
    fn default() -> Self {
        Self {
            hot_capacity: tiering::HOT_CAPACITY,
            warm_capacity: tiering::WARM_CAPACITY,
            cold_capacity: tiering::COLD_CAPACITY,
            default_ttl_seconds: None,
            cleanup_interval_ms: cleanup::INTERVAL_MS,
            warm_promotion_threshold: tiering::WARM_PROMOTION_THRESHOLD,
            cold_promotion_threshold: tiering::COLD_PROMOTION_THRESHOLD,
        }
    }
}

impl TieredCacheConfig {
    /// Config with explicit capacities and every other field defaulted.
    #[must_use]
    pub fn with_capacities(hot: usize, warm: usize, cold: usize) -> Self {
        Self {
            hot_capacity: hot,
            warm_capacity: warm,
            cold_capacity: cold,
            ..Self::default()
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// `CacheError::ConfigError` naming the first offending field.
    pub fn validate(&self) -> CacheResult<()> {
        if self.hot_capacity == 0 {
            return Err(CacheError::config("hot_capacity must be > 0"));
        }
        if self.warm_capacity == 0 {
            return Err(CacheError::config("warm_capacity must be > 0"));
        }
        if self.cold_capacity == 0 {
            return Err(CacheError::config("cold_capacity must be > 0"));
        }
        if self.default_ttl_seconds == Some(0) {
            return Err(CacheError::config(
                "default_ttl_seconds must be > 0 when set",
            ));
        }
        if self.warm_promotion_threshold == 0 {
            return Err(CacheError::config("warm_promotion_threshold must be > 0"));
        }
        if self.cold_promotion_threshold == 0 {
            return Err(CacheError::config("cold_promotion_threshold must be > 0"));
        }
        Ok(())
    }

    /// Default TTL as a `Duration`.
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_seconds.map(Duration::from_secs)
    }

    /// Sweep interval, or `None` when the sweep is disabled.
    #[must_use]
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_ms > 0).then(|| Duration::from_millis(self.cleanup_interval_ms))
    }

    /// Sum of all tier capacities.
    #[must_use]
    pub fn total_capacity(&self) -> usize {
        self.hot_capacity + self.warm_capacity + self.cold_capacity
    }
}
