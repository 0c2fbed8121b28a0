//! Configuration for the single-tier TTL+LRU cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

use super::constants::{cleanup, ttl_cache};

/// Configuration for [`crate::TtlCache`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtlCacheConfig {
    /// Maximum number of entries before LRU eviction.
    pub max_entries: usize,
    /// Byte budget across all entries (estimated).
    pub max_bytes: usize,
    /// Entry lifetime from creation. `None` = never expire.
    pub ttl_seconds: Option<u64>,
    /// Sweep interval used by `spawn_cleanup`. 0 disables it.
    pub cleanup_interval_ms: u64,
}

impl Default for TtlCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: ttl_cache::MAX_ENTRIES,
            max_bytes: ttl_cache::MAX_BYTES,
            ttl_seconds: Some(ttl_cache::TTL_SECONDS),
            cleanup_interval_ms: cleanup::INTERVAL_MS,
        }
    }
}

impl TtlCacheConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    /// `CacheError::ConfigError` naming the first offending field.
    pub fn validate(&self) -> CacheResult<()> {
        if self.max_entries == 0 {
            return Err(CacheError::config("max_entries cannot be 0"));
        }
        if self.max_bytes == 0 {
            return Err(CacheError::config("max_bytes cannot be 0"));
        }
        if self.ttl_seconds == Some(0) {
            return Err(CacheError::config("ttl_seconds must be > 0 when set"));
        }
        Ok(())
    }

    /// TTL as a `Duration`.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_seconds.map(Duration::from_secs)
    }

    /// Sweep interval, or `None` when disabled.
    #[must_use]
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_ms > 0).then(|| Duration::from_millis(self.cleanup_interval_ms))
    }
}
