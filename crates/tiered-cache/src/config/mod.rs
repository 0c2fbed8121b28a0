//! Root configuration for the cache subsystem.
//!
//! `CacheConfig` aggregates the tiered coordinator and the single-tier
//! TTL cache settings.
//!
//! # Loading Configuration
//!
//! ```rust,ignore
//! use tiered_cache::CacheConfig;
//!
//! // Load from file
//! let config = CacheConfig::from_file("cache.toml")?;
//!
//! // Or use defaults, then apply environment overrides
//! let config = CacheConfig::default().with_env_overrides();
//! config.validate()?;
//! ```
//!
//! # TOML Structure
//!
//! ```toml
//! [tiered]
//! hot_capacity = 100
//! warm_capacity = 500
//! cold_capacity = 2000
//! default_ttl_seconds = 600
//! cleanup_interval_ms = 300000
//! warm_promotion_threshold = 3
//! cold_promotion_threshold = 2
//!
//! [ttl]
//! max_entries = 1000
//! max_bytes = 67108864
//! ttl_seconds = 3600
//! ```

pub mod constants;
mod tiered;
mod ttl;


pub use tiered::TieredCacheConfig;
pub use ttl::TtlCacheConfig;

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "TIERED_CACHE_";

/// Root configuration for the cache subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Three-tier coordinator configuration
    #[serde(default)]
    pub tiered: TieredCacheConfig,

    /// Single-tier TTL cache configuration
    #[serde(default)]
    pub ttl: TtlCacheConfig,
}

impl CacheConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - `CacheError::ConfigError` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> CacheResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CacheError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            CacheError::config(format!(
                "Failed to parse TOML in '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// - `CacheError::ConfigError` if TOML parsing fails
    pub fn from_toml_str(toml: &str) -> CacheResult<Self> {
        toml::from_str(toml)
            .map_err(|e| CacheError::config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to a TOML string.
    ///
    /// # Errors
    /// - `CacheError::ConfigError` if serialization fails
    pub fn to_toml_string(&self) -> CacheResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CacheError::config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Validate every section, returning the first error found.
    ///
    /// # Errors
    /// - `CacheError::ConfigError` prefixed with the offending section
    pub fn validate(&self) -> CacheResult<()> {
        self.tiered
            .validate()
            .map_err(|e| CacheError::config(format!("[tiered] {}", e)))?;

        self.ttl
            .validate()
            .map_err(|e| CacheError::config(format!("[ttl] {}", e)))?;

        Ok(())
    }

    /// Apply environment variable overrides. Prefix: `TIERED_CACHE_`
    ///
    /// | Variable | Config Path | Type |
    /// |----------|-------------|------|
    /// | `TIERED_CACHE_HOT_CAPACITY` | `tiered.hot_capacity` | usize |
    /// | `TIERED_CACHE_WARM_CAPACITY` | `tiered.warm_capacity` | usize |
    /// | `TIERED_CACHE_COLD_CAPACITY` | `tiered.cold_capacity` | usize |
    /// | `TIERED_CACHE_DEFAULT_TTL_SECONDS` | `tiered.default_ttl_seconds` | u64 |
    /// | `TIERED_CACHE_CLEANUP_INTERVAL_MS` | `tiered.cleanup_interval_ms` | u64 |
    /// | `TIERED_CACHE_TTL_MAX_ENTRIES` | `ttl.max_entries` | usize |
    /// | `TIERED_CACHE_TTL_SECONDS` | `ttl.ttl_seconds` | u64 |
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| env::var(format!("{}{}", ENV_PREFIX, name)).ok())
    }

    /// Apply overrides from an arbitrary lookup (variable name without prefix).
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            name: &str,
        ) -> Option<T> {
            lookup(name).and_then(|v| v.trim().parse::<T>().ok())
        }

        if let Some(n) = parsed(&lookup, "HOT_CAPACITY") {
            self.tiered.hot_capacity = n;
        }
        if let Some(n) = parsed(&lookup, "WARM_CAPACITY") {
            self.tiered.warm_capacity = n;
        }
        if let Some(n) = parsed(&lookup, "COLD_CAPACITY") {
            self.tiered.cold_capacity = n;
        }
        if let Some(n) = parsed(&lookup, "DEFAULT_TTL_SECONDS") {
            self.tiered.default_ttl_seconds = Some(n);
        }
        if let Some(n) = parsed(&lookup, "CLEANUP_INTERVAL_MS") {
            self.tiered.cleanup_interval_ms = n;
        }
        if let Some(n) = parsed(&lookup, "TTL_MAX_ENTRIES") {
            self.ttl.max_entries = n;
        }
        if let Some(n) = parsed(&lookup, "TTL_SECONDS") {
            self.ttl.ttl_seconds = Some(n);
        }

        self
    }
}
