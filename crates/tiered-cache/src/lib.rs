//! Tiered Cache Library
//!
//! In-memory hot/warm/cold cache that promotes entries by access frequency
//! and demotes them on eviction, plus a single-tier TTL+LRU cache for
//! deterministic-key workloads.
//!
//! # Architecture
//!
//! This crate defines:
//! - [`TieredCache`]: three capacity-bounded tiers behind one lock; new
//!   entries always enter cold, repeated reads promote them
//! - [`TtlCache`]: one LRU tier with an entry bound, a byte budget and a TTL
//! - [`CleanupScheduler`]: background expiry sweep for either cache
//! - [`WarmupRunner`]: concurrent preloading through a [`ValueProducer`]
//! - Metrics snapshots with hit ratios and a performance dashboard
//!
//! # Example
//!
//! ```
//! use tiered_cache::{CacheKey, TieredCache, TieredCacheConfig};
//!
//! let config = TieredCacheConfig {
//!     cleanup_interval_ms: 0,
//!     ..TieredCacheConfig::default()
//! };
//! let cache: TieredCache<String> = TieredCache::new(config).unwrap();
//!
//! let key = CacheKey::from_content("What is the capital of France?");
//! cache.set(key, "Paris".to_string(), None);
//!
//! assert_eq!(cache.get(&key).as_deref(), Some("Paris"));
//! assert_eq!(cache.metrics().tier3_hits, 1);
//! ```

pub mod cleanup;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod metrics;
pub mod tier;
pub mod ttl;
pub mod types;
pub mod warmup;

// Re-exports for convenience
pub use cleanup::{CleanupScheduler, Sweep};
pub use config::{CacheConfig, TieredCacheConfig, TtlCacheConfig};
pub use coordinator::{TierSizes, TieredCache};
pub use error::{BoxError, CacheError, CacheResult};
pub use metrics::{HitRatios, MetricsSnapshot, PerformanceStatus};
pub use ttl::{TtlCache, TtlCacheStatsSnapshot};
pub use types::{CacheEntry, CacheKey, MemorySize, TierLevel};
pub use warmup::{ValueProducer, WarmTarget, WarmupFailure, WarmupReport, WarmupRunner};
