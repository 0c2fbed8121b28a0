//! Single-tier TTL+LRU cache for deterministic-key workloads.
//!
//! Degenerate specialization of the tiered model: one tier, no promotion,
//! entries expire a fixed time after creation. Typical use is caching
//! outputs keyed by normalized input text and pre-populating them with
//! [`crate::warmup::WarmupRunner`].
//!
//! # Architecture
//!
//! - LinkedHashMap maintains access order for O(1) LRU eviction
//! - A single mutex serializes every operation, including sweeps
//! - Atomic counters allow lock-free stats reads

mod core;
mod stats;


pub use self::core::TtlCache;
pub use stats::{TtlCacheStats, TtlCacheStatsSnapshot};
