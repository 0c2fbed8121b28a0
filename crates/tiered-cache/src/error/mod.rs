//! Error types for the tiered cache.
//!
//! "Not found" is never an error: lookups return `Option`/`bool`. Errors are
//! reserved for rejected configuration, oversized entries, producer failures
//! surfaced during warmup, and repaired internal invariant violations.

mod types;


pub use types::{BoxError, CacheError, CacheResult};
