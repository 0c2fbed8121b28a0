//! Bulk preload of cache entries ahead of expected demand.
//!
//! # Flow
//!
//! ```text
//! inputs ──► CacheKey ──► contains_key()? ──yes──► already cached
//!                              │ no
//!                              ▼
//!                   producer.produce(input)   (outside any cache lock)
//!                              │
//!                 ok ──► store(key, value)    err ──► logged, skipped
//! ```
//!
//! Every input is attempted concurrently and the batch resolves once all
//! attempts have settled. A failed input never aborts the batch. Dropping
//! the future abandons the remaining attempts; values already stored stay.

mod producer;
mod runner;


pub use producer::ValueProducer;
pub use runner::{WarmTarget, WarmupFailure, WarmupReport, WarmupRunner};
