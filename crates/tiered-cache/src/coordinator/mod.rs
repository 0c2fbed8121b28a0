//! Three-tier adaptive cache coordinator.
//!
//! # Architecture
//!
//! ```text
//! get(key) ──► hot ──miss──► warm ──miss──► cold ──miss──► None
//!               │             │ hit           │ hit
//!               │             ▼               ▼
//!               │      tier_hits > T1?   access_count > T2?
//!               │             │ yes           │ yes
//!               │             ▼               ▼
//!               │        move to hot      move to warm
//!               │     (evictions cascade one tier colder)
//!
//! set(key, v) ──► delete everywhere ──► cold (evictions dropped)
//! ```
//!
//! All tiers sit behind one mutex, so a promotion and the demotions it
//! triggers are observed atomically. Metrics are atomics read without it.

mod core;
mod tiers;

#[cfg(test)]
mod tests;

pub use self::core::TieredCache;
pub use tiers::TierSizes;
