//! Key, entry and tier-level types shared by every cache in this crate.
//!
//! - [`CacheKey`]: 8-byte xxHash64 of normalized lookup parameters
//! - [`CacheEntry`]: cached value with access metadata
//! - [`MemorySize`]: payload size estimation for memory accounting
//! - [`TierLevel`]: hot/warm/cold ranking

mod entry;
mod key;
mod level;
mod size;

pub use entry::CacheEntry;
pub use key::{normalize_content, CacheKey};
pub use level::TierLevel;
pub use size::MemorySize;
