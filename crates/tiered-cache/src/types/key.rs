//! Cache key derived from normalized lookup parameters.

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::{xxh64, Xxh64};

/// Separator hashed between key parts so `("ab", "c")` != `("a", "bc")`.
const PART_SEPARATOR: [u8; 1] = [0x1f];

/// Normalize lookup text: trim, case-fold, collapse whitespace runs.
///
/// `"  Hello\n\tWORLD "` and `"hello world"` normalize identically.
#[must_use]
pub fn normalize_content(content: &str) -> String {
    content
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Opaque cache key: xxHash64 of normalized lookup parameters.
///
/// `Copy` + `Eq` + `Hash`, 8 bytes, no allocation. Equal logical lookups
/// produce equal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// xxHash64 of the normalized content and discriminators
    pub content_hash: u64,
}

impl CacheKey {
    /// Key from free text, normalized first.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        Self {
            content_hash: xxh64(normalize_content(content).as_bytes(), 0),
        }
    }

    /// Key from free text plus discriminators (model name, mode, ...).
    ///
    /// The text is normalized; discriminators are hashed verbatim, in order.
    #[must_use]
    pub fn from_parts(content: &str, discriminators: &[&str]) -> Self {
        let mut hasher = Xxh64::new(0);
        hasher.update(normalize_content(content).as_bytes());
        for part in discriminators {
            hasher.update(&PART_SEPARATOR);
            hasher.update(part.as_bytes());
        }
        Self {
            content_hash: hasher.digest(),
        }
    }
}

impl From<u64> for CacheKey {
    fn from(hash: u64) -> Self {
        Self { content_hash: hash }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.content_hash)
    }
}
