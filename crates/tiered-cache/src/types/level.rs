//! Tier ranking.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three storage levels, hottest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierLevel {
    Hot,
    Warm,
    Cold,
}

impl TierLevel {
    /// All levels, hottest first. This is the lookup order.
    pub const ALL: [TierLevel; 3] = [TierLevel::Hot, TierLevel::Warm, TierLevel::Cold];

    /// Next colder level, `None` for cold.
    #[must_use]
    pub fn colder(self) -> Option<TierLevel> {
        match self {
            Self::Hot => Some(Self::Warm),
            Self::Warm => Some(Self::Cold),
            Self::Cold => None,
        }
    }

    /// Next hotter level, `None` for hot.
    #[must_use]
    pub fn hotter(self) -> Option<TierLevel> {
        match self {
            Self::Hot => None,
            Self::Warm => Some(Self::Hot),
            Self::Cold => Some(Self::Warm),
        }
    }

    /// 1-based tier number used by metrics (hot = 1).
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Hot => 1,
            Self::Warm => 2,
            Self::Cold => 3,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
        }
    }
}

impl fmt::Display for TierLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
