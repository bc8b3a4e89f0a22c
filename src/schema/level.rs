//! Level tags (`L0`..`L10`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_LEVEL_INDEX;

/// One tier of the fixed hierarchy depth.
///
/// Ordered by numeric depth, so `L2 < L10`. Serialised as its string tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const ROOT: Level = Level(0);

    /// Create a level from its numeric index, `None` past `L10`.
    pub fn new(index: u8) -> Option<Self> {
        (index <= MAX_LEVEL_INDEX).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn is_root(self) -> bool {
        self.0 == 0
    }

    /// The immediately preceding level, `None` for `L0`.
    pub fn parent(self) -> Option<Level> {
        self.0.checked_sub(1).map(Level)
    }

    /// Every level from `L0` through `self`, inclusive.
    pub fn up_to(self) -> impl Iterator<Item = Level> {
        (0..=self.0).map(Level)
    }

    /// All levels `L0`..`L10`.
    pub fn all() -> impl Iterator<Item = Level> {
        (0..=MAX_LEVEL_INDEX).map(Level)
    }

    /// Lineage key for this level, e.g. `L2_ID`.
    pub fn lineage_key(self) -> String {
        format!("L{}_ID", self.0)
    }

    /// Parse a lineage key such as `L2_ID` back into a level.
    pub fn from_lineage_key(key: &str) -> Option<Self> {
        key.strip_suffix("_ID").and_then(|tag| tag.parse().ok())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid level tag '{}': expected L0..L{MAX_LEVEL_INDEX}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('L')
            .or_else(|| s.trim().strip_prefix('l'))
            .ok_or_else(|| ParseLevelError(s.to_string()))?;
        digits
            .parse::<u8>()
            .ok()
            .and_then(Level::new)
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
