//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear index of a tile in the world grid
///
/// Index arithmetic wraps around the map edges (see `WorldGrid::offset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex(pub u32);

impl TileIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// World-wide climate preset
///
/// Controls which tree species exist, how the ground reacts to elevation,
/// and how densely the world is forested at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landscape {
    Temperate,
    SubArctic,
    SubTropical,
    Toyland,
}

impl Default for Landscape {
    fn default() -> Self {
        Self::Temperate
    }
}

impl fmt::Display for Landscape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Temperate => "temperate",
            Self::SubArctic => "sub-arctic",
            Self::SubTropical => "sub-tropical",
            Self::Toyland => "toyland",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Landscape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "temperate" => Ok(Self::Temperate),
            "subarctic" | "arctic" => Ok(Self::SubArctic),
            "subtropical" | "tropical" | "desert" => Ok(Self::SubTropical),
            "toyland" => Ok(Self::Toyland),
            other => Err(format!("unknown landscape '{}'", other)),
        }
    }
}

/// Owner of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Nobody,
    Company(u8),
    Town,
}

impl Default for Owner {
    fn default() -> Self {
        Self::Nobody
    }
}

impl Owner {
    pub fn is_nobody(&self) -> bool {
        matches!(self, Self::Nobody)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nobody => f.write_str("nobody"),
            Self::Company(id) => write!(f, "company {}", id),
            Self::Town => f.write_str("town"),
        }
    }
}
