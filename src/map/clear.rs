//! Clear-land view of a tile's packed state byte
//!
//! Clear land belongs to another subsystem. Vegetation only needs to know
//! what kind of ground is there (to decide whether a tree may take the
//! tile) and how to write it back when a forest dies off.

use serde::{Deserialize, Serialize};

/// Kind of clear ground, stored in bits 2-4 of the state byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearKind {
    Grass,
    Rough,
    Rocks,
    Fields,
    /// Snow on sub-arctic maps, desert sand on sub-tropical maps
    SnowDesert,
}

impl ClearKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Self::Grass,
            1 => Self::Rough,
            3 => Self::Fields,
            4 => Self::SnowDesert,
            // 2 is rocks; the unused values read as rocks so nothing grows there
            _ => Self::Rocks,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Grass => 0,
            Self::Rough => 1,
            Self::Rocks => 2,
            Self::Fields => 3,
            Self::SnowDesert => 4,
        }
    }
}

/// Decoded clear-land state: ground kind plus a 0-3 density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClearGround {
    pub kind: ClearKind,
    pub density: u8,
}

impl ClearGround {
    pub fn new(kind: ClearKind, density: u8) -> Self {
        Self {
            kind,
            density: density.min(3),
        }
    }

    pub fn from_bits(bits: u8) -> Self {
        Self {
            kind: ClearKind::from_bits(bits >> 2),
            density: bits & 3,
        }
    }

    pub fn to_bits(self) -> u8 {
        (self.kind.bits() << 2) | (self.density & 3)
    }

    /// Whether world generation may put a tree here (not rocks or ripe farmland)
    pub fn accepts_generated_tree(&self) -> bool {
        match self.kind {
            ClearKind::Rocks => false,
            ClearKind::Fields => self.density != 3,
            _ => true,
        }
    }

    /// Whether a neighbouring forest may seed onto this ground
    ///
    /// Rough and snow/desert ground always take a seedling; grass only once
    /// it has fully grown back.
    pub fn accepts_spread(&self) -> bool {
        match self.kind {
            ClearKind::Rough | ClearKind::SnowDesert => true,
            ClearKind::Grass => self.density == 3,
            ClearKind::Rocks | ClearKind::Fields => false,
        }
    }

    /// Whether the per-tick rainforest event may plant here
    pub fn accepts_rainforest_seedling(&self) -> bool {
        matches!(self.kind, ClearKind::Grass | ClearKind::Rough)
    }

    /// Whether the rare random planting event may plant here
    pub fn accepts_wild_seedling(&self) -> bool {
        matches!(
            self.kind,
            ClearKind::Grass | ClearKind::Rough | ClearKind::SnowDesert
        )
    }
}
