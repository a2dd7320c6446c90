//! Tile record - the packed per-tile storage shared by every subsystem
//!
//! The four `*_bits` bytes mean different things depending on `kind`. Only
//! the subsystem that owns a kind may interpret them; everyone else goes
//! through the typed views (`ClearGround`, `vegetation::codec::TreeState`).

use serde::{Deserialize, Serialize};

use crate::core::types::Owner;
use crate::map::clear::{ClearGround, ClearKind};

/// Which subsystem owns a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Clear,
    Forested,
    Water,
    /// Anything owned by a subsystem this crate does not know about
    Other,
}

/// Per-tile terrain classification on sub-tropical maps
///
/// Produced by the host's terrain generator and only read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateBand {
    Normal,
    DesertTransition,
    Rainforest,
}

impl ClimateBand {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            1 => Self::DesertTransition,
            2 => Self::Rainforest,
            _ => Self::Normal,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::DesertTransition => 1,
            Self::Rainforest => 2,
        }
    }
}

impl Default for ClimateBand {
    fn default() -> Self {
        Self::Normal
    }
}

/// One addressable unit of the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Elevation in height units (8 per terrain level)
    pub height: u8,
    pub owner: Owner,
    pub climate: ClimateBand,
    /// Forested: maturity counter, ground type, ground density
    pub ground_bits: u8,
    /// Forested: species index
    pub variant_bits: u8,
    /// Fence/hedge bits, owned by the clear-land subsystem
    pub border_bits: u8,
    /// Clear: ground kind and density. Forested: growth stage and tree count
    pub state_bits: u8,
}

impl Default for Tile {
    fn default() -> Self {
        Self::clear(ClearGround::new(ClearKind::Grass, 3))
    }
}

impl Tile {
    /// A clear tile at height 0 with the given ground
    pub fn clear(ground: ClearGround) -> Self {
        Self {
            kind: TileKind::Clear,
            height: 0,
            owner: Owner::Nobody,
            climate: ClimateBand::Normal,
            ground_bits: 0,
            variant_bits: 0,
            border_bits: 0,
            state_bits: ground.to_bits(),
        }
    }

    pub fn water() -> Self {
        Self {
            kind: TileKind::Water,
            state_bits: 0,
            ..Self::default()
        }
    }

    pub fn is_clear(&self) -> bool {
        self.kind == TileKind::Clear
    }

    pub fn is_forested(&self) -> bool {
        self.kind == TileKind::Forested
    }

    /// Clear-land view of this tile, if it is clear
    pub fn clear_ground(&self) -> Option<ClearGround> {
        self.is_clear().then(|| ClearGround::from_bits(self.state_bits))
    }

    /// Turn the tile into clear land with the given ground.
    ///
    /// Owner, height, climate band and border bits are left alone.
    pub fn set_clear(&mut self, ground: ClearGround) {
        self.kind = TileKind::Clear;
        self.ground_bits = 0;
        self.variant_bits = 0;
        self.state_bits = ground.to_bits();
    }
}
