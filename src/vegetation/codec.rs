//! Tree state codec - packing between tile bytes and `TreeState`
//!
//! Layout of a forested tile:
//! - ground byte:  bits 0-3 maturity counter, bits 4-5 ground type, bits 6-7 ground density
//! - variant byte: species index
//! - state byte:   bits 0-2 growth stage, bits 6-7 tree count minus one
//!
//! The rest of the crate works on the unpacked struct. Packing happens only
//! at the grid boundary, here.

use serde::{Deserialize, Serialize};

use crate::map::tile::{Tile, TileKind};
use crate::vegetation::constants::{MATURITY_PERIOD, MAX_TREES_PER_TILE, SPECIES_COUNT};

/// Growth stage of the trees on a tile
///
/// 0-2 growing, 3 mature, 4-6 decaying. There is no stage 7: a raw 7 reads
/// as `Dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum GrowthStage {
    Seedling = 0,
    Sapling = 1,
    Young = 2,
    Mature = 3,
    Declining = 4,
    Withering = 5,
    Dead = 6,
}

impl GrowthStage {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Self::Seedling,
            1 => Self::Sapling,
            2 => Self::Young,
            3 => Self::Mature,
            4 => Self::Declining,
            5 => Self::Withering,
            _ => Self::Dead,
        }
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn is_growing(self) -> bool {
        self < Self::Mature
    }

    pub fn is_decaying(self) -> bool {
        self > Self::Mature
    }

    /// The following stage. `Dead` has no successor and stays put.
    pub fn next(self) -> Self {
        Self::from_bits(self.bits() + 1)
    }
}

/// Ground visible under the trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundType {
    Bare,
    Rough,
    Snow,
    Desert,
}

impl GroundType {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Self::Bare,
            1 => Self::Rough,
            2 => Self::Snow,
            _ => Self::Desert,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Bare => 0,
            Self::Rough => 1,
            Self::Snow => 2,
            Self::Desert => 3,
        }
    }

    /// Snow and desert sand share one clear-land kind
    pub fn is_snowy(self) -> bool {
        matches!(self, Self::Snow | Self::Desert)
    }
}

/// Raw bytes of a forested tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedTree {
    pub ground_bits: u8,
    pub variant_bits: u8,
    pub state_bits: u8,
}

/// Decoded vegetation view of a forested tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeState {
    pub species: u8,
    pub stage: GrowthStage,
    /// Number of trees on the tile, 1-4
    pub count: u8,
    pub ground: GroundType,
    /// Snow depth or sand cover, 0-3
    pub density: u8,
    /// Visits until the next growth evaluation, 0-15
    pub counter: u8,
}

impl TreeState {
    /// Trees on bare ground with a zeroed counter
    pub fn new(species: u8, stage: GrowthStage, count: u8) -> Self {
        Self {
            species,
            stage,
            count,
            ground: GroundType::Bare,
            density: 0,
            counter: 0,
        }
    }

    pub fn with_ground(mut self, ground: GroundType, density: u8) -> Self {
        self.ground = ground;
        self.density = density;
        self
    }

    pub fn with_counter(mut self, counter: u8) -> Self {
        self.counter = counter;
        self
    }

    pub fn pack(&self) -> PackedTree {
        debug_assert!((1..=MAX_TREES_PER_TILE).contains(&self.count));
        debug_assert!(self.density <= 3);
        debug_assert!(self.counter < MATURITY_PERIOD);

        PackedTree {
            ground_bits: pack_ground(self.ground, self.density, self.counter),
            variant_bits: self.species,
            state_bits: pack_stage_count(self.stage, self.count),
        }
    }

    /// Decode packed bytes.
    ///
    /// Panics if the species index lies outside the species table; that
    /// means the grid is corrupt.
    pub fn unpack(packed: PackedTree) -> Self {
        let species = packed.variant_bits;
        assert!(
            species < SPECIES_COUNT,
            "corrupt tree tile: species {} outside table of {}",
            species,
            SPECIES_COUNT
        );
        let (stage, count) = unpack_stage_count(packed.state_bits);
        let (ground, density, counter) = unpack_ground(packed.ground_bits);

        Self {
            species,
            stage,
            count,
            ground,
            density,
            counter,
        }
    }

    /// Vegetation view of a tile, or `None` if it is not forested
    pub fn read(tile: &Tile) -> Option<Self> {
        tile.is_forested().then(|| {
            Self::unpack(PackedTree {
                ground_bits: tile.ground_bits,
                variant_bits: tile.variant_bits,
                state_bits: tile.state_bits,
            })
        })
    }

    /// Store this state on a tile and tag it forested.
    ///
    /// Owner, height, climate band and border bits are not touched.
    pub fn write(&self, tile: &mut Tile) {
        let packed = self.pack();
        tile.kind = TileKind::Forested;
        tile.ground_bits = packed.ground_bits;
        tile.variant_bits = packed.variant_bits;
        tile.state_bits = packed.state_bits;
    }
}

pub fn pack_stage_count(stage: GrowthStage, count: u8) -> u8 {
    ((count.clamp(1, MAX_TREES_PER_TILE) - 1) << 6) | stage.bits()
}

/// Stage and tree count from a state byte (or a raw placement draw)
pub fn unpack_stage_count(bits: u8) -> (GrowthStage, u8) {
    (GrowthStage::from_bits(bits), (bits >> 6) + 1)
}

pub fn pack_ground(ground: GroundType, density: u8, counter: u8) -> u8 {
    ((density & 3) << 6) | (ground.bits() << 4) | (counter & 0xF)
}

pub fn unpack_ground(bits: u8) -> (GroundType, u8, u8) {
    (GroundType::from_bits(bits >> 4), bits >> 6, bits & 0xF)
}
