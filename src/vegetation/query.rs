//! Read-only queries over forest tiles

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TreelineError};
use crate::core::types::{Owner, TileIndex};
use crate::map::grid::WorldGrid;
use crate::vegetation::codec::{GrowthStage, TreeState};
use crate::vegetation::constants::{CACTUS_SPECIES, RAINFOREST_SPECIES, SPECIES_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeClass {
    Trees,
    Rainforest,
    Cactus,
}

impl TreeClass {
    pub fn of_species(species: u8) -> Self {
        if species == CACTUS_SPECIES {
            Self::Cactus
        } else if RAINFOREST_SPECIES.contains(&species) {
            Self::Rainforest
        } else {
            Self::Trees
        }
    }
}

impl fmt::Display for TreeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Trees => "trees",
            Self::Rainforest => "rainforest",
            Self::Cactus => "cactus plants",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDescription {
    pub class: TreeClass,
    pub owner: Owner,
}

impl fmt::Display for TileDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (owner: {})", self.class, self.owner)
    }
}

/// Human-readable label for a forested tile
pub fn describe_tile(grid: &WorldGrid, tile: TileIndex) -> Result<TileDescription> {
    let cell = grid.get(tile).ok_or(TreelineError::TileOutOfBounds(tile))?;
    let state = TreeState::read(cell).ok_or(TreelineError::NotForested(tile))?;
    Ok(TileDescription {
        class: TreeClass::of_species(state.species),
        owner: cell.owner,
    })
}

/// Census of every forested tile on the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestStats {
    pub forested_tiles: u32,
    pub trees: u32,
    /// Tiles by stage bucket
    pub growing: u32,
    pub mature: u32,
    pub decaying: u32,
    /// Tiles per species index
    pub per_species: Vec<u32>,
}

impl Default for ForestStats {
    fn default() -> Self {
        Self {
            forested_tiles: 0,
            trees: 0,
            growing: 0,
            mature: 0,
            decaying: 0,
            per_species: vec![0; SPECIES_COUNT as usize],
        }
    }
}

impl ForestStats {
    /// Share of the map covered by trees
    pub fn coverage(&self, area: u32) -> f32 {
        if area == 0 {
            return 0.0;
        }
        self.forested_tiles as f32 / area as f32
    }
}

pub fn forest_stats(grid: &WorldGrid) -> ForestStats {
    let mut stats = ForestStats::default();

    for state in grid.tiles().iter().filter_map(TreeState::read) {
        stats.forested_tiles += 1;
        stats.trees += state.count as u32;
        stats.per_species[state.species as usize] += 1;
        match state.stage {
            GrowthStage::Mature => stats.mature += 1,
            s if s.is_growing() => stats.growing += 1,
            _ => stats.decaying += 1,
        }
    }

    stats
}
