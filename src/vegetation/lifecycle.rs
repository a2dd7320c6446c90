//! Lifecycle automaton - what happens to a forested tile when it is visited
//!
//! Every visit runs the ambient climate effects and bumps the maturity
//! counter. Only when the counter wraps does the growth stage move:
//!
//! ```text
//! 0 -> 1 -> 2 -> 3 (mature) -> 4 -> 5 -> 6 (dead)
//!                  |                      |
//!                  +- roll: decay, add a   +- more trees: lose one, back to 3
//!                     tree, spread, idle   +- last tree: tile reverts to clear
//! ```

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::types::{Owner, TileIndex};
use crate::map::clear::{ClearGround, ClearKind};
use crate::map::grid::WorldGrid;
use crate::map::tile::ClimateBand;
use crate::vegetation::climate::{apply_ambient, AmbientSound, Climate};
use crate::vegetation::codec::{GroundType, GrowthStage, TreeState};
use crate::vegetation::constants::{CACTUS_SPECIES, MATURITY_PERIOD, MAX_TREES_PER_TILE};

/// Neighbour offsets addressed by a 3-bit spread roll
const SPREAD_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// What a mature tile's dice roll asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatureRoll {
    StartDecay,
    AddTree,
    Spread,
    Idle,
}

impl MatureRoll {
    pub fn from_dice(dice: u32) -> Self {
        match dice & 7 {
            0 => Self::StartDecay,
            1 => Self::AddTree,
            2 => Self::Spread,
            _ => Self::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadOutcome {
    Seeded { target: TileIndex, species: u8 },
    /// Neighbour was not clear, or its ground cannot take a seedling
    Blocked { target: TileIndex },
}

/// Result of one visit's growth evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Counter advanced without wrapping
    Dormant,
    Grew { stage: GrowthStage },
    /// Mature trees began to decay; `forced` when the desert band killed them
    StartedDecay { forced: bool },
    AddedTree { count: u8 },
    Spread(SpreadOutcome),
    /// Mature roll came up idle
    NoOp,
    /// A dead tree fell and the rest went back to mature
    TreeLost { remaining: u8 },
    /// The last tree died and the tile is clear land again
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileVisit {
    pub ambient: Option<AmbientSound>,
    pub transition: Transition,
}

/// Run one visit on a tile. Returns `None` when the tile holds no trees.
pub fn visit_tile<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    tile: TileIndex,
    rng: &mut R,
) -> Option<TileVisit> {
    if !grid.tile(tile).is_forested() {
        return None;
    }

    let ambient = apply_ambient(grid, climate, tile, rng);
    let transition = if advance_counter(grid, tile) {
        evaluate(grid, climate, tile, rng)
    } else {
        Transition::Dormant
    };

    if transition != Transition::Dormant {
        tracing::trace!("Tile {}: {:?}", tile, transition);
    }

    Some(TileVisit {
        ambient,
        transition,
    })
}

/// Bump the maturity counter. Returns true when it wrapped to zero.
pub fn advance_counter(grid: &mut WorldGrid, tile: TileIndex) -> bool {
    let Some(mut state) = TreeState::read(grid.tile(tile)) else {
        return false;
    };
    state.counter = (state.counter + 1) % MATURITY_PERIOD;
    state.write(grid.tile_mut(tile));
    state.counter == 0
}

/// Move a forested tile one step through its lifecycle
pub fn evaluate<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    tile: TileIndex,
    rng: &mut R,
) -> Transition {
    let cell = *grid.tile(tile);
    let Some(mut state) = TreeState::read(&cell) else {
        return Transition::NoOp;
    };

    let transition = match state.stage {
        GrowthStage::Mature => {
            if climate.is_sub_tropical()
                && cell.climate == ClimateBand::DesertTransition
                && state.species != CACTUS_SPECIES
            {
                state.stage = GrowthStage::Declining;
                Transition::StartedDecay { forced: true }
            } else {
                match MatureRoll::from_dice(rng.next_u32()) {
                    MatureRoll::StartDecay => {
                        state.stage = GrowthStage::Declining;
                        Transition::StartedDecay { forced: false }
                    }
                    MatureRoll::AddTree if state.count < MAX_TREES_PER_TILE => {
                        state.count += 1;
                        state.stage = GrowthStage::Seedling;
                        Transition::AddedTree { count: state.count }
                    }
                    // A full tile spreads instead
                    MatureRoll::AddTree | MatureRoll::Spread => {
                        return Transition::Spread(spread(grid, climate, tile, &state, rng));
                    }
                    MatureRoll::Idle => return Transition::NoOp,
                }
            }
        }
        GrowthStage::Dead => {
            if state.count > 1 {
                state.count -= 1;
                state.stage = GrowthStage::Mature;
                Transition::TreeLost {
                    remaining: state.count,
                }
            } else {
                let cell = grid.tile_mut(tile);
                cell.set_clear(ground_after_death(&state));
                cell.owner = Owner::Nobody;
                grid.mark_dirty(tile);
                return Transition::Cleared;
            }
        }
        stage => {
            state.stage = stage.next();
            Transition::Grew { stage: state.stage }
        }
    };

    state.write(grid.tile_mut(tile));
    grid.mark_dirty(tile);
    transition
}

/// Seed one random neighbour with the source species. The source tile is
/// left as it was.
fn spread<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    source: TileIndex,
    state: &TreeState,
    rng: &mut R,
) -> SpreadOutcome {
    let (dx, dy) = SPREAD_OFFSETS[(rng.next_u32() & 7) as usize];
    let target = grid.offset(source, dx, dy);

    let clear = match grid.tile(target).clear_ground() {
        Some(clear) if clear.accepts_spread() => clear,
        _ => return SpreadOutcome::Blocked { target },
    };

    let (ground, density) = climate.seedling_ground(clear);
    let seedling =
        TreeState::new(state.species, GrowthStage::Seedling, 1).with_ground(ground, density);
    let cell = grid.tile_mut(target);
    seedling.write(cell);
    cell.border_bits = 0;
    grid.mark_dirty(target);

    SpreadOutcome::Seeded {
        target,
        species: state.species,
    }
}

/// Clear land left behind when the last tree on a tile dies
pub fn ground_after_death(state: &TreeState) -> ClearGround {
    match state.ground {
        GroundType::Bare => ClearGround::new(ClearKind::Grass, 3),
        GroundType::Rough => ClearGround::new(ClearKind::Rough, 3),
        GroundType::Snow | GroundType::Desert => {
            ClearGround::new(ClearKind::SnowDesert, state.density)
        }
    }
}
