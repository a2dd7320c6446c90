//! Tick driver - sweeps the grid and fires scheduled planting events
//!
//! Per tick, in order:
//! 1. Tile sweep: visit every tile whose index matches the current phase
//!    modulo the sweep period.
//! 2. Sub-tropical maps: one rainforest planting attempt.
//! 3. Every 256th tick: one wild planting attempt anywhere on the map.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::config::VegetationConfig;
use crate::core::error::{Result, TreelineError};
use crate::core::types::TileIndex;
use crate::map::grid::WorldGrid;
use crate::map::tile::ClimateBand;
use crate::vegetation::climate::{select_species, Climate};
use crate::vegetation::codec::{GrowthStage, TreeState};
use crate::vegetation::constants::DEFAULT_SWEEP_PERIOD;
use crate::vegetation::events::{SeedSource, VegetationEvent};
use crate::vegetation::lifecycle::visit_tile;

/// Persistent scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredDriver")]
pub struct TickDriver {
    /// Counts down each tick; the wild planting event fires when it hits zero
    rare_counter: u8,
    sweep_phase: u32,
    sweep_period: u32,
}

#[derive(Deserialize)]
struct StoredDriver {
    rare_counter: u8,
    sweep_phase: u32,
    sweep_period: u32,
}

impl TryFrom<StoredDriver> for TickDriver {
    type Error = TreelineError;

    fn try_from(stored: StoredDriver) -> Result<Self> {
        let driver = Self::new(stored.sweep_period)?;
        if stored.sweep_phase >= stored.sweep_period {
            return Err(TreelineError::InvalidConfig(format!(
                "sweep phase {} outside period {}",
                stored.sweep_phase, stored.sweep_period
            )));
        }
        Ok(Self {
            rare_counter: stored.rare_counter,
            sweep_phase: stored.sweep_phase,
            ..driver
        })
    }
}

impl Default for TickDriver {
    fn default() -> Self {
        Self {
            rare_counter: 0,
            sweep_phase: 0,
            sweep_period: DEFAULT_SWEEP_PERIOD,
        }
    }
}

impl TickDriver {
    /// Driver that visits every tile once per `sweep_period` ticks
    pub fn new(sweep_period: u32) -> Result<Self> {
        if sweep_period == 0 || !sweep_period.is_power_of_two() {
            return Err(TreelineError::InvalidConfig(format!(
                "sweep period must be a power of two, got {}",
                sweep_period
            )));
        }
        Ok(Self {
            sweep_period,
            ..Self::default()
        })
    }

    pub fn from_config(config: &VegetationConfig) -> Result<Self> {
        Self::new(config.sweep_period)
    }

    pub fn sweep_period(&self) -> u32 {
        self.sweep_period
    }

    pub fn sweep_phase(&self) -> u32 {
        self.sweep_phase
    }

    pub fn rare_counter(&self) -> u8 {
        self.rare_counter
    }

    /// Advance vegetation by one tick
    pub fn tick<R: RngCore + ?Sized>(
        &mut self,
        grid: &mut WorldGrid,
        climate: &Climate,
        rng: &mut R,
    ) -> Vec<VegetationEvent> {
        let mut events = Vec::new();

        self.sweep(grid, climate, rng, &mut events);

        if climate.is_sub_tropical() {
            events.extend(rainforest_event(grid, climate, rng));
        }

        self.rare_counter = self.rare_counter.wrapping_sub(1);
        if self.rare_counter == 0 {
            events.extend(wild_seedling_event(grid, climate, rng));
        }

        events
    }

    /// Visit this tick's slice of the grid
    pub fn sweep<R: RngCore + ?Sized>(
        &mut self,
        grid: &mut WorldGrid,
        climate: &Climate,
        rng: &mut R,
        events: &mut Vec<VegetationEvent>,
    ) {
        let step = self.sweep_period.min(grid.area()) as usize;
        let phase = self.sweep_phase % step as u32;

        for index in (phase..grid.area()).step_by(step) {
            let tile = grid.wrap(index);
            let Some(visit) = visit_tile(grid, climate, tile, rng) else {
                continue;
            };
            if let Some(sound) = visit.ambient {
                events.push(VegetationEvent::Sound { tile, sound });
            }
            events.extend(VegetationEvent::from_transition(tile, visit.transition));
        }

        self.sweep_phase = (self.sweep_phase + 1) % self.sweep_period;
    }
}

/// One rainforest planting attempt (one draw)
pub fn rainforest_event<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    rng: &mut R,
) -> Option<VegetationEvent> {
    let r = rng.next_u32();
    let tile = grid.wrap(r);
    let cell = grid.tile(tile);
    if cell.climate != ClimateBand::Rainforest {
        return None;
    }
    let clear = cell
        .clear_ground()
        .filter(|ground| ground.accepts_rainforest_seedling())?;
    let species = select_species(climate.landscape, cell.climate, (r >> 24) as u8)?;

    let (ground, density) = climate.seedling_ground(clear);
    let seedling = TreeState::new(species, GrowthStage::Seedling, 1).with_ground(ground, density);
    plant_seedling(grid, tile, seedling);

    tracing::trace!("Rainforest seedling {} at {}", species, tile);
    Some(VegetationEvent::Seeded {
        tile,
        species,
        source: SeedSource::Rainforest,
    })
}

/// One wild planting attempt anywhere on the map (one draw)
pub fn wild_seedling_event<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    rng: &mut R,
) -> Option<VegetationEvent> {
    let r = rng.next_u32();
    let tile = grid.wrap(r);
    let cell = grid.tile(tile);
    let clear = cell
        .clear_ground()
        .filter(|ground| ground.accepts_wild_seedling())?;
    let species = select_species(climate.landscape, cell.climate, (r >> 24) as u8)?;

    let (ground, density) = climate.seedling_ground(clear);
    let seedling = TreeState::new(species, GrowthStage::Seedling, 1).with_ground(ground, density);
    plant_seedling(grid, tile, seedling);

    tracing::debug!("Wild seedling {} at {}", species, tile);
    Some(VegetationEvent::Seeded {
        tile,
        species,
        source: SeedSource::Wild,
    })
}

fn plant_seedling(grid: &mut WorldGrid, tile: TileIndex, state: TreeState) {
    let cell = grid.tile_mut(tile);
    state.write(cell);
    cell.border_bits &= !3;
    grid.mark_dirty(tile);
}
