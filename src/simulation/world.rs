//! ForestWorld - grid, climate, driver and random stream in one container

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::VegetationConfig;
use crate::core::error::{Result, TreelineError};
use crate::core::types::{Tick, TileIndex};
use crate::map::grid::WorldGrid;
use crate::map::terrain::{generate_terrain, TerrainSummary};
use crate::vegetation::climate::Climate;
use crate::vegetation::constants::SPECIES_COUNT;
use crate::vegetation::driver::TickDriver;
use crate::vegetation::events::VegetationEvent;
use crate::vegetation::generator::{generate_forests, GenerationReport};
use crate::vegetation::planting::{clear_trees, plant_trees, ClearingReport, PlantingReport};
use crate::vegetation::query::{describe_tile, forest_stats, ForestStats, TileDescription};

/// A world whose vegetation evolves tick by tick
pub struct ForestWorld {
    pub grid: WorldGrid,
    pub climate: Climate,
    pub driver: TickDriver,
    /// Ticks run so far
    pub tick: Tick,
    /// Random number generator (deterministic)
    rng: ChaCha8Rng,
    generated: bool,
}

/// Persistable world state: packed tiles plus driver counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub grid: WorldGrid,
    pub climate: Climate,
    pub driver: TickDriver,
    pub tick: Tick,
    pub generated: bool,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and check a saved world. Grid shape and driver counters are
    /// checked while deserializing; tree tiles are checked here.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        let corrupt = self
            .grid
            .iter()
            .find(|(_, t)| t.is_forested() && t.variant_bits >= SPECIES_COUNT);
        if let Some((tile, cell)) = corrupt {
            return Err(TreelineError::InvalidConfig(format!(
                "tile {} holds unknown species {}",
                tile, cell.variant_bits
            )));
        }
        Ok(())
    }
}

impl ForestWorld {
    /// An all-grass world, ready for forest generation
    pub fn new(config: &VegetationConfig) -> Result<Self> {
        config.validate()?;
        Self::from_grid(WorldGrid::from_config(config)?, config)
    }

    /// A world on a host-supplied grid
    pub fn from_grid(grid: WorldGrid, config: &VegetationConfig) -> Result<Self> {
        if grid.width() != config.width || grid.height() != config.height {
            return Err(TreelineError::InvalidConfig(format!(
                "grid is {}x{} but config says {}x{}",
                grid.width(),
                grid.height(),
                config.width,
                config.height
            )));
        }
        Ok(Self {
            grid,
            climate: Climate::from_config(config),
            driver: TickDriver::from_config(config)?,
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            generated: false,
        })
    }

    /// A world with demo terrain drawn from the world's own random stream
    pub fn with_terrain(config: &VegetationConfig) -> Result<(Self, TerrainSummary)> {
        let mut world = Self::new(config)?;
        let summary = generate_terrain(&mut world.grid, config, &mut world.rng);
        Ok((world, summary))
    }

    /// Resume from a snapshot. The random stream restarts from `seed`.
    pub fn from_snapshot(snapshot: WorldSnapshot, seed: u64) -> Self {
        Self {
            grid: snapshot.grid,
            climate: snapshot.climate,
            driver: snapshot.driver,
            tick: snapshot.tick,
            rng: ChaCha8Rng::seed_from_u64(seed),
            generated: snapshot.generated,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            grid: self.grid.clone(),
            climate: self.climate,
            driver: self.driver,
            tick: self.tick,
            generated: self.generated,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Plant the initial forests. Only allowed once per world.
    pub fn generate(&mut self) -> Result<GenerationReport> {
        if self.generated {
            return Err(TreelineError::AlreadyGenerated);
        }
        let report = generate_forests(&mut self.grid, &self.climate, &mut self.rng);
        self.generated = true;
        Ok(report)
    }

    /// Run one simulation tick
    pub fn tick(&mut self) -> Vec<VegetationEvent> {
        let events = self.driver.tick(&mut self.grid, &self.climate, &mut self.rng);
        self.tick += 1;
        events
    }

    pub fn describe(&self, tile: TileIndex) -> Result<TileDescription> {
        describe_tile(&self.grid, tile)
    }

    pub fn plant(
        &mut self,
        from: TileIndex,
        to: TileIndex,
        species: Option<u8>,
    ) -> Result<PlantingReport> {
        plant_trees(&mut self.grid, &self.climate, from, to, species, &mut self.rng)
    }

    pub fn clear(&mut self, tile: TileIndex) -> Result<ClearingReport> {
        clear_trees(&mut self.grid, tile)
    }

    pub fn stats(&self) -> ForestStats {
        forest_stats(&self.grid)
    }

    /// Tiles the renderer should redraw, drained
    pub fn take_dirty(&mut self) -> Vec<TileIndex> {
        self.grid.take_dirty()
    }
}
