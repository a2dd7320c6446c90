//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{Landscape, Tick};
use crate::map::terrain::TerrainSummary;
use crate::vegetation::events::EventTally;
use crate::vegetation::generator::GenerationReport;
use crate::vegetation::query::ForestStats;

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub world: WorldInfo,
    pub generation: GenerationReport,
    pub initial_forest: ForestStats,
    pub final_forest: ForestStats,
    pub events: EventTally,
    pub statistics: SimulationStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldInfo {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub landscape: Landscape,
    pub water_tiles: u32,
    pub rainforest_tiles: u32,
    pub desert_tiles: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks_simulated: Tick,
    pub simulation_time_ms: u64,
    pub initial_coverage: f32,
    pub final_coverage: f32,
    /// Tiles that gained trees on their own during the run
    pub new_forest_tiles: u64,
}

impl WorldInfo {
    pub fn new(
        width: u32,
        height: u32,
        seed: u64,
        landscape: Landscape,
        terrain: &TerrainSummary,
    ) -> Self {
        Self {
            width,
            height,
            seed,
            landscape,
            water_tiles: terrain.water,
            rainforest_tiles: terrain.rainforest,
            desert_tiles: terrain.desert,
        }
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }
}

impl SimulationOutput {
    pub fn new(
        world: WorldInfo,
        generation: GenerationReport,
        initial_forest: ForestStats,
        final_forest: ForestStats,
        events: EventTally,
        ticks: Tick,
        elapsed: Duration,
    ) -> Self {
        let area = world.area();
        let statistics = SimulationStats {
            ticks_simulated: ticks,
            simulation_time_ms: elapsed.as_millis() as u64,
            initial_coverage: initial_forest.coverage(area),
            final_coverage: final_forest.coverage(area),
            new_forest_tiles: events.new_forest_tiles(),
        };

        Self {
            world,
            generation,
            initial_forest,
            final_forest,
            events,
            statistics,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "{}x{} {} map, seed {}\n\
             Generated {} trees ({} clusters), {:.1}% of tiles forested\n\
             Simulated {} ticks in {}ms\n\
             {} spreads, {} seedlings ({} new forest tiles), {} forests died back\n\
             {} forested tiles ({:.1}%), {} trees at end",
            self.world.width,
            self.world.height,
            self.world.landscape,
            self.world.seed,
            self.generation.total_planted(),
            self.generation.clusters,
            self.statistics.initial_coverage * 100.0,
            self.statistics.ticks_simulated,
            self.statistics.simulation_time_ms,
            self.events.spreads,
            self.events.rainforest_seedlings + self.events.wild_seedlings,
            self.statistics.new_forest_tiles,
            self.events.forests_cleared,
            self.final_forest.forested_tiles,
            self.statistics.final_coverage * 100.0,
            self.final_forest.trees,
        )
    }
}
