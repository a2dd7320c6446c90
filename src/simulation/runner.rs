//! Batch runner: build a world, grow its forests, tick it N times

use crate::core::config::VegetationConfig;
use crate::core::error::Result;
use crate::core::types::Tick;
use crate::simulation::output::{SimulationOutput, WorldInfo};
use crate::simulation::world::ForestWorld;
use crate::vegetation::events::EventTally;

/// Run a full vegetation simulation on demo terrain
pub fn simulate(config: &VegetationConfig, ticks: Tick) -> Result<SimulationOutput> {
    let start = std::time::Instant::now();

    let (mut world, terrain) = ForestWorld::with_terrain(config)?;
    let generation = world.generate()?;
    let initial_forest = world.stats();

    let mut tally = EventTally::default();
    for tick in 0..ticks {
        let events = world.tick();
        tally.record_all(&events);

        // Nobody renders the batch run
        world.take_dirty();

        if (tick + 1) % 4096 == 0 {
            tracing::debug!(
                "Tick {}: {} forested tiles",
                tick + 1,
                world.stats().forested_tiles
            );
        }
    }

    let final_forest = world.stats();
    let info = WorldInfo::new(config.width, config.height, config.seed, config.landscape, &terrain);

    tracing::info!(
        "Simulated {} ticks: {} -> {} forested tiles",
        ticks,
        initial_forest.forested_tiles,
        final_forest.forested_tiles
    );

    Ok(SimulationOutput::new(
        info,
        generation,
        initial_forest,
        final_forest,
        tally,
        ticks,
        start.elapsed(),
    ))
}
