//! Vegetation - forest generation and the per-tile tree lifecycle
//!
//! Trees live in the packed bytes of forested grid tiles. `codec` is the
//! only place those bytes are interpreted; everything else works on
//! `TreeState`. All randomness flows through a caller-supplied `RngCore`
//! so a seeded world evolves identically on every run.

pub mod climate;
pub mod codec;
pub mod constants;
pub mod driver;
pub mod events;
pub mod generator;
pub mod lifecycle;
pub mod planting;
pub mod query;

pub use climate::{select_species, AmbientSound, Climate};
pub use codec::{GroundType, GrowthStage, TreeState};
pub use driver::TickDriver;
pub use events::{EventTally, SeedSource, VegetationEvent};
pub use generator::{
    generate_forests, place_cluster, place_tree, GenerationReport, Placement, PlacementOutcome,
};
pub use lifecycle::{visit_tile, Transition};
pub use planting::{clear_trees, plant_trees, ClearingReport, PlantOutcome, PlantingReport};
pub use query::{describe_tile, forest_stats, ForestStats, TileDescription, TreeClass};
