//! Simulation facade - a self-contained world for hosts, the CLI and tests

pub mod output;
pub mod runner;
pub mod world;

pub use output::{SimulationOutput, SimulationStats, WorldInfo};
pub use runner::simulate;
pub use world::{ForestWorld, WorldSnapshot};
