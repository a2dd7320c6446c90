pub mod config;
pub mod error;
pub mod types;

pub use config::{TerrainConfig, VegetationConfig};
pub use error::{Result, TreelineError};
pub use types::{Landscape, Owner, Tick, TileIndex};
