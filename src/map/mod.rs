//! Map layer - the tile grid vegetation lives on
//!
//! The grid is owned by the host simulation. Vegetation reads tile kinds,
//! heights and climate bands written by other subsystems, and writes only
//! the packed bytes of tiles it owns (plus clear-land state when a forest
//! dies back).

pub mod clear;
pub mod grid;
pub mod terrain;
pub mod tile;

pub use clear::{ClearGround, ClearKind};
pub use grid::WorldGrid;
pub use terrain::{generate_terrain, TerrainSummary};
pub use tile::{ClimateBand, Tile, TileKind};
