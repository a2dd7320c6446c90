//! Vegetation configuration with documented defaults
//!
//! Everything a host decides per world lives here: map size, seed, climate,
//! and how fast the tile sweep walks the map. The tuning constants that fix
//! forest density are not configurable; see `vegetation::constants`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, TreelineError};
use crate::core::types::Landscape;
use crate::vegetation::constants::DEFAULT_SWEEP_PERIOD;

/// Smallest supported map edge, in tiles
pub const MIN_MAP_EDGE: u32 = 16;

/// Largest supported map edge, in tiles
pub const MAX_MAP_EDGE: u32 = 4096;

/// Configuration for one vegetation world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    // === WORLD ===
    /// Map width in tiles. Must be a power of two.
    ///
    /// Tile indices are masked by the map area, which is what gives the grid
    /// its wraparound addressing.
    pub width: u32,

    /// Map height in tiles. Must be a power of two.
    pub height: u32,

    /// Seed for the world's single random stream
    ///
    /// Same seed + same map = same forests, tick for tick.
    pub seed: u64,

    // === CLIMATE ===
    /// Climate preset for the whole world
    pub landscape: Landscape,

    /// Snow line height in height units (8 units per terrain level)
    ///
    /// Only meaningful on sub-arctic maps. Trees planted above it start on
    /// snow, and the ambient ground pass banks snow around it.
    pub snow_line: u8,

    // === TICKING ===
    /// Number of ticks for the tile sweep to visit every tile once
    ///
    /// Must be a power of two no larger than the map area. At the default of
    /// 256 a tile's maturity counter wraps every 16 * 256 = 4096 ticks.
    pub sweep_period: u32,

    // === DEMO TERRAIN ===
    /// Parameters for the built-in terrain generator used by the CLI and tests
    pub terrain: TerrainConfig,
}

/// Parameters for `map::terrain::generate_terrain`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Highest terrain level (each level is 8 height units)
    pub max_level: u8,

    /// Tiles at or below this level become water
    pub water_level: u8,

    /// Chance that a land tile is rough ground
    pub rough_frequency: f32,

    /// Chance that a land tile is rocks
    pub rocks_frequency: f32,

    /// Chance that a lowland tile is farmland
    pub fields_frequency: f32,

    /// Moisture above which sub-tropical land is rainforest
    pub rainforest_moisture: f32,

    /// Moisture below which sub-tropical land is desert
    pub desert_moisture: f32,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            seed: 12345,
            landscape: Landscape::Temperate,
            snow_line: 56,
            sweep_period: DEFAULT_SWEEP_PERIOD,
            terrain: TerrainConfig::default(),
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            max_level: 12,
            water_level: 0,
            rough_frequency: 0.08,
            rocks_frequency: 0.03,
            fields_frequency: 0.05,
            rainforest_moisture: 0.65,
            desert_moisture: 0.35,
        }
    }
}

impl VegetationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Map area in tiles
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        for (name, edge) in [("width", self.width), ("height", self.height)] {
            if !edge.is_power_of_two() {
                return Err(TreelineError::InvalidConfig(format!(
                    "{} ({}) must be a power of two",
                    name, edge
                )));
            }
            if !(MIN_MAP_EDGE..=MAX_MAP_EDGE).contains(&edge) {
                return Err(TreelineError::InvalidConfig(format!(
                    "{} ({}) must be between {} and {}",
                    name, edge, MIN_MAP_EDGE, MAX_MAP_EDGE
                )));
            }
        }

        if !self.sweep_period.is_power_of_two() || self.sweep_period as u64 > self.area() {
            return Err(TreelineError::InvalidConfig(format!(
                "sweep_period ({}) must be a power of two no larger than the map area ({})",
                self.sweep_period,
                self.area()
            )));
        }

        let t = &self.terrain;
        if t.water_level >= t.max_level {
            return Err(TreelineError::InvalidConfig(format!(
                "terrain.water_level ({}) must be below terrain.max_level ({})",
                t.water_level, t.max_level
            )));
        }
        if t.max_level > 31 {
            return Err(TreelineError::InvalidConfig(format!(
                "terrain.max_level ({}) does not fit in a height byte",
                t.max_level
            )));
        }
        if t.desert_moisture >= t.rainforest_moisture {
            return Err(TreelineError::InvalidConfig(format!(
                "terrain.desert_moisture ({}) should be < terrain.rainforest_moisture ({})",
                t.desert_moisture, t.rainforest_moisture
            )));
        }

        Ok(())
    }

    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
