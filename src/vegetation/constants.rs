//! Vegetation constants - the species table and the density contract
//!
//! World-generation counts are tuned for a 256x256 map and scaled by area.
//! The pass order and repetition counts decide how dense each landscape's
//! forests come out, so treat them as fixed.

use std::ops::RangeInclusive;

// Species table
pub const SPECIES_COUNT: u8 = 41;
pub const CACTUS_SPECIES: u8 = 27;
pub const RAINFOREST_SPECIES: RangeInclusive<u8> = 20..=26;

// Tile capacity
pub const MAX_TREES_PER_TILE: u8 = 4;

// Lifecycle timing
/// Visits between two growth evaluations of the same tile
pub const MATURITY_PERIOD: u8 = 16;
/// Ticks between two rare random planting events
pub const WILD_SEEDLING_PERIOD: u32 = 256;
pub const DEFAULT_SWEEP_PERIOD: u32 = 256;

// Clustered scatter
pub const CLUSTER_BASE_COUNT: u32 = 25;
pub const CLUSTER_COUNT_JITTER_MASK: u32 = 0x1F;
pub const CLUSTER_ATTEMPTS: u32 = 1000;
pub const CLUSTER_RADIUS: u32 = 13;
pub const CLUSTER_CORE_RADIUS: u32 = 6;

// Uniform scatter
pub const SCATTER_ATTEMPTS: u32 = 1000;
pub const RAINFOREST_ATTEMPTS: u32 = 15000;
pub const SCATTER_PASSES: u32 = 6;
pub const SCATTER_PASSES_SUB_ARCTIC: u32 = 15;

// Ambient effects: chance numerator/denominator, tested against 16 random bits
pub const AMBIENT_CHANCE_NUM: u32 = 1;
pub const AMBIENT_CHANCE_DEN: u32 = 200;

/// Height units between snow bands on sub-arctic maps
pub const SNOW_BAND_STEP: i32 = 8;

/// Desert-transition draws above this seed byte yield no tree
pub const CACTUS_SEED_LIMIT: u8 = 12;

/// Rainforest trees take four times the effort to clear per tree
pub const RAINFOREST_CLEARING_FACTOR: u32 = 4;
