//! Demo terrain generation
//!
//! Hosts normally bring their own terrain. This generator exists so the CLI,
//! benchmarks and integration tests have plausible land to grow forests on:
//! smooth value-noise heights, scattered rough/rocks/farmland, snow above
//! the snow line, and desert/rainforest bands on sub-tropical maps.

use rand::{Rng, RngCore};

use crate::core::config::VegetationConfig;
use crate::core::types::Landscape;
use crate::map::clear::{ClearGround, ClearKind};
use crate::map::grid::WorldGrid;
use crate::map::tile::{ClimateBand, Tile};

/// Height units per terrain level
pub const HEIGHT_PER_LEVEL: u8 = 8;

/// Lattice spacing for the value noise, in tiles
const NOISE_CELL: u32 = 16;

/// Tile counts produced by `generate_terrain`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainSummary {
    pub water: u32,
    pub grass: u32,
    pub rough: u32,
    pub rocks: u32,
    pub fields: u32,
    pub snow_or_desert: u32,
    pub rainforest: u32,
    pub desert: u32,
}

/// Overwrite every tile of `grid` with freshly generated terrain
pub fn generate_terrain<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    config: &VegetationConfig,
    rng: &mut R,
) -> TerrainSummary {
    let t = &config.terrain;
    let mut summary = TerrainSummary::default();
    let height_seed = config.seed;
    let moisture_seed = config.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0x5EED;

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let index = grid.index(x, y);
            let elevation = value_noise(x, y, height_seed);
            let level = ((elevation * (t.max_level as f32 + 1.0)) as u8).min(t.max_level);
            let height = level * HEIGHT_PER_LEVEL;

            if level <= t.water_level {
                *grid.tile_mut(index) = Tile {
                    height,
                    ..Tile::water()
                };
                summary.water += 1;
                continue;
            }

            let mut climate = ClimateBand::Normal;
            let roll: f32 = rng.gen();
            let mut ground = if roll < t.rocks_frequency {
                ClearGround::new(ClearKind::Rocks, 3)
            } else if roll < t.rocks_frequency + t.rough_frequency {
                ClearGround::new(ClearKind::Rough, 3)
            } else if level <= t.max_level / 3
                && roll < t.rocks_frequency + t.rough_frequency + t.fields_frequency
            {
                ClearGround::new(ClearKind::Fields, 3)
            } else {
                ClearGround::new(ClearKind::Grass, 3)
            };

            match config.landscape {
                Landscape::SubArctic if height > config.snow_line => {
                    let depth = (height - config.snow_line) / HEIGHT_PER_LEVEL;
                    ground = ClearGround::new(ClearKind::SnowDesert, depth.min(3));
                }
                Landscape::SubTropical => {
                    let moisture = value_noise(x, y, moisture_seed);
                    if moisture > t.rainforest_moisture {
                        climate = ClimateBand::Rainforest;
                        summary.rainforest += 1;
                    } else if moisture < t.desert_moisture {
                        climate = ClimateBand::DesertTransition;
                        ground = ClearGround::new(ClearKind::SnowDesert, 3);
                        summary.desert += 1;
                    }
                }
                _ => {}
            }

            match ground.kind {
                ClearKind::Grass => summary.grass += 1,
                ClearKind::Rough => summary.rough += 1,
                ClearKind::Rocks => summary.rocks += 1,
                ClearKind::Fields => summary.fields += 1,
                ClearKind::SnowDesert => summary.snow_or_desert += 1,
            }

            *grid.tile_mut(index) = Tile {
                height,
                climate,
                ..Tile::clear(ground)
            };
        }
    }

    tracing::debug!(
        "Generated terrain: {} water, {} grass, {} rough, {} rocks, {} fields, {} snow/desert",
        summary.water,
        summary.grass,
        summary.rough,
        summary.rocks,
        summary.fields,
        summary.snow_or_desert
    );

    summary
}

/// Smooth noise in [0, 1): bilinear interpolation of hashed lattice points
fn value_noise(x: u32, y: u32, seed: u64) -> f32 {
    let cx = x / NOISE_CELL;
    let cy = y / NOISE_CELL;
    let fx = (x % NOISE_CELL) as f32 / NOISE_CELL as f32;
    let fy = (y % NOISE_CELL) as f32 / NOISE_CELL as f32;

    let a = lattice_hash(cx, cy, seed);
    let b = lattice_hash(cx + 1, cy, seed);
    let c = lattice_hash(cx, cy + 1, seed);
    let d = lattice_hash(cx + 1, cy + 1, seed);

    let top = a + (b - a) * smoothstep(fx);
    let bottom = c + (d - c) * smoothstep(fx);
    (top + (bottom - top) * smoothstep(fy)).clamp(0.0, 0.999_999)
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lattice_hash(x: u32, y: u32, seed: u64) -> f32 {
    let n = (x as u64)
        .wrapping_mul(374761393)
        .wrapping_add((y as u64).wrapping_mul(668265263))
        .wrapping_add(seed);
    let n = (n ^ (n >> 13)).wrapping_mul(0x5851_F42D_4C95_7F2D);
    let n = n ^ (n >> 29);
    (n >> 40) as f32 / (1u64 << 24) as f32
}
