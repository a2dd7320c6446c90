//! Climate rules - species selection, placement ground, ambient effects
//!
//! Each landscape owns a contiguous slice of the species table. Which
//! species a random seed byte yields depends on the landscape and, on
//! sub-tropical maps, on the tile's climate band.

use std::ops::RangeInclusive;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::config::VegetationConfig;
use crate::core::types::{Landscape, TileIndex};
use crate::map::clear::{ClearGround, ClearKind};
use crate::map::grid::WorldGrid;
use crate::map::tile::ClimateBand;
use crate::vegetation::codec::{GroundType, TreeState};
use crate::vegetation::constants::{
    AMBIENT_CHANCE_DEN, AMBIENT_CHANCE_NUM, CACTUS_SEED_LIMIT, CACTUS_SPECIES, SNOW_BAND_STEP,
};

impl Landscape {
    /// First species index of this landscape's slice
    pub fn species_base(self) -> u8 {
        match self {
            Self::Temperate => 0,
            Self::SubArctic => 12,
            Self::SubTropical => 20,
            Self::Toyland => 32,
        }
    }

    pub fn species_count(self) -> u8 {
        match self {
            Self::Temperate => 12,
            Self::SubArctic => 8,
            Self::SubTropical => 12,
            Self::Toyland => 9,
        }
    }

    pub fn species_range(self) -> RangeInclusive<u8> {
        let base = self.species_base();
        base..=base + self.species_count() - 1
    }

    pub fn accepts_species(self, species: u8) -> bool {
        self.species_range().contains(&species)
    }

    /// Tree ground used for snow-or-sand clear land
    pub fn snowy_ground(self) -> GroundType {
        match self {
            Self::SubTropical => GroundType::Desert,
            _ => GroundType::Snow,
        }
    }
}

/// Pick a species from a random seed byte.
///
/// Returns `None` only on sub-tropical desert-transition tiles, where most
/// seeds produce nothing and the rest produce cactus.
pub fn select_species(landscape: Landscape, band: ClimateBand, seed: u8) -> Option<u8> {
    let seed = seed as u32;
    let species = match landscape {
        Landscape::Temperate => seed * 12 >> 8,
        Landscape::SubArctic => (seed >> 5) + 12,
        Landscape::SubTropical => match band {
            ClimateBand::Normal => (seed >> 6) + 28,
            ClimateBand::DesertTransition => {
                if seed > CACTUS_SEED_LIMIT as u32 {
                    return None;
                }
                CACTUS_SPECIES as u32
            }
            ClimateBand::Rainforest => (seed * 7 >> 8) + 20,
        },
        Landscape::Toyland => (seed * 9 >> 8) + 32,
    };
    Some(species as u8)
}

/// Landscape-wide inputs for the vegetation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Climate {
    pub landscape: Landscape,
    /// Snow line in height units
    pub snow_line: u8,
}

impl Climate {
    pub fn new(landscape: Landscape, snow_line: u8) -> Self {
        Self {
            landscape,
            snow_line,
        }
    }

    pub fn from_config(config: &VegetationConfig) -> Self {
        Self::new(config.landscape, config.snow_line)
    }

    pub fn is_sub_tropical(&self) -> bool {
        self.landscape == Landscape::SubTropical
    }

    /// Ground, density and starting counter for a tree placed at `height`.
    ///
    /// Sub-arctic trees above the snow line start deep in snow with a
    /// counter in 0-7. Everywhere else the counter takes the low nibble of
    /// the seed and bit 4 decides between rough and bare ground.
    pub fn placement_ground(&self, height: u8, seed: u8) -> (GroundType, u8, u8) {
        if self.landscape == Landscape::SubArctic && height > self.snow_line {
            (GroundType::Snow, 3, seed & 7)
        } else {
            let ground = if seed & 0x10 != 0 {
                GroundType::Rough
            } else {
                GroundType::Bare
            };
            (ground, 0, seed & 0xF)
        }
    }

    /// Tree ground for a seedling taking over clear land.
    ///
    /// Rough stays rough, snow or sand keeps its density, anything else is
    /// bare. Callers decide separately whether the ground is acceptable.
    pub fn seedling_ground(&self, clear: ClearGround) -> (GroundType, u8) {
        match clear.kind {
            ClearKind::Rough => (GroundType::Rough, 0),
            ClearKind::SnowDesert => (self.landscape.snowy_ground(), clear.density),
            _ => (GroundType::Bare, 0),
        }
    }

    /// Snow ground a sub-arctic tile at `height` settles to, if any
    fn snow_target(&self, height: u8) -> SnowTarget {
        let k = height as i32 - self.snow_line as i32;
        if k < -SNOW_BAND_STEP {
            SnowTarget::Melt
        } else if k == -SNOW_BAND_STEP {
            SnowTarget::Depth(0)
        } else if k < SNOW_BAND_STEP {
            SnowTarget::Depth(1)
        } else if k == SNOW_BAND_STEP {
            SnowTarget::Depth(2)
        } else {
            SnowTarget::Deep
        }
    }
}

enum SnowTarget {
    Melt,
    Depth(u8),
    Deep,
}

/// Sound effects the ambient pass asks the host to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbientSound {
    LoonBird,
    Lion,
    Monkeys,
    DistantBird,
    Wind,
    HeavyWind,
}

impl AmbientSound {
    const JUNGLE: [AmbientSound; 4] = [
        AmbientSound::LoonBird,
        AmbientSound::Lion,
        AmbientSound::Monkeys,
        AmbientSound::DistantBird,
    ];
}

/// `num/den` chance tested against the low 16 bits of a draw
#[inline]
pub fn chance16(num: u32, den: u32, r: u32) -> bool {
    (r as u16) <= ((65536 * num / den) as u16)
}

/// Climate effects applied to a forested tile on every visit.
///
/// Runs before the maturity counter advances. Ground changes keep the
/// counter and mark the tile dirty; a sound is returned for the host to play.
pub fn apply_ambient<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    tile: TileIndex,
    rng: &mut R,
) -> Option<AmbientSound> {
    let cell = *grid.tile(tile);
    let mut state = TreeState::read(&cell)?;

    match climate.landscape {
        Landscape::SubTropical => match cell.climate {
            ClimateBand::Rainforest => {
                let r = rng.next_u32();
                if chance16(AMBIENT_CHANCE_NUM, AMBIENT_CHANCE_DEN, r) {
                    return Some(AmbientSound::JUNGLE[((r >> 16) & 3) as usize]);
                }
                None
            }
            ClimateBand::DesertTransition => {
                if !state.ground.is_snowy() {
                    state.ground = GroundType::Desert;
                    state.density = 3;
                    state.write(grid.tile_mut(tile));
                    grid.mark_dirty(tile);
                }
                None
            }
            ClimateBand::Normal => None,
        },
        Landscape::SubArctic => {
            let (ground, density) = match climate.snow_target(cell.height) {
                SnowTarget::Melt => {
                    if !state.ground.is_snowy() {
                        return None;
                    }
                    (GroundType::Bare, 0)
                }
                SnowTarget::Depth(d) => (GroundType::Snow, d),
                SnowTarget::Deep => {
                    if state.ground == GroundType::Snow && state.density == 3 {
                        let r = rng.next_u32();
                        if chance16(AMBIENT_CHANCE_NUM, AMBIENT_CHANCE_DEN, r) {
                            return Some(if r & 0x8000_0000 != 0 {
                                AmbientSound::HeavyWind
                            } else {
                                AmbientSound::Wind
                            });
                        }
                        return None;
                    }
                    (GroundType::Snow, 3)
                }
            };

            if state.ground != ground || state.density != density {
                state.ground = ground;
                state.density = density;
                state.write(grid.tile_mut(tile));
                grid.mark_dirty(tile);
            }
            None
        }
        Landscape::Temperate | Landscape::Toyland => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tile::Tile;
    use crate::vegetation::codec::GrowthStage;
    use crate::vegetation::constants::{RAINFOREST_SPECIES, SPECIES_COUNT};
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_species_ranges_tile_the_table() {
        let mut next = 0;
        for landscape in [
            Landscape::Temperate,
            Landscape::SubArctic,
            Landscape::SubTropical,
            Landscape::Toyland,
        ] {
            assert_eq!(landscape.species_base(), next);
            next += landscape.species_count();
        }
        assert_eq!(next, SPECIES_COUNT);
    }

    #[test]
    fn test_selection_stays_in_landscape() {
        for seed in 0..=255u8 {
            for landscape in [Landscape::Temperate, Landscape::SubArctic, Landscape::Toyland] {
                let species = select_species(landscape, ClimateBand::Normal, seed).unwrap();
                assert!(landscape.accepts_species(species), "{landscape}: {species}");
            }
            for band in [ClimateBand::Normal, ClimateBand::Rainforest] {
                let species = select_species(Landscape::SubTropical, band, seed).unwrap();
                assert!(Landscape::SubTropical.accepts_species(species));
            }
        }
    }

    #[test]
    fn test_known_species() {
        assert_eq!(select_species(Landscape::Temperate, ClimateBand::Normal, 128), Some(6));
        assert_eq!(select_species(Landscape::SubArctic, ClimateBand::Normal, 255), Some(19));
        assert_eq!(select_species(Landscape::SubTropical, ClimateBand::Normal, 0), Some(28));
        assert_eq!(select_species(Landscape::Toyland, ClimateBand::Normal, 255), Some(40));
    }

    #[test]
    fn test_desert_band_is_mostly_barren() {
        let hits = (0..=255u8)
            .filter_map(|s| {
                select_species(Landscape::SubTropical, ClimateBand::DesertTransition, s)
            })
            .collect::<Vec<_>>();
        assert_eq!(hits.len(), 13);
        assert!(hits.iter().all(|&s| s == CACTUS_SPECIES));
    }

    #[test]
    fn test_rainforest_band_species() {
        for seed in 0..=255u8 {
            let s = select_species(Landscape::SubTropical, ClimateBand::Rainforest, seed).unwrap();
            assert!(RAINFOREST_SPECIES.contains(&s));
        }
    }

    #[test]
    fn test_placement_ground() {
        let arctic = Climate::new(Landscape::SubArctic, 40);
        assert_eq!(arctic.placement_ground(48, 0xFF), (GroundType::Snow, 3, 7));
        assert_eq!(arctic.placement_ground(40, 0x1F), (GroundType::Rough, 0, 0xF));

        let temperate = Climate::new(Landscape::Temperate, 40);
        assert_eq!(temperate.placement_ground(200, 0x2A), (GroundType::Bare, 0, 0xA));
    }

    #[test]
    fn test_seedling_ground_follows_clear_kind() {
        let tropical = Climate::new(Landscape::SubTropical, 0);
        let arctic = Climate::new(Landscape::SubArctic, 40);
        let sand = ClearGround::new(ClearKind::SnowDesert, 2);
        assert_eq!(tropical.seedling_ground(sand), (GroundType::Desert, 2));
        assert_eq!(arctic.seedling_ground(sand), (GroundType::Snow, 2));
        assert_eq!(
            arctic.seedling_ground(ClearGround::new(ClearKind::Rough, 3)),
            (GroundType::Rough, 0)
        );
        assert_eq!(
            arctic.seedling_ground(ClearGround::new(ClearKind::Fields, 3)),
            (GroundType::Bare, 0)
        );
    }

    #[test]
    fn test_chance16_boundary() {
        // 65536 / 200 = 327
        assert!(chance16(1, 200, 327));
        assert!(!chance16(1, 200, 328));
        assert!(chance16(1, 200, 0xFFFF_0000));
    }

    fn forested_grid(height: u8, band: ClimateBand, state: TreeState) -> (WorldGrid, TileIndex) {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        let tile = grid.index(4, 4);
        let cell = grid.tile_mut(tile);
        *cell = Tile {
            height,
            climate: band,
            ..Tile::default()
        };
        state.write(cell);
        (grid, tile)
    }

    #[test]
    fn test_desert_band_turns_ground_to_sand() {
        let climate = Climate::new(Landscape::SubTropical, 0);
        let state = TreeState::new(30, GrowthStage::Young, 1).with_counter(5);
        let (mut grid, tile) = forested_grid(8, ClimateBand::DesertTransition, state);

        let sound = apply_ambient(&mut grid, &climate, tile, &mut StepRng::new(0, 0));
        assert_eq!(sound, None);

        let after = TreeState::read(grid.tile(tile)).unwrap();
        assert_eq!(after.ground, GroundType::Desert);
        assert_eq!(after.density, 3);
        assert_eq!(after.counter, 5);
        assert!(grid.is_dirty(tile));
    }

    #[test]
    fn test_rainforest_sound_from_draw() {
        let climate = Climate::new(Landscape::SubTropical, 0);
        let state = TreeState::new(22, GrowthStage::Mature, 2);
        let (mut grid, tile) = forested_grid(8, ClimateBand::Rainforest, state);

        // Low half 0 passes the chance, bits 16-17 = 2 selects monkeys
        let mut rng = StepRng::new(0x0002_0000, 0);
        let sound = apply_ambient(&mut grid, &climate, tile, &mut rng);
        assert_eq!(sound, Some(AmbientSound::Monkeys));
        assert!(!grid.is_dirty(tile));
    }

    #[test]
    fn test_snow_bands() {
        let climate = Climate::new(Landscape::SubArctic, 40);
        let cases = [
            (48, GroundType::Snow, 2),
            (40, GroundType::Snow, 1),
            (32, GroundType::Snow, 0),
            (56, GroundType::Snow, 3),
        ];
        for (height, ground, density) in cases {
            let state = TreeState::new(14, GrowthStage::Sapling, 1);
            let (mut grid, tile) = forested_grid(height, ClimateBand::Normal, state);
            apply_ambient(&mut grid, &climate, tile, &mut StepRng::new(u64::MAX, 0));
            let after = TreeState::read(grid.tile(tile)).unwrap();
            assert_eq!((after.ground, after.density), (ground, density), "height {height}");
            assert!(grid.is_dirty(tile));
        }
    }

    #[test]
    fn test_snow_melts_far_below_line() {
        let climate = Climate::new(Landscape::SubArctic, 40);
        let snowy = TreeState::new(14, GrowthStage::Sapling, 1).with_ground(GroundType::Snow, 2);
        let (mut grid, tile) = forested_grid(16, ClimateBand::Normal, snowy);
        apply_ambient(&mut grid, &climate, tile, &mut StepRng::new(0, 0));
        let after = TreeState::read(grid.tile(tile)).unwrap();
        assert_eq!((after.ground, after.density), (GroundType::Bare, 0));

        // Rough ground low down is left alone and not redrawn
        let rough = TreeState::new(14, GrowthStage::Sapling, 1).with_ground(GroundType::Rough, 0);
        let (mut grid, tile) = forested_grid(16, ClimateBand::Normal, rough);
        apply_ambient(&mut grid, &climate, tile, &mut StepRng::new(0, 0));
        assert_eq!(TreeState::read(grid.tile(tile)), Some(rough));
        assert!(!grid.is_dirty(tile));
    }

    #[test]
    fn test_deep_snow_howls() {
        let climate = Climate::new(Landscape::SubArctic, 40);
        let deep = TreeState::new(14, GrowthStage::Mature, 1).with_ground(GroundType::Snow, 3);
        let (mut grid, tile) = forested_grid(80, ClimateBand::Normal, deep);

        let sound = apply_ambient(&mut grid, &climate, tile, &mut StepRng::new(0x8000_0000, 0));
        assert_eq!(sound, Some(AmbientSound::HeavyWind));
        assert!(!grid.is_dirty(tile));

        let sound = apply_ambient(&mut grid, &climate, tile, &mut StepRng::new(0x0000_FFFF, 0));
        assert_eq!(sound, None);
    }
}
