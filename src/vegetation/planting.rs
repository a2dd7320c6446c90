//! Player-facing tree planting and clearing
//!
//! Cost accounting and town ratings belong to the host. These functions do
//! the tile work and return enough detail for the host to charge for it.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TreelineError};
use crate::core::types::{Owner, TileIndex};
use crate::map::clear::{ClearGround, ClearKind};
use crate::map::grid::WorldGrid;
use crate::vegetation::climate::{select_species, Climate};
use crate::vegetation::codec::{GrowthStage, TreeState};
use crate::vegetation::constants::{
    CACTUS_SPECIES, MAX_TREES_PER_TILE, RAINFOREST_CLEARING_FACTOR, RAINFOREST_SPECIES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    TreeAlreadyHere,
    OwnedBy(Owner),
    Unsuitable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantOutcome {
    /// New trees on clear land. `cleared` names farmland or rocks that had
    /// to be removed first.
    Planted { species: u8, cleared: Option<ClearKind> },
    /// One more tree on an existing forest tile
    Thickened { count: u8 },
    Skipped(SkipReason),
}

/// Per-tile results of a planting request, in row-major order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingReport {
    pub tiles: Vec<(TileIndex, PlantOutcome)>,
}

impl PlantingReport {
    pub fn planted(&self) -> usize {
        self.count(|o| matches!(o, PlantOutcome::Planted { .. }))
    }

    pub fn thickened(&self) -> usize {
        self.count(|o| matches!(o, PlantOutcome::Thickened { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PlantOutcome::Skipped(_)))
    }

    fn count(&self, f: impl Fn(&PlantOutcome) -> bool) -> usize {
        self.tiles.iter().filter(|(_, o)| f(o)).count()
    }
}

/// What removing a forest tile took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingReport {
    pub trees: u8,
    /// Trees weighted by how hard they are to fell
    pub effort: u32,
}

/// Plant trees over the rectangle spanned by `from` and `to`.
///
/// With `species` unset each tile draws one from the landscape's rules,
/// falling back to cactus where the climate offers nothing.
pub fn plant_trees<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    from: TileIndex,
    to: TileIndex,
    species: Option<u8>,
    rng: &mut R,
) -> Result<PlantingReport> {
    for corner in [from, to] {
        if !grid.contains(corner) {
            return Err(TreelineError::TileOutOfBounds(corner));
        }
    }
    if let Some(species) = species {
        if !climate.landscape.accepts_species(species) {
            return Err(TreelineError::InvalidSpecies {
                species,
                landscape: climate.landscape,
            });
        }
    }

    let (fx, fy) = grid.coords(from);
    let (tx, ty) = grid.coords(to);
    let mut report = PlantingReport::default();

    for y in fy.min(ty)..=fy.max(ty) {
        for x in fx.min(tx)..=fx.max(tx) {
            let tile = grid.index(x, y);
            let outcome = plant_one(grid, climate, tile, species, rng);
            report.tiles.push((tile, outcome));
        }
    }

    tracing::debug!(
        "Planting {}..{}: {} planted, {} thickened, {} skipped",
        from,
        to,
        report.planted(),
        report.thickened(),
        report.skipped()
    );
    Ok(report)
}

fn plant_one<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    tile: TileIndex,
    species: Option<u8>,
    rng: &mut R,
) -> PlantOutcome {
    let cell = *grid.tile(tile);

    if let Some(mut state) = TreeState::read(&cell) {
        if state.count >= MAX_TREES_PER_TILE {
            return PlantOutcome::Skipped(SkipReason::TreeAlreadyHere);
        }
        state.count += 1;
        state.write(grid.tile_mut(tile));
        grid.mark_dirty(tile);
        return PlantOutcome::Thickened { count: state.count };
    }

    let Some(clear) = cell.clear_ground() else {
        return PlantOutcome::Skipped(SkipReason::Unsuitable);
    };
    if !cell.owner.is_nobody() {
        return PlantOutcome::Skipped(SkipReason::OwnedBy(cell.owner));
    }

    let species = species.unwrap_or_else(|| {
        select_species(climate.landscape, cell.climate, (rng.next_u32() >> 24) as u8)
            .unwrap_or(CACTUS_SPECIES)
    });
    let cleared = match clear.kind {
        ClearKind::Fields | ClearKind::Rocks => Some(clear.kind),
        _ => None,
    };

    let (ground, density) = climate.seedling_ground(clear);
    let state = TreeState::new(species, GrowthStage::Seedling, 1).with_ground(ground, density);
    let cell = grid.tile_mut(tile);
    state.write(cell);
    cell.border_bits = 0;
    grid.mark_dirty(tile);

    PlantOutcome::Planted { species, cleared }
}

/// Fell every tree on a tile and return it to fresh grass
pub fn clear_trees(grid: &mut WorldGrid, tile: TileIndex) -> Result<ClearingReport> {
    let cell = grid.get(tile).ok_or(TreelineError::TileOutOfBounds(tile))?;
    let state = TreeState::read(cell).ok_or(TreelineError::NotForested(tile))?;

    let mut effort = state.count as u32;
    if RAINFOREST_SPECIES.contains(&state.species) {
        effort *= RAINFOREST_CLEARING_FACTOR;
    }

    let cell = grid.tile_mut(tile);
    cell.set_clear(ClearGround::new(ClearKind::Grass, 0));
    cell.owner = Owner::Nobody;
    cell.border_bits = 0;
    grid.mark_dirty(tile);

    Ok(ClearingReport {
        trees: state.count,
        effort,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Landscape;
    use crate::map::tile::{ClimateBand, Tile};
    use crate::vegetation::codec::GroundType;
    use rand::rngs::mock::StepRng;

    fn temperate() -> Climate {
        Climate::new(Landscape::Temperate, 56)
    }

    fn plant_fixed(
        grid: &mut WorldGrid,
        climate: &Climate,
        from: TileIndex,
        to: TileIndex,
        species: Option<u8>,
    ) -> Result<PlantingReport> {
        plant_trees(grid, climate, from, to, species, &mut StepRng::new(0, 0))
    }

    #[test]
    fn test_plant_rectangle_with_species() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        let from = grid.index(5, 6);
        let to = grid.index(3, 4);
        let report = plant_fixed(&mut grid, &temperate(), from, to, Some(5)).unwrap();

        assert_eq!(report.planted(), 9);
        assert_eq!(report.tiles[0].0, grid.index(3, 4));
        for (tile, _) in &report.tiles {
            let state = TreeState::read(grid.tile(*tile)).unwrap();
            assert_eq!(state, TreeState::new(5, GrowthStage::Seedling, 1));
            assert_eq!(grid.tile(*tile).owner, Owner::Nobody);
        }
    }

    #[test]
    fn test_rejects_foreign_species() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        let err = plant_fixed(&mut grid, &temperate(), TileIndex(0), TileIndex(0), Some(20));
        assert!(matches!(err, Err(TreelineError::InvalidSpecies { species: 20, .. })));
        assert!(grid.tile(TileIndex(0)).is_clear());
    }

    #[test]
    fn test_rejects_out_of_bounds_corner() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        let err = plant_fixed(&mut grid, &temperate(), TileIndex(0), TileIndex(256), None);
        assert!(matches!(err, Err(TreelineError::TileOutOfBounds(TileIndex(256)))));
    }

    #[test]
    fn test_random_species_falls_back_to_cactus() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        let climate = Climate::new(Landscape::SubTropical, 0);
        grid.tile_mut(TileIndex(0)).climate = ClimateBand::DesertTransition;

        let mut rng = StepRng::new(0xFF00_0000, 0);
        let report =
            plant_trees(&mut grid, &climate, TileIndex(0), TileIndex(0), None, &mut rng).unwrap();
        assert_eq!(
            report.tiles[0].1,
            PlantOutcome::Planted {
                species: CACTUS_SPECIES,
                cleared: None
            }
        );
    }

    #[test]
    fn test_thicken_then_full() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        TreeState::new(2, GrowthStage::Young, 3).write(grid.tile_mut(TileIndex(1)));
        let mut rng = StepRng::new(0, 0);

        let tile = TileIndex(1);
        let report = plant_trees(&mut grid, &temperate(), tile, tile, None, &mut rng).unwrap();
        assert_eq!(report.tiles[0].1, PlantOutcome::Thickened { count: 4 });
        assert_eq!(TreeState::read(grid.tile(TileIndex(1))).unwrap().stage, GrowthStage::Young);

        let report = plant_trees(&mut grid, &temperate(), tile, tile, None, &mut rng).unwrap();
        assert_eq!(report.tiles[0].1, PlantOutcome::Skipped(SkipReason::TreeAlreadyHere));
    }

    #[test]
    fn test_skips_owned_and_water() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        grid.tile_mut(TileIndex(0)).owner = Owner::Company(3);
        *grid.tile_mut(TileIndex(1)) = Tile::water();

        let (from, to) = (TileIndex(0), TileIndex(1));
        let report = plant_fixed(&mut grid, &temperate(), from, to, Some(0)).unwrap();
        assert_eq!(
            report.tiles[0].1,
            PlantOutcome::Skipped(SkipReason::OwnedBy(Owner::Company(3)))
        );
        assert_eq!(report.tiles[1].1, PlantOutcome::Skipped(SkipReason::Unsuitable));
    }

    #[test]
    fn test_planting_over_fields_is_reported() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        *grid.tile_mut(TileIndex(0)) = Tile::clear(ClearGround::new(ClearKind::Fields, 3));
        *grid.tile_mut(TileIndex(1)) = Tile::clear(ClearGround::new(ClearKind::SnowDesert, 1));

        let climate = Climate::new(Landscape::SubArctic, 56);
        let (from, to) = (TileIndex(0), TileIndex(1));
        let report = plant_fixed(&mut grid, &climate, from, to, Some(12)).unwrap();
        assert_eq!(
            report.tiles[0].1,
            PlantOutcome::Planted {
                species: 12,
                cleared: Some(ClearKind::Fields)
            }
        );
        let snowy = TreeState::read(grid.tile(TileIndex(1))).unwrap();
        assert_eq!((snowy.ground, snowy.density), (GroundType::Snow, 1));
    }

    #[test]
    fn test_clear_trees() {
        let mut grid = WorldGrid::new(16, 16).unwrap();
        TreeState::new(22, GrowthStage::Mature, 3).write(grid.tile_mut(TileIndex(4)));
        grid.tile_mut(TileIndex(4)).owner = Owner::Town;

        let report = clear_trees(&mut grid, TileIndex(4)).unwrap();
        assert_eq!(report, ClearingReport { trees: 3, effort: 12 });
        assert_eq!(
            grid.tile(TileIndex(4)).clear_ground(),
            Some(ClearGround::new(ClearKind::Grass, 0))
        );
        assert_eq!(grid.tile(TileIndex(4)).owner, Owner::Nobody);

        assert!(matches!(
            clear_trees(&mut grid, TileIndex(4)),
            Err(TreelineError::NotForested(_))
        ));
        assert!(matches!(
            clear_trees(&mut grid, TileIndex(999)),
            Err(TreelineError::TileOutOfBounds(_))
        ));
    }
}
