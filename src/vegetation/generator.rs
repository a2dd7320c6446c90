//! World-creation forest generation
//!
//! Three passes, all drawing from the world's one random stream:
//! clustered scatter (dense groves around random centers), uniform scatter
//! and, on sub-tropical maps, rainforest densification. A single 32-bit draw
//! picks a candidate tile and seeds the placement on it.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::types::{Landscape, TileIndex};
use crate::map::grid::WorldGrid;
use crate::map::tile::ClimateBand;
use crate::vegetation::climate::{select_species, Climate};
use crate::vegetation::codec::{unpack_stage_count, GrowthStage, TreeState};
use crate::vegetation::constants::{
    CLUSTER_ATTEMPTS, CLUSTER_BASE_COUNT, CLUSTER_COUNT_JITTER_MASK, CLUSTER_CORE_RADIUS,
    CLUSTER_RADIUS, MAX_TREES_PER_TILE, RAINFOREST_ATTEMPTS, SCATTER_ATTEMPTS, SCATTER_PASSES,
    SCATTER_PASSES_SUB_ARCTIC,
};

/// How a placement derives stage and count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Stage and count from bits 16-23 of the seed
    Seeded,
    /// Full grown grove heart: four mature trees
    ClusterCore,
    /// Grove fringe: seedlings with a seed-drawn count
    ClusterEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Planted(TreeState),
    /// The climate band produced no species for this seed
    NoSpecies,
    /// Not clear land, or ground trees cannot take
    Unsuitable,
}

/// Tally of a full generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub clusters: u32,
    pub cluster_trees: u32,
    pub scatter_trees: u32,
    pub rainforest_trees: u32,
    pub scatter_passes: u32,
}

impl GenerationReport {
    pub fn total_planted(&self) -> u32 {
        self.cluster_trees + self.scatter_trees + self.rainforest_trees
    }
}

/// Plant the initial forests of a freshly built world.
///
/// Pass order and repeat counts are part of the density contract:
/// clusters first (none on toyland), then uniform scatter plus rainforest
/// densification, six times over (fifteen on sub-arctic maps).
pub fn generate_forests<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    rng: &mut R,
) -> GenerationReport {
    let mut report = GenerationReport::default();

    if climate.landscape != Landscape::Toyland {
        let (clusters, planted) = place_clusters(grid, climate, rng);
        report.clusters = clusters;
        report.cluster_trees = planted;
    }

    report.scatter_passes = match climate.landscape {
        Landscape::SubArctic => SCATTER_PASSES_SUB_ARCTIC,
        _ => SCATTER_PASSES,
    };
    for pass in 0..report.scatter_passes {
        let scattered = scatter_trees(grid, climate, rng);
        let rainforest = if climate.is_sub_tropical() {
            densify_rainforest(grid, climate, rng)
        } else {
            0
        };
        tracing::debug!(
            "Scatter pass {}: {} trees, {} rainforest trees",
            pass + 1,
            scattered,
            rainforest
        );
        report.scatter_trees += scattered;
        report.rainforest_trees += rainforest;
    }

    tracing::info!(
        "Generated forests on {} map: {} clusters, {} trees planted",
        climate.landscape,
        report.clusters,
        report.total_planted()
    );

    report
}

/// Clustered scatter. Returns (cluster count, trees planted).
pub fn place_clusters<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    rng: &mut R,
) -> (u32, u32) {
    let jitter = rng.next_u32() & CLUSTER_COUNT_JITTER_MASK;
    let clusters = grid.scale_by_map_size(jitter + CLUSTER_BASE_COUNT);
    let mut planted = 0;

    for _ in 0..clusters {
        let center = grid.random_tile(rng);
        planted += place_cluster(grid, climate, center, rng);
    }

    tracing::debug!("Placed {} clusters with {} trees", clusters, planted);
    (clusters, planted)
}

/// One grove: a fixed number of draws around `center`, each accepted when
/// its offset lies within the cluster radius.
pub fn place_cluster<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    center: TileIndex,
    rng: &mut R,
) -> u32 {
    let mut planted = 0;

    for _ in 0..CLUSTER_ATTEMPTS {
        let r = rng.next_u32();
        let dx = (r & 0x1F) as i32 - 16;
        let dy = ((r >> 8) & 0x1F) as i32 - 16;
        let dist = dx.unsigned_abs() + dy.unsigned_abs();
        if dist > CLUSTER_RADIUS {
            continue;
        }

        let tile = grid.offset(center, dx, dy);
        let placement = if dist <= CLUSTER_CORE_RADIUS {
            Placement::ClusterCore
        } else {
            Placement::ClusterEdge
        };
        if let PlacementOutcome::Planted(_) = place_tree(grid, climate, tile, r, placement) {
            planted += 1;
        }
    }

    planted
}

/// Uniform scatter: each draw names its own tile
pub fn scatter_trees<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    rng: &mut R,
) -> u32 {
    let attempts = grid.scale_by_map_size(SCATTER_ATTEMPTS);
    let mut planted = 0;

    for _ in 0..attempts {
        let r = rng.next_u32();
        let tile = grid.wrap(r);
        let outcome = place_tree(grid, climate, tile, r, Placement::Seeded);
        if let PlacementOutcome::Planted(_) = outcome {
            planted += 1;
        }
    }

    planted
}

/// Extra scatter draws that only land on rainforest-band tiles
pub fn densify_rainforest<R: RngCore + ?Sized>(
    grid: &mut WorldGrid,
    climate: &Climate,
    rng: &mut R,
) -> u32 {
    let attempts = grid.scale_by_map_size(RAINFOREST_ATTEMPTS);
    let mut planted = 0;

    for _ in 0..attempts {
        let r = rng.next_u32();
        let tile = grid.wrap(r);
        if grid.tile(tile).climate != ClimateBand::Rainforest {
            continue;
        }
        let outcome = place_tree(grid, climate, tile, r, Placement::Seeded);
        if let PlacementOutcome::Planted(_) = outcome {
            planted += 1;
        }
    }

    planted
}

/// Put trees on a clear tile, seeded by one 32-bit draw.
///
/// Species comes from bits 24-31, stage and count from bits 16-23, and the
/// ground and starting counter from bits 24-31 again. Border bits are wiped.
pub fn place_tree(
    grid: &mut WorldGrid,
    climate: &Climate,
    tile: TileIndex,
    seed: u32,
    placement: Placement,
) -> PlacementOutcome {
    let cell = grid.tile(tile);
    match cell.clear_ground() {
        Some(ground) if ground.accepts_generated_tree() => {}
        _ => return PlacementOutcome::Unsuitable,
    }

    let high = (seed >> 24) as u8;
    let Some(species) = select_species(climate.landscape, cell.climate, high) else {
        return PlacementOutcome::NoSpecies;
    };

    let (seeded_stage, seeded_count) = unpack_stage_count((seed >> 16) as u8);
    let (stage, count) = match placement {
        Placement::Seeded => (seeded_stage, seeded_count),
        Placement::ClusterCore => (GrowthStage::Mature, MAX_TREES_PER_TILE),
        Placement::ClusterEdge => (GrowthStage::Seedling, seeded_count),
    };
    let (ground, density, counter) = climate.placement_ground(cell.height, high);

    let state = TreeState {
        species,
        stage,
        count,
        ground,
        density,
        counter,
    };
    let cell = grid.tile_mut(tile);
    state.write(cell);
    cell.border_bits = 0;

    tracing::trace!("Placed {:?} at {}", state, tile);
    PlacementOutcome::Planted(state)
}
