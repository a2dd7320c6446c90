//! Shared helpers for integration tests

#![allow(dead_code)]

use treeline::core::types::{Landscape, TileIndex};
use treeline::map::grid::WorldGrid;
use treeline::vegetation::codec::TreeState;

#[path = "../../src/test_support.rs"]
mod test_support;

pub use test_support::ScriptedRng;

pub const ALL_LANDSCAPES: [Landscape; 4] = [
    Landscape::Temperate,
    Landscape::SubArctic,
    Landscape::SubTropical,
    Landscape::Toyland,
];

/// Every forested tile with its decoded state
pub fn forested(grid: &WorldGrid) -> Vec<(TileIndex, TreeState)> {
    grid.iter()
        .filter_map(|(i, t)| TreeState::read(t).map(|s| (i, s)))
        .collect()
}

/// Panic unless every forested tile decodes to a legal state for `landscape`
pub fn assert_forest_invariants(grid: &WorldGrid, landscape: Landscape) {
    for (tile, state) in forested(grid) {
        assert!(state.stage.bits() <= 6, "{tile}: stage {:?}", state.stage);
        assert!((1..=4).contains(&state.count), "{tile}: count {}", state.count);
        assert!(state.density <= 3, "{tile}: density {}", state.density);
        assert!(state.counter < 16, "{tile}: counter {}", state.counter);
        assert!(
            landscape.accepts_species(state.species),
            "{tile}: species {} on {landscape}",
            state.species
        );
    }
}
