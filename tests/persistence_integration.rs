//! Integration tests for saving and loading vegetation state
//!
//! Persisted state is the packed tile bytes plus the driver counters.
//! Dirty marks are renderer state and are not saved.

use treeline::core::config::VegetationConfig;
use treeline::core::error::TreelineError;
use treeline::core::types::{Landscape, TileIndex};
use treeline::map::grid::WorldGrid;
use treeline::simulation::{ForestWorld, WorldSnapshot};
use treeline::vegetation::driver::TickDriver;

fn grown_world() -> ForestWorld {
    let config = VegetationConfig {
        width: 64,
        height: 64,
        seed: 2024,
        landscape: Landscape::SubTropical,
        sweep_period: 16,
        ..VegetationConfig::default()
    };
    let (mut world, _) = ForestWorld::with_terrain(&config).unwrap();
    world.generate().unwrap();
    for _ in 0..300 {
        world.tick();
    }
    world
}

#[test]
fn test_grid_json_roundtrip_is_exact() {
    let world = grown_world();
    let json = serde_json::to_string(&world.grid).unwrap();
    let restored: WorldGrid = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, world.grid);
    assert_eq!(restored.tiles(), world.grid.tiles());
    assert_eq!(restored.dirty_count(), 0);
}

#[test]
fn test_driver_counters_survive() {
    let world = grown_world();
    let json = serde_json::to_string(&world.driver).unwrap();
    let restored: TickDriver = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, world.driver);
    // 300 ticks from zero with wrapping decrement
    assert_eq!(restored.rare_counter(), 0u8.wrapping_sub(44));
    assert_eq!(restored.sweep_phase(), 300 % 16);
}

#[test]
fn test_restored_world_cannot_regenerate() {
    let world = grown_world();
    let snapshot = WorldSnapshot::from_json(&world.snapshot().to_json().unwrap()).unwrap();
    let mut restored = ForestWorld::from_snapshot(snapshot, 2024);

    assert_eq!(restored.tick, 300);
    assert!(matches!(restored.generate(), Err(TreelineError::AlreadyGenerated)));
}

#[test]
fn test_restored_worlds_evolve_identically() {
    let world = grown_world();
    let snapshot = world.snapshot();
    let mut a = ForestWorld::from_snapshot(snapshot.clone(), 77);
    let mut b = ForestWorld::from_snapshot(snapshot, 77);

    for _ in 0..500 {
        assert_eq!(a.tick(), b.tick());
    }
    assert_eq!(a.grid, b.grid);
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    assert!(matches!(
        WorldSnapshot::from_json("{\"grid\": 3}"),
        Err(TreelineError::SerdeError(_))
    ));
}

#[test]
fn test_toml_config_file() {
    let path = std::env::temp_dir().join("treeline_persistence_config.toml");
    std::fs::write(
        &path,
        "seed = 9\nlandscape = \"sub_arctic\"\nsnow_line = 40\n\n[terrain]\nmax_level = 10\n",
    )
    .unwrap();

    let config = VegetationConfig::load(&path).unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.landscape, Landscape::SubArctic);
    assert_eq!(config.snow_line, 40);
    assert_eq!(config.terrain.max_level, 10);
    assert_eq!(config.width, 256);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_describe_after_restore() {
    let world = grown_world();
    let (tile, _) = world
        .grid
        .iter()
        .find(|(_, t)| t.is_forested())
        .expect("a grown world has trees");
    let before = world.describe(tile).unwrap();

    let restored = ForestWorld::from_snapshot(world.snapshot(), 1);
    assert_eq!(restored.describe(tile).unwrap(), before);
    assert!(matches!(
        restored.describe(TileIndex(1 << 20)),
        Err(TreelineError::TileOutOfBounds(_))
    ));
}

fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> Result<WorldSnapshot, TreelineError> {
    let world = grown_world();
    let mut value = serde_json::to_value(world.snapshot()).unwrap();
    edit(&mut value);
    WorldSnapshot::from_json(&value.to_string())
}

#[test]
fn test_truncated_tile_array_is_rejected() {
    let result = tampered(|v| {
        v["grid"]["tiles"].as_array_mut().unwrap().truncate(10);
    });
    assert!(matches!(result, Err(TreelineError::SerdeError(_))));
}

#[test]
fn test_bad_map_edges_are_rejected() {
    let result = tampered(|v| v["grid"]["width"] = 48.into());
    assert!(matches!(result, Err(TreelineError::SerdeError(_))));
}

#[test]
fn test_bad_sweep_counters_are_rejected() {
    for (field, value) in [("sweep_period", 0), ("sweep_period", 12), ("sweep_phase", 16)] {
        let result = tampered(|v| v["driver"][field] = value.into());
        assert!(
            matches!(result, Err(TreelineError::SerdeError(_))),
            "{field} = {value} loaded"
        );
    }
}

#[test]
fn test_unknown_species_is_rejected() {
    let world = grown_world();
    let (tile, _) = world.grid.iter().find(|(_, t)| t.is_forested()).unwrap();
    let result = tampered(|v| v["grid"]["tiles"][tile.as_usize()]["variant_bits"] = 50.into());
    assert!(matches!(result, Err(TreelineError::InvalidConfig(_))));
}

#[test]
fn test_untouched_snapshot_loads_and_ticks() {
    let snapshot = tampered(|_| {}).unwrap();
    let mut world = ForestWorld::from_snapshot(snapshot, 5);
    for _ in 0..64 {
        world.tick();
    }
    assert_eq!(world.tick, 364);
}
