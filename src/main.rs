//! Treeline - Entry Point
//!
//! Builds a world on demo terrain, plants its initial forests, runs the
//! vegetation ticks and prints a summary. Set `RUST_LOG` for more detail.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use treeline::core::config::VegetationConfig;
use treeline::core::error::Result;
use treeline::core::types::Landscape;
use treeline::simulation::simulate;

/// Grow forests on a generated map and watch them evolve
#[derive(Parser, Debug)]
#[command(name = "treeline")]
#[command(about = "Procedural forest generation and vegetation lifecycle simulation")]
struct Args {
    /// TOML config file (missing keys use defaults)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Map width in tiles (power of two)
    #[arg(long)]
    width: Option<u32>,

    /// Map height in tiles (power of two)
    #[arg(long)]
    height: Option<u32>,

    /// temperate, sub-arctic, sub-tropical or toyland
    #[arg(long)]
    landscape: Option<Landscape>,

    /// Number of ticks to simulate after generation
    #[arg(long, short = 't', default_value_t = 4096)]
    ticks: u64,

    /// Write the full output as JSON to this file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("treeline=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VegetationConfig::load(path)?,
        None => VegetationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(landscape) = args.landscape {
        config.landscape = landscape;
    }
    config.validate()?;

    tracing::info!(
        "Starting {}x{} {} world, seed {}",
        config.width,
        config.height,
        config.landscape,
        config.seed
    );

    let output = simulate(&config, args.ticks)?;
    println!("{}", output.summary());

    if let Some(path) = &args.output {
        std::fs::write(path, output.to_json())?;
        println!("\nFull output written to {}", path.display());
    }

    Ok(())
}
