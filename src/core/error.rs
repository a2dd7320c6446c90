use thiserror::Error;

use crate::core::types::{Landscape, TileIndex};

#[derive(Error, Debug)]
pub enum TreelineError {
    #[error("Tile out of bounds: {0}")]
    TileOutOfBounds(TileIndex),

    #[error("Species {species} is not available in the {landscape} landscape")]
    InvalidSpecies { species: u8, landscape: Landscape },

    #[error("Tile {0} has no trees")]
    NotForested(TileIndex),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Forests have already been generated for this world")]
    AlreadyGenerated,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TreelineError>;
