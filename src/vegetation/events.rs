//! Vegetation events reported to the host each tick

use serde::{Deserialize, Serialize};

use crate::core::types::TileIndex;
use crate::vegetation::climate::AmbientSound;
use crate::vegetation::codec::GrowthStage;
use crate::vegetation::lifecycle::{SpreadOutcome, Transition};

/// Where a scheduled seedling came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedSource {
    /// Per-tick rainforest planting on sub-tropical maps
    Rainforest,
    /// The rare random planting event
    Wild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VegetationEvent {
    // Ambience
    Sound { tile: TileIndex, sound: AmbientSound },

    // Lifecycle
    Grew { tile: TileIndex, stage: GrowthStage },
    DecayStarted { tile: TileIndex, forced: bool },
    TreeAdded { tile: TileIndex, count: u8 },
    Spread { from: TileIndex, to: TileIndex, species: u8 },
    SpreadBlocked { from: TileIndex, to: TileIndex },
    TreeLost { tile: TileIndex, remaining: u8 },
    ForestCleared { tile: TileIndex },

    // Scheduled planting
    Seeded { tile: TileIndex, species: u8, source: SeedSource },
}

impl VegetationEvent {
    /// Event for a lifecycle transition, if it is worth reporting
    pub fn from_transition(tile: TileIndex, transition: Transition) -> Option<Self> {
        let event = match transition {
            Transition::Dormant | Transition::NoOp => return None,
            Transition::Grew { stage } => Self::Grew { tile, stage },
            Transition::StartedDecay { forced } => Self::DecayStarted { tile, forced },
            Transition::AddedTree { count } => Self::TreeAdded { tile, count },
            Transition::Spread(SpreadOutcome::Seeded { target, species }) => Self::Spread {
                from: tile,
                to: target,
                species,
            },
            Transition::Spread(SpreadOutcome::Blocked { target }) => Self::SpreadBlocked {
                from: tile,
                to: target,
            },
            Transition::TreeLost { remaining } => Self::TreeLost { tile, remaining },
            Transition::Cleared => Self::ForestCleared { tile },
        };
        Some(event)
    }

    pub fn tile(&self) -> TileIndex {
        match *self {
            Self::Sound { tile, .. }
            | Self::Grew { tile, .. }
            | Self::DecayStarted { tile, .. }
            | Self::TreeAdded { tile, .. }
            | Self::TreeLost { tile, .. }
            | Self::ForestCleared { tile }
            | Self::Seeded { tile, .. } => tile,
            Self::Spread { from, .. } | Self::SpreadBlocked { from, .. } => from,
        }
    }
}

/// Running totals of events, by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTally {
    pub sounds: u64,
    pub growth: u64,
    pub decay_started: u64,
    pub forced_decay: u64,
    pub trees_added: u64,
    pub spreads: u64,
    pub blocked_spreads: u64,
    pub trees_lost: u64,
    pub forests_cleared: u64,
    pub rainforest_seedlings: u64,
    pub wild_seedlings: u64,
}

impl EventTally {
    pub fn record(&mut self, event: &VegetationEvent) {
        match event {
            VegetationEvent::Sound { .. } => self.sounds += 1,
            VegetationEvent::Grew { .. } => self.growth += 1,
            VegetationEvent::DecayStarted { forced, .. } => {
                self.decay_started += 1;
                if *forced {
                    self.forced_decay += 1;
                }
            }
            VegetationEvent::TreeAdded { .. } => self.trees_added += 1,
            VegetationEvent::Spread { .. } => self.spreads += 1,
            VegetationEvent::SpreadBlocked { .. } => self.blocked_spreads += 1,
            VegetationEvent::TreeLost { .. } => self.trees_lost += 1,
            VegetationEvent::ForestCleared { .. } => self.forests_cleared += 1,
            VegetationEvent::Seeded { source, .. } => match source {
                SeedSource::Rainforest => self.rainforest_seedlings += 1,
                SeedSource::Wild => self.wild_seedlings += 1,
            },
        }
    }

    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a VegetationEvent>) {
        for event in events {
            self.record(event);
        }
    }

    /// Tiles that gained trees without being planted by anyone
    pub fn new_forest_tiles(&self) -> u64 {
        self.spreads + self.rainforest_seedlings + self.wild_seedlings
    }
}
