//! Core identifier types used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player known to the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

/// One of the two fixed player positions in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    P0,
    P1,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::P0, Slot::P1];

    /// Array index for per-slot state
    pub fn index(self) -> usize {
        match self {
            Slot::P0 => 0,
            Slot::P1 => 1,
        }
    }
}
