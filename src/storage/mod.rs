//! Opaque persistence services
//!
//! The host environment owns real player-variable storage and leaderboards;
//! the game only needs get/set semantics keyed by player and string key.
//! Trait seams keep the decision core testable with the in-memory
//! implementations below. Writes are last-write-wins; all dispatch is
//! single-threaded so no locking is required.

use std::collections::HashMap;

use crate::core::types::PlayerId;

/// Persisted per-player numeric variables
pub trait PlayerVarStore {
    /// Read a variable; unseen keys read as zero
    fn get(&self, player: PlayerId, key: &str) -> i64;
    fn set(&mut self, player: PlayerId, key: &str, value: i64);
}

/// Named leaderboards
pub trait LeaderboardStore {
    /// Record a score for a player
    ///
    /// With `override_previous` the stored entry is replaced outright;
    /// otherwise only an improvement is kept.
    fn set_score(&mut self, board: &str, player: PlayerId, score: i64, override_previous: bool);

    /// Current entry for a player, if any
    fn score(&self, board: &str, player: PlayerId) -> Option<i64>;
}

/// Bundle handed to scoring code at dispatch time
pub struct ScoreServices {
    pub vars: Box<dyn PlayerVarStore>,
    pub boards: Box<dyn LeaderboardStore>,
}

impl ScoreServices {
    pub fn new(vars: Box<dyn PlayerVarStore>, boards: Box<dyn LeaderboardStore>) -> Self {
        Self { vars, boards }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryVarStore::default()),
            Box::new(MemoryLeaderboard::default()),
        )
    }
}

/// HashMap-backed variable store
#[derive(Debug, Default)]
pub struct MemoryVarStore {
    values: HashMap<(PlayerId, String), i64>,
}

impl PlayerVarStore for MemoryVarStore {
    fn get(&self, player: PlayerId, key: &str) -> i64 {
        self.values
            .get(&(player, key.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn set(&mut self, player: PlayerId, key: &str, value: i64) {
        self.values.insert((player, key.to_string()), value);
    }
}

/// HashMap-backed leaderboard store
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    entries: HashMap<(String, PlayerId), i64>,
}

impl LeaderboardStore for MemoryLeaderboard {
    fn set_score(&mut self, board: &str, player: PlayerId, score: i64, override_previous: bool) {
        let key = (board.to_string(), player);
        match self.entries.get(&key) {
            Some(existing) if !override_previous && *existing >= score => {}
            _ => {
                self.entries.insert(key, score);
            }
        }
    }

    fn score(&self, board: &str, player: PlayerId) -> Option<i64> {
        self.entries.get(&(board.to_string(), player)).copied()
    }
}
