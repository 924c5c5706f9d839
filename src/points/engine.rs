//! Scoring engine with streak multipliers and clamped bounds
//!
//! One `PointsManager` tracks a single player's points for the current game
//! session. Streak length and the point factor live only in memory; points
//! and the high score are pushed to the persistence services on every
//! change so they survive the session.

use crate::core::config::PointsOptions;
use crate::core::types::PlayerId;
use crate::storage::ScoreServices;

/// Outcome of a scoring operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Points after the operation
    pub points: i64,
    /// Whether the stored high score was rewritten (callers broadcast a
    /// high-score-changed notification when set)
    pub high_score_changed: bool,
}

/// Per-player points, streak, and persistence bookkeeping
#[derive(Debug)]
pub struct PointsManager {
    player: PlayerId,
    high_score_key: String,
    leaderboard: String,
    opts: PointsOptions,
    points: i64,
    streak_length: u32,
    point_factor: i64,
}

impl PointsManager {
    pub fn new(
        player: PlayerId,
        high_score_key: impl Into<String>,
        leaderboard: impl Into<String>,
        opts: PointsOptions,
    ) -> Self {
        Self {
            player,
            high_score_key: high_score_key.into(),
            leaderboard: leaderboard.into(),
            opts,
            points: 0,
            streak_length: 0,
            point_factor: 1,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    /// Score a win
    ///
    /// The streak is counted after the points are added: the win that
    /// reaches `streak_threshold` is still scored at the old factor, and
    /// the escalated factor applies from the following win. Escalation is
    /// sticky until a loss.
    pub fn win(&mut self, scores: &mut ScoreServices) -> ScoreUpdate {
        self.points = (self.points + self.opts.win_points * self.point_factor).min(self.opts.max_win);
        self.streak_length += 1;
        if self.streak_length >= self.opts.streak_threshold {
            self.point_factor = self.opts.streak_multiplier;
        }
        self.record_score(scores, false)
    }

    /// Score a loss; the streak and factor always reset
    pub fn lose(&mut self, scores: &mut ScoreServices) -> ScoreUpdate {
        self.points = (self.points - self.opts.lose_points).max(self.opts.max_lose);
        self.streak_length = 0;
        self.point_factor = 1;
        self.record_score(scores, false)
    }

    /// Zero the session points; optionally force the stored high score down
    pub fn reset(&mut self, reset_high_score: bool, scores: &mut ScoreServices) -> ScoreUpdate {
        self.points = 0;
        self.streak_length = 0;
        self.point_factor = 1;
        self.record_score(scores, reset_high_score)
    }

    fn record_score(&self, scores: &mut ScoreServices, reset_high_score: bool) -> ScoreUpdate {
        let high_score = scores.vars.get(self.player, &self.high_score_key);
        let high_score_changed = reset_high_score || self.points > high_score;
        if high_score_changed {
            scores
                .vars
                .set(self.player, &self.high_score_key, self.points);
        }
        scores
            .boards
            .set_score(&self.leaderboard, self.player, self.points, reset_high_score);
        ScoreUpdate {
            points: self.points,
            high_score_changed,
        }
    }
}
