//! Game configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values can be overridden from a
//! TOML file; anything not present falls back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Scoring parameters for one player's points tally
///
/// The defaults give a slow climb with a modest streak bonus; the clamps
/// keep scores inside the range the leaderboard display expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsOptions {
    /// Points awarded per win, before the streak factor is applied
    pub win_points: i64,
    /// Points removed per loss (never multiplied)
    pub lose_points: i64,
    /// Upper clamp for accumulated points
    pub max_win: i64,
    /// Lower clamp for accumulated points
    pub max_lose: i64,
    /// Consecutive wins needed before the factor escalates
    ///
    /// The win that reaches this count is still scored at the old factor;
    /// only the win after it benefits. See `PointsManager::win`.
    pub streak_threshold: u32,
    /// Factor applied to `win_points` once a streak is established
    pub streak_multiplier: i64,
}

impl Default for PointsOptions {
    fn default() -> Self {
        Self {
            win_points: 1,
            lose_points: 1,
            max_win: 100,
            max_lose: 0,
            streak_threshold: 3,
            streak_multiplier: 2,
        }
    }
}

/// Configuration for a strike arena
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === MATCH PACING ===
    /// Seconds of ready-up countdown before a match starts
    pub start_countdown_secs: u32,

    /// Extra margin added to the orchestrator's own countdown deadline (ms)
    ///
    /// The per-slot display timers run the exact countdown; the match start
    /// fires slightly later so their terminal signals land first.
    pub countdown_grace_ms: u64,

    /// Pause between rounds after the round-over cue (ms)
    pub round_pause_ms: u64,

    /// Delay between the game-over announcement and the full reset (ms)
    pub game_over_reset_ms: u64,

    // === PER-STRIKE TIMING ===
    /// Starting per-sequence time budget (ms)
    pub start_timeout_ms: u64,

    /// Geometric shrink applied to the budget once per sequence-advance
    ///
    /// At 0.9 the budget drops below 5 seconds around round 8 and reaches
    /// the floor near round 22.
    pub timeout_reduction_factor: f32,

    /// Floor for the shrinking budget (ms)
    pub minimum_timeout_ms: u64,

    /// Pause after a judged hit before the next strike is shown (ms)
    ///
    /// Gives the hand time to clear the trigger volume so the next strike
    /// is not judged against a stale entry.
    pub hit_cooldown_ms: u64,

    /// How long the "You Lost!" message stays on the strike display (ms)
    pub lost_text_ms: u64,

    // === COUNTDOWN TIMER ===
    /// Wall-time cadence of the countdown tick loop (ms)
    pub timer_tick_ms: u64,

    /// Delay before an expired clock display is cleared (ms)
    pub clock_clear_ms: u64,

    // === SEQUENCE DEALING ===
    /// Rounds dealt from the easy pool before moving to medium
    pub num_easy: usize,
    /// Rounds dealt from the medium pool before moving to hard
    pub num_medium: usize,
    /// Fixed RNG seed for sequence dealing; `None` draws from entropy
    pub seed: Option<u64>,

    // === STRIKE DETECTION ===
    /// Settle delay between trigger-volume ownership transfer and arming (ms)
    ///
    /// The underlying ownership hand-off is not instantaneous; wiring the
    /// trigger callbacks too early races against it. Must not be zero.
    pub detector_settle_ms: u64,

    /// Maximum distance between the acting hand and the entered trigger
    /// for a strike to count (world units)
    pub max_trigger_distance: f32,

    /// Minimum hand speed for a strike to count (world units per frame)
    ///
    /// Only consulted when `enforce_hit_speed` is set.
    pub minimum_hit_speed: f32,

    /// Whether the hand-speed gate participates in judgment
    ///
    /// Velocity is always tracked; the gate stays off until the detection
    /// tuning work lands, so enabling it does not silently change game
    /// difficulty for existing worlds.
    pub enforce_hit_speed: bool,

    /// How long a punch-class ring stays visible after a judged entry (ms)
    pub ring_show_ms: u64,

    // === SCORING / PERSISTENCE ===
    pub points: PointsOptions,

    /// Persisted-variable key for this game's per-player high score
    pub high_score_key: String,

    /// Leaderboard fed with the current points after every score change
    pub leaderboard: String,

    /// Leaderboard receiving the summed per-game high scores
    pub global_board: String,

    /// Persisted-variable keys summed into the global board
    pub game_score_keys: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_countdown_secs: 10,
            countdown_grace_ms: 100,
            round_pause_ms: 3000,
            game_over_reset_ms: 5000,
            start_timeout_ms: 10_000,
            timeout_reduction_factor: 0.9,
            minimum_timeout_ms: 1000,
            hit_cooldown_ms: 250,
            lost_text_ms: 5000,
            timer_tick_ms: 100,
            clock_clear_ms: 1000,
            num_easy: 5,
            num_medium: 5,
            seed: None,
            detector_settle_ms: 1000,
            max_trigger_distance: 0.2,
            minimum_hit_speed: 0.0,
            enforce_hit_speed: false,
            ring_show_ms: 1000,
            points: PointsOptions::default(),
            high_score_key: "strikeHighScore".to_string(),
            leaderboard: "strikeScores".to_string(),
            global_board: "overallScores".to_string(),
            game_score_keys: vec!["strikeHighScore".to_string()],
        }
    }
}

impl GameConfig {
    /// Parse a configuration from TOML, filling omissions with defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file from disk
    pub fn load(path: &std::path::Path) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_authored_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.start_countdown_secs, 10);
        assert_eq!(config.start_timeout_ms, 10_000);
        assert!((config.timeout_reduction_factor - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.minimum_timeout_ms, 1000);
        assert_eq!(config.num_easy, 5);
        assert_eq!(config.num_medium, 5);
        assert!(!config.enforce_hit_speed);
        assert!(config.detector_settle_ms > 0);
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            start_countdown_secs = 5
            num_easy = 3

            [points]
            win_points = 2
            streak_threshold = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.start_countdown_secs, 5);
        assert_eq!(config.num_easy, 3);
        assert_eq!(config.num_medium, 5);
        assert_eq!(config.points.win_points, 2);
        assert_eq!(config.points.streak_threshold, 5);
        assert_eq!(config.points.lose_points, 1);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("start_countdown_secs = \"ten\"").is_err());
    }
}
