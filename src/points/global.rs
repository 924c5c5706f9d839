//! Overall high-score aggregation across minigames
//!
//! Each game persists its own per-player high score under a named key.
//! Whenever one of them reports a change, the configured keys are summed
//! and pushed to the overall leaderboard, overriding the previous entry.

use crate::runtime::ctx::Ctx;
use crate::runtime::message::Message;

/// Global leaderboard aggregator
#[derive(Debug)]
pub struct GlobalPoints {
    game_score_keys: Vec<String>,
    global_board: String,
}

impl GlobalPoints {
    pub fn new(game_score_keys: Vec<String>, global_board: impl Into<String>) -> Self {
        Self {
            game_score_keys,
            global_board: global_board.into(),
        }
    }

    pub fn handle(&mut self, msg: &Message, ctx: &mut Ctx<'_>) {
        if let Message::HighScoreUpdate { player } = msg {
            let total: i64 = self
                .game_score_keys
                .iter()
                .map(|key| ctx.scores.vars.get(*player, key))
                .sum();
            tracing::debug!(?player, total, "overall high score update");
            ctx.scores
                .boards
                .set_score(&self.global_board, *player, total, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PlayerId;
    use crate::runtime::ctx::test_ctx;

    #[test]
    fn sums_all_configured_keys_into_the_overall_board() {
        let mut global = GlobalPoints::new(
            vec!["gameA".to_string(), "gameB".to_string()],
            "overallScores",
        );
        let (mut scheduler, mut scores, mut outputs) = test_ctx();
        let player = PlayerId::new();
        scores.vars.set(player, "gameA", 12);
        scores.vars.set(player, "gameB", 30);

        let mut ctx = Ctx::new(&mut scheduler, &mut scores, &mut outputs);
        global.handle(&Message::HighScoreUpdate { player }, &mut ctx);
        drop(ctx);

        assert_eq!(scores.boards.score("overallScores", player), Some(42));
    }

    #[test]
    fn override_semantics_allow_the_total_to_drop() {
        let mut global = GlobalPoints::new(vec!["gameA".to_string()], "overallScores");
        let (mut scheduler, mut scores, mut outputs) = test_ctx();
        let player = PlayerId::new();

        scores.vars.set(player, "gameA", 50);
        let mut ctx = Ctx::new(&mut scheduler, &mut scores, &mut outputs);
        global.handle(&Message::HighScoreUpdate { player }, &mut ctx);
        drop(ctx);

        scores.vars.set(player, "gameA", 10);
        let mut ctx = Ctx::new(&mut scheduler, &mut scores, &mut outputs);
        global.handle(&Message::HighScoreUpdate { player }, &mut ctx);
        drop(ctx);

        assert_eq!(scores.boards.score("overallScores", player), Some(10));
    }
}
