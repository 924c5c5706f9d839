//! Match orchestration
//!
//! The orchestrator tracks slot readiness, runs the start countdown, deals
//! a fresh shared generator into each occupied session when the match
//! begins, paces rounds off sequence-completion reports, and ends the match
//! when no active player remains.

use crate::core::config::GameConfig;
use crate::core::types::Slot;
use crate::runtime::ctx::Ctx;
use crate::runtime::message::{Address, Message, OutputEvent, SoundCue};
use crate::runtime::scheduler::TimerId;
use crate::strikes::generator::StrikeGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    WaitingForPlayers,
    Countdown,
    InGame,
    GameOver,
}

#[derive(Debug)]
pub struct StrikeGame {
    phase: MatchPhase,
    /// Slots still in the match
    player_active: [bool; 2],
    /// Slots that have not yet finished the current sequence
    player_punching: [bool; 2],
    countdown_handle: Option<TimerId>,
    pause_handle: Option<TimerId>,
    reset_handle: Option<TimerId>,
    config: OrchestratorConfig,
}

#[derive(Debug, Clone)]
struct OrchestratorConfig {
    start_countdown_secs: u32,
    countdown_grace_ms: u64,
    round_pause_ms: u64,
    game_over_reset_ms: u64,
    num_easy: usize,
    num_medium: usize,
    seed: Option<u64>,
}

impl StrikeGame {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: MatchPhase::WaitingForPlayers,
            player_active: [false; 2],
            player_punching: [false; 2],
            countdown_handle: None,
            pause_handle: None,
            reset_handle: None,
            config: OrchestratorConfig {
                start_countdown_secs: config.start_countdown_secs,
                countdown_grace_ms: config.countdown_grace_ms,
                round_pause_ms: config.round_pause_ms,
                game_over_reset_ms: config.game_over_reset_ms,
                num_easy: config.num_easy,
                num_medium: config.num_medium,
                seed: config.seed,
            },
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn handle(&mut self, msg: &Message, ctx: &mut Ctx<'_>) {
        match msg {
            Message::ResetGame => self.reset(ctx),
            Message::PlayerReady { slot, is_ready } => self.on_player_ready(*slot, *is_ready, ctx),
            Message::CountdownElapsed => self.on_countdown_elapsed(ctx),
            Message::SequenceDone { slot } => self.on_sequence_done(*slot, ctx),
            Message::PlayerLost { slot } => self.on_player_lost(*slot, ctx),
            Message::AdvanceRound => {
                self.pause_handle = None;
                if self.phase == MatchPhase::InGame {
                    self.send_next_sequence(ctx);
                }
            }
            Message::BroadcastReset => {
                self.reset_handle = None;
                ctx.broadcast(Message::ResetGame);
            }
            _ => {}
        }
    }

    fn reset(&mut self, ctx: &mut Ctx<'_>) {
        self.cancel_timers(ctx);
        self.phase = MatchPhase::WaitingForPlayers;
        self.player_active = [false; 2];
        self.player_punching = [false; 2];
        ctx.emit(OutputEvent::StatusText("Waiting for players".to_string()));
    }

    fn on_player_ready(&mut self, slot: Slot, is_ready: bool, ctx: &mut Ctx<'_>) {
        if !matches!(
            self.phase,
            MatchPhase::WaitingForPlayers | MatchPhase::Countdown
        ) {
            // the roster is fixed once the match starts; a rising edge here
            // is a stray signal, a falling edge a withdrawal
            if is_ready {
                tracing::debug!(?slot, "readiness rise ignored mid-match");
                return;
            }
            self.player_active[slot.index()] = false;
            self.player_punching[slot.index()] = false;
            if self.phase == MatchPhase::InGame && !self.any_active() {
                ctx.broadcast(Message::ResetGame);
            } else {
                self.check_round_over(ctx);
            }
            return;
        }
        self.player_active[slot.index()] = is_ready;
        match self.phase {
            MatchPhase::WaitingForPlayers if is_ready => {
                tracing::info!(?slot, "first player ready, countdown starts");
                self.phase = MatchPhase::Countdown;
                // the display countdown runs in the sessions; the match
                // itself starts a beat later so the last tick is visible
                self.countdown_handle = Some(ctx.after(
                    u64::from(self.config.start_countdown_secs) * 1000 + self.config.countdown_grace_ms,
                    Address::Game,
                    Message::CountdownElapsed,
                ));
                for slot in Slot::ALL {
                    ctx.send(
                        Address::Session(slot),
                        Message::StartGameCountdown {
                            seconds: self.config.start_countdown_secs,
                        },
                    );
                }
            }
            MatchPhase::Countdown if !is_ready && !self.any_active() => {
                tracing::info!(?slot, "last player left, countdown cancelled");
                if let Some(handle) = self.countdown_handle.take() {
                    ctx.cancel(handle);
                }
                self.phase = MatchPhase::WaitingForPlayers;
                for slot in Slot::ALL {
                    ctx.send(Address::Session(slot), Message::StopGameCountdown);
                }
            }
            _ => {}
        }
    }

    fn on_countdown_elapsed(&mut self, ctx: &mut Ctx<'_>) {
        self.countdown_handle = None;
        if self.phase != MatchPhase::Countdown {
            return;
        }
        tracing::info!(active = ?self.player_active, "match started");
        self.phase = MatchPhase::InGame;
        let generator = match self.config.seed {
            Some(seed) => StrikeGenerator::seeded(self.config.num_easy, self.config.num_medium, seed),
            None => StrikeGenerator::from_entropy(self.config.num_easy, self.config.num_medium),
        }
        .shared();
        for slot in Slot::ALL {
            let dealt = self.player_active[slot.index()].then(|| generator.clone());
            ctx.send(Address::Session(slot), Message::StartGame { generator: dealt });
        }
        self.send_next_sequence(ctx);
    }

    fn send_next_sequence(&mut self, ctx: &mut Ctx<'_>) {
        ctx.emit(OutputEvent::StatusText("Next Sequence".to_string()));
        self.player_punching = self.player_active;
        for slot in Slot::ALL {
            if self.player_active[slot.index()] {
                ctx.send(Address::Session(slot), Message::NextSequence);
            }
        }
    }

    fn on_sequence_done(&mut self, slot: Slot, ctx: &mut Ctx<'_>) {
        self.player_punching[slot.index()] = false;
        self.check_round_over(ctx);
    }

    fn on_player_lost(&mut self, slot: Slot, ctx: &mut Ctx<'_>) {
        self.player_active[slot.index()] = false;
        self.player_punching[slot.index()] = false;
        if self.phase != MatchPhase::InGame {
            return;
        }
        if !self.any_active() {
            tracing::info!("last player out, game over");
            self.phase = MatchPhase::GameOver;
            if let Some(handle) = self.pause_handle.take() {
                ctx.cancel(handle);
            }
            ctx.emit(OutputEvent::StatusText("Game Over!".to_string()));
            self.reset_handle = Some(ctx.after(
                self.config.game_over_reset_ms,
                Address::Game,
                Message::BroadcastReset,
            ));
        } else {
            // the survivor may already be done with the round
            self.check_round_over(ctx);
        }
    }

    fn check_round_over(&mut self, ctx: &mut Ctx<'_>) {
        if self.phase != MatchPhase::InGame || self.player_punching.iter().any(|&punching| punching)
        {
            return;
        }
        if self.pause_handle.is_some() {
            return;
        }
        tracing::debug!("round over");
        ctx.emit(OutputEvent::StatusText("Round Over!".to_string()));
        ctx.emit(OutputEvent::Sound {
            slot: None,
            cue: SoundCue::RoundOver,
        });
        self.pause_handle = Some(ctx.after(
            self.config.round_pause_ms,
            Address::Game,
            Message::AdvanceRound,
        ));
    }

    fn any_active(&self) -> bool {
        self.player_active.iter().any(|&active| active)
    }

    fn cancel_timers(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(handle) = self.countdown_handle.take() {
            ctx.cancel(handle);
        }
        if let Some(handle) = self.pause_handle.take() {
            ctx.cancel(handle);
        }
        if let Some(handle) = self.reset_handle.take() {
            ctx.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ctx::test_ctx;
    use crate::runtime::message::Envelope;
    use crate::runtime::scheduler::Scheduler;
    use crate::storage::ScoreServices;

    struct Harness {
        game: StrikeGame,
        scheduler: Scheduler,
        scores: ScoreServices,
        outputs: Vec<OutputEvent>,
        sent: Vec<Envelope>,
    }

    impl Harness {
        fn new() -> Self {
            let (scheduler, scores, outputs) = test_ctx();
            Self {
                game: StrikeGame::new(&GameConfig::default()),
                scheduler,
                scores,
                outputs,
                sent: Vec::new(),
            }
        }

        fn deliver(&mut self, msg: Message) {
            let mut ctx = Ctx::new(&mut self.scheduler, &mut self.scores, &mut self.outputs);
            self.game.handle(&msg, &mut ctx);
            self.sent.extend(ctx.into_outbox());
        }

        fn advance(&mut self, dt_ms: u64) {
            self.scheduler.bump(dt_ms);
            while let Some(env) = self.scheduler.pop_due() {
                match env.to {
                    Address::Game => self.deliver(env.msg),
                    _ => self.sent.push(env),
                }
            }
        }

        fn start_match(&mut self, slots: &[Slot]) {
            for &slot in slots {
                self.deliver(Message::PlayerReady {
                    slot,
                    is_ready: true,
                });
            }
            let config = GameConfig::default();
            self.advance(u64::from(config.start_countdown_secs) * 1000 + config.countdown_grace_ms);
        }

        fn count_to_sessions(&self, pred: impl Fn(&Message) -> bool) -> usize {
            self.sent
                .iter()
                .filter(|env| matches!(env.to, Address::Session(_)) && pred(&env.msg))
                .count()
        }
    }

    #[test]
    fn first_ready_player_starts_the_countdown_everywhere() {
        let mut h = Harness::new();
        h.deliver(Message::PlayerReady {
            slot: Slot::P0,
            is_ready: true,
        });
        assert_eq!(h.game.phase(), MatchPhase::Countdown);
        // both sessions get the countdown, occupied or not
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::StartGameCountdown { .. })),
            2
        );
    }

    #[test]
    fn readiness_falling_to_zero_cancels_the_countdown() {
        let mut h = Harness::new();
        h.deliver(Message::PlayerReady {
            slot: Slot::P0,
            is_ready: true,
        });
        h.deliver(Message::PlayerReady {
            slot: Slot::P0,
            is_ready: false,
        });
        assert_eq!(h.game.phase(), MatchPhase::WaitingForPlayers);
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::StopGameCountdown)),
            2
        );
        // the elapsed deadline never fires
        h.advance(60_000);
        assert_eq!(h.game.phase(), MatchPhase::WaitingForPlayers);
    }

    #[test]
    fn one_departure_of_two_keeps_the_countdown_running() {
        let mut h = Harness::new();
        h.deliver(Message::PlayerReady {
            slot: Slot::P0,
            is_ready: true,
        });
        h.deliver(Message::PlayerReady {
            slot: Slot::P1,
            is_ready: true,
        });
        h.deliver(Message::PlayerReady {
            slot: Slot::P0,
            is_ready: false,
        });
        assert_eq!(h.game.phase(), MatchPhase::Countdown);
    }

    #[test]
    fn match_start_deals_the_generator_to_occupied_slots_only() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0]);
        assert_eq!(h.game.phase(), MatchPhase::InGame);
        let dealt: Vec<bool> = h
            .sent
            .iter()
            .filter_map(|env| match (&env.to, &env.msg) {
                (Address::Session(_), Message::StartGame { generator }) => {
                    Some(generator.is_some())
                }
                _ => None,
            })
            .collect();
        assert_eq!(dealt, vec![true, false]);
        // only the occupied slot is told to advance
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::NextSequence)),
            1
        );
    }

    #[test]
    fn round_advances_after_both_sequences_finish_and_a_pause() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0, Slot::P1]);
        h.sent.clear();
        h.deliver(Message::SequenceDone { slot: Slot::P0 });
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::NextSequence)),
            0
        );
        h.deliver(Message::SequenceDone { slot: Slot::P1 });
        assert!(h
            .outputs
            .iter()
            .any(|event| matches!(event, OutputEvent::StatusText(text) if text == "Round Over!")));
        h.advance(GameConfig::default().round_pause_ms);
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::NextSequence)),
            2
        );
    }

    #[test]
    fn loss_mid_round_does_not_stall_the_survivor() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0, Slot::P1]);
        h.sent.clear();
        h.deliver(Message::SequenceDone { slot: Slot::P0 });
        // the other player loses while still marked as punching
        h.deliver(Message::PlayerLost { slot: Slot::P1 });
        h.advance(GameConfig::default().round_pause_ms);
        // the round advances for the survivor alone
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::NextSequence)),
            1
        );
    }

    #[test]
    fn readiness_changes_are_ignored_once_the_match_runs() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0]);
        // a stray rising edge for the other slot must not join the roster
        h.deliver(Message::PlayerReady {
            slot: Slot::P1,
            is_ready: true,
        });
        h.sent.clear();
        h.deliver(Message::SequenceDone { slot: Slot::P0 });
        h.advance(GameConfig::default().round_pause_ms);
        // the round advances for the original player alone
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::NextSequence)),
            1
        );
    }

    #[test]
    fn readiness_withdrawal_to_none_mid_match_forces_a_reset() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0]);
        h.sent.clear();
        h.deliver(Message::PlayerReady {
            slot: Slot::P0,
            is_ready: false,
        });
        assert!(h
            .sent
            .iter()
            .any(|env| env.to == Address::Broadcast && matches!(env.msg, Message::ResetGame)));
    }

    #[test]
    fn last_loss_ends_the_game_and_schedules_the_reset() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0, Slot::P1]);
        h.deliver(Message::PlayerLost { slot: Slot::P0 });
        assert_eq!(h.game.phase(), MatchPhase::InGame);
        h.deliver(Message::PlayerLost { slot: Slot::P1 });
        assert_eq!(h.game.phase(), MatchPhase::GameOver);
        assert!(h
            .outputs
            .iter()
            .any(|event| matches!(event, OutputEvent::StatusText(text) if text == "Game Over!")));
        h.sent.clear();
        h.advance(GameConfig::default().game_over_reset_ms);
        assert!(h
            .sent
            .iter()
            .any(|env| env.to == Address::Broadcast && matches!(env.msg, Message::ResetGame)));
    }

    #[test]
    fn reset_returns_to_waiting() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0]);
        h.deliver(Message::ResetGame);
        assert_eq!(h.game.phase(), MatchPhase::WaitingForPlayers);
        assert!(h
            .outputs
            .iter()
            .any(|event| matches!(event, OutputEvent::StatusText(text) if text == "Waiting for players")));
    }

    #[test]
    fn sequence_done_after_game_over_does_not_restart_rounds() {
        let mut h = Harness::new();
        h.start_match(&[Slot::P0]);
        h.deliver(Message::PlayerLost { slot: Slot::P0 });
        h.sent.clear();
        h.deliver(Message::SequenceDone { slot: Slot::P0 });
        h.advance(GameConfig::default().round_pause_ms);
        assert_eq!(
            h.count_to_sessions(|msg| matches!(msg, Message::NextSequence)),
            0
        );
    }
}
