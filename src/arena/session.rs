//! Per-slot match participant
//!
//! A session owns everything about one player position: occupancy,
//! handedness, the shared generator handle for the current match, the
//! shrinking per-sequence time budget, and the sequence being consumed.
//! It reacts to readiness changes, countdown signals, detector judgments,
//! and timer expiry, and reports sequence completion and losses to the
//! orchestrator.

use crate::core::config::GameConfig;
use crate::core::types::{PlayerId, Slot};
use crate::points::engine::PointsManager;
use crate::runtime::ctx::Ctx;
use crate::runtime::message::{Address, Message, OutputEvent, SoundCue};
use crate::runtime::scheduler::TimerId;
use crate::strikes::catalog::{strike_name, StrikeSequence, Target};
use crate::strikes::generator::SharedGenerator;

/// Session lifecycle
///
/// `Lost` holds until the match-wide reset returns the slot to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No player at this slot
    Empty,
    /// Player present, waiting for the match countdown
    Ready,
    /// Ready-up countdown running with this player present
    Countdown,
    /// Match running
    InGame,
    /// Out of this match
    Lost,
}

#[derive(Debug)]
pub struct PlayerController {
    slot: Slot,
    phase: SessionPhase,
    /// A match is running somewhere in the arena, whether or not this slot
    /// takes part; entries are refused until the next reset
    match_running: bool,
    player: Option<PlayerId>,
    is_right_handed: bool,
    generator: Option<SharedGenerator>,
    strike_count: usize,
    current_timeout_ms: u64,
    current_sequence: Option<StrikeSequence>,
    points: Option<PointsManager>,
    cooldown_handle: Option<TimerId>,
    lost_text_handle: Option<TimerId>,
    arm_handles: Vec<TimerId>,
    config: SessionConfig,
}

/// Tuning copied out of `GameConfig` at construction
#[derive(Debug, Clone)]
struct SessionConfig {
    start_timeout_ms: u64,
    timeout_reduction_factor: f32,
    minimum_timeout_ms: u64,
    hit_cooldown_ms: u64,
    lost_text_ms: u64,
    detector_settle_ms: u64,
    high_score_key: String,
    leaderboard: String,
    points: crate::core::config::PointsOptions,
}

impl PlayerController {
    pub fn new(slot: Slot, config: &GameConfig) -> Self {
        Self {
            slot,
            phase: SessionPhase::Empty,
            match_running: false,
            player: None,
            is_right_handed: false,
            generator: None,
            strike_count: 0,
            current_timeout_ms: 0,
            current_sequence: None,
            points: None,
            cooldown_handle: None,
            lost_text_handle: None,
            arm_handles: Vec::new(),
            config: SessionConfig {
                start_timeout_ms: config.start_timeout_ms,
                timeout_reduction_factor: config.timeout_reduction_factor,
                minimum_timeout_ms: config.minimum_timeout_ms,
                hit_cooldown_ms: config.hit_cooldown_ms,
                lost_text_ms: config.lost_text_ms,
                detector_settle_ms: config.detector_settle_ms,
                high_score_key: config.high_score_key.clone(),
                leaderboard: config.leaderboard.clone(),
                points: config.points.clone(),
            },
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    pub fn points(&self) -> Option<i64> {
        self.points.as_ref().map(|pm| pm.points())
    }

    pub fn handle(&mut self, msg: &Message, ctx: &mut Ctx<'_>) {
        match msg {
            Message::ResetGame => self.reset(ctx),
            Message::PlayerEnter { player } => self.on_player_enter(*player, ctx),
            Message::PlayerExit { player } => self.on_player_exit(*player, ctx),
            Message::StartGameCountdown { seconds } => self.on_start_countdown(*seconds, ctx),
            Message::StopGameCountdown => self.on_stop_countdown(ctx),
            Message::PlayerHandedness { is_right_handed } => {
                self.show_handedness_buttons(false, ctx);
                self.is_right_handed = *is_right_handed;
            }
            Message::StartGame { generator } => self.on_start_game(generator.clone(), ctx),
            Message::NextSequence => self.on_next_sequence(ctx),
            Message::TimerDone => self.on_timer_done(ctx),
            Message::DetectorHit { is_hit } => self.on_detector_hit(*is_hit, ctx),
            Message::ShowNextStrike => {
                self.cooldown_handle = None;
                if self.phase == SessionPhase::InGame {
                    self.display_next_strike(ctx);
                }
            }
            Message::ClearStrikeText => {
                self.lost_text_handle = None;
                self.show_strike_text(String::new(), ctx);
            }
            _ => {}
        }
    }

    fn reset(&mut self, ctx: &mut Ctx<'_>) {
        self.cancel_timers(ctx);
        self.phase = SessionPhase::Empty;
        self.match_running = false;
        self.player = None;
        self.is_right_handed = false;
        self.generator = None;
        self.strike_count = 0;
        self.current_timeout_ms = 0;
        self.current_sequence = None;
        self.points = None;
        self.show_strike_text(String::new(), ctx);
        self.show_handedness_buttons(false, ctx);
    }

    fn on_player_enter(&mut self, player: PlayerId, ctx: &mut Ctx<'_>) {
        if self.player.is_none() && !self.match_running && matches!(self.phase, SessionPhase::Empty)
        {
            tracing::info!(slot = ?self.slot, ?player, "player entered slot");
            self.player = Some(player);
            self.is_right_handed = true;
            self.phase = SessionPhase::Ready;
            self.points = Some(PointsManager::new(
                player,
                self.config.high_score_key.clone(),
                self.config.leaderboard.clone(),
                self.config.points.clone(),
            ));
            for target in [Target::Head, Target::Body] {
                ctx.emit(OutputEvent::TransferTriggerOwnership {
                    slot: self.slot,
                    target,
                    player: Some(player),
                });
                // the ownership hand-off needs time to settle before the
                // trigger callbacks may be trusted
                self.arm_handles.push(ctx.after(
                    self.config.detector_settle_ms,
                    Address::Detector(self.slot, target),
                    Message::ArmTriggers,
                ));
            }
            ctx.send(
                Address::Game,
                Message::PlayerReady {
                    slot: self.slot,
                    is_ready: true,
                },
            );
            self.show_handedness_buttons(true, ctx);
        } else {
            ctx.emit(OutputEvent::Popup {
                player,
                text: "Game in progress".to_string(),
                seconds: 2,
            });
        }
    }

    fn on_player_exit(&mut self, player: PlayerId, ctx: &mut Ctx<'_>) {
        if self.player != Some(player) {
            return;
        }
        tracing::info!(slot = ?self.slot, ?player, "player left slot");
        self.player = None;
        for handle in self.arm_handles.drain(..) {
            ctx.cancel(handle);
        }
        for target in [Target::Head, Target::Body] {
            ctx.emit(OutputEvent::TransferTriggerOwnership {
                slot: self.slot,
                target,
                player: None,
            });
            ctx.send(Address::Detector(self.slot, target), Message::DisarmTriggers);
        }
        match self.phase {
            SessionPhase::Ready | SessionPhase::Countdown => {
                self.phase = SessionPhase::Empty;
                self.show_handedness_buttons(false, ctx);
                ctx.send(
                    Address::Game,
                    Message::PlayerReady {
                        slot: self.slot,
                        is_ready: false,
                    },
                );
            }
            SessionPhase::InGame => self.player_lost(ctx),
            SessionPhase::Lost | SessionPhase::Empty => {}
        }
    }

    fn on_start_countdown(&mut self, seconds: u32, ctx: &mut Ctx<'_>) {
        if self.player.is_some() {
            self.phase = SessionPhase::Countdown;
            self.show_handedness_buttons(true, ctx);
        }
        ctx.send(
            Address::Timer(self.slot),
            Message::StartTimer {
                msec: u64::from(seconds) * 1000,
                whole_seconds: true,
            },
        );
    }

    fn on_stop_countdown(&mut self, ctx: &mut Ctx<'_>) {
        if self.phase == SessionPhase::Countdown {
            self.phase = SessionPhase::Ready;
        }
        self.show_handedness_buttons(false, ctx);
        ctx.send(Address::Timer(self.slot), Message::StopTimer);
    }

    fn on_timer_done(&mut self, ctx: &mut Ctx<'_>) {
        match self.phase {
            SessionPhase::InGame => {
                // ran out of time on the current sequence
                tracing::debug!(slot = ?self.slot, "per-strike timer expired");
                self.player_lost(ctx);
            }
            _ => {
                // ready-up countdown display finished; the orchestrator's
                // own deadline starts the match moments later
                self.show_handedness_buttons(false, ctx);
                ctx.emit(OutputEvent::Sound {
                    slot: Some(self.slot),
                    cue: SoundCue::TimerDone,
                });
            }
        }
    }

    fn on_start_game(&mut self, generator: Option<SharedGenerator>, ctx: &mut Ctx<'_>) {
        // even a slot dealt nothing refuses entries until the match resets
        self.match_running = true;
        self.generator = generator;
        if self.generator.is_none() || self.player.is_none() {
            // unoccupied slot; nothing was dealt
            return;
        }
        self.phase = SessionPhase::InGame;
        self.strike_count = 0;
        self.current_timeout_ms = self.config.start_timeout_ms;
        if let Some(points) = &mut self.points {
            // fresh session points; the stored high score survives
            points.reset(false, ctx.scores);
        }
    }

    fn on_next_sequence(&mut self, ctx: &mut Ctx<'_>) {
        let Some(generator) = &self.generator else {
            // already lost; a stray advance is a no-op
            tracing::debug!(slot = ?self.slot, "advance without generator");
            return;
        };
        let sequence = generator.borrow_mut().next_sequence(self.strike_count);
        self.strike_count += 1;
        tracing::debug!(slot = ?self.slot, round = self.strike_count, ?sequence, "sequence dealt");
        self.current_sequence = Some(sequence);
        ctx.send(
            Address::Timer(self.slot),
            Message::StartTimer {
                msec: self.current_timeout_ms,
                whole_seconds: false,
            },
        );
        // budget shrinks once per sequence-advance, before the strike shows
        self.current_timeout_ms = ((self.current_timeout_ms as f32
            * self.config.timeout_reduction_factor) as u64)
            .max(self.config.minimum_timeout_ms);
        self.display_next_strike(ctx);
    }

    fn display_next_strike(&mut self, ctx: &mut Ctx<'_>) {
        let strike = self
            .current_sequence
            .as_mut()
            .and_then(|sequence| sequence.pop_front());
        if let Some(strike) = strike {
            tracing::debug!(slot = ?self.slot, ?strike, "next strike");
            self.show_strike_text(strike_name(strike, self.is_right_handed), ctx);
            for target in [Target::Head, Target::Body] {
                ctx.send(
                    Address::Detector(self.slot, target),
                    Message::DetectorStrikeType(strike),
                );
            }
        } else {
            // sequence exhausted; report the round as done
            self.show_strike_text(String::new(), ctx);
            ctx.send(Address::Timer(self.slot), Message::StopTimer);
            ctx.send(Address::Game, Message::SequenceDone { slot: self.slot });
        }
    }

    fn on_detector_hit(&mut self, is_hit: bool, ctx: &mut Ctx<'_>) {
        self.clear_detectors(ctx);
        if self.phase != SessionPhase::InGame {
            return;
        }
        if is_hit {
            tracing::debug!(slot = ?self.slot, "strike hit");
            ctx.emit(OutputEvent::Sound {
                slot: Some(self.slot),
                cue: SoundCue::Hit,
            });
            self.score_win(ctx);
            // brief pause for the hand to clear before the next strike
            self.cooldown_handle = Some(ctx.after(
                self.config.hit_cooldown_ms,
                Address::Session(self.slot),
                Message::ShowNextStrike,
            ));
        } else {
            tracing::debug!(slot = ?self.slot, "strike miss");
            self.player_lost(ctx);
        }
    }

    fn player_lost(&mut self, ctx: &mut Ctx<'_>) {
        self.clear_detectors(ctx);
        // taking the generator also guards against double loss reports
        if self.generator.take().is_none() {
            return;
        }
        tracing::info!(slot = ?self.slot, "player lost");
        self.phase = SessionPhase::Lost;
        self.show_strike_text("You Lost!".to_string(), ctx);
        ctx.emit(OutputEvent::Sound {
            slot: Some(self.slot),
            cue: SoundCue::Buzzer,
        });
        self.lost_text_handle = Some(ctx.after(
            self.config.lost_text_ms,
            Address::Session(self.slot),
            Message::ClearStrikeText,
        ));
        ctx.send(Address::Timer(self.slot), Message::StopTimer);
        if let Some(points) = &mut self.points {
            let update = points.lose(ctx.scores);
            if update.high_score_changed {
                let player = points.player();
                ctx.broadcast(Message::HighScoreUpdate { player });
            }
        }
        ctx.send(Address::Game, Message::PlayerLost { slot: self.slot });
    }

    fn score_win(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(points) = &mut self.points {
            let update = points.win(ctx.scores);
            if update.high_score_changed {
                let player = points.player();
                ctx.broadcast(Message::HighScoreUpdate { player });
            }
        }
    }

    fn clear_detectors(&self, ctx: &mut Ctx<'_>) {
        for target in [Target::Head, Target::Body] {
            ctx.send(
                Address::Detector(self.slot, target),
                Message::DetectorClearStrike,
            );
        }
    }

    fn show_handedness_buttons(&self, shown: bool, ctx: &mut Ctx<'_>) {
        use crate::strikes::catalog::Hand;
        for hand in [Hand::Left, Hand::Right] {
            let msg = match (shown, self.player) {
                (true, Some(player)) => Message::ShowHandednessButton { player },
                _ => Message::HideButton,
            };
            ctx.send(Address::Button(self.slot, hand), msg);
        }
    }

    fn show_strike_text(&self, text: String, ctx: &mut Ctx<'_>) {
        ctx.emit(OutputEvent::StrikeText {
            slot: self.slot,
            text,
        });
    }

    fn cancel_timers(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(handle) = self.cooldown_handle.take() {
            ctx.cancel(handle);
        }
        if let Some(handle) = self.lost_text_handle.take() {
            ctx.cancel(handle);
        }
        for handle in self.arm_handles.drain(..) {
            ctx.cancel(handle);
        }
    }
}
