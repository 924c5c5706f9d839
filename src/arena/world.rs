//! Arena composition root and message dispatcher
//!
//! `StrikeWorld` owns every component of one two-slot arena plus the
//! scheduler, the persistence services, and the output queue. Hosts drive
//! it through the input methods and `advance`, then drain the accumulated
//! `OutputEvent`s each frame.
//!
//! Dispatch is synchronous and depth-first: a handler's queued envelopes
//! are delivered, one by one, immediately after it returns, each delivery
//! recursing before the next starts. Broadcasts visit components in
//! registration order (game, sessions, timers, detectors, buttons, global
//! points), with each component's fallout delivered before the next
//! component sees the broadcast.

use crate::arena::button::HandednessButton;
use crate::arena::orchestrator::{MatchPhase, StrikeGame};
use crate::arena::session::{PlayerController, SessionPhase};
use crate::arena::timer::CountdownTimer;
use crate::core::config::GameConfig;
use crate::core::types::{PlayerId, Slot};
use crate::detect::{StrikeDetector, TriggerZone, ZoneLayout};
use crate::points::global::GlobalPoints;
use crate::runtime::ctx::Ctx;
use crate::runtime::message::{Address, Envelope, HandSample, Message, OutputEvent};
use crate::runtime::scheduler::Scheduler;
use crate::storage::ScoreServices;
use crate::strikes::catalog::{Hand, Target};

pub struct StrikeWorld {
    scheduler: Scheduler,
    scores: ScoreServices,
    outputs: Vec<OutputEvent>,
    game: StrikeGame,
    sessions: [PlayerController; 2],
    timers: [CountdownTimer; 2],
    /// Indexed by `detector_index`
    detectors: [StrikeDetector; 4],
    buttons: [HandednessButton; 4],
    global_points: GlobalPoints,
}

fn detector_index(slot: Slot, target: Target) -> usize {
    slot.index() * 2
        + match target {
            Target::Head => 0,
            Target::Body => 1,
        }
}

fn button_index(slot: Slot, hand: Hand) -> usize {
    slot.index() * 2
        + match hand {
            Hand::Left => 0,
            Hand::Right => 1,
        }
}

impl StrikeWorld {
    pub fn new(config: &GameConfig) -> Self {
        let detector = |slot, target| {
            StrikeDetector::new(slot, target, ZoneLayout::for_rig(slot, target), config)
        };
        let mut world = Self {
            scheduler: Scheduler::new(),
            scores: ScoreServices::in_memory(),
            outputs: Vec::new(),
            game: StrikeGame::new(config),
            sessions: [
                PlayerController::new(Slot::P0, config),
                PlayerController::new(Slot::P1, config),
            ],
            timers: [
                CountdownTimer::new(Slot::P0, config),
                CountdownTimer::new(Slot::P1, config),
            ],
            detectors: [
                detector(Slot::P0, Target::Head),
                detector(Slot::P0, Target::Body),
                detector(Slot::P1, Target::Head),
                detector(Slot::P1, Target::Body),
            ],
            buttons: [
                HandednessButton::new(Slot::P0, Hand::Left),
                HandednessButton::new(Slot::P0, Hand::Right),
                HandednessButton::new(Slot::P1, Hand::Left),
                HandednessButton::new(Slot::P1, Hand::Right),
            ],
            global_points: GlobalPoints::new(
                config.game_score_keys.clone(),
                config.global_board.clone(),
            ),
        };
        world.deliver(Envelope::broadcast(Message::ResetGame));
        world
    }

    /// Replace the in-memory persistence backends
    pub fn with_scores(config: &GameConfig, scores: ScoreServices) -> Self {
        let mut world = Self::new(config);
        world.scores = scores;
        world
    }

    // === HOST INPUTS ===

    pub fn player_enter(&mut self, slot: Slot, player: PlayerId) {
        self.deliver(Envelope::new(
            Address::Session(slot),
            Message::PlayerEnter { player },
        ));
    }

    pub fn player_exit(&mut self, slot: Slot, player: PlayerId) {
        self.deliver(Envelope::new(
            Address::Session(slot),
            Message::PlayerExit { player },
        ));
    }

    pub fn press_button(&mut self, slot: Slot, hand: Hand, player: PlayerId) {
        self.deliver(Envelope::new(
            Address::Button(slot, hand),
            Message::ButtonPressed { player },
        ));
    }

    /// Report a trigger-volume entry by zone name.
    ///
    /// Unknown names are logged and dropped; the host's collision layer is
    /// outside this crate's control.
    pub fn trigger_enter(&mut self, slot: Slot, target: Target, zone_name: &str) {
        match zone_name.parse::<TriggerZone>() {
            Ok(zone) => self.deliver(Envelope::new(
                Address::Detector(slot, target),
                Message::TriggerEnter { zone },
            )),
            Err(err) => tracing::warn!(%err, "ignoring trigger entry"),
        }
    }

    /// Advance the arena clock by `dt_ms`, feeding the frame's hand samples
    /// to the detectors and firing every timer that comes due.
    pub fn advance(&mut self, dt_ms: u64, hands: [HandSample; 2]) {
        self.deliver(Envelope::broadcast(Message::FrameUpdate { dt_ms, hands }));
        self.scheduler.bump(dt_ms);
        // one at a time so a cancellation between pops takes effect
        while let Some(env) = self.scheduler.pop_due() {
            self.deliver(env);
        }
    }

    /// Take the output events accumulated since the last drain
    pub fn drain_outputs(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.outputs)
    }

    // === OBSERVATION ===

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn match_phase(&self) -> MatchPhase {
        self.game.phase()
    }

    pub fn session_phase(&self, slot: Slot) -> SessionPhase {
        self.sessions[slot.index()].phase()
    }

    pub fn session_points(&self, slot: Slot) -> Option<i64> {
        self.sessions[slot.index()].points()
    }

    pub fn pending_strike(&self, slot: Slot, target: Target) -> Option<crate::strikes::catalog::StrikeType> {
        self.detectors[detector_index(slot, target)].expected()
    }

    pub fn scores(&self) -> &ScoreServices {
        &self.scores
    }

    // === DISPATCH ===

    fn deliver(&mut self, env: Envelope) {
        match env.to {
            Address::Broadcast => {
                for to in Self::registration_order() {
                    let outbox = self.route(to, &env.msg);
                    for queued in outbox {
                        self.deliver(queued);
                    }
                }
            }
            to => {
                let outbox = self.route(to, &env.msg);
                for queued in outbox {
                    self.deliver(queued);
                }
            }
        }
    }

    fn registration_order() -> impl Iterator<Item = Address> {
        let mut order = vec![Address::Game];
        for slot in Slot::ALL {
            order.push(Address::Session(slot));
        }
        for slot in Slot::ALL {
            order.push(Address::Timer(slot));
        }
        for slot in Slot::ALL {
            for target in [Target::Head, Target::Body] {
                order.push(Address::Detector(slot, target));
            }
        }
        for slot in Slot::ALL {
            for hand in [Hand::Left, Hand::Right] {
                order.push(Address::Button(slot, hand));
            }
        }
        order.push(Address::GlobalPoints);
        order.into_iter()
    }

    fn route(&mut self, to: Address, msg: &Message) -> Vec<Envelope> {
        let mut ctx = Ctx::new(&mut self.scheduler, &mut self.scores, &mut self.outputs);
        match to {
            Address::Game => self.game.handle(msg, &mut ctx),
            Address::Session(slot) => self.sessions[slot.index()].handle(msg, &mut ctx),
            Address::Timer(slot) => self.timers[slot.index()].handle(msg, &mut ctx),
            Address::Detector(slot, target) => {
                self.detectors[detector_index(slot, target)].handle(msg, &mut ctx)
            }
            Address::Button(slot, hand) => {
                self.buttons[button_index(slot, hand)].handle(msg, &mut ctx)
            }
            Address::GlobalPoints => self.global_points.handle(msg, &mut ctx),
            Address::Broadcast => unreachable!("broadcast is fanned out before routing"),
        }
        ctx.into_outbox()
    }
}
