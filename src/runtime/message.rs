//! Entity-addressed message catalog
//!
//! Every interaction between the arena's components travels as a `Message`
//! in an `Envelope` addressed to one component (or broadcast to all).
//! Delivery is synchronous and single-threaded; see `arena::world` for the
//! dispatch rules. `OutputEvent`s are the crate's only outward surface:
//! fire-and-forget display/audio/ownership requests drained by the host.

use glam::Vec3;

use crate::core::types::{PlayerId, Slot};
use crate::detect::TriggerZone;
use crate::strikes::catalog::{Hand, StrikeType, Target};
use crate::strikes::generator::SharedGenerator;

/// Component address within one arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Game,
    Session(Slot),
    Timer(Slot),
    Detector(Slot, Target),
    Button(Slot, Hand),
    GlobalPoints,
    /// Delivered to every component in registration order
    Broadcast,
}

/// Hand positions for one slot, sampled once per frame by the host
#[derive(Debug, Clone, Copy, Default)]
pub struct HandSample {
    pub left: Vec3,
    pub right: Vec3,
}

#[derive(Debug, Clone)]
pub enum Message {
    // === MATCH LIFECYCLE ===
    ResetGame,
    PlayerReady { slot: Slot, is_ready: bool },
    StartGameCountdown { seconds: u32 },
    StopGameCountdown,
    StartGame { generator: Option<SharedGenerator> },
    NextSequence,
    SequenceDone { slot: Slot },
    PlayerLost { slot: Slot },

    // === HANDEDNESS AFFORDANCE ===
    ShowHandednessButton { player: PlayerId },
    HideButton,
    PlayerHandedness { is_right_handed: bool },

    // === COUNTDOWN TIMER ===
    StartTimer { msec: u64, whole_seconds: bool },
    StopTimer,
    TimerDone,

    // === STRIKE DETECTION ===
    DetectorStrikeType(StrikeType),
    DetectorClearStrike,
    DetectorClearPeer,
    DetectorHit { is_hit: bool },
    ArmTriggers,
    DisarmTriggers,

    // === SCORING ===
    HighScoreUpdate { player: PlayerId },

    // === HOST INPUTS ===
    PlayerEnter { player: PlayerId },
    PlayerExit { player: PlayerId },
    ButtonPressed { player: PlayerId },
    TriggerEnter { zone: TriggerZone },
    FrameUpdate { dt_ms: u64, hands: [HandSample; 2] },

    // === SCHEDULED INTERNALS ===
    CountdownElapsed,
    TimerTick,
    ClearClock,
    ShowNextStrike,
    ClearStrikeText,
    AdvanceRound,
    BroadcastReset,
}

/// One addressed message in flight
#[derive(Debug, Clone)]
pub struct Envelope {
    pub to: Address,
    pub msg: Message,
}

impl Envelope {
    pub fn new(to: Address, msg: Message) -> Self {
        Self { to, msg }
    }

    pub fn broadcast(msg: Message) -> Self {
        Self::new(Address::Broadcast, msg)
    }
}

/// Audio cue requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Whole-second countdown tick
    Tick,
    /// Countdown reached zero outside a match
    TimerDone,
    /// Judged hit
    Hit,
    /// Judged miss or per-strike timeout
    Buzzer,
    /// All active players finished the round
    RoundOver,
}

/// Punch-class feedback ring shown where a trigger volume was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Jab,
    Hook,
    Uppercut,
}

/// Side-effect requests for the host environment
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Shared status board text
    StatusText(String),
    /// Per-slot strike instruction text
    StrikeText { slot: Slot, text: String },
    /// Per-slot countdown clock text
    ClockText { slot: Slot, text: String },
    /// Transient message shown to one player
    Popup {
        player: PlayerId,
        text: String,
        seconds: u32,
    },
    /// Audio cue; `slot` is `None` for arena-wide cues
    Sound { slot: Option<Slot>, cue: SoundCue },
    /// Handedness button visibility change
    ButtonVisible {
        slot: Slot,
        hand: Hand,
        visible: bool,
    },
    /// Punch-class ring display with a timed hide
    RingShown {
        slot: Slot,
        target: Target,
        ring: RingKind,
        duration_ms: u64,
    },
    /// Transfer of a slot's trigger volumes to a player (or back to the host)
    TransferTriggerOwnership {
        slot: Slot,
        target: Target,
        player: Option<PlayerId>,
    },
}
