//! Per-region strike detection
//!
//! Each slot carries two detectors, one bound to the head region and one to
//! the body. A detector holds at most one pending expected strike. Trigger
//! volumes report entries by zone; the detector judges the entry against
//! the expected strike's canonical zone and the acting hand's distance to
//! the entered trigger, then signals hit or miss to the owning session.
//! The pending strike is consumed by the first entry regardless of outcome.
//!
//! Hand velocity is derived every frame as the position delta. It is
//! advisory for now: the speed gate only participates in judgment when
//! `enforce_hit_speed` is configured on.

use std::str::FromStr;

use glam::Vec3;

use crate::core::config::GameConfig;
use crate::core::error::ArenaError;
use crate::core::types::Slot;
use crate::runtime::ctx::Ctx;
use crate::runtime::message::{Address, HandSample, Message, OutputEvent, RingKind};
use crate::strikes::catalog::{Hand, Punch, StrikeType, Target};

/// Sub-region trigger volumes around one target region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerZone {
    Center,
    Left,
    Right,
    Bottom,
}

impl TriggerZone {
    /// Punch-class ring shown when this zone is entered
    pub fn ring(self) -> RingKind {
        match self {
            TriggerZone::Center => RingKind::Jab,
            TriggerZone::Left | TriggerZone::Right => RingKind::Hook,
            TriggerZone::Bottom => RingKind::Uppercut,
        }
    }

    /// The one zone a given strike must enter to count
    pub fn canonical_for(strike: StrikeType) -> TriggerZone {
        match strike.punch {
            Punch::Jab => TriggerZone::Center,
            Punch::Hook => match strike.hand {
                Hand::Left => TriggerZone::Left,
                Hand::Right => TriggerZone::Right,
            },
            Punch::Uppercut => TriggerZone::Bottom,
        }
    }
}

impl FromStr for TriggerZone {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(TriggerZone::Center),
            "left" => Ok(TriggerZone::Left),
            "right" => Ok(TriggerZone::Right),
            "bottom" => Ok(TriggerZone::Bottom),
            other => Err(ArenaError::UnknownZone(other.to_string())),
        }
    }
}

/// World positions of one region's four trigger volumes
#[derive(Debug, Clone, Copy)]
pub struct ZoneLayout {
    pub center: Vec3,
    pub left: Vec3,
    pub right: Vec3,
    pub bottom: Vec3,
}

impl ZoneLayout {
    /// Default rig geometry: slots side by side, head above body, hooks a
    /// shoulder-width out from the center line
    pub fn for_rig(slot: Slot, target: Target) -> Self {
        let x = match slot {
            Slot::P0 => -1.5,
            Slot::P1 => 1.5,
        };
        let y = match target {
            Target::Head => 1.7,
            Target::Body => 1.2,
        };
        Self {
            center: Vec3::new(x, y, 0.5),
            left: Vec3::new(x - 0.25, y, 0.4),
            right: Vec3::new(x + 0.25, y, 0.4),
            bottom: Vec3::new(x, y - 0.15, 0.45),
        }
    }

    pub fn position(&self, zone: TriggerZone) -> Vec3 {
        match zone {
            TriggerZone::Center => self.center,
            TriggerZone::Left => self.left,
            TriggerZone::Right => self.right,
            TriggerZone::Bottom => self.bottom,
        }
    }
}

/// Gesture classifier bound to one (slot, target region) pair
#[derive(Debug)]
pub struct StrikeDetector {
    slot: Slot,
    target: Target,
    layout: ZoneLayout,
    max_trigger_distance: f32,
    minimum_hit_speed: f32,
    enforce_hit_speed: bool,
    ring_show_ms: u64,
    armed: bool,
    expected: Option<StrikeType>,
    left_position: Vec3,
    right_position: Vec3,
    left_velocity: Vec3,
    right_velocity: Vec3,
    sampled: bool,
}

impl StrikeDetector {
    pub fn new(slot: Slot, target: Target, layout: ZoneLayout, config: &GameConfig) -> Self {
        Self {
            slot,
            target,
            layout,
            max_trigger_distance: config.max_trigger_distance,
            minimum_hit_speed: config.minimum_hit_speed,
            enforce_hit_speed: config.enforce_hit_speed,
            ring_show_ms: config.ring_show_ms,
            armed: false,
            expected: None,
            left_position: Vec3::ZERO,
            right_position: Vec3::ZERO,
            left_velocity: Vec3::ZERO,
            right_velocity: Vec3::ZERO,
            sampled: false,
        }
    }

    /// Pending expected strike, if any
    pub fn expected(&self) -> Option<StrikeType> {
        self.expected
    }

    pub fn hand_velocity(&self, hand: Hand) -> Vec3 {
        match hand {
            Hand::Left => self.left_velocity,
            Hand::Right => self.right_velocity,
        }
    }

    pub fn handle(&mut self, msg: &Message, ctx: &mut Ctx<'_>) {
        match msg {
            Message::DetectorStrikeType(strike) => {
                tracing::debug!(slot = ?self.slot, target = ?self.target, ?strike, "expecting strike");
                self.expected = Some(*strike);
            }
            Message::DetectorClearStrike | Message::DetectorClearPeer => {
                self.expected = None;
            }
            Message::ArmTriggers => {
                self.armed = true;
            }
            Message::DisarmTriggers => {
                self.armed = false;
            }
            Message::ResetGame => {
                self.expected = None;
                self.armed = false;
                self.left_velocity = Vec3::ZERO;
                self.right_velocity = Vec3::ZERO;
                self.sampled = false;
            }
            Message::FrameUpdate { hands, .. } => {
                self.sample_hands(hands[self.slot.index()]);
            }
            Message::TriggerEnter { zone } => {
                self.on_trigger_enter(*zone, ctx);
            }
            _ => {}
        }
    }

    fn sample_hands(&mut self, sample: HandSample) {
        if self.sampled {
            self.left_velocity = sample.left - self.left_position;
            self.right_velocity = sample.right - self.right_position;
        }
        self.left_position = sample.left;
        self.right_position = sample.right;
        self.sampled = true;
    }

    fn on_trigger_enter(&mut self, zone: TriggerZone, ctx: &mut Ctx<'_>) {
        if !self.armed {
            tracing::debug!(slot = ?self.slot, target = ?self.target, "trigger enter while disarmed");
            return;
        }
        ctx.send(
            Address::Detector(self.slot, self.target.other()),
            Message::DetectorClearPeer,
        );
        let Some(strike) = self.expected.take() else {
            // not detecting right now; no signal either way
            tracing::debug!(slot = ?self.slot, target = ?self.target, "trigger enter with no pending strike");
            return;
        };
        ctx.emit(OutputEvent::RingShown {
            slot: self.slot,
            target: self.target,
            ring: zone.ring(),
            duration_ms: self.ring_show_ms,
        });
        let is_hit = self.judge(strike, zone);
        tracing::debug!(slot = ?self.slot, target = ?self.target, ?zone, is_hit, "judged trigger entry");
        ctx.send(
            Address::Session(self.slot),
            Message::DetectorHit { is_hit },
        );
    }

    fn judge(&self, strike: StrikeType, zone: TriggerZone) -> bool {
        if strike.target != self.target {
            return false;
        }
        if zone != TriggerZone::canonical_for(strike) {
            tracing::debug!(?zone, "wrong trigger zone");
            return false;
        }
        let hand_position = match strike.hand {
            Hand::Left => self.left_position,
            Hand::Right => self.right_position,
        };
        if hand_position.distance(self.layout.position(zone)) > self.max_trigger_distance {
            tracing::debug!("acting hand too far from trigger");
            return false;
        }
        if self.enforce_hit_speed {
            let speed = self.hand_velocity(strike.hand).length();
            if speed < self.minimum_hit_speed {
                tracing::debug!(speed, "acting hand too slow");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ctx::test_ctx;
    use crate::runtime::message::Envelope;
    use crate::strikes::catalog::{LEFT_JAB_BODY, LEFT_JAB_HEAD, RIGHT_HOOK_HEAD};

    fn head_detector(config: &GameConfig) -> StrikeDetector {
        StrikeDetector::new(
            Slot::P0,
            Target::Head,
            ZoneLayout::for_rig(Slot::P0, Target::Head),
            config,
        )
    }

    /// Runs one message and returns the queued outbound envelopes.
    fn run(detector: &mut StrikeDetector, msg: Message) -> Vec<Envelope> {
        let (mut scheduler, mut scores, mut outputs) = test_ctx();
        let mut ctx = Ctx::new(&mut scheduler, &mut scores, &mut outputs);
        detector.handle(&msg, &mut ctx);
        ctx.into_outbox()
    }

    fn hands_at(position: Vec3, hand: Hand) -> [HandSample; 2] {
        let mut sample = HandSample::default();
        match hand {
            Hand::Left => sample.left = position,
            Hand::Right => sample.right = position,
        }
        [sample, HandSample::default()]
    }

    fn hit_signal(outbox: &[Envelope]) -> Option<bool> {
        outbox.iter().find_map(|env| match env.msg {
            Message::DetectorHit { is_hit } => Some(is_hit),
            _ => None,
        })
    }

    fn armed_with(strike: StrikeType, hand_at: Vec3, acting: Hand) -> StrikeDetector {
        let config = GameConfig::default();
        let mut detector = head_detector(&config);
        run(&mut detector, Message::ArmTriggers);
        run(
            &mut detector,
            Message::FrameUpdate {
                dt_ms: 16,
                hands: hands_at(hand_at, acting),
            },
        );
        run(&mut detector, Message::DetectorStrikeType(strike));
        detector
    }

    #[test]
    fn canonical_zone_within_distance_is_a_hit() {
        let center = ZoneLayout::for_rig(Slot::P0, Target::Head).center;
        let mut detector = armed_with(LEFT_JAB_HEAD, center, Hand::Left);
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        assert_eq!(hit_signal(&outbox), Some(true));
        assert_eq!(detector.expected(), None);
    }

    #[test]
    fn wrong_zone_is_a_miss() {
        let center = ZoneLayout::for_rig(Slot::P0, Target::Head).center;
        let mut detector = armed_with(LEFT_JAB_HEAD, center, Hand::Left);
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Bottom,
            },
        );
        assert_eq!(hit_signal(&outbox), Some(false));
    }

    #[test]
    fn distant_hand_is_a_miss() {
        let center = ZoneLayout::for_rig(Slot::P0, Target::Head).center;
        let far = center + Vec3::new(1.0, 0.0, 0.0);
        let mut detector = armed_with(LEFT_JAB_HEAD, far, Hand::Left);
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        assert_eq!(hit_signal(&outbox), Some(false));
    }

    #[test]
    fn wrong_target_region_is_a_miss() {
        // body strike entering the head detector's canonical zone
        let center = ZoneLayout::for_rig(Slot::P0, Target::Head).center;
        let mut detector = armed_with(LEFT_JAB_BODY, center, Hand::Left);
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        assert_eq!(hit_signal(&outbox), Some(false));
    }

    #[test]
    fn no_pending_strike_yields_no_signal_at_all() {
        let config = GameConfig::default();
        let mut detector = head_detector(&config);
        run(&mut detector, Message::ArmTriggers);
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        assert_eq!(hit_signal(&outbox), None);
        // the peer is still cleared so it cannot double-judge
        assert!(outbox
            .iter()
            .any(|env| matches!(env.msg, Message::DetectorClearPeer)));
    }

    #[test]
    fn disarmed_detector_ignores_entries() {
        let config = GameConfig::default();
        let mut detector = head_detector(&config);
        run(&mut detector, Message::DetectorStrikeType(LEFT_JAB_HEAD));
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        assert!(outbox.is_empty());
        // the pending strike survives until the detector is armed
        assert_eq!(detector.expected(), Some(LEFT_JAB_HEAD));
    }

    #[test]
    fn pending_strike_is_consumed_by_the_first_entry() {
        let center = ZoneLayout::for_rig(Slot::P0, Target::Head).center;
        let mut detector = armed_with(LEFT_JAB_HEAD, center, Hand::Left);
        run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        // re-entry after the judgment produces nothing
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        assert_eq!(hit_signal(&outbox), None);
    }

    #[test]
    fn velocity_tracks_frame_deltas() {
        let config = GameConfig::default();
        let mut detector = head_detector(&config);
        run(
            &mut detector,
            Message::FrameUpdate {
                dt_ms: 16,
                hands: hands_at(Vec3::new(0.0, 1.0, 0.0), Hand::Right),
            },
        );
        run(
            &mut detector,
            Message::FrameUpdate {
                dt_ms: 16,
                hands: hands_at(Vec3::new(0.0, 1.0, 0.3), Hand::Right),
            },
        );
        let v = detector.hand_velocity(Hand::Right);
        assert!((v.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn speed_gate_rejects_slow_hands_when_enforced() {
        let config = GameConfig {
            enforce_hit_speed: true,
            minimum_hit_speed: 0.2,
            ..GameConfig::default()
        };
        let layout = ZoneLayout::for_rig(Slot::P0, Target::Head);
        let mut detector = StrikeDetector::new(Slot::P0, Target::Head, layout, &config);
        run(&mut detector, Message::ArmTriggers);
        // two identical samples: zero velocity
        for _ in 0..2 {
            run(
                &mut detector,
                Message::FrameUpdate {
                    dt_ms: 16,
                    hands: hands_at(layout.center, Hand::Left),
                },
            );
        }
        run(&mut detector, Message::DetectorStrikeType(LEFT_JAB_HEAD));
        let outbox = run(
            &mut detector,
            Message::TriggerEnter {
                zone: TriggerZone::Center,
            },
        );
        assert_eq!(hit_signal(&outbox), Some(false));
    }

    #[test]
    fn canonical_zone_mapping() {
        assert_eq!(
            TriggerZone::canonical_for(LEFT_JAB_HEAD),
            TriggerZone::Center
        );
        assert_eq!(
            TriggerZone::canonical_for(RIGHT_HOOK_HEAD),
            TriggerZone::Right
        );
        assert_eq!(
            TriggerZone::canonical_for(crate::strikes::catalog::LEFT_UPPERCUT_BODY),
            TriggerZone::Bottom
        );
    }

    #[test]
    fn zone_names_parse_and_unknown_names_fail() {
        assert_eq!("center".parse::<TriggerZone>().unwrap(), TriggerZone::Center);
        assert_eq!("bottom".parse::<TriggerZone>().unwrap(), TriggerZone::Bottom);
        assert!("top".parse::<TriggerZone>().is_err());
    }
}
