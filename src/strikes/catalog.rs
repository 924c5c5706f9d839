//! Strike definitions and the authored difficulty-tier sequence pools
//!
//! A strike is one required gesture: acting hand, punch type, target body
//! region. Sequences are ordered lists of strikes a player must land within
//! one round; the pools below are read-only templates the generator draws
//! working copies from.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Acting hand for a strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => write!(f, "left"),
            Hand::Right => write!(f, "right"),
        }
    }
}

/// Punch type for a strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punch {
    Jab,
    Hook,
    Uppercut,
}

impl fmt::Display for Punch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Punch::Jab => write!(f, "jab"),
            Punch::Hook => write!(f, "hook"),
            Punch::Uppercut => write!(f, "uppercut"),
        }
    }
}

/// Target body region for a strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Head,
    Body,
}

impl Target {
    /// The other region (each detector pair covers head and body)
    pub fn other(self) -> Target {
        match self {
            Target::Head => Target::Body,
            Target::Body => Target::Head,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Head => write!(f, "head"),
            Target::Body => write!(f, "body"),
        }
    }
}

/// One required gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrikeType {
    pub hand: Hand,
    pub punch: Punch,
    pub target: Target,
}

impl StrikeType {
    pub const fn new(hand: Hand, punch: Punch, target: Target) -> Self {
        Self {
            hand,
            punch,
            target,
        }
    }
}

/// Ordered strikes for one round, consumed front-first
pub type StrikeSequence = VecDeque<StrikeType>;

pub const LEFT_JAB_HEAD: StrikeType = StrikeType::new(Hand::Left, Punch::Jab, Target::Head);
pub const LEFT_JAB_BODY: StrikeType = StrikeType::new(Hand::Left, Punch::Jab, Target::Body);
pub const LEFT_HOOK_HEAD: StrikeType = StrikeType::new(Hand::Left, Punch::Hook, Target::Head);
pub const LEFT_HOOK_BODY: StrikeType = StrikeType::new(Hand::Left, Punch::Hook, Target::Body);
pub const LEFT_UPPERCUT_HEAD: StrikeType = StrikeType::new(Hand::Left, Punch::Uppercut, Target::Head);
pub const LEFT_UPPERCUT_BODY: StrikeType = StrikeType::new(Hand::Left, Punch::Uppercut, Target::Body);
pub const RIGHT_JAB_HEAD: StrikeType = StrikeType::new(Hand::Right, Punch::Jab, Target::Head);
pub const RIGHT_JAB_BODY: StrikeType = StrikeType::new(Hand::Right, Punch::Jab, Target::Body);
pub const RIGHT_HOOK_HEAD: StrikeType = StrikeType::new(Hand::Right, Punch::Hook, Target::Head);
pub const RIGHT_HOOK_BODY: StrikeType = StrikeType::new(Hand::Right, Punch::Hook, Target::Body);
pub const RIGHT_UPPERCUT_HEAD: StrikeType =
    StrikeType::new(Hand::Right, Punch::Uppercut, Target::Head);
pub const RIGHT_UPPERCUT_BODY: StrikeType =
    StrikeType::new(Hand::Right, Punch::Uppercut, Target::Body);

fn seq(strikes: &[StrikeType]) -> StrikeSequence {
    strikes.iter().copied().collect()
}

/// Single-strike warmup sequences
pub fn easy_pool() -> Vec<StrikeSequence> {
    vec![
        seq(&[LEFT_JAB_HEAD]),
        seq(&[LEFT_HOOK_BODY]),
        seq(&[LEFT_UPPERCUT_BODY]),
        seq(&[RIGHT_HOOK_HEAD]),
        seq(&[RIGHT_UPPERCUT_HEAD]),
        seq(&[RIGHT_JAB_BODY]),
    ]
}

/// Two-strike combinations
pub fn medium_pool() -> Vec<StrikeSequence> {
    vec![
        seq(&[RIGHT_HOOK_BODY, LEFT_JAB_HEAD]),
        seq(&[LEFT_UPPERCUT_BODY, RIGHT_JAB_HEAD]),
        seq(&[LEFT_HOOK_HEAD, RIGHT_HOOK_HEAD]),
        seq(&[LEFT_JAB_BODY, RIGHT_UPPERCUT_HEAD]),
        seq(&[LEFT_JAB_BODY, RIGHT_JAB_BODY]),
        seq(&[LEFT_HOOK_BODY, RIGHT_UPPERCUT_HEAD]),
    ]
}

/// Three-strike combinations, dealt indefinitely once reached
pub fn hard_pool() -> Vec<StrikeSequence> {
    vec![
        seq(&[RIGHT_UPPERCUT_BODY, LEFT_JAB_HEAD, RIGHT_HOOK_BODY]),
        seq(&[LEFT_UPPERCUT_BODY, RIGHT_JAB_HEAD, LEFT_HOOK_BODY]),
        seq(&[RIGHT_JAB_HEAD, LEFT_JAB_HEAD, RIGHT_HOOK_BODY]),
        seq(&[LEFT_UPPERCUT_HEAD, RIGHT_JAB_BODY, LEFT_HOOK_HEAD]),
        seq(&[RIGHT_UPPERCUT_HEAD, LEFT_JAB_BODY, RIGHT_HOOK_HEAD]),
    ]
}

/// Display label for a strike
///
/// A jab thrown with the player's dominant hand reads as "cross"; the swap
/// is purely cosmetic and has no effect on judgment.
pub fn strike_name(strike: StrikeType, is_right_handed: bool) -> String {
    let hand_punch = match strike.punch {
        Punch::Jab => {
            if (strike.hand == Hand::Right) == is_right_handed {
                "cross".to_string()
            } else {
                "jab".to_string()
            }
        }
        other => format!("{} {}", strike.hand, other),
    };
    format!("{} {}", hand_punch, strike.target)
}
