//! Strike Arena - Two-Player Reflex Boxing Decision Core

pub mod arena;
pub mod core;
pub mod detect;
pub mod points;
pub mod runtime;
pub mod storage;
pub mod strikes;
