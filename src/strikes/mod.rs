pub mod catalog;
pub mod generator;

pub use catalog::{strike_name, Hand, Punch, StrikeSequence, StrikeType, Target};
pub use generator::{SharedGenerator, StrikeGenerator};
