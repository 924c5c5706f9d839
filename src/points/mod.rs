pub mod engine;
pub mod global;

pub use engine::{PointsManager, ScoreUpdate};
pub use global::GlobalPoints;
