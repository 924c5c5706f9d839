pub mod button;
pub mod orchestrator;
pub mod session;
pub mod timer;
pub mod world;

pub use orchestrator::{MatchPhase, StrikeGame};
pub use session::{PlayerController, SessionPhase};
pub use world::StrikeWorld;
