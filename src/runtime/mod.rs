pub mod ctx;
pub mod message;
pub mod scheduler;

pub use ctx::Ctx;
pub use message::{Address, Envelope, HandSample, Message, OutputEvent, RingKind, SoundCue};
pub use scheduler::{Scheduler, TimerId};
