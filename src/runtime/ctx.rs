//! Dispatch context handed to component handlers
//!
//! Handlers never touch each other directly: they queue outbound envelopes
//! here, and the dispatcher delivers them depth-first after the handler
//! returns. The context also exposes the scheduler, the persistence
//! services, and the output-event queue.

use crate::runtime::message::{Address, Envelope, Message, OutputEvent};
use crate::runtime::scheduler::{Scheduler, TimerId};
use crate::storage::ScoreServices;

pub struct Ctx<'a> {
    pub scheduler: &'a mut Scheduler,
    pub scores: &'a mut ScoreServices,
    pub outputs: &'a mut Vec<OutputEvent>,
    outbox: Vec<Envelope>,
}

impl<'a> Ctx<'a> {
    pub fn new(
        scheduler: &'a mut Scheduler,
        scores: &'a mut ScoreServices,
        outputs: &'a mut Vec<OutputEvent>,
    ) -> Self {
        Self {
            scheduler,
            scores,
            outputs,
            outbox: Vec::new(),
        }
    }

    /// Queue a message for delivery after the current handler returns
    pub fn send(&mut self, to: Address, msg: Message) {
        self.outbox.push(Envelope::new(to, msg));
    }

    /// Queue a message for every component
    pub fn broadcast(&mut self, msg: Message) {
        self.outbox.push(Envelope::broadcast(msg));
    }

    /// Schedule a one-shot delivery
    pub fn after(&mut self, delay_ms: u64, to: Address, msg: Message) -> TimerId {
        self.scheduler.schedule_after(delay_ms, to, msg)
    }

    /// Schedule a repeating delivery
    pub fn every(&mut self, interval_ms: u64, to: Address, msg: Message) -> TimerId {
        self.scheduler.schedule_every(interval_ms, to, msg)
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.scheduler.cancel(id);
    }

    /// Emit a side-effect request for the host
    pub fn emit(&mut self, event: OutputEvent) {
        self.outputs.push(event);
    }

    pub fn into_outbox(self) -> Vec<Envelope> {
        self.outbox
    }
}

/// Fresh scheduler/services/output backing for component unit tests
#[cfg(test)]
pub fn test_ctx() -> (Scheduler, ScoreServices, Vec<OutputEvent>) {
    (Scheduler::new(), ScoreServices::in_memory(), Vec::new())
}
