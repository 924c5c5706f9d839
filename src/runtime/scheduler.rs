//! Manual-clock scheduler for one-shot and periodic callbacks
//!
//! Every "wait" in the arena is a scheduled envelope, never a blocking
//! sleep. Handles are cancellable; any state transition that supersedes a
//! pending timer must cancel the old handle so it cannot fire against
//! stale state. The host advances the clock with the frame loop and drains
//! due envelopes one at a time, so a cancellation performed while an
//! earlier envelope from the same frame is being handled takes effect
//! before the cancelled entry can fire.

use crate::runtime::message::{Address, Envelope, Message};

/// Cancellable handle for a scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry {
    id: TimerId,
    /// Fire order among entries due at the same time
    seq: u64,
    due_ms: u64,
    repeat_ms: Option<u64>,
    to: Address,
    msg: Message,
}

/// Single-threaded timer queue driven by `bump` + `pop_due`
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule a one-shot delivery `delay_ms` from now
    pub fn schedule_after(&mut self, delay_ms: u64, to: Address, msg: Message) -> TimerId {
        self.push(self.now_ms + delay_ms, None, to, msg)
    }

    /// Schedule a repeating delivery every `interval_ms`
    pub fn schedule_every(&mut self, interval_ms: u64, to: Address, msg: Message) -> TimerId {
        self.push(self.now_ms + interval_ms, Some(interval_ms), to, msg)
    }

    /// Drop a pending entry; unknown or already-fired ids are a no-op
    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Advance the clock without firing anything
    pub fn bump(&mut self, dt_ms: u64) {
        self.now_ms += dt_ms;
    }

    /// Next due envelope in (due time, schedule order), if any
    ///
    /// Repeating entries are re-queued one interval later, so a large clock
    /// bump yields every elapsed occurrence.
    pub fn pop_due(&mut self) -> Option<Envelope> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= self.now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))
            .map(|(i, _)| i)?;
        if let Some(interval) = self.entries[idx].repeat_ms {
            let entry = &mut self.entries[idx];
            let env = Envelope::new(entry.to, entry.msg.clone());
            entry.due_ms += interval;
            entry.seq = self.next_seq;
            self.next_seq += 1;
            Some(env)
        } else {
            let entry = self.entries.remove(idx);
            Some(Envelope::new(entry.to, entry.msg))
        }
    }

    fn push(&mut self, due_ms: u64, repeat_ms: Option<u64>, to: Address, msg: Message) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            id,
            seq,
            due_ms,
            repeat_ms,
            to,
            msg,
        });
        id
    }
}
