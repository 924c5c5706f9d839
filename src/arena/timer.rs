//! Shared countdown ticking service
//!
//! One timer per slot drives both the ready-up countdown display and the
//! per-strike budget. It ticks on a fixed wall-time cadence, publishes the
//! remaining time for display, clicks on whole seconds, and fires a single
//! terminal signal at zero. Stopping cancels everything with no terminal
//! signal.

use crate::core::config::GameConfig;
use crate::core::types::Slot;
use crate::runtime::ctx::Ctx;
use crate::runtime::message::{Address, Message, OutputEvent, SoundCue};
use crate::runtime::scheduler::TimerId;

#[derive(Debug)]
pub struct CountdownTimer {
    slot: Slot,
    tick_ms: u64,
    clear_ms: u64,
    remaining_ms: i64,
    whole_seconds: bool,
    tick_handle: Option<TimerId>,
    clear_handle: Option<TimerId>,
}

impl CountdownTimer {
    pub fn new(slot: Slot, config: &GameConfig) -> Self {
        Self {
            slot,
            tick_ms: config.timer_tick_ms,
            clear_ms: config.clock_clear_ms,
            remaining_ms: 0,
            whole_seconds: false,
            tick_handle: None,
            clear_handle: None,
        }
    }

    pub fn handle(&mut self, msg: &Message, ctx: &mut Ctx<'_>) {
        match msg {
            Message::StartTimer {
                msec,
                whole_seconds,
            } => self.start(*msec, *whole_seconds, ctx),
            Message::StopTimer | Message::ResetGame => self.stop(ctx),
            Message::TimerTick => self.on_tick(ctx),
            Message::ClearClock => {
                self.clear_handle = None;
                self.show(String::new(), ctx);
            }
            _ => {}
        }
    }

    fn start(&mut self, msec: u64, whole_seconds: bool, ctx: &mut Ctx<'_>) {
        self.cancel_pending(ctx);
        self.remaining_ms = msec as i64;
        self.whole_seconds = whole_seconds;
        self.tick_handle = Some(ctx.every(
            self.tick_ms,
            Address::Timer(self.slot),
            Message::TimerTick,
        ));
    }

    fn stop(&mut self, ctx: &mut Ctx<'_>) {
        self.cancel_pending(ctx);
        self.show(String::new(), ctx);
    }

    fn on_tick(&mut self, ctx: &mut Ctx<'_>) {
        if self.tick_handle.is_none() {
            // stale tick after a stop
            return;
        }
        self.remaining_ms -= self.tick_ms as i64;
        let seconds = self.remaining_ms as f64 / 1000.0;
        let text = if self.whole_seconds {
            format!("{:.0}", seconds)
        } else {
            format!("{:.1}", seconds)
        };
        self.show(text, ctx);
        if self.remaining_ms % 1000 == 0 {
            ctx.emit(OutputEvent::Sound {
                slot: Some(self.slot),
                cue: SoundCue::Tick,
            });
        }
        if self.remaining_ms <= 0 {
            if let Some(handle) = self.tick_handle.take() {
                ctx.cancel(handle);
            }
            self.clear_handle = Some(ctx.after(
                self.clear_ms,
                Address::Timer(self.slot),
                Message::ClearClock,
            ));
            ctx.send(Address::Session(self.slot), Message::TimerDone);
        }
    }

    fn cancel_pending(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(handle) = self.tick_handle.take() {
            ctx.cancel(handle);
        }
        if let Some(handle) = self.clear_handle.take() {
            ctx.cancel(handle);
        }
    }

    fn show(&self, text: String, ctx: &mut Ctx<'_>) {
        ctx.emit(OutputEvent::ClockText {
            slot: self.slot,
            text,
        });
    }
}
