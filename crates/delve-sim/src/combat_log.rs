//! Per-tick event and log-line collection.

use delve_core::events::{CombatEvent, CombatLogLine};

/// Events and human-readable lines produced during one tick.
///
/// Drained into the snapshot at the end of every tick.
#[derive(Debug, Default)]
pub struct TickLog {
    tick: u64,
    events: Vec<CombatEvent>,
    lines: Vec<CombatLogLine>,
}

impl TickLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent lines with `tick`.
    pub fn begin_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    pub fn event(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn line(&mut self, message: impl Into<String>) {
        self.lines.push(CombatLogLine {
            tick: self.tick,
            message: message.into(),
        });
    }

    /// Drain everything collected so far.
    pub fn take(&mut self) -> (Vec<CombatEvent>, Vec<CombatLogLine>) {
        (
            std::mem::take(&mut self.events),
            std::mem::take(&mut self.lines),
        )
    }
}
