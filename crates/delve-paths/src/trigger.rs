//! Per-tick trigger recording.
//!
//! A [`TriggerBuffer`] is created when a tick starts, filled by whichever
//! systems resolve attacks and powers, consumed by the ability pipeline and
//! dropped when the tick ends. Nothing in it survives to the next tick.

use delve_core::enums::Trigger;

/// Details of the combat event behind a trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerContext {
    /// Damage dealt (or received, for `OnDamaged`; avoided, for `OnDodge`).
    pub damage: f64,
    pub is_crit: bool,
    pub power_id: Option<String>,
    pub is_dodge: bool,
}

impl TriggerContext {
    pub fn damage(damage: f64) -> Self {
        Self {
            damage,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    pub trigger: Trigger,
    pub context: TriggerContext,
}

/// Triggers recorded during a single tick.
#[derive(Debug, Default)]
pub struct TriggerBuffer {
    events: Vec<TriggerEvent>,
}

impl TriggerBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a trigger for processing later in this tick.
    pub fn record(&mut self, trigger: Trigger, context: TriggerContext) {
        self.events.push(TriggerEvent { trigger, context });
    }

    pub fn events(&self) -> &[TriggerEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove and return every recorded trigger.
    pub fn take(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
