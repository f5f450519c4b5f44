//! Fundamental simulation types.

use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks that actually advanced the simulation.
    pub tick: u64,
    /// Elapsed combat time in milliseconds, already scaled by combat speed.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one tick of `scaled_delta_ms`.
    pub fn advance(&mut self, scaled_delta_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += scaled_delta_ms;
    }
}

/// Stable identifier of a spawned enemy, unique for the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u64);

/// Fraction of `current` over `max`, `None` when `max` is not positive.
pub fn ratio(current: f64, max: f64) -> Option<f64> {
    if max > 0.0 && current.is_finite() && max.is_finite() {
        Some(current / max)
    } else {
        None
    }
}
