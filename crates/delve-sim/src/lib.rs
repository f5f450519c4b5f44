//! Simulation engine for DELVE.
//!
//! Owns the hecs ECS world, runs the combat systems once per host tick,
//! and produces `CombatSnapshot`s for the host.

pub mod combat_log;
pub mod encounter;
pub mod engine;
pub mod formulas;
pub mod status;
pub mod systems;

pub use delve_core as core;
pub use engine::{CombatEngine, SimConfig};

#[cfg(test)]
mod tests;
