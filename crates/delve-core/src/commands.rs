//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Encounter ---
    /// Spawn an enemy and enter combat.
    StartEncounter { enemy: EnemyKind },
    /// Leave the current encounter without rewards.
    Retreat,

    // --- Combat actions ---
    /// Activate a power by id.
    UsePower { power_id: String },
    /// Raise a block against the next enemy hit.
    ActivateBlock,

    // --- Build ---
    /// Choose a build path (requires the class and level threshold).
    ChoosePath { path: PathId },
    /// Switch stance on a passive path.
    SetStance { stance: Stance },

    // --- Simulation control ---
    /// Set the global combat speed.
    SetCombatSpeed { speed: CombatSpeed },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
