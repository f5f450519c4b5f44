//! Events emitted by the simulation for animation, log and accessibility
//! consumers.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EnemyId;

/// Discrete combat events produced during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// An encounter began.
    EncounterStarted { enemy_id: EnemyId, enemy: EnemyKind },
    /// The player's auto-attack resolved.
    PlayerAttack {
        damage: f64,
        is_crit: bool,
        is_dodge: bool,
        target_died: bool,
    },
    /// The enemy's auto-attack resolved.
    EnemyAttack {
        damage: f64,
        is_dodge: bool,
        blocked: bool,
        target_died: bool,
    },
    /// A player power resolved.
    PlayerPower {
        power_id: String,
        damage: f64,
        healed: f64,
        combo_count: u32,
        target_died: bool,
    },
    /// Extra damage dealt to the enemy by a path ability.
    EnemyHit { damage: f64, source: String, target_died: bool },
    /// Damage dealt to the player outside of an enemy swing.
    PlayerHit { damage: f64, source: String, target_died: bool },
    /// A status was applied or refreshed.
    StatusApplied { target: CombatantKind, kind: StatusKind },
    /// A status was resisted through immunity.
    StatusResisted { target: CombatantKind, kind: StatusKind },
    /// A damaging status ticked.
    StatusTick {
        target: CombatantKind,
        kind: StatusKind,
        damage: f64,
    },
    /// A path ability fired.
    AbilityTriggered { ability_id: String },
    /// The enemy died; rewards have been granted.
    EnemyDefeated { enemy_id: EnemyId, xp: u64, gold: u64 },
    /// The player died.
    PlayerDefeated,
    /// The player gained a level.
    LevelUp { level: u32 },
}

/// Human-readable line for the combat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogLine {
    pub tick: u64,
    pub message: String,
}
