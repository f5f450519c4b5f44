//! Combat state snapshot — the complete visible state handed to the host
//! after each tick. Every snapshot is a fresh value.

use serde::{Deserialize, Serialize};

use crate::components::{Buff, StatusEffect, Stats};
use crate::enums::*;
use crate::events::{CombatEvent, CombatLogLine};
use crate::types::{EnemyId, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub combat_speed: CombatSpeed,
    pub player: Option<CombatantView>,
    pub enemy: Option<CombatantView>,
    pub powers: Vec<PowerView>,
    pub path: Option<PathView>,
    pub progress: Option<ProgressView>,
    pub events: Vec<CombatEvent>,
    pub log: Vec<CombatLogLine>,
}

/// One combatant as the UI sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantView {
    pub name: String,
    pub kind: CombatantKind,
    pub enemy_id: Option<EnemyId>,
    pub stats: Stats,
    pub statuses: Vec<StatusEffect>,
    pub buffs: Vec<Buff>,
    pub is_dying: bool,
    pub is_blocking: bool,
    pub combo_count: u32,
    /// Progress toward the next attack (0.0 - 1.0).
    pub attack_progress: f64,
}

/// Power button state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerView {
    pub id: String,
    pub name: String,
    pub category: PowerCategory,
    pub resource_cost: f64,
    pub cooldown_ms: f64,
    pub current_cooldown_ms: f64,
    /// Whether `UsePower` would currently succeed.
    pub usable: bool,
}

/// Chosen path with ability cooldowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathView {
    pub path: PathId,
    pub stance: Option<Stance>,
    pub abilities: Vec<AbilityView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityView {
    pub id: String,
    pub name: String,
    pub cooldown_remaining_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressView {
    pub class: CharacterClass,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next: u64,
    pub gold: u64,
    pub kills: u32,
}
