//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in systems; the few methods
//! here are read-side helpers and bounded mutators that keep invariants.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{ratio, EnemyId};

/// Marks the player's combatant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Marks an enemy combatant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Identity of a combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub kind: CombatantKind,
    pub name: String,
}

/// Effective stat line used by every combat calculation.
///
/// Invariants: `health <= max_health`, `resource <= max_resource`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub health: f64,
    pub max_health: f64,
    pub power: f64,
    pub armor: f64,
    pub speed: f64,
    /// Mana, energy or rage, depending on class.
    pub resource: f64,
    pub max_resource: f64,
    pub fortune: f64,
}

impl Stats {
    /// Current health as a fraction of max health.
    pub fn health_ratio(&self) -> Option<f64> {
        ratio(self.health, self.max_health)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Restore health up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    /// Restore resource up to the maximum. Returns the amount actually restored.
    pub fn restore_resource(&mut self, amount: f64) -> f64 {
        let before = self.resource;
        self.resource = (self.resource + amount.max(0.0)).min(self.max_resource);
        self.resource - before
    }
}

/// Unbuffed stat line from class and level. Effective [`Stats`] are
/// recomputed from this whenever buffs or stance change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_health: f64,
    pub power: f64,
    pub armor: f64,
    pub speed: f64,
    pub max_resource: f64,
    pub fortune: f64,
}

/// A timed multiplicative stat modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub stat: BuffStat,
    pub multiplier: f64,
    pub remaining_ms: f64,
    /// Power or ability id that granted the buff.
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuffs {
    pub buffs: Vec<Buff>,
}

/// One active status condition. At most one per kind per combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub id: u64,
    pub kind: StatusKind,
    /// Damage per status turn (poison, bleed).
    pub damage: Option<f64>,
    /// Magnitude for non-damaging statuses (slow: interval lengthening).
    pub value: Option<f64>,
    pub remaining_turns: u32,
    pub icon: String,
    /// Who applied it, for logs.
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn get(&self, kind: &StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| &e.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Status kinds a combatant resists outright.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Immunities {
    pub kinds: Vec<StatusKind>,
}

/// Combat-transient flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatFlags {
    /// Set exactly once when health first reaches zero.
    pub is_dying: bool,
    /// Scaled time spent dying, used to delay removal.
    pub dying_elapsed_ms: f64,
    pub is_blocking: bool,
    pub block_remaining_ms: f64,
    pub block_cooldown_ms: f64,
    pub combo_count: u32,
    pub last_power_used: Option<String>,
}

/// Fixed-timestep attack accumulator.
///
/// `accumulated_ms` only grows by elapsed time and shrinks by exactly one
/// effective interval per attack, so fractional progress carries over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackTimer {
    pub accumulated_ms: f64,
    pub attack_interval_ms: f64,
}

/// Inserted by the timing system when an attack is ready; consumed by
/// attack resolution in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingAttack {
    pub damage: f64,
    pub is_crit: bool,
}

/// Secondary behaviour attached to a power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PowerExtra {
    /// Heal for this fraction of damage dealt.
    LifeSteal(f64),
    /// A heal power that restores resource instead of health.
    RestoresResource,
    /// Which stat a buff power scales and for how long.
    BuffStat { stat: BuffStat, duration_ms: f64 },
    /// Status a debuff power inflicts on the enemy.
    InflictStatus {
        kind: StatusKind,
        turns: Option<u32>,
        damage: Option<f64>,
        value: Option<f64>,
    },
}

/// A player power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub id: String,
    pub name: String,
    pub resource_cost: f64,
    pub cooldown_ms: f64,
    /// Owned by the timing system: only it decays this value.
    pub current_cooldown_ms: f64,
    pub effect: PowerEffect,
    /// Damage multiplier, heal fraction, buff multiplier or status damage.
    pub value: f64,
    pub category: PowerCategory,
    pub extra: Option<PowerExtra>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerBook {
    pub powers: Vec<Power>,
}

impl PowerBook {
    pub fn get(&self, id: &str) -> Option<&Power> {
        self.powers.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Power> {
        self.powers.iter_mut().find(|p| p.id == id)
    }
}

/// The player's build path and per-ability runtime state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathState {
    pub path: Option<PathId>,
    pub stance: Option<Stance>,
    /// Remaining cooldown per ability id (milliseconds).
    pub cooldowns: HashMap<String, f64>,
    /// Named counters abilities read and write.
    pub counters: HashMap<String, u32>,
}

impl PathState {
    pub fn cooldown(&self, ability_id: &str) -> f64 {
        self.cooldowns.get(ability_id).copied().unwrap_or(0.0)
    }

    pub fn counter(&self, name: &str) -> u32 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

/// Enemy bookkeeping: identity and rewards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyInfo {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub xp_reward: u64,
    pub gold_reward: u64,
}

/// Character progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub class: CharacterClass,
    pub level: u32,
    pub xp: u64,
    pub gold: u64,
    pub kills: u32,
}
