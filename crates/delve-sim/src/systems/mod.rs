//! ECS systems that operate on the combat world each tick.
//!
//! Systems are plain functions over `&mut World` plus a [`TickContext`].
//! They do not own state; everything persistent lives in components or in
//! the engine.

pub mod attack;
pub mod block;
pub mod buffs;
pub mod cleanup;
pub mod death;
pub mod path_abilities;
pub mod powers;
pub mod snapshot;
pub mod status_decay;
pub mod timing;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use delve_core::components::{Enemy, Player};
use delve_core::config::BalanceConfig;
use delve_core::enums::CombatSpeed;
use delve_paths::trigger::TriggerBuffer;

use crate::combat_log::TickLog;
use death::DeathLedger;

/// Everything a system may touch besides the world, borrowed from the
/// engine for one tick.
pub struct TickContext<'a> {
    pub rng: &'a mut ChaCha8Rng,
    pub balance: &'a BalanceConfig,
    pub combat_speed: CombatSpeed,
    /// Elapsed time this tick, already multiplied by combat speed.
    pub scaled_delta_ms: f64,
    pub triggers: &'a mut TriggerBuffer,
    pub log: &'a mut TickLog,
    pub ledger: &'a mut DeathLedger,
}

/// The player's entity, if spawned.
pub fn player_entity(world: &World) -> Option<Entity> {
    world.query::<&Player>().iter().next().map(|(entity, _)| entity)
}

/// The current enemy, if one is in the world.
pub fn enemy_entity(world: &World) -> Option<Entity> {
    world.query::<&Enemy>().iter().next().map(|(entity, _)| entity)
}

/// The combatant `entity` is fighting.
pub fn opponent_of(world: &World, entity: Entity) -> Option<Entity> {
    if world.get::<&Player>(entity).is_ok() {
        enemy_entity(world)
    } else {
        player_entity(world)
    }
}
