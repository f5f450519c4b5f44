//! Lethal-hit bookkeeping.
//!
//! A combatant whose health reached zero is marked dying exactly once.
//! Enemy rewards are additionally guarded by a per-encounter
//! [`DeathLedger`], so a second pass over the same corpse is a no-op.

use std::collections::HashSet;

use hecs::{Entity, World};

use delve_core::components::{BaseStats, CombatFlags, Combatant, Enemy, EnemyInfo, Player, Progress, Stats};
use delve_core::constants::XP_PER_LEVEL;
use delve_core::enums::Trigger;
use delve_core::events::CombatEvent;
use delve_core::types::EnemyId;
use delve_paths::trigger::TriggerContext;

use crate::combat_log::TickLog;
use crate::encounter::{class_growth, grow};
use crate::formulas::drop_quality_bonus;
use crate::systems::buffs::refresh_stats;
use crate::systems::{player_entity, TickContext};

/// Enemy deaths already rewarded in the current encounter.
#[derive(Debug, Default)]
pub struct DeathLedger {
    processed: HashSet<EnemyId>,
}

impl DeathLedger {
    /// Record a death. Returns false if it was already recorded.
    pub fn record(&mut self, id: EnemyId) -> bool {
        self.processed.insert(id)
    }

    pub fn contains(&self, id: EnemyId) -> bool {
        self.processed.contains(&id)
    }

    pub fn clear(&mut self) {
        self.processed.clear();
    }
}

/// Experience needed to advance from `level`.
pub fn xp_to_next(level: u32) -> u64 {
    u64::from(level.max(1)) * XP_PER_LEVEL
}

/// Mark newly dead combatants as dying and grant rewards.
pub fn run(world: &mut World, ctx: &mut TickContext) {
    let mut fallen_enemies = Vec::new();
    for (entity, (stats, flags, info, combatant, _enemy)) in
        world.query_mut::<(&Stats, &mut CombatFlags, &EnemyInfo, &Combatant, &Enemy)>()
    {
        if stats.is_dead() && !flags.is_dying {
            flags.is_dying = true;
            fallen_enemies.push((entity, info.clone(), combatant.name.clone()));
        }
    }

    let mut player_fell = false;
    for (_entity, (stats, flags, _player)) in world.query_mut::<(&Stats, &mut CombatFlags, &Player)>() {
        if stats.is_dead() && !flags.is_dying {
            flags.is_dying = true;
            player_fell = true;
        }
    }

    for (_entity, info, name) in fallen_enemies {
        if !ctx.ledger.record(info.id) {
            continue;
        }
        grant_rewards(world, &info, &name, ctx.log);
        ctx.triggers.record(Trigger::OnKill, TriggerContext::default());
    }

    if player_fell {
        tracing::info!("player defeated");
        ctx.log.line("You have been defeated.");
        ctx.log.event(CombatEvent::PlayerDefeated);
    }
}

fn grant_rewards(world: &mut World, info: &EnemyInfo, name: &str, log: &mut TickLog) {
    let Some(player) = player_entity(world) else {
        tracing::warn!(enemy = ?info.id, "enemy died with no player to reward");
        return;
    };
    let fortune = world.get::<&Stats>(player).map_or(0.0, |s| s.fortune);
    let gold = (info.gold_reward as f64 * drop_quality_bonus(fortune)).floor() as u64;
    let xp = info.xp_reward;

    let levels_gained = match world.get::<&mut Progress>(player) {
        Ok(mut progress) => {
            progress.xp += xp;
            progress.gold += gold;
            progress.kills += 1;

            let mut gained = Vec::new();
            while progress.xp >= xp_to_next(progress.level) {
                progress.xp -= xp_to_next(progress.level);
                progress.level += 1;
                gained.push((progress.level, progress.class));
            }
            gained
        }
        Err(_) => {
            tracing::warn!("player has no progress component");
            Vec::new()
        }
    };

    tracing::info!(enemy = ?info.id, xp, gold, "enemy defeated");
    log.line(format!("{name} is defeated! (+{xp} XP, +{gold} gold)"));
    log.event(CombatEvent::EnemyDefeated {
        enemy_id: info.id,
        xp,
        gold,
    });

    for (level, class) in levels_gained {
        level_up(world, player, class_growth(class));
        tracing::info!(level, "level up");
        log.line(format!("You reached level {level}!"));
        log.event(CombatEvent::LevelUp { level });
    }
}

/// Apply one level of growth and restore the player to full.
fn level_up(world: &mut World, player: Entity, growth: BaseStats) {
    if let Ok(mut base) = world.get::<&mut BaseStats>(player) {
        *base = grow(&base, &growth);
    }
    refresh_stats(world, player);
    if let Ok(mut stats) = world.get::<&mut Stats>(player) {
        stats.health = stats.max_health;
        stats.resource = stats.max_resource;
    }
}
