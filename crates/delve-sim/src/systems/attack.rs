//! Auto-attack damage rolls and resolution.
//!
//! The timing system rolls a [`PendingAttack`] when an attacker's timer
//! fires; [`run`] consumes it the same tick, rolling the defender's dodge
//! and applying block, health loss, events and triggers.

use hecs::{Entity, World};
use rand::Rng;

use delve_core::components::{CombatFlags, Combatant, PendingAttack, Player, Stats};
use delve_core::config::{BalanceConfig, FortuneCurve};
use delve_core::constants::{ARMOR_MITIGATION_DIVISOR, MIN_ATTACK_DAMAGE};
use delve_core::enums::Trigger;
use delve_core::events::CombatEvent;
use delve_paths::trigger::TriggerContext;

use crate::formulas::{crit_chance, crit_damage_multiplier, dodge_chance};
use crate::systems::{opponent_of, TickContext};

/// Random inputs to one damage roll. Tests inject fixed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackRoll {
    /// Damage variance multiplier.
    pub variance: f64,
    /// Uniform roll in [0, 1) compared against crit chance.
    pub crit_roll: f64,
}

impl AttackRoll {
    pub fn random(rng: &mut impl Rng, balance: &BalanceConfig) -> Self {
        let (min, max) = if balance.variance_min <= balance.variance_max {
            (balance.variance_min, balance.variance_max)
        } else {
            (balance.variance_max, balance.variance_min)
        };
        Self {
            variance: rng.gen_range(min..=max),
            crit_roll: rng.gen::<f64>(),
        }
    }

    /// Variance 1.0 and no crit.
    pub fn flat() -> Self {
        Self {
            variance: 1.0,
            crit_roll: 1.0,
        }
    }
}

/// `floor(max(1, power - armor / 2) * variance)`, then crit for players.
pub fn roll_attack(
    attacker: &Stats,
    defender: &Stats,
    can_crit: bool,
    roll: AttackRoll,
    curve: FortuneCurve,
) -> PendingAttack {
    let mitigated = (attacker.power - defender.armor / ARMOR_MITIGATION_DIVISOR).max(MIN_ATTACK_DAMAGE);
    let mut damage = (mitigated * roll.variance).floor();

    let is_crit = can_crit && roll.crit_roll < crit_chance(attacker.fortune, curve);
    if is_crit {
        damage = (damage * crit_damage_multiplier(attacker.fortune, curve)).floor();
    }

    PendingAttack {
        damage: if damage.is_finite() { damage.max(0.0) } else { 0.0 },
        is_crit,
    }
}

/// Health lost by a combatant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub amount: f64,
    pub target_died: bool,
}

/// Subtract `amount` from a living combatant's health, floored at zero.
///
/// Returns `None` when the target is missing or already dying.
pub fn damage_combatant(world: &mut World, target: Entity, amount: f64) -> Option<DamageDealt> {
    if world.get::<&CombatFlags>(target).is_ok_and(|flags| flags.is_dying) {
        return None;
    }
    let Ok(mut stats) = world.get::<&mut Stats>(target) else {
        tracing::warn!(?target, "damage target has no stats");
        return None;
    };
    if stats.is_dead() {
        return None;
    }

    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    let before = stats.health;
    stats.health = (stats.health - amount).max(0.0);
    Some(DamageDealt {
        amount: before - stats.health,
        target_died: stats.is_dead(),
    })
}

/// Resolve every pending attack.
pub fn run(world: &mut World, ctx: &mut TickContext) {
    let pending: Vec<(Entity, PendingAttack)> = world
        .query::<&PendingAttack>()
        .iter()
        .map(|(entity, attack)| (entity, *attack))
        .collect();

    for (attacker, attack) in pending {
        let _ = world.remove_one::<PendingAttack>(attacker);
        resolve(world, attacker, attack, ctx);
    }
}

fn is_active(world: &World, entity: Entity) -> bool {
    let dying = world.get::<&CombatFlags>(entity).is_ok_and(|flags| flags.is_dying);
    let dead = world.get::<&Stats>(entity).map_or(true, |stats| stats.is_dead());
    !dying && !dead
}

fn resolve(world: &mut World, attacker: Entity, attack: PendingAttack, ctx: &mut TickContext) {
    let Some(defender) = opponent_of(world, attacker) else {
        return;
    };
    if !is_active(world, attacker) || !is_active(world, defender) {
        return;
    }

    let attacker_is_player = world.get::<&Player>(attacker).is_ok();
    let defender_name = world
        .get::<&Combatant>(defender)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let attacker_name = world
        .get::<&Combatant>(attacker)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let defender_fortune = world.get::<&Stats>(defender).map_or(0.0, |s| s.fortune);

    let is_dodge = ctx.rng.gen::<f64>() < dodge_chance(defender_fortune);

    if attacker_is_player {
        resolve_player_attack(world, defender, &defender_name, attack, is_dodge, ctx);
    } else {
        resolve_enemy_attack(world, defender, &attacker_name, attack, is_dodge, ctx);
    }
}

fn resolve_player_attack(
    world: &mut World,
    enemy: Entity,
    enemy_name: &str,
    attack: PendingAttack,
    is_dodge: bool,
    ctx: &mut TickContext,
) {
    if is_dodge {
        ctx.log.line(format!("{enemy_name} dodges your attack!"));
        ctx.log.event(CombatEvent::PlayerAttack {
            damage: 0.0,
            is_crit: false,
            is_dodge: true,
            target_died: false,
        });
        return;
    }

    let Some(dealt) = damage_combatant(world, enemy, attack.damage) else {
        return;
    };

    if attack.is_crit {
        ctx.log.line(format!(
            "Critical hit! You strike {enemy_name} for {} damage.",
            dealt.amount
        ));
    } else {
        ctx.log
            .line(format!("You hit {enemy_name} for {} damage.", dealt.amount));
    }
    ctx.log.event(CombatEvent::PlayerAttack {
        damage: dealt.amount,
        is_crit: attack.is_crit,
        is_dodge: false,
        target_died: dealt.target_died,
    });

    let context = TriggerContext {
        damage: dealt.amount,
        is_crit: attack.is_crit,
        ..Default::default()
    };
    ctx.triggers.record(Trigger::OnHit, context.clone());
    if attack.is_crit {
        ctx.triggers.record(Trigger::OnCrit, context);
    }
}

fn resolve_enemy_attack(
    world: &mut World,
    player: Entity,
    enemy_name: &str,
    attack: PendingAttack,
    is_dodge: bool,
    ctx: &mut TickContext,
) {
    if is_dodge {
        ctx.log
            .line(format!("{enemy_name} attacks, but you dodge!"));
        ctx.log.event(CombatEvent::EnemyAttack {
            damage: 0.0,
            is_dodge: true,
            blocked: false,
            target_died: false,
        });
        ctx.triggers.record(
            Trigger::OnDodge,
            TriggerContext {
                damage: attack.damage,
                is_dodge: true,
                ..Default::default()
            },
        );
        return;
    }

    let blocked = match world.get::<&mut CombatFlags>(player) {
        Ok(mut flags) if flags.is_blocking => {
            flags.is_blocking = false;
            flags.block_remaining_ms = 0.0;
            true
        }
        _ => false,
    };
    let damage = if blocked {
        (attack.damage * (1.0 - ctx.balance.block_damage_reduction)).floor()
    } else {
        attack.damage
    };

    let Some(dealt) = damage_combatant(world, player, damage) else {
        return;
    };

    if blocked {
        ctx.log.line(format!(
            "You block {enemy_name}'s attack and take {} damage.",
            dealt.amount
        ));
    } else {
        ctx.log
            .line(format!("{enemy_name} hits you for {} damage.", dealt.amount));
    }
    ctx.log.event(CombatEvent::EnemyAttack {
        damage: dealt.amount,
        is_dodge: false,
        blocked,
        target_died: dealt.target_died,
    });

    if dealt.amount > 0.0 {
        ctx.triggers
            .record(Trigger::OnDamaged, TriggerContext::damage(dealt.amount));
    }
}
