//! Attack timing system: converts speed into attack cadence.
//!
//! Each combatant accumulates scaled time. When the accumulator reaches the
//! effective interval, a `PendingAttack` is rolled and exactly one
//! interval is subtracted, so leftover progress carries into the next
//! cycle. Also owns power cooldown decay.

use hecs::{Entity, World};

use delve_core::components::{AttackTimer, CombatFlags, Player, PowerBook, Stats, StatusEffects};
use delve_core::constants::SLOW_DEFAULT_VALUE;
use delve_core::enums::{StatusKind, Trigger};
use delve_paths::trigger::TriggerContext;

use crate::formulas::attack_interval;
use crate::status::has_status;
use crate::systems::attack::{roll_attack, AttackRoll};
use crate::systems::{enemy_entity, opponent_of, player_entity, TickContext};

/// Advance a timer by `scaled_delta_ms`. Returns true when an attack is
/// ready, in which case one `effective_interval_ms` has been consumed.
pub fn advance_timer(timer: &mut AttackTimer, scaled_delta_ms: f64, effective_interval_ms: f64) -> bool {
    timer.accumulated_ms += scaled_delta_ms;
    if effective_interval_ms > 0.0 && timer.accumulated_ms >= effective_interval_ms {
        timer.accumulated_ms -= effective_interval_ms;
        true
    } else {
        false
    }
}

/// Interval lengthened by an active slow.
pub fn effective_interval(interval_ms: f64, statuses: &StatusEffects) -> f64 {
    match statuses.get(&StatusKind::Slow) {
        Some(slow) => interval_ms * (1.0 + slow.value.unwrap_or(SLOW_DEFAULT_VALUE).max(0.0)),
        None => interval_ms,
    }
}

fn is_out_of_fight(world: &World, entity: Option<Entity>) -> bool {
    let Some(entity) = entity else {
        return true;
    };
    let dying = world.get::<&CombatFlags>(entity).is_ok_and(|flags| flags.is_dying);
    let dead = world.get::<&Stats>(entity).map_or(true, |stats| stats.is_dead());
    dying || dead
}

pub fn run(world: &mut World, ctx: &mut TickContext) {
    decay_power_cooldowns(world, ctx.scaled_delta_ms);

    if is_out_of_fight(world, player_entity(world)) || is_out_of_fight(world, enemy_entity(world)) {
        return;
    }

    let base_interval = ctx.balance.base_attack_interval_ms;
    let curve = ctx.balance.speed_curve;
    let mut ready = Vec::new();

    for (entity, (timer, stats, flags, statuses)) in
        world.query_mut::<(&mut AttackTimer, &Stats, &CombatFlags, &StatusEffects)>()
    {
        if flags.is_dying || stats.is_dead() || has_status(statuses, &StatusKind::Stun) {
            continue;
        }

        timer.attack_interval_ms = attack_interval(stats.speed, base_interval, curve);
        let effective = effective_interval(timer.attack_interval_ms, statuses);
        if advance_timer(timer, ctx.scaled_delta_ms, effective) {
            ready.push(entity);
        }
    }

    for attacker in ready {
        let Some(defender) = opponent_of(world, attacker) else {
            continue;
        };
        let (Ok(attacker_stats), Ok(defender_stats)) = (
            world.get::<&Stats>(attacker).map(|s| *s),
            world.get::<&Stats>(defender).map(|s| *s),
        ) else {
            tracing::warn!(?attacker, "attacker or defender lost its stats");
            continue;
        };

        let is_player = world.get::<&Player>(attacker).is_ok();
        let roll = AttackRoll::random(ctx.rng, ctx.balance);
        let attack = roll_attack(
            &attacker_stats,
            &defender_stats,
            is_player,
            roll,
            ctx.balance.fortune_curve,
        );
        let _ = world.insert_one(attacker, attack);

        if is_player {
            ctx.triggers.record(Trigger::TurnStart, TriggerContext::default());
        }
    }
}

/// Decrease every power cooldown by the scaled delta, floored at zero.
pub fn decay_power_cooldowns(world: &mut World, scaled_delta_ms: f64) {
    if !(scaled_delta_ms.is_finite() && scaled_delta_ms > 0.0) {
        return;
    }
    for (_entity, book) in world.query_mut::<&mut PowerBook>() {
        for power in &mut book.powers {
            if power.current_cooldown_ms > 0.0 {
                power.current_cooldown_ms = (power.current_cooldown_ms - scaled_delta_ms).max(0.0);
            }
        }
    }
}
