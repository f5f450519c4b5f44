//! Status decay: one status turn per `status_tick_ms` of scaled time.
//!
//! Each turn, damaging statuses hit their bearer, every status loses a turn
//! and expired ones are removed. Dying combatants lose all their statuses.

use hecs::World;

use delve_core::components::{CombatFlags, Combatant, Stats, StatusEffects};
use delve_core::enums::CombatantKind;
use delve_core::events::CombatEvent;

use crate::systems::TickContext;

/// Advance the status clock; runs as many status turns as have elapsed.
/// Leftover time is kept in `clock_ms`.
pub fn run(world: &mut World, ctx: &mut TickContext, clock_ms: &mut f64) {
    clear_dying(world);

    let interval = ctx.balance.status_tick_ms;
    if !(interval.is_finite() && interval > 0.0) {
        return;
    }
    *clock_ms += ctx.scaled_delta_ms;
    while *clock_ms >= interval {
        *clock_ms -= interval;
        status_turn(world, ctx);
    }
}

fn clear_dying(world: &mut World) {
    for (_entity, (flags, effects)) in world.query_mut::<(&CombatFlags, &mut StatusEffects)>() {
        if flags.is_dying && !effects.is_empty() {
            effects.effects.clear();
        }
    }
}

fn status_turn(world: &mut World, ctx: &mut TickContext) {
    for (_entity, (stats, flags, effects, combatant)) in
        world.query_mut::<(&mut Stats, &CombatFlags, &mut StatusEffects, &Combatant)>()
    {
        if flags.is_dying || effects.is_empty() {
            continue;
        }

        for effect in &mut effects.effects {
            let tick_damage = effect
                .damage
                .filter(|d| d.is_finite() && *d > 0.0 && effect.kind.deals_damage());
            if let Some(damage) = tick_damage.filter(|_| !stats.is_dead()) {
                let before = stats.health;
                stats.health = (stats.health - damage).max(0.0);
                let dealt = before - stats.health;

                let kind = effect.kind.name();
                ctx.log.line(match combatant.kind {
                    CombatantKind::Player => format!("You take {dealt} {kind} damage."),
                    CombatantKind::Enemy => format!("{} takes {dealt} {kind} damage.", combatant.name),
                });
                ctx.log.event(CombatEvent::StatusTick {
                    target: combatant.kind,
                    kind: effect.kind.clone(),
                    damage: dealt,
                });
            }
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }

        for expired in effects.effects.iter().filter(|e| e.remaining_turns == 0) {
            let kind = expired.kind.name();
            ctx.log.line(match combatant.kind {
                CombatantKind::Player => format!("Your {kind} wears off."),
                CombatantKind::Enemy => format!("{}'s {kind} wears off.", combatant.name),
            });
        }
        effects.effects.retain(|e| e.remaining_turns > 0);
    }
}
