//! Path-ability system: feeds the tick's triggers through the player's
//! abilities and applies whatever fires.
//!
//! Effects that kill the enemy record new triggers (`OnKill`); those are
//! evaluated in a follow-up pass within the same tick. Whatever is left in
//! the buffer afterwards is discarded.

use hecs::{Entity, World};

use delve_core::components::{Buff, CombatFlags, PathState, PowerBook, Stats, StatusEffects};
use delve_core::events::CombatEvent;
use delve_paths::ability::EffectAction;
use delve_paths::catalog::get_abilities;
use delve_paths::condition::{ConditionContext, Vitals};
use delve_paths::pipeline::{decay_cooldowns, evaluate, TriggeredEffect};

use crate::formulas::proc_chance_bonus;
use crate::status::{inflict, StatusApplication};
use crate::systems::attack::damage_combatant;
use crate::systems::buffs::push_buff;
use crate::systems::{death, enemy_entity, player_entity, TickContext};

/// Upper bound on evaluation passes per tick.
const MAX_TRIGGER_PASSES: usize = 3;

fn vitals(world: &World, entity: Option<Entity>) -> Option<Vitals> {
    let entity = entity?;
    let stats = world.get::<&Stats>(entity).ok()?;
    Some(Vitals {
        health: stats.health,
        max_health: stats.max_health,
    })
}

/// Snapshot of both combatants for condition checks.
pub fn condition_context(world: &World, player: Entity, enemy: Option<Entity>) -> ConditionContext {
    ConditionContext {
        player: vitals(world, Some(player)),
        enemy: vitals(world, enemy),
        combo_count: world
            .get::<&CombatFlags>(player)
            .map_or(0, |flags| flags.combo_count),
        enemy_has_status: enemy.is_some_and(|e| {
            world
                .get::<&StatusEffects>(e)
                .is_ok_and(|effects| !effects.is_empty())
        }),
    }
}

pub fn run(world: &mut World, ctx: &mut TickContext) {
    let Some(player) = player_entity(world) else {
        ctx.triggers.clear();
        return;
    };

    let path = match world.get::<&mut PathState>(player) {
        Ok(mut state) => {
            decay_cooldowns(&mut state, ctx.scaled_delta_ms);
            state.path
        }
        Err(_) => None,
    };
    let player_dying = world
        .get::<&CombatFlags>(player)
        .is_ok_and(|flags| flags.is_dying);

    let Some(path) = path.filter(|_| !player_dying) else {
        ctx.triggers.clear();
        return;
    };
    let abilities = get_abilities(path);

    for _ in 0..MAX_TRIGGER_PASSES {
        let events = ctx.triggers.take();
        if events.is_empty() {
            break;
        }

        let enemy = enemy_entity(world);
        let cond_ctx = condition_context(world, player, enemy);
        let fortune = world.get::<&Stats>(player).map_or(0.0, |s| s.fortune);

        let fired = match world.get::<&mut PathState>(player) {
            Ok(mut state) => evaluate(
                &abilities,
                &events,
                &cond_ctx,
                &mut state,
                &mut *ctx.rng,
                proc_chance_bonus(fortune),
            ),
            Err(_) => Vec::new(),
        };

        for effect in &fired {
            apply_effect(world, player, enemy, effect, ctx);
        }
        death::run(world, ctx);
    }

    ctx.triggers.clear();
}

fn apply_effect(
    world: &mut World,
    player: Entity,
    enemy: Option<Entity>,
    effect: &TriggeredEffect,
    ctx: &mut TickContext,
) {
    let name = effect.ability_name;
    ctx.log.event(CombatEvent::AbilityTriggered {
        ability_id: effect.ability_id.to_string(),
    });

    match &effect.action {
        EffectAction::BonusDamage(fraction) => {
            let amount = (effect.context.damage * fraction).floor();
            hit_enemy(world, enemy, amount, effect, ctx);
        }
        EffectAction::FlatDamage(amount) => {
            hit_enemy(world, enemy, amount.floor(), effect, ctx);
        }
        EffectAction::Heal(fraction) => {
            if let Ok(mut stats) = world.get::<&mut Stats>(player) {
                let amount = (stats.max_health * fraction).floor();
                let restored = stats.heal(amount);
                ctx.log
                    .line(format!("{name} restores {restored} health."));
            }
        }
        EffectAction::RestoreResource(amount) => {
            if let Ok(mut stats) = world.get::<&mut Stats>(player) {
                let restored = stats.restore_resource(*amount);
                ctx.log
                    .line(format!("{name} restores {restored} resource."));
            }
        }
        EffectAction::InflictStatus {
            kind,
            turns,
            damage,
            value,
        } => {
            let Some(enemy) = enemy else {
                return;
            };
            let application = StatusApplication {
                kind: kind.clone(),
                turns: *turns,
                damage: *damage,
                value: *value,
            };
            inflict(world, enemy, &application, effect.ability_id, ctx.log);
        }
        EffectAction::Buff {
            stat,
            multiplier,
            duration_ms,
        } => {
            push_buff(
                world,
                player,
                Buff {
                    stat: *stat,
                    multiplier: *multiplier,
                    remaining_ms: *duration_ms,
                    source: effect.ability_id.to_string(),
                },
            );
            ctx.log.line(format!("{name} empowers you."));
        }
        EffectAction::IncrementCounter(counter) => {
            let value = world
                .get::<&PathState>(player)
                .map_or(0, |state| state.counter(counter));
            ctx.log.line(format!("{name} builds ({value})."));
        }
        EffectAction::ResetCounter(_) => {
            ctx.log.line(format!("{name} is spent."));
        }
        EffectAction::ReduceCooldowns(ms) => {
            if let Ok(mut book) = world.get::<&mut PowerBook>(player) {
                for power in &mut book.powers {
                    power.current_cooldown_ms = (power.current_cooldown_ms - ms).max(0.0);
                }
            }
            ctx.log.line(format!("{name} hastens your powers."));
        }
    }
}

fn hit_enemy(
    world: &mut World,
    enemy: Option<Entity>,
    amount: f64,
    effect: &TriggeredEffect,
    ctx: &mut TickContext,
) {
    if amount <= 0.0 {
        return;
    }
    let Some(dealt) = enemy.and_then(|enemy| damage_combatant(world, enemy, amount)) else {
        return;
    };

    ctx.log.line(format!(
        "{} deals {} bonus damage!",
        effect.ability_name, dealt.amount
    ));
    ctx.log.event(CombatEvent::EnemyHit {
        damage: dealt.amount,
        source: effect.ability_id.to_string(),
        target_died: dealt.target_died,
    });
}
