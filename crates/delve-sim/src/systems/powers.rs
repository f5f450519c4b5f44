//! Player power activation.
//!
//! A rejected activation leaves every component untouched. A successful
//! one pays the resource cost, starts the cooldown, advances the combo and
//! resolves the power's effect against the current enemy.

use hecs::{Entity, World};

use delve_core::components::{Buff, CombatFlags, Combatant, Power, PowerBook, PowerExtra, Stats};
use delve_core::constants::{DEFAULT_BUFF_DURATION_MS, HOST_TICK_MS};
use delve_core::enums::{BuffStat, PowerEffect, StatusKind, Trigger};
use delve_core::events::CombatEvent;
use delve_paths::trigger::TriggerContext;

use crate::status::{inflict, StatusApplication};
use crate::systems::attack::damage_combatant;
use crate::systems::buffs::push_buff;
use crate::systems::{enemy_entity, player_entity, TickContext};

/// Combo after using `power_id`, given the previously used power.
///
/// A different power than last time extends the combo up to `max_combo`;
/// repeating a power resets it.
pub fn next_combo(previous: Option<&str>, power_id: &str, combo: u32, max_combo: u32) -> u32 {
    match previous {
        Some(last) if last == power_id => 0,
        Some(_) => (combo + 1).min(max_combo),
        None => combo,
    }
}

/// Why a power could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoPlayer,
    UnknownPower,
    OnCooldown,
    InsufficientResource,
    PlayerDying,
    /// Damage and debuff powers need a living enemy.
    NoTarget,
}

/// Whether `effect` acts on the enemy rather than the player.
pub fn needs_target(effect: PowerEffect) -> bool {
    matches!(effect, PowerEffect::Damage | PowerEffect::Debuff)
}

/// An enemy is present and neither dying nor dead.
pub fn has_living_target(world: &World) -> bool {
    enemy_entity(world).is_some_and(|enemy| {
        let dying = world.get::<&CombatFlags>(enemy).is_ok_and(|flags| flags.is_dying);
        let dead = world.get::<&Stats>(enemy).map_or(true, |stats| stats.is_dead());
        !dying && !dead
    })
}

/// Check whether `power_id` can be used right now.
pub fn check_usable(world: &World, player: Entity, power_id: &str) -> Result<Power, Rejection> {
    let flags = world
        .get::<&CombatFlags>(player)
        .map_err(|_| Rejection::NoPlayer)?;
    if flags.is_dying {
        return Err(Rejection::PlayerDying);
    }
    let book = world
        .get::<&PowerBook>(player)
        .map_err(|_| Rejection::NoPlayer)?;
    let power = book.get(power_id).ok_or(Rejection::UnknownPower)?;
    if power.current_cooldown_ms > 0.0 {
        return Err(Rejection::OnCooldown);
    }
    let resource = world
        .get::<&Stats>(player)
        .map_err(|_| Rejection::NoPlayer)?
        .resource;
    if resource < power.resource_cost {
        return Err(Rejection::InsufficientResource);
    }
    if needs_target(power.effect) && !has_living_target(world) {
        return Err(Rejection::NoTarget);
    }
    Ok(power.clone())
}

/// Activate a power. Returns whether it was used.
pub fn use_power(world: &mut World, power_id: &str, ctx: &mut TickContext) -> bool {
    let Some(player) = player_entity(world) else {
        tracing::warn!(power_id, "power used with no player");
        return false;
    };
    let power = match check_usable(world, player, power_id) {
        Ok(power) => power,
        Err(reason) => {
            tracing::debug!(power_id, ?reason, "power rejected");
            return false;
        }
    };

    if let Ok(mut stats) = world.get::<&mut Stats>(player) {
        stats.resource = (stats.resource - power.resource_cost).max(0.0);
    }
    if let Ok(mut book) = world.get::<&mut PowerBook>(player) {
        if let Some(slot) = book.get_mut(power_id) {
            // Pre-reduced by one scaled host tick.
            let pre_reduction = HOST_TICK_MS * ctx.combat_speed.multiplier();
            slot.current_cooldown_ms = (slot.cooldown_ms - pre_reduction).max(0.0);
        }
    }
    let combo = match world.get::<&mut CombatFlags>(player) {
        Ok(mut flags) => {
            flags.combo_count = next_combo(
                flags.last_power_used.as_deref(),
                power_id,
                flags.combo_count,
                ctx.balance.max_combo,
            );
            flags.last_power_used = Some(power_id.to_string());
            flags.combo_count
        }
        Err(_) => 0,
    };
    let combo_multiplier = 1.0 + f64::from(combo) * ctx.balance.combo_bonus_per_level;

    let enemy = enemy_entity(world);
    let resolved = match power.effect {
        PowerEffect::Damage => resolve_damage(world, player, enemy, &power, combo_multiplier, ctx),
        PowerEffect::Heal => resolve_heal(world, player, &power, ctx),
        PowerEffect::Buff => resolve_buff(world, player, &power, ctx),
        PowerEffect::Debuff => resolve_debuff(world, enemy, &power, ctx),
    };

    ctx.log.event(CombatEvent::PlayerPower {
        power_id: power.id.clone(),
        damage: resolved.damage,
        healed: resolved.healed,
        combo_count: combo,
        target_died: resolved.target_died,
    });
    if combo > 1 {
        ctx.log.line(format!("Combo x{combo}!"));
    }
    ctx.triggers.record(
        Trigger::OnPowerUse,
        TriggerContext {
            damage: resolved.damage,
            power_id: Some(power.id.clone()),
            ..Default::default()
        },
    );
    true
}

#[derive(Debug, Default)]
struct Resolved {
    damage: f64,
    healed: f64,
    target_died: bool,
}

fn enemy_name(world: &World, enemy: Entity) -> String {
    world
        .get::<&Combatant>(enemy)
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

fn resolve_damage(
    world: &mut World,
    player: Entity,
    enemy: Option<Entity>,
    power: &Power,
    combo_multiplier: f64,
    ctx: &mut TickContext,
) -> Resolved {
    let Some(enemy) = enemy else {
        return Resolved::default();
    };
    let player_power = world.get::<&Stats>(player).map_or(0.0, |s| s.power);
    let amount = (player_power * power.value * combo_multiplier).floor();

    let Some(dealt) = damage_combatant(world, enemy, amount) else {
        return Resolved::default();
    };
    let name = enemy_name(world, enemy);
    ctx.log.line(format!(
        "You use {} on {name} for {} damage!",
        power.name, dealt.amount
    ));

    let mut healed = 0.0;
    if let Some(PowerExtra::LifeSteal(fraction)) = power.extra {
        if let Ok(mut stats) = world.get::<&mut Stats>(player) {
            healed = stats.heal((dealt.amount * fraction).floor());
        }
        if healed > 0.0 {
            ctx.log.line(format!("You drain {healed} health."));
        }
    }

    if dealt.amount > 0.0 {
        ctx.triggers.record(
            Trigger::OnHit,
            TriggerContext {
                damage: dealt.amount,
                power_id: Some(power.id.clone()),
                ..Default::default()
            },
        );
    }

    Resolved {
        damage: dealt.amount,
        healed,
        target_died: dealt.target_died,
    }
}

fn resolve_heal(world: &mut World, player: Entity, power: &Power, ctx: &mut TickContext) -> Resolved {
    let Ok(mut stats) = world.get::<&mut Stats>(player) else {
        return Resolved::default();
    };

    if matches!(power.extra, Some(PowerExtra::RestoresResource)) {
        let amount = (stats.max_resource * power.value).floor();
        let restored = stats.restore_resource(amount);
        ctx.log
            .line(format!("You use {} and recover {restored} resource.", power.name));
        Resolved::default()
    } else {
        let amount = (stats.max_health * power.value).floor();
        let healed = stats.heal(amount);
        ctx.log
            .line(format!("You use {} and heal for {healed}.", power.name));
        Resolved {
            healed,
            ..Default::default()
        }
    }
}

fn resolve_buff(world: &mut World, player: Entity, power: &Power, ctx: &mut TickContext) -> Resolved {
    let (stat, duration_ms) = match power.extra {
        Some(PowerExtra::BuffStat { stat, duration_ms }) => (stat, duration_ms),
        _ => (BuffStat::Power, DEFAULT_BUFF_DURATION_MS),
    };
    push_buff(
        world,
        player,
        Buff {
            stat,
            multiplier: power.value,
            remaining_ms: duration_ms,
            source: power.id.clone(),
        },
    );
    ctx.log.line(format!("You use {}.", power.name));
    Resolved::default()
}

fn resolve_debuff(world: &mut World, enemy: Option<Entity>, power: &Power, ctx: &mut TickContext) -> Resolved {
    let Some(enemy) = enemy else {
        return Resolved::default();
    };

    let application = match &power.extra {
        Some(PowerExtra::InflictStatus {
            kind,
            turns,
            damage,
            value,
        }) => StatusApplication {
            kind: kind.clone(),
            turns: *turns,
            damage: damage.or_else(|| kind.deals_damage().then_some(power.value)),
            value: *value,
        },
        _ => StatusApplication {
            kind: StatusKind::Other(power.name.to_lowercase()),
            turns: None,
            damage: None,
            value: Some(power.value),
        },
    };

    ctx.log.line(format!(
        "You use {} on {}.",
        power.name,
        enemy_name(world, enemy)
    ));
    inflict(world, enemy, &application, &power.id, ctx.log);
    Resolved::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::{spawn_enemy, spawn_player};
    use delve_core::enums::{CharacterClass, EnemyKind};
    use delve_core::types::EnemyId;

    #[test]
    fn test_combo_rules() {
        assert_eq!(next_combo(None, "a", 0, 5), 0, "First power starts no combo");
        assert_eq!(next_combo(Some("a"), "b", 0, 5), 1);
        assert_eq!(next_combo(Some("b"), "a", 1, 5), 2);
        assert_eq!(next_combo(Some("a"), "a", 3, 5), 0, "Repeat resets");
        assert_eq!(next_combo(Some("a"), "b", 5, 5), 5, "Capped");
    }

    #[test]
    fn test_target_required_for_damage_powers() {
        let mut world = World::new();
        let player = spawn_player(&mut world, CharacterClass::Warrior, 1);

        assert!(matches!(
            check_usable(&world, player, "power_strike"),
            Err(Rejection::NoTarget)
        ));
        assert!(check_usable(&world, player, "second_wind").is_ok());

        spawn_enemy(&mut world, EnemyKind::Goblin, EnemyId(1), 1);
        assert!(check_usable(&world, player, "power_strike").is_ok());
    }
}
