//! Snapshot system: queries the world and builds a complete `CombatSnapshot`.
//!
//! Read-only. Every call produces a fresh value.

use hecs::{Entity, World};

use delve_core::components::*;
use delve_core::enums::*;
use delve_core::events::{CombatEvent, CombatLogLine};
use delve_core::state::*;
use delve_core::types::{ratio, SimTime};
use delve_paths::catalog::get_abilities;

use crate::systems::death::xp_to_next;
use crate::systems::powers::{has_living_target, needs_target};
use crate::systems::{enemy_entity, player_entity};

/// Build a complete snapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: SimTime,
    phase: GamePhase,
    combat_speed: CombatSpeed,
    events: Vec<CombatEvent>,
    log: Vec<CombatLogLine>,
) -> CombatSnapshot {
    let player = player_entity(world);
    let enemy = enemy_entity(world);

    CombatSnapshot {
        time,
        phase,
        combat_speed,
        player: player.and_then(|p| build_combatant(world, p)),
        enemy: enemy.and_then(|e| build_combatant(world, e)),
        powers: player.map_or_else(Vec::new, |p| build_powers(world, p, phase)),
        path: player.and_then(|p| build_path(world, p)),
        progress: player.and_then(|p| build_progress(world, p)),
        events,
        log,
    }
}

fn build_combatant(world: &World, entity: Entity) -> Option<CombatantView> {
    let mut query = world
        .query_one::<(
            &Combatant,
            &Stats,
            &StatusEffects,
            &ActiveBuffs,
            &CombatFlags,
            &AttackTimer,
            Option<&EnemyInfo>,
        )>(entity)
        .ok()?;
    let (combatant, stats, statuses, buffs, flags, timer, info) = query.get()?;

    Some(CombatantView {
        name: combatant.name.clone(),
        kind: combatant.kind,
        enemy_id: info.map(|i| i.id),
        stats: *stats,
        statuses: statuses.effects.clone(),
        buffs: buffs.buffs.clone(),
        is_dying: flags.is_dying,
        is_blocking: flags.is_blocking,
        combo_count: flags.combo_count,
        attack_progress: ratio(timer.accumulated_ms, timer.attack_interval_ms)
            .map_or(0.0, |r| r.clamp(0.0, 1.0)),
    })
}

fn build_powers(world: &World, player: Entity, phase: GamePhase) -> Vec<PowerView> {
    let Ok(book) = world.get::<&PowerBook>(player) else {
        return Vec::new();
    };
    let resource = world.get::<&Stats>(player).map_or(0.0, |s| s.resource);
    let dying = world
        .get::<&CombatFlags>(player)
        .is_ok_and(|flags| flags.is_dying);
    let in_combat = phase == GamePhase::Combat;
    let target_alive = has_living_target(world);

    book.powers
        .iter()
        .map(|power| PowerView {
            id: power.id.clone(),
            name: power.name.clone(),
            category: power.category,
            resource_cost: power.resource_cost,
            cooldown_ms: power.cooldown_ms,
            current_cooldown_ms: power.current_cooldown_ms,
            usable: in_combat
                && !dying
                && power.current_cooldown_ms <= 0.0
                && resource >= power.resource_cost
                && (target_alive || !needs_target(power.effect)),
        })
        .collect()
}

fn build_path(world: &World, player: Entity) -> Option<PathView> {
    let state = world.get::<&PathState>(player).ok()?;
    let path = state.path?;

    Some(PathView {
        path,
        stance: state.stance,
        abilities: get_abilities(path)
            .into_iter()
            .map(|ability| AbilityView {
                id: ability.id.to_string(),
                name: ability.name.to_string(),
                cooldown_remaining_ms: state.cooldown(ability.id),
            })
            .collect(),
    })
}

fn build_progress(world: &World, player: Entity) -> Option<ProgressView> {
    let progress = world.get::<&Progress>(player).ok()?;
    Some(ProgressView {
        class: progress.class,
        level: progress.level,
        xp: progress.xp,
        xp_to_next: xp_to_next(progress.level),
        gold: progress.gold,
        kills: progress.kills,
    })
}
