//! Buff decay and effective-stat recalculation.

use hecs::{Entity, World};

use delve_core::components::{ActiveBuffs, BaseStats, Buff, PathState, Player, Stats};
use delve_core::enums::{BuffStat, Stance};
use delve_paths::catalog::stance_modifiers;

use crate::systems::TickContext;

fn buff_product(buffs: &[Buff], stat: BuffStat) -> f64 {
    buffs
        .iter()
        .filter(|b| b.stat == stat && b.multiplier.is_finite())
        .map(|b| b.multiplier)
        .product()
}

/// Effective stats from base × stance × buffs.
///
/// Current health and resource are preserved, clamped to the new maxima.
pub fn recalculate_stats(base: &BaseStats, current: &Stats, buffs: &[Buff], stance: Option<Stance>) -> Stats {
    let stance = stance.map(stance_modifiers).unwrap_or_default();

    Stats {
        health: current.health.min(base.max_health),
        max_health: base.max_health,
        power: base.power * stance.power * buff_product(buffs, BuffStat::Power),
        armor: base.armor * stance.armor * buff_product(buffs, BuffStat::Armor),
        speed: base.speed * stance.speed * buff_product(buffs, BuffStat::Speed),
        resource: current.resource.min(base.max_resource),
        max_resource: base.max_resource,
        fortune: base.fortune + stance.fortune,
    }
}

/// Recompute an entity's [`Stats`] from its base line, buffs and stance.
pub fn refresh_stats(world: &mut World, entity: Entity) {
    let Ok(base) = world.get::<&BaseStats>(entity).map(|b| *b) else {
        tracing::warn!(?entity, "cannot recalculate stats without a base line");
        return;
    };
    let buffs = world
        .get::<&ActiveBuffs>(entity)
        .map(|b| b.buffs.clone())
        .unwrap_or_default();
    let stance = world.get::<&PathState>(entity).ok().and_then(|p| p.stance);

    if let Ok(mut stats) = world.get::<&mut Stats>(entity) {
        *stats = recalculate_stats(&base, &stats, &buffs, stance);
    }
}

/// Add a timed buff and recompute stats.
pub fn push_buff(world: &mut World, entity: Entity, buff: Buff) {
    match world.get::<&mut ActiveBuffs>(entity) {
        Ok(mut active) => active.buffs.push(buff),
        Err(_) => {
            tracing::warn!(?entity, "buff target has no buff list");
            return;
        }
    }
    refresh_stats(world, entity);
}

/// Tick down every buff; expired buffs are removed and stats recomputed.
pub fn run(world: &mut World, ctx: &mut TickContext) {
    let delta = ctx.scaled_delta_ms;
    if !(delta.is_finite() && delta > 0.0) {
        return;
    }

    let mut expired = Vec::new();
    for (entity, active) in world.query_mut::<&mut ActiveBuffs>() {
        let before = active.buffs.len();
        for buff in &mut active.buffs {
            buff.remaining_ms -= delta;
        }
        active.buffs.retain(|b| b.remaining_ms > 0.0);
        if active.buffs.len() != before {
            expired.push(entity);
        }
    }

    for entity in expired {
        refresh_stats(world, entity);
        if world.get::<&Player>(entity).is_ok() {
            ctx.log.line("A buff on you fades.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseStats {
        BaseStats {
            max_health: 100.0,
            power: 10.0,
            armor: 5.0,
            speed: 10.0,
            max_resource: 50.0,
            fortune: 4.0,
        }
    }

    fn buff(stat: BuffStat, multiplier: f64) -> Buff {
        Buff {
            stat,
            multiplier,
            remaining_ms: 1000.0,
            source: "test".into(),
        }
    }

    #[test]
    fn test_buffs_multiply() {
        let current = Stats {
            health: 60.0,
            resource: 20.0,
            ..Default::default()
        };
        let buffs = [buff(BuffStat::Power, 1.5), buff(BuffStat::Power, 2.0), buff(BuffStat::Speed, 1.2)];
        let stats = recalculate_stats(&base(), &current, &buffs, None);
        assert_eq!(stats.power, 30.0);
        assert_eq!(stats.speed, 12.0);
        assert_eq!(stats.armor, 5.0);
        assert_eq!(stats.health, 60.0, "Health preserved");
        assert_eq!(stats.resource, 20.0);
    }

    #[test]
    fn test_health_clamped_to_new_max() {
        let current = Stats {
            health: 150.0,
            resource: 80.0,
            ..Default::default()
        };
        let stats = recalculate_stats(&base(), &current, &[], None);
        assert_eq!(stats.health, 100.0);
        assert_eq!(stats.resource, 50.0);
    }

    #[test]
    fn test_stance_reweights() {
        let current = Stats {
            health: 100.0,
            ..Default::default()
        };
        let bulwark = recalculate_stats(&base(), &current, &[], Some(Stance::Bulwark));
        assert_eq!(bulwark.armor, 7.0);
        assert_eq!(bulwark.power, 8.5);

        let veil = recalculate_stats(&base(), &current, &[], Some(Stance::Veil));
        assert_eq!(veil.fortune, 9.0);
    }
}
