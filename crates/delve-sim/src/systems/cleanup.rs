//! Cleanup system: removes dead enemies after their dying linger and
//! reports how the encounter ended.

use hecs::{Entity, World};

use delve_core::components::{CombatFlags, Enemy, Player};
use delve_core::enums::GamePhase;

use crate::systems::TickContext;

/// Despawn enemies that finished dying. Returns the phase the encounter
/// moves to, if it ended this tick.
pub fn run(world: &mut World, ctx: &mut TickContext, despawn_buffer: &mut Vec<Entity>) -> Option<GamePhase> {
    despawn_buffer.clear();

    let player_dying = world
        .query_mut::<(&CombatFlags, &Player)>()
        .into_iter()
        .any(|(_, (flags, _))| flags.is_dying);
    if player_dying {
        return Some(GamePhase::Defeat);
    }

    let linger = ctx.balance.dying_linger_ms;
    for (entity, (flags, _enemy)) in world.query_mut::<(&mut CombatFlags, &Enemy)>() {
        if flags.is_dying {
            flags.dying_elapsed_ms += ctx.scaled_delta_ms;
            if flags.dying_elapsed_ms >= linger {
                despawn_buffer.push(entity);
            }
        }
    }

    let any_removed = !despawn_buffer.is_empty();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    let enemies_left = world.query_mut::<&Enemy>().into_iter().count();
    (any_removed && enemies_left == 0).then_some(GamePhase::Victory)
}
