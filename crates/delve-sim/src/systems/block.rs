//! Player block: raise on command, expire and recover over scaled time.

use hecs::World;

use delve_core::components::{CombatFlags, Player};
use delve_core::config::BalanceConfig;

use crate::combat_log::TickLog;
use crate::systems::{player_entity, TickContext};

/// Raise a block if it is off cooldown. Returns whether it was raised.
pub fn activate(world: &mut World, balance: &BalanceConfig, log: &mut TickLog) -> bool {
    let Some(player) = player_entity(world) else {
        tracing::warn!("block requested with no player");
        return false;
    };
    let Ok(mut flags) = world.get::<&mut CombatFlags>(player) else {
        return false;
    };

    if flags.is_dying || flags.is_blocking || flags.block_cooldown_ms > 0.0 {
        tracing::debug!(
            blocking = flags.is_blocking,
            cooldown_ms = flags.block_cooldown_ms,
            "block rejected"
        );
        return false;
    }

    flags.is_blocking = true;
    flags.block_remaining_ms = balance.block_duration_ms;
    flags.block_cooldown_ms = balance.block_cooldown_ms;
    log.line("You raise your guard.");
    true
}

/// Count down the active block window and the block cooldown.
pub fn run(world: &mut World, ctx: &mut TickContext) {
    let delta = ctx.scaled_delta_ms;
    if !(delta.is_finite() && delta > 0.0) {
        return;
    }

    for (_entity, (flags, _player)) in world.query_mut::<(&mut CombatFlags, &Player)>() {
        if flags.block_cooldown_ms > 0.0 {
            flags.block_cooldown_ms = (flags.block_cooldown_ms - delta).max(0.0);
        }
        if flags.is_blocking {
            flags.block_remaining_ms -= delta;
            if flags.block_remaining_ms <= 0.0 {
                flags.is_blocking = false;
                flags.block_remaining_ms = 0.0;
                ctx.log.line("You lower your guard.");
            }
        }
    }
}
