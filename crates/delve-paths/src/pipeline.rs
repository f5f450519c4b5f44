//! Trigger → condition → cooldown → chance → effect.
//!
//! `evaluate` decides which effects fire for the triggers of one tick and
//! records cooldowns and counters on the path state. Actions that touch
//! combatants are returned for the simulation to apply.

use rand::Rng;

use delve_core::components::PathState;
use delve_core::enums::Trigger;

use crate::ability::{EffectAction, PathAbility};
use crate::condition::{check_condition, ConditionContext};
use crate::trigger::{TriggerContext, TriggerEvent};

/// An effect that passed every gate this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredEffect {
    pub ability_id: &'static str,
    pub ability_name: &'static str,
    pub trigger: Trigger,
    pub context: TriggerContext,
    pub action: EffectAction,
}

/// Run every recorded trigger through the player's abilities.
///
/// `proc_bonus` scales configured proc chances (fortune); the scaled chance
/// is capped at 1.0. Counter actions are applied to `path_state` as they
/// fire so later conditions in the same tick observe them.
pub fn evaluate(
    abilities: &[PathAbility],
    triggers: &[TriggerEvent],
    ctx: &ConditionContext,
    path_state: &mut PathState,
    rng: &mut impl Rng,
    proc_bonus: f64,
) -> Vec<TriggeredEffect> {
    let mut fired = Vec::new();
    let proc_bonus = if proc_bonus.is_finite() && proc_bonus > 0.0 {
        proc_bonus
    } else {
        1.0
    };

    for event in triggers {
        for ability in abilities {
            for effect in &ability.effects {
                if effect.trigger != event.trigger {
                    continue;
                }
                if let Some(condition) = &effect.condition {
                    if !check_condition(condition, ctx, path_state) {
                        continue;
                    }
                }
                if path_state.cooldown(ability.id) > 0.0 {
                    continue;
                }
                if let Some(chance) = effect.chance {
                    let chance = (chance * proc_bonus).clamp(0.0, 1.0);
                    if rng.gen::<f64>() >= chance {
                        continue;
                    }
                }

                if let Some(secs) = effect.cooldown_secs {
                    path_state
                        .cooldowns
                        .insert(ability.id.to_string(), secs * 1000.0);
                }
                if effect.action.is_path_local() {
                    apply_path_local(&effect.action, path_state);
                }

                tracing::debug!(ability = ability.id, trigger = ?event.trigger, "path ability fired");
                fired.push(TriggeredEffect {
                    ability_id: ability.id,
                    ability_name: ability.name,
                    trigger: event.trigger,
                    context: event.context.clone(),
                    action: effect.action.clone(),
                });
            }
        }
    }

    fired
}

fn apply_path_local(action: &EffectAction, path_state: &mut PathState) {
    match action {
        EffectAction::IncrementCounter(name) => {
            *path_state.counters.entry((*name).to_string()).or_insert(0) += 1;
        }
        EffectAction::ResetCounter(name) => {
            path_state.counters.insert((*name).to_string(), 0);
        }
        _ => {}
    }
}

/// Decrement every nonzero ability cooldown by `scaled_delta_ms`, floored at zero.
pub fn decay_cooldowns(path_state: &mut PathState, scaled_delta_ms: f64) {
    if !(scaled_delta_ms.is_finite() && scaled_delta_ms > 0.0) {
        return;
    }
    for remaining in path_state.cooldowns.values_mut() {
        if *remaining > 0.0 {
            *remaining = (*remaining - scaled_delta_ms).max(0.0);
        }
    }
}
