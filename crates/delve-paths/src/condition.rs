//! Ability condition evaluation.
//!
//! Missing data never panics: a condition that needs a combatant the
//! context does not have evaluates to `false`.

use delve_core::components::PathState;
use delve_core::types::ratio;

use crate::ability::AbilityCondition;

/// Health of one combatant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub health: f64,
    pub max_health: f64,
}

impl Vitals {
    fn ratio(&self) -> Option<f64> {
        ratio(self.health, self.max_health)
    }
}

/// Everything a condition may look at besides path counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionContext {
    pub player: Option<Vitals>,
    pub enemy: Option<Vitals>,
    pub combo_count: u32,
    pub enemy_has_status: bool,
}

/// Evaluate one condition.
pub fn check_condition(
    condition: &AbilityCondition,
    ctx: &ConditionContext,
    path_state: &PathState,
) -> bool {
    let player_ratio = ctx.player.as_ref().and_then(Vitals::ratio);
    let enemy_ratio = ctx.enemy.as_ref().and_then(Vitals::ratio);

    match condition {
        AbilityCondition::HealthBelow(threshold) => player_ratio.is_some_and(|r| r < *threshold),
        AbilityCondition::HealthAbove(threshold) => player_ratio.is_some_and(|r| r > *threshold),
        AbilityCondition::HealthAtOrBelow(threshold) => {
            player_ratio.is_some_and(|r| r <= *threshold)
        }
        AbilityCondition::EnemyHealthBelow(threshold) => {
            enemy_ratio.is_some_and(|r| r < *threshold)
        }
        AbilityCondition::ComboAtLeast(count) => ctx.combo_count >= *count,
        AbilityCondition::CounterAtLeast { counter, value } => {
            path_state.counter(counter) >= *value
        }
        AbilityCondition::EnemyHasStatus => ctx.enemy.is_some() && ctx.enemy_has_status,
    }
}
