//! Ability definitions. Immutable once built by the catalog.

use delve_core::enums::{BuffStat, StatusKind, Trigger};

/// A named ability granted by a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathAbility {
    /// Key for the per-player cooldown map.
    pub id: &'static str,
    pub name: &'static str,
    pub effects: Vec<AbilityEffect>,
}

/// One rule of an ability. All effects of an ability share its cooldown.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityEffect {
    pub trigger: Trigger,
    pub condition: Option<AbilityCondition>,
    /// Base proc chance (0.0 - 1.0), scaled by fortune when rolled.
    pub chance: Option<f64>,
    /// Ability cooldown set when this effect fires (seconds).
    pub cooldown_secs: Option<f64>,
    pub action: EffectAction,
}

impl AbilityEffect {
    /// Unconditional effect with no chance roll or cooldown.
    pub fn on(trigger: Trigger, action: EffectAction) -> Self {
        Self {
            trigger,
            condition: None,
            chance: None,
            cooldown_secs: None,
            action,
        }
    }

    pub fn when(mut self, condition: AbilityCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn cooldown(mut self, secs: f64) -> Self {
        self.cooldown_secs = Some(secs);
        self
    }
}

/// Predicates over the two combatants and the player's path state.
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityCondition {
    /// Player health ratio strictly below the threshold.
    HealthBelow(f64),
    /// Player health ratio strictly above the threshold.
    HealthAbove(f64),
    /// Player health ratio at or below the threshold.
    HealthAtOrBelow(f64),
    /// Enemy health ratio strictly below the threshold.
    EnemyHealthBelow(f64),
    /// Player combo count at least this high.
    ComboAtLeast(u32),
    /// Named path counter at least this high.
    CounterAtLeast { counter: &'static str, value: u32 },
    /// Enemy currently has any status effect.
    EnemyHasStatus,
}

/// What an effect does once it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectAction {
    /// Extra damage to the enemy as a fraction of the triggering damage.
    BonusDamage(f64),
    /// Fixed extra damage to the enemy.
    FlatDamage(f64),
    /// Heal the player for a fraction of max health.
    Heal(f64),
    /// Restore a flat amount of resource.
    RestoreResource(f64),
    /// Apply a status to the enemy.
    InflictStatus {
        kind: StatusKind,
        turns: Option<u32>,
        damage: Option<f64>,
        value: Option<f64>,
    },
    /// Timed multiplicative buff on the player.
    Buff {
        stat: BuffStat,
        multiplier: f64,
        duration_ms: f64,
    },
    /// Bump a named counter by one.
    IncrementCounter(&'static str),
    /// Reset a named counter to zero.
    ResetCounter(&'static str),
    /// Shorten every power cooldown by this many milliseconds.
    ReduceCooldowns(f64),
}

impl EffectAction {
    /// Whether the pipeline resolves this action against path state itself.
    pub fn is_path_local(&self) -> bool {
        matches!(
            self,
            EffectAction::IncrementCounter(_) | EffectAction::ResetCounter(_)
        )
    }
}
