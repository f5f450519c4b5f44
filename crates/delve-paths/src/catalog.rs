//! Path and stance catalog.
//!
//! Each path is one arm of [`get_path`]; adding a path means adding a
//! `PathId` variant and its arm here.

use delve_core::enums::{BuffStat, CharacterClass, PathId, Stance, StatusKind, Trigger};

use crate::ability::{AbilityCondition, AbilityEffect, EffectAction, PathAbility};

/// Counter bumped by Berserker kills.
pub const RAMPAGE_COUNTER: &str = "rampage";

/// Counter bumped by Shadowdancer dodges.
pub const SHADOW_COUNTER: &str = "shadow";

/// A build path and the abilities it grants.
#[derive(Debug, Clone)]
pub struct PathDefinition {
    pub id: PathId,
    pub name: &'static str,
    pub class: CharacterClass,
    /// Passive paths offer stances instead of extra active effects.
    pub stances: &'static [Stance],
    pub abilities: Vec<PathAbility>,
}

/// Multiplicative stat re-weighting for a stance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StanceModifiers {
    pub power: f64,
    pub armor: f64,
    pub speed: f64,
    /// Flat fortune added after multipliers.
    pub fortune: f64,
}

impl Default for StanceModifiers {
    fn default() -> Self {
        Self {
            power: 1.0,
            armor: 1.0,
            speed: 1.0,
            fortune: 0.0,
        }
    }
}

/// Look up a path definition.
pub fn get_path(path: PathId) -> PathDefinition {
    match path {
        PathId::Berserker => PathDefinition {
            id: path,
            name: "Berserker",
            class: path.class(),
            stances: &[],
            abilities: berserker(),
        },
        PathId::Guardian => PathDefinition {
            id: path,
            name: "Guardian",
            class: path.class(),
            stances: &[Stance::Bulwark, Stance::Vengeance],
            abilities: guardian(),
        },
        PathId::Archmage => PathDefinition {
            id: path,
            name: "Archmage",
            class: path.class(),
            stances: &[],
            abilities: archmage(),
        },
        PathId::Spellblade => PathDefinition {
            id: path,
            name: "Spellblade",
            class: path.class(),
            stances: &[],
            abilities: spellblade(),
        },
        PathId::Assassin => PathDefinition {
            id: path,
            name: "Assassin",
            class: path.class(),
            stances: &[],
            abilities: assassin(),
        },
        PathId::Shadowdancer => PathDefinition {
            id: path,
            name: "Shadowdancer",
            class: path.class(),
            stances: &[Stance::Veil, Stance::Flurry],
            abilities: shadowdancer(),
        },
    }
}

/// Abilities granted by a path.
pub fn get_abilities(path: PathId) -> Vec<PathAbility> {
    get_path(path).abilities
}

/// Stat re-weighting for a stance.
pub fn stance_modifiers(stance: Stance) -> StanceModifiers {
    match stance {
        Stance::Bulwark => StanceModifiers {
            power: 0.85,
            armor: 1.4,
            ..Default::default()
        },
        Stance::Vengeance => StanceModifiers {
            power: 1.2,
            armor: 0.8,
            ..Default::default()
        },
        Stance::Veil => StanceModifiers {
            speed: 0.9,
            fortune: 5.0,
            ..Default::default()
        },
        Stance::Flurry => StanceModifiers {
            speed: 1.3,
            armor: 0.85,
            ..Default::default()
        },
    }
}

fn berserker() -> Vec<PathAbility> {
    vec![
        PathAbility {
            id: "blood_frenzy",
            name: "Blood Frenzy",
            effects: vec![AbilityEffect::on(Trigger::OnHit, EffectAction::BonusDamage(0.25))
                .when(AbilityCondition::HealthBelow(0.5))],
        },
        PathAbility {
            id: "executioner",
            name: "Executioner",
            effects: vec![AbilityEffect::on(Trigger::OnHit, EffectAction::BonusDamage(0.5))
                .when(AbilityCondition::EnemyHealthBelow(0.25))
                .chance(0.3)
                .cooldown(3.0)],
        },
        PathAbility {
            id: "rampage",
            name: "Rampage",
            effects: vec![
                AbilityEffect::on(Trigger::OnKill, EffectAction::IncrementCounter(RAMPAGE_COUNTER)),
                AbilityEffect::on(
                    Trigger::CombatStart,
                    EffectAction::Buff {
                        stat: BuffStat::Power,
                        multiplier: 1.25,
                        duration_ms: 8000.0,
                    },
                )
                .when(AbilityCondition::CounterAtLeast {
                    counter: RAMPAGE_COUNTER,
                    value: 3,
                }),
                AbilityEffect::on(Trigger::CombatStart, EffectAction::ResetCounter(RAMPAGE_COUNTER))
                    .when(AbilityCondition::CounterAtLeast {
                        counter: RAMPAGE_COUNTER,
                        value: 3,
                    }),
            ],
        },
    ]
}

fn guardian() -> Vec<PathAbility> {
    vec![
        PathAbility {
            id: "retaliation",
            name: "Retaliation",
            effects: vec![AbilityEffect::on(Trigger::OnDamaged, EffectAction::BonusDamage(0.5))
                .chance(0.35)],
        },
        PathAbility {
            id: "last_stand",
            name: "Last Stand",
            effects: vec![AbilityEffect::on(Trigger::OnDamaged, EffectAction::Heal(0.2))
                .when(AbilityCondition::HealthAtOrBelow(0.3))
                .cooldown(20.0)],
        },
        PathAbility {
            id: "steady_footing",
            name: "Steady Footing",
            effects: vec![AbilityEffect::on(Trigger::OnDodge, EffectAction::RestoreResource(5.0))],
        },
    ]
}

fn archmage() -> Vec<PathAbility> {
    vec![
        PathAbility {
            id: "arcane_echo",
            name: "Arcane Echo",
            effects: vec![
                AbilityEffect::on(Trigger::OnPowerUse, EffectAction::ReduceCooldowns(2000.0))
                    .chance(0.2),
            ],
        },
        PathAbility {
            id: "mana_siphon",
            name: "Mana Siphon",
            effects: vec![AbilityEffect::on(Trigger::OnHit, EffectAction::RestoreResource(3.0))],
        },
        PathAbility {
            id: "overload",
            name: "Overload",
            effects: vec![AbilityEffect::on(
                Trigger::OnCrit,
                EffectAction::InflictStatus {
                    kind: StatusKind::Stun,
                    turns: Some(1),
                    damage: None,
                    value: None,
                },
            )
            .cooldown(4.0)],
        },
    ]
}

fn spellblade() -> Vec<PathAbility> {
    vec![
        PathAbility {
            id: "frost_edge",
            name: "Frost Edge",
            effects: vec![AbilityEffect::on(
                Trigger::OnHit,
                EffectAction::InflictStatus {
                    kind: StatusKind::Slow,
                    turns: Some(2),
                    damage: None,
                    value: Some(0.3),
                },
            )
            .chance(0.25)],
        },
        PathAbility {
            id: "spell_strike",
            name: "Spell Strike",
            effects: vec![AbilityEffect::on(
                Trigger::OnPowerUse,
                EffectAction::Buff {
                    stat: BuffStat::Power,
                    multiplier: 1.15,
                    duration_ms: 3000.0,
                },
            )
            .cooldown(6.0)],
        },
        PathAbility {
            id: "battle_focus",
            name: "Battle Focus",
            effects: vec![AbilityEffect::on(
                Trigger::CombatStart,
                EffectAction::RestoreResource(20.0),
            )],
        },
    ]
}

fn assassin() -> Vec<PathAbility> {
    vec![
        PathAbility {
            id: "venom_blades",
            name: "Venom Blades",
            effects: vec![AbilityEffect::on(
                Trigger::OnHit,
                EffectAction::InflictStatus {
                    kind: StatusKind::Poison,
                    turns: Some(3),
                    damage: Some(3.0),
                    value: None,
                },
            )
            .chance(0.3)],
        },
        PathAbility {
            id: "exploit_weakness",
            name: "Exploit Weakness",
            effects: vec![AbilityEffect::on(Trigger::OnHit, EffectAction::BonusDamage(0.2))
                .when(AbilityCondition::EnemyHasStatus)],
        },
        PathAbility {
            id: "killing_spree",
            name: "Killing Spree",
            effects: vec![AbilityEffect::on(Trigger::OnKill, EffectAction::Heal(0.15))],
        },
    ]
}

fn shadowdancer() -> Vec<PathAbility> {
    vec![
        PathAbility {
            id: "riposte",
            name: "Riposte",
            effects: vec![
                AbilityEffect::on(Trigger::OnDodge, EffectAction::IncrementCounter(SHADOW_COUNTER)),
                AbilityEffect::on(Trigger::OnDodge, EffectAction::BonusDamage(1.0)).cooldown(2.0),
            ],
        },
        PathAbility {
            id: "hemorrhage",
            name: "Hemorrhage",
            effects: vec![AbilityEffect::on(
                Trigger::OnCrit,
                EffectAction::InflictStatus {
                    kind: StatusKind::Bleed,
                    turns: Some(3),
                    damage: Some(4.0),
                    value: None,
                },
            )],
        },
        PathAbility {
            id: "momentum",
            name: "Momentum",
            effects: vec![AbilityEffect::on(Trigger::OnHit, EffectAction::BonusDamage(0.15))
                .when(AbilityCondition::ComboAtLeast(2))],
        },
        PathAbility {
            id: "umbral_surge",
            name: "Umbral Surge",
            effects: vec![
                AbilityEffect::on(
                    Trigger::TurnStart,
                    EffectAction::Buff {
                        stat: BuffStat::Speed,
                        multiplier: 1.2,
                        duration_ms: 4000.0,
                    },
                )
                .when(AbilityCondition::CounterAtLeast {
                    counter: SHADOW_COUNTER,
                    value: 3,
                }),
                AbilityEffect::on(Trigger::TurnStart, EffectAction::ResetCounter(SHADOW_COUNTER))
                    .when(AbilityCondition::CounterAtLeast {
                        counter: SHADOW_COUNTER,
                        value: 3,
                    }),
            ],
        },
    ]
}
