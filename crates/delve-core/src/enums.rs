//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side of the fight a combatant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    Player,
    Enemy,
}

/// Status condition kinds.
///
/// `Other` carries conditions introduced by content that the engine has no
/// dedicated behaviour for; they still track duration and show up in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Poison,
    Stun,
    Slow,
    Bleed,
    Other(String),
}

impl StatusKind {
    /// Display name used in logs.
    pub fn name(&self) -> &str {
        match self {
            StatusKind::Poison => "poison",
            StatusKind::Stun => "stun",
            StatusKind::Slow => "slow",
            StatusKind::Bleed => "bleed",
            StatusKind::Other(name) => name,
        }
    }

    /// Whether this status deals damage on every status turn.
    pub fn deals_damage(&self) -> bool {
        matches!(self, StatusKind::Poison | StatusKind::Bleed)
    }
}

/// What a power does when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerEffect {
    Damage,
    Heal,
    Buff,
    Debuff,
}

/// UI grouping for powers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerCategory {
    #[default]
    Offense,
    Defense,
    Utility,
}

/// Stats a timed buff can scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffStat {
    Power,
    Armor,
    Speed,
}

/// Named combat events that path abilities subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// The player's auto-attack or damaging power connected.
    OnHit,
    /// The player landed a critical hit.
    OnCrit,
    /// The enemy died this tick.
    OnKill,
    /// The player dodged an enemy attack.
    OnDodge,
    /// The player took damage.
    OnDamaged,
    /// The player used a power.
    OnPowerUse,
    /// An encounter began.
    CombatStart,
    /// The player's attack timer fired.
    TurnStart,
}

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No encounter running.
    #[default]
    Exploring,
    /// Encounter in progress; systems run.
    Combat,
    /// Encounter frozen; no time accumulates.
    Paused,
    /// The enemy died and has been removed.
    Victory,
    /// The player died.
    Defeat,
}

/// Global combat-speed setting chosen by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatSpeed {
    #[default]
    Normal,
    Double,
    Triple,
}

impl CombatSpeed {
    /// Multiplier applied to every elapsed delta.
    pub fn multiplier(self) -> f64 {
        match self {
            CombatSpeed::Normal => 1.0,
            CombatSpeed::Double => 2.0,
            CombatSpeed::Triple => 3.0,
        }
    }
}

/// Playable classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
}

/// Enemy archetypes available to encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Skeleton,
    OrcBrute,
    CaveSpider,
    Wraith,
}

/// Build-defining specializations, two per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathId {
    Berserker,
    Guardian,
    Archmage,
    Spellblade,
    Assassin,
    Shadowdancer,
}

impl PathId {
    /// The class that may choose this path.
    pub fn class(self) -> CharacterClass {
        match self {
            PathId::Berserker | PathId::Guardian => CharacterClass::Warrior,
            PathId::Archmage | PathId::Spellblade => CharacterClass::Mage,
            PathId::Assassin | PathId::Shadowdancer => CharacterClass::Rogue,
        }
    }
}

/// Mutually exclusive modes of the passive paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    /// Guardian: heavy armor, reduced power.
    Bulwark,
    /// Guardian: trades armor for power.
    Vengeance,
    /// Shadowdancer: evasive, slower strikes.
    Veil,
    /// Shadowdancer: rapid strikes, thinner guard.
    Flurry,
}

impl Stance {
    /// The path that grants this stance.
    pub fn path(self) -> PathId {
        match self {
            Stance::Bulwark | Stance::Vengeance => PathId::Guardian,
            Stance::Veil | Stance::Flurry => PathId::Shadowdancer,
        }
    }
}
