//! Entity spawn factories: class templates, power books and enemy templates.

use hecs::{Entity, World};

use delve_core::components::*;
use delve_core::constants::ENEMY_LEVEL_SCALING;
use delve_core::enums::*;
use delve_core::types::EnemyId;

/// Errors raised while resolving setup input by name.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("unknown character class `{0}`")]
    UnknownClass(String),

    #[error("unknown enemy `{0}`")]
    UnknownEnemy(String),

    #[error("unknown path `{0}`")]
    UnknownPath(String),
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_ascii_lowercase()
}

pub fn parse_class(name: &str) -> Result<CharacterClass, SetupError> {
    match normalize(name).as_str() {
        "warrior" => Ok(CharacterClass::Warrior),
        "mage" => Ok(CharacterClass::Mage),
        "rogue" => Ok(CharacterClass::Rogue),
        _ => Err(SetupError::UnknownClass(name.to_string())),
    }
}

pub fn parse_enemy(name: &str) -> Result<EnemyKind, SetupError> {
    match normalize(name).as_str() {
        "goblin" => Ok(EnemyKind::Goblin),
        "skeleton" => Ok(EnemyKind::Skeleton),
        "orcbrute" | "orc" => Ok(EnemyKind::OrcBrute),
        "cavespider" | "spider" => Ok(EnemyKind::CaveSpider),
        "wraith" => Ok(EnemyKind::Wraith),
        _ => Err(SetupError::UnknownEnemy(name.to_string())),
    }
}

pub fn parse_path(name: &str) -> Result<PathId, SetupError> {
    match normalize(name).as_str() {
        "berserker" => Ok(PathId::Berserker),
        "guardian" => Ok(PathId::Guardian),
        "archmage" => Ok(PathId::Archmage),
        "spellblade" => Ok(PathId::Spellblade),
        "assassin" => Ok(PathId::Assassin),
        "shadowdancer" => Ok(PathId::Shadowdancer),
        _ => Err(SetupError::UnknownPath(name.to_string())),
    }
}

// ---- Classes ----

pub fn class_name(class: CharacterClass) -> &'static str {
    match class {
        CharacterClass::Warrior => "Warrior",
        CharacterClass::Mage => "Mage",
        CharacterClass::Rogue => "Rogue",
    }
}

/// Level 1 stat line.
pub fn class_base_stats(class: CharacterClass) -> BaseStats {
    match class {
        CharacterClass::Warrior => BaseStats {
            max_health: 120.0,
            power: 9.0,
            armor: 4.0,
            speed: 10.0,
            max_resource: 50.0,
            fortune: 5.0,
        },
        CharacterClass::Mage => BaseStats {
            max_health: 80.0,
            power: 12.0,
            armor: 2.0,
            speed: 9.0,
            max_resource: 100.0,
            fortune: 6.0,
        },
        CharacterClass::Rogue => BaseStats {
            max_health: 95.0,
            power: 10.0,
            armor: 3.0,
            speed: 13.0,
            max_resource: 60.0,
            fortune: 10.0,
        },
    }
}

/// Stats gained per level.
pub fn class_growth(class: CharacterClass) -> BaseStats {
    match class {
        CharacterClass::Warrior => BaseStats {
            max_health: 12.0,
            power: 1.5,
            armor: 0.5,
            speed: 0.0,
            max_resource: 5.0,
            fortune: 0.5,
        },
        CharacterClass::Mage => BaseStats {
            max_health: 8.0,
            power: 2.0,
            armor: 0.25,
            speed: 0.0,
            max_resource: 10.0,
            fortune: 0.5,
        },
        CharacterClass::Rogue => BaseStats {
            max_health: 10.0,
            power: 1.5,
            armor: 0.35,
            speed: 0.2,
            max_resource: 5.0,
            fortune: 1.0,
        },
    }
}

/// Add one level of growth to a base stat line.
pub fn grow(base: &BaseStats, growth: &BaseStats) -> BaseStats {
    BaseStats {
        max_health: base.max_health + growth.max_health,
        power: base.power + growth.power,
        armor: base.armor + growth.armor,
        speed: base.speed + growth.speed,
        max_resource: base.max_resource + growth.max_resource,
        fortune: base.fortune + growth.fortune,
    }
}

/// Base stats for a class at `level`.
pub fn base_stats_at_level(class: CharacterClass, level: u32) -> BaseStats {
    let growth = class_growth(class);
    (1..level.max(1)).fold(class_base_stats(class), |base, _| grow(&base, &growth))
}

/// Effective stats at full health and resource.
pub fn full_stats(base: &BaseStats) -> Stats {
    Stats {
        health: base.max_health,
        max_health: base.max_health,
        power: base.power,
        armor: base.armor,
        speed: base.speed,
        resource: base.max_resource,
        max_resource: base.max_resource,
        fortune: base.fortune,
    }
}

#[allow(clippy::too_many_arguments)]
fn power(
    id: &str,
    name: &str,
    effect: PowerEffect,
    value: f64,
    resource_cost: f64,
    cooldown_ms: f64,
    category: PowerCategory,
    extra: Option<PowerExtra>,
) -> Power {
    Power {
        id: id.to_string(),
        name: name.to_string(),
        resource_cost,
        cooldown_ms,
        current_cooldown_ms: 0.0,
        effect,
        value,
        category,
        extra,
    }
}

/// Starting powers for a class.
pub fn class_power_book(class: CharacterClass) -> PowerBook {
    use PowerCategory::{Defense, Offense, Utility};
    use PowerEffect::{Damage, Debuff, Heal};

    let powers = match class {
        CharacterClass::Warrior => vec![
            power("power_strike", "Power Strike", Damage, 1.5, 10.0, 4000.0, Offense, None),
            power(
                "bloodthirst",
                "Bloodthirst",
                Damage,
                1.2,
                15.0,
                6000.0,
                Offense,
                Some(PowerExtra::LifeSteal(0.3)),
            ),
            power(
                "battle_cry",
                "Battle Cry",
                PowerEffect::Buff,
                1.3,
                20.0,
                12000.0,
                Utility,
                Some(PowerExtra::BuffStat {
                    stat: BuffStat::Power,
                    duration_ms: 6000.0,
                }),
            ),
            power("second_wind", "Second Wind", Heal, 0.25, 20.0, 15000.0, Defense, None),
        ],
        CharacterClass::Mage => vec![
            power("fireball", "Fireball", Damage, 1.8, 20.0, 3000.0, Offense, None),
            power(
                "frost_nova",
                "Frost Nova",
                Debuff,
                0.0,
                15.0,
                8000.0,
                Utility,
                Some(PowerExtra::InflictStatus {
                    kind: StatusKind::Slow,
                    turns: Some(3),
                    damage: None,
                    value: Some(0.4),
                }),
            ),
            power(
                "arcane_shield",
                "Arcane Shield",
                PowerEffect::Buff,
                1.5,
                25.0,
                12000.0,
                Defense,
                Some(PowerExtra::BuffStat {
                    stat: BuffStat::Armor,
                    duration_ms: 6000.0,
                }),
            ),
            power(
                "meditate",
                "Meditate",
                Heal,
                0.3,
                0.0,
                12000.0,
                Utility,
                Some(PowerExtra::RestoresResource),
            ),
        ],
        CharacterClass::Rogue => vec![
            power("backstab", "Backstab", Damage, 1.6, 15.0, 3000.0, Offense, None),
            power(
                "poison_blade",
                "Poison Blade",
                Debuff,
                4.0,
                10.0,
                7000.0,
                Offense,
                Some(PowerExtra::InflictStatus {
                    kind: StatusKind::Poison,
                    turns: Some(4),
                    damage: None,
                    value: None,
                }),
            ),
            power(
                "evasion",
                "Evasion",
                PowerEffect::Buff,
                1.3,
                20.0,
                10000.0,
                Defense,
                Some(PowerExtra::BuffStat {
                    stat: BuffStat::Speed,
                    duration_ms: 5000.0,
                }),
            ),
            power("quick_slash", "Quick Slash", Damage, 1.0, 5.0, 1500.0, Offense, None),
        ],
    };

    PowerBook { powers }
}

/// Spawn the player at full health for `class` and `level`.
pub fn spawn_player(world: &mut World, class: CharacterClass, level: u32) -> Entity {
    let level = level.max(1);
    let base = base_stats_at_level(class, level);

    world.spawn((
        Player,
        Combatant {
            kind: CombatantKind::Player,
            name: "You".to_string(),
        },
        full_stats(&base),
        base,
        ActiveBuffs::default(),
        StatusEffects::default(),
        Immunities::default(),
        CombatFlags::default(),
        AttackTimer::default(),
        class_power_book(class),
        PathState::default(),
        Progress {
            class,
            level,
            xp: 0,
            gold: 0,
            kills: 0,
        },
    ))
}

// ---- Enemies ----

/// Static description of an enemy archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub base: BaseStats,
    pub xp_reward: u64,
    pub gold_reward: u64,
    pub immunities: Vec<StatusKind>,
}

fn enemy_stats(max_health: f64, power: f64, armor: f64, speed: f64, fortune: f64) -> BaseStats {
    BaseStats {
        max_health,
        power,
        armor,
        speed,
        max_resource: 0.0,
        fortune,
    }
}

pub fn enemy_template(kind: EnemyKind) -> EnemyTemplate {
    match kind {
        EnemyKind::Goblin => EnemyTemplate {
            name: "Goblin",
            base: enemy_stats(40.0, 6.0, 2.0, 11.0, 3.0),
            xp_reward: 20,
            gold_reward: 8,
            immunities: Vec::new(),
        },
        EnemyKind::Skeleton => EnemyTemplate {
            name: "Skeleton",
            base: enemy_stats(55.0, 8.0, 4.0, 8.0, 0.0),
            xp_reward: 30,
            gold_reward: 12,
            immunities: vec![StatusKind::Poison, StatusKind::Bleed],
        },
        EnemyKind::OrcBrute => EnemyTemplate {
            name: "Orc Brute",
            base: enemy_stats(90.0, 11.0, 5.0, 7.0, 2.0),
            xp_reward: 45,
            gold_reward: 20,
            immunities: Vec::new(),
        },
        EnemyKind::CaveSpider => EnemyTemplate {
            name: "Cave Spider",
            base: enemy_stats(35.0, 5.0, 1.0, 14.0, 6.0),
            xp_reward: 18,
            gold_reward: 6,
            immunities: Vec::new(),
        },
        EnemyKind::Wraith => EnemyTemplate {
            name: "Wraith",
            base: enemy_stats(60.0, 10.0, 3.0, 10.0, 8.0),
            xp_reward: 40,
            gold_reward: 18,
            immunities: vec![StatusKind::Bleed, StatusKind::Slow],
        },
    }
}

/// Template stats scaled to the player's level.
pub fn scaled_enemy_stats(base: &BaseStats, level: u32) -> BaseStats {
    let factor = 1.0 + ENEMY_LEVEL_SCALING * f64::from(level.max(1) - 1);
    BaseStats {
        max_health: (base.max_health * factor).round(),
        power: base.power * factor,
        armor: base.armor * factor,
        ..*base
    }
}

/// Spawn an enemy at full health, scaled to `level`.
pub fn spawn_enemy(world: &mut World, kind: EnemyKind, id: EnemyId, level: u32) -> Entity {
    let template = enemy_template(kind);
    let base = scaled_enemy_stats(&template.base, level);
    let factor = 1.0 + ENEMY_LEVEL_SCALING * f64::from(level.max(1) - 1);

    world.spawn((
        Enemy,
        Combatant {
            kind: CombatantKind::Enemy,
            name: template.name.to_string(),
        },
        full_stats(&base),
        base,
        ActiveBuffs::default(),
        StatusEffects::default(),
        Immunities {
            kinds: template.immunities,
        },
        CombatFlags::default(),
        AttackTimer::default(),
        EnemyInfo {
            id,
            kind,
            xp_reward: (template.xp_reward as f64 * factor).round() as u64,
            gold_reward: template.gold_reward,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warrior_base_line() {
        let base = class_base_stats(CharacterClass::Warrior);
        assert_eq!(base.max_health, 120.0);
        assert_eq!(base.power, 9.0);
        assert_eq!(base.armor, 4.0);
        assert_eq!(base.speed, 10.0);
        assert_eq!(base.max_resource, 50.0);
        assert_eq!(base.fortune, 5.0);
    }

    #[test]
    fn test_level_growth_accumulates() {
        let level_three = base_stats_at_level(CharacterClass::Warrior, 3);
        assert_eq!(level_three.max_health, 144.0);
        assert_eq!(level_three.power, 12.0);
        assert_eq!(base_stats_at_level(CharacterClass::Mage, 0), class_base_stats(CharacterClass::Mage));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(parse_class(" Rogue ").unwrap(), CharacterClass::Rogue);
        assert_eq!(parse_enemy("orc-brute").unwrap(), EnemyKind::OrcBrute);
        assert_eq!(parse_enemy("Cave Spider").unwrap(), EnemyKind::CaveSpider);
        assert_eq!(parse_path("shadow_dancer").unwrap(), PathId::Shadowdancer);
        assert!(matches!(parse_class("bard"), Err(SetupError::UnknownClass(_))));
        assert!(matches!(parse_enemy("dragon"), Err(SetupError::UnknownEnemy(_))));
    }

    #[test]
    fn test_power_books_are_well_formed() {
        for class in [CharacterClass::Warrior, CharacterClass::Mage, CharacterClass::Rogue] {
            let book = class_power_book(class);
            assert_eq!(book.powers.len(), 4);
            let base = class_base_stats(class);
            for power in &book.powers {
                assert!(power.resource_cost <= base.max_resource, "{} unaffordable", power.id);
                assert!(power.cooldown_ms > 0.0);
                assert_eq!(power.current_cooldown_ms, 0.0);
            }
        }
    }

    #[test]
    fn test_enemy_spawns_with_template_immunities() {
        let mut world = World::new();
        let entity = spawn_enemy(&mut world, EnemyKind::Skeleton, EnemyId(7), 1);

        let immunities = world.get::<&Immunities>(entity).unwrap();
        assert!(immunities.kinds.contains(&StatusKind::Poison));
        assert!(immunities.kinds.contains(&StatusKind::Bleed));
        let stats = world.get::<&Stats>(entity).unwrap();
        assert_eq!(stats.health, 55.0);
        assert_eq!(world.get::<&EnemyInfo>(entity).unwrap().id, EnemyId(7));
    }

    #[test]
    fn test_enemy_scales_with_level() {
        let base = enemy_template(EnemyKind::Goblin).base;
        let scaled = scaled_enemy_stats(&base, 6);
        assert_eq!(scaled.max_health, 60.0);
        assert_eq!(scaled.speed, base.speed);
    }
}
