//! Engine-level tests: determinism, pacing, powers, statuses, paths and
//! encounter lifecycle.

use hecs::Entity;

use delve_core::commands::PlayerCommand;
use delve_core::components::*;
use delve_core::constants::PATH_UNLOCK_LEVEL;
use delve_core::enums::*;
use delve_core::events::CombatEvent;
use delve_core::state::CombatSnapshot;
use delve_core::types::EnemyId;
use delve_paths::catalog::RAMPAGE_COUNTER;

use crate::engine::{CombatEngine, SimConfig};

// ---- Helpers ----

fn engine_for(class: CharacterClass) -> CombatEngine {
    CombatEngine::new(SimConfig {
        class,
        ..Default::default()
    })
}

fn start(engine: &mut CombatEngine, enemy: EnemyKind) -> CombatSnapshot {
    engine.queue_command(PlayerCommand::StartEncounter { enemy });
    engine.tick(0.0)
}

fn use_power(engine: &mut CombatEngine, power_id: &str) -> CombatSnapshot {
    engine.queue_command(PlayerCommand::UsePower {
        power_id: power_id.to_string(),
    });
    engine.tick(0.0)
}

fn player(engine: &CombatEngine) -> Entity {
    engine.player().unwrap()
}

fn enemy(engine: &CombatEngine) -> Entity {
    engine.enemy().unwrap()
}

/// Make the current enemy effectively unkillable for power tests.
fn fortify_enemy(engine: &mut CombatEngine) {
    let enemy = enemy(engine);
    let mut stats = engine.world_mut().get::<&mut Stats>(enemy).unwrap();
    stats.max_health = 100_000.0;
    stats.health = 100_000.0;
}

fn set_health(engine: &mut CombatEngine, entity: Entity, health: f64) {
    engine.world_mut().get::<&mut Stats>(entity).unwrap().health = health;
}

fn reset_cooldown(engine: &mut CombatEngine, power_id: &str) {
    let player = player(engine);
    let mut book = engine.world_mut().get::<&mut PowerBook>(player).unwrap();
    book.get_mut(power_id).unwrap().current_cooldown_ms = 0.0;
}

fn set_level(engine: &mut CombatEngine, level: u32) {
    let player = player(engine);
    engine.world_mut().get::<&mut Progress>(player).unwrap().level = level;
}

fn count_power_events(snapshot: &CombatSnapshot) -> usize {
    snapshot
        .events
        .iter()
        .filter(|e| matches!(e, CombatEvent::PlayerPower { .. }))
        .count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = CombatEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = CombatEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    for engine in [&mut engine_a, &mut engine_b] {
        engine.queue_command(PlayerCommand::StartEncounter {
            enemy: EnemyKind::OrcBrute,
        });
    }

    for i in 0..300 {
        if i == 20 {
            for engine in [&mut engine_a, &mut engine_b] {
                engine.queue_command(PlayerCommand::UsePower {
                    power_id: "power_strike".to_string(),
                });
            }
        }
        let snap_a = engine_a.tick(100.0);
        let snap_b = engine_b.tick(100.0);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = CombatEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = CombatEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });

    engine_a.queue_command(PlayerCommand::StartEncounter {
        enemy: EnemyKind::OrcBrute,
    });
    engine_b.queue_command(PlayerCommand::StartEncounter {
        enemy: EnemyKind::OrcBrute,
    });

    // Variance rolls differ from the first exchange of blows.
    let mut diverged = false;
    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick(100.0)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(100.0)).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Pacing ----

#[test]
fn test_exploring_does_not_advance_time() {
    let mut engine = CombatEngine::new(SimConfig::default());
    for _ in 0..10 {
        engine.tick(100.0);
    }
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.time().elapsed_ms, 0.0);
    assert_eq!(engine.phase(), GamePhase::Exploring);
}

#[test]
fn test_pause_freezes_time() {
    let mut engine = CombatEngine::new(SimConfig::default());
    start(&mut engine, EnemyKind::OrcBrute);
    for _ in 0..5 {
        engine.tick(100.0);
    }

    engine.queue_command(PlayerCommand::Pause);
    engine.tick(100.0);
    assert_eq!(engine.phase(), GamePhase::Paused);

    let elapsed = engine.time().elapsed_ms;
    let player = player(&engine);
    let accumulated = engine.world().get::<&AttackTimer>(player).unwrap().accumulated_ms;

    for _ in 0..20 {
        engine.tick(100.0);
    }
    assert_eq!(engine.time().elapsed_ms, elapsed, "Paused time must not advance");
    assert_eq!(
        engine.world().get::<&AttackTimer>(player).unwrap().accumulated_ms,
        accumulated,
        "Paused timers must not accumulate"
    );

    engine.queue_command(PlayerCommand::Resume);
    engine.tick(100.0);
    assert_eq!(engine.phase(), GamePhase::Combat);
    assert!(engine.time().elapsed_ms > elapsed);
}

#[test]
fn test_combat_speed_scales_elapsed_time() {
    let mut normal = CombatEngine::new(SimConfig::default());
    let mut double = CombatEngine::new(SimConfig {
        combat_speed: CombatSpeed::Double,
        ..Default::default()
    });
    start(&mut normal, EnemyKind::OrcBrute);
    start(&mut double, EnemyKind::OrcBrute);

    for _ in 0..10 {
        normal.tick(100.0);
        double.tick(100.0);
    }
    assert!((normal.time().elapsed_ms - 1000.0).abs() < 1e-9);
    assert!((double.time().elapsed_ms - 2000.0).abs() < 1e-9);
}

#[test]
fn test_set_combat_speed_command() {
    let mut engine = CombatEngine::new(SimConfig::default());
    start(&mut engine, EnemyKind::OrcBrute);
    engine.queue_command(PlayerCommand::SetCombatSpeed {
        speed: CombatSpeed::Triple,
    });
    engine.tick(100.0);
    assert_eq!(engine.combat_speed(), CombatSpeed::Triple);
    assert!((engine.time().elapsed_ms - 300.0).abs() < 1e-9);
}

#[test]
fn test_invalid_delta_treated_as_zero() {
    let mut engine = CombatEngine::new(SimConfig::default());
    start(&mut engine, EnemyKind::Goblin);

    engine.tick(f64::NAN);
    engine.tick(-50.0);
    engine.tick(f64::INFINITY);
    assert_eq!(engine.time().elapsed_ms, 0.0);
    assert_eq!(engine.phase(), GamePhase::Combat);
}

// ---- Powers ----

#[test]
fn test_power_pays_cost_and_starts_cooldown() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);

    let snapshot = use_power(&mut engine, "power_strike");
    assert_eq!(count_power_events(&snapshot), 1);

    let player = player(&engine);
    let resource = engine.world().get::<&Stats>(player).unwrap().resource;
    assert_eq!(resource, 40.0, "Warrior starts with 50 and Power Strike costs 10");

    let book = engine.world().get::<&PowerBook>(player).unwrap();
    let slot = book.get("power_strike").unwrap();
    assert_eq!(slot.current_cooldown_ms, 3900.0, "Cooldown is pre-reduced by one host tick");
}

#[test]
fn test_power_rejected_on_cooldown() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);

    engine.queue_commands([
        PlayerCommand::UsePower {
            power_id: "power_strike".to_string(),
        },
        PlayerCommand::UsePower {
            power_id: "power_strike".to_string(),
        },
    ]);
    let snapshot = engine.tick(0.0);
    assert_eq!(count_power_events(&snapshot), 1, "Second use is on cooldown");

    let player = player(&engine);
    assert_eq!(engine.world().get::<&Stats>(player).unwrap().resource, 40.0);
}

#[test]
fn test_power_rejected_without_resource() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);

    let player = player(&engine);
    engine.world_mut().get::<&mut Stats>(player).unwrap().resource = 5.0;

    let snapshot = use_power(&mut engine, "power_strike");
    assert_eq!(count_power_events(&snapshot), 0);
    assert_eq!(engine.world().get::<&Stats>(player).unwrap().resource, 5.0);
    let book = engine.world().get::<&PowerBook>(player).unwrap();
    assert_eq!(book.get("power_strike").unwrap().current_cooldown_ms, 0.0);
}

#[test]
fn test_power_rejected_outside_combat() {
    let mut engine = engine_for(CharacterClass::Warrior);
    let snapshot = use_power(&mut engine, "power_strike");
    assert_eq!(count_power_events(&snapshot), 0);

    let player = player(&engine);
    assert_eq!(engine.world().get::<&Stats>(player).unwrap().resource, 50.0);
}

#[test]
fn test_power_rejected_against_dying_enemy() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);
    let enemy = enemy(&engine);
    let player = player(&engine);
    set_health(&mut engine, enemy, 0.0);
    engine.tick(100.0);
    assert!(engine.world().get::<&CombatFlags>(enemy).unwrap().is_dying);

    let snapshot = use_power(&mut engine, "power_strike");
    assert_eq!(count_power_events(&snapshot), 0);
    assert_eq!(engine.world().get::<&Stats>(player).unwrap().resource, 50.0);
    {
        let book = engine.world().get::<&PowerBook>(player).unwrap();
        assert_eq!(book.get("power_strike").unwrap().current_cooldown_ms, 0.0);
        let flags = engine.world().get::<&CombatFlags>(player).unwrap();
        assert_eq!(flags.combo_count, 0);
        assert!(flags.last_power_used.is_none());
    }
    let strike = snapshot.powers.iter().find(|p| p.id == "power_strike").unwrap();
    assert!(!strike.usable, "Damage power is not usable without a living target");

    // Self-targeted powers still work.
    let snapshot = use_power(&mut engine, "second_wind");
    assert_eq!(count_power_events(&snapshot), 1);
    assert_eq!(engine.world().get::<&Stats>(player).unwrap().resource, 30.0);
}

#[test]
fn test_combo_through_engine() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);
    let player = player(&engine);
    let combo = |engine: &CombatEngine| engine.world().get::<&CombatFlags>(player).unwrap().combo_count;

    use_power(&mut engine, "power_strike");
    assert_eq!(combo(&engine), 0);

    use_power(&mut engine, "bloodthirst");
    assert_eq!(combo(&engine), 1);

    reset_cooldown(&mut engine, "power_strike");
    let snapshot = use_power(&mut engine, "power_strike");
    assert_eq!(combo(&engine), 2);
    assert!(snapshot.log.iter().any(|l| l.message == "Combo x2!"));

    reset_cooldown(&mut engine, "power_strike");
    use_power(&mut engine, "power_strike");
    assert_eq!(combo(&engine), 0, "Repeating a power resets the combo");
}

#[test]
fn test_damage_power_scales_with_combo() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);

    let first = use_power(&mut engine, "power_strike");
    let first_damage = first
        .events
        .iter()
        .find_map(|e| match e {
            CombatEvent::PlayerPower { damage, .. } => Some(*damage),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_damage, 13.0, "floor(9 * 1.5)");

    use_power(&mut engine, "bloodthirst");
    reset_cooldown(&mut engine, "power_strike");
    let third = use_power(&mut engine, "power_strike");
    let third_damage = third
        .events
        .iter()
        .find_map(|e| match e {
            CombatEvent::PlayerPower { damage, .. } => Some(*damage),
            _ => None,
        })
        .unwrap();
    assert!(third_damage > first_damage, "Combo multiplier raises damage");
}

#[test]
fn test_buff_power_raises_stat_then_fades() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);
    let player = player(&engine);

    use_power(&mut engine, "battle_cry");
    let buffed = engine.world().get::<&Stats>(player).unwrap().power;
    assert!((buffed - 9.0 * 1.3).abs() < 1e-9);

    // Keep the player alive while the buff runs out.
    for _ in 0..70 {
        set_health(&mut engine, player, 120.0);
        engine.tick(100.0);
    }
    let power = engine.world().get::<&Stats>(player).unwrap().power;
    assert!((power - 9.0).abs() < 1e-9, "Buff expired after 6 seconds");
}

// ---- Statuses ----

#[test]
fn test_poison_applies_and_refreshes() {
    let mut engine = engine_for(CharacterClass::Rogue);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);
    let enemy = enemy(&engine);

    let snapshot = use_power(&mut engine, "poison_blade");
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::StatusApplied { kind: StatusKind::Poison, .. })));
    {
        let effects = engine.world().get::<&StatusEffects>(enemy).unwrap();
        let poison = effects.get(&StatusKind::Poison).unwrap();
        assert_eq!(poison.remaining_turns, 4);
        assert_eq!(poison.damage, Some(4.0));
    }

    // One status turn later the poison has ticked once.
    for _ in 0..10 {
        engine.tick(100.0);
    }
    let turns = engine
        .world()
        .get::<&StatusEffects>(enemy)
        .unwrap()
        .get(&StatusKind::Poison)
        .unwrap()
        .remaining_turns;
    assert_eq!(turns, 3);

    reset_cooldown(&mut engine, "poison_blade");
    use_power(&mut engine, "poison_blade");
    let effects = engine.world().get::<&StatusEffects>(enemy).unwrap();
    assert_eq!(effects.effects.len(), 1, "Refresh does not stack");
    assert_eq!(effects.get(&StatusKind::Poison).unwrap().remaining_turns, 4);
}

#[test]
fn test_skeleton_resists_poison() {
    let mut engine = engine_for(CharacterClass::Rogue);
    start(&mut engine, EnemyKind::Skeleton);
    fortify_enemy(&mut engine);

    let snapshot = use_power(&mut engine, "poison_blade");
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::StatusResisted { kind: StatusKind::Poison, .. })));
    assert!(snapshot.log.iter().any(|l| l.message == "Skeleton resists poison!"));

    let enemy = enemy(&engine);
    assert!(engine.world().get::<&StatusEffects>(enemy).unwrap().is_empty());
}

#[test]
fn test_frost_nova_applies_slow() {
    let mut engine = engine_for(CharacterClass::Mage);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);

    use_power(&mut engine, "frost_nova");
    let enemy = enemy(&engine);
    let effects = engine.world().get::<&StatusEffects>(enemy).unwrap();
    let slow = effects.get(&StatusKind::Slow).unwrap();
    assert_eq!(slow.value, Some(0.4));
    assert_eq!(slow.remaining_turns, 3);
}

// ---- Block ----

#[test]
fn test_block_activation_and_cooldown() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::OrcBrute);
    let player = player(&engine);

    engine.queue_command(PlayerCommand::ActivateBlock);
    engine.tick(0.0);
    assert!(engine.world().get::<&CombatFlags>(player).unwrap().is_blocking);

    // A second activation while blocking is ignored.
    engine.queue_command(PlayerCommand::ActivateBlock);
    let snapshot = engine.tick(0.0);
    assert!(!snapshot.log.iter().any(|l| l.message == "You raise your guard."));
}

// ---- Death and rewards ----

#[test]
fn test_death_processed_once() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);
    let enemy = enemy(&engine);
    let player = player(&engine);
    set_health(&mut engine, enemy, 0.0);

    let first = engine.run_death_pass();
    assert!(first.events().iter().any(|e| e.trigger == Trigger::OnKill));
    assert!(engine.ledger().contains(EnemyId(1)));

    let progress = engine.world().get::<&Progress>(player).map(|p| (*p).clone()).unwrap();
    assert_eq!(progress.xp, 20);
    assert_eq!(progress.kills, 1);

    let second = engine.run_death_pass();
    assert!(second.is_empty(), "No second OnKill for the same corpse");
    let again = engine.world().get::<&Progress>(player).map(|p| (*p).clone()).unwrap();
    assert_eq!(again.xp, progress.xp);
    assert_eq!(again.gold, progress.gold);
    assert_eq!(again.kills, 1);
}

#[test]
fn test_death_ledger_blocks_second_reward() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);
    let enemy = enemy(&engine);
    let player = player(&engine);
    set_health(&mut engine, enemy, 0.0);
    engine.run_death_pass();
    let progress = engine.world().get::<&Progress>(player).map(|p| (*p).clone()).unwrap();

    // Clear the latch so only the ledger stands between the corpse and a
    // second reward.
    engine.world_mut().get::<&mut CombatFlags>(enemy).unwrap().is_dying = false;
    let second = engine.run_death_pass();
    assert!(second.is_empty(), "Ledger suppresses a repeated OnKill");
    assert!(engine.world().get::<&CombatFlags>(enemy).unwrap().is_dying);

    let again = engine.world().get::<&Progress>(player).map(|p| (*p).clone()).unwrap();
    assert_eq!(again.xp, progress.xp);
    assert_eq!(again.gold, progress.gold);
    assert_eq!(again.kills, progress.kills);
}

#[test]
fn test_victory_after_linger() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);
    let enemy = enemy(&engine);
    set_health(&mut engine, enemy, 0.0);

    let snapshot = engine.tick(100.0);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::EnemyDefeated { enemy_id: EnemyId(1), .. })));
    assert_eq!(engine.phase(), GamePhase::Combat, "Enemy lingers while dying");
    assert!(snapshot.enemy.unwrap().is_dying);

    for _ in 0..10 {
        engine.tick(100.0);
    }
    assert_eq!(engine.phase(), GamePhase::Victory);
    assert!(engine.enemy().is_none());
}

#[test]
fn test_defeat_then_revive_on_next_encounter() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);
    let player = player(&engine);
    set_health(&mut engine, player, 0.0);

    let snapshot = engine.tick(100.0);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::PlayerDefeated)));
    assert_eq!(engine.phase(), GamePhase::Defeat);

    start(&mut engine, EnemyKind::Goblin);
    assert_eq!(engine.phase(), GamePhase::Combat);
    let stats = *engine.world().get::<&Stats>(player).unwrap();
    assert_eq!(stats.health, stats.max_health);
    assert!(!engine.world().get::<&CombatFlags>(player).unwrap().is_dying);
}

#[test]
fn test_full_fight_resolves() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);

    for _ in 0..3000 {
        engine.tick(100.0);
        if matches!(engine.phase(), GamePhase::Victory | GamePhase::Defeat) {
            break;
        }
    }
    assert!(matches!(engine.phase(), GamePhase::Victory | GamePhase::Defeat));
}

#[test]
fn test_level_up_from_rewards() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);
    let player = player(&engine);
    engine.world_mut().get::<&mut Progress>(player).unwrap().xp = 90;
    let enemy = enemy(&engine);
    set_health(&mut engine, enemy, 0.0);

    let snapshot = engine.tick(100.0);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::LevelUp { level: 2 })));
    let progress = engine.world().get::<&Progress>(player).map(|p| (*p).clone()).unwrap();
    assert_eq!(progress.level, 2);
    assert_eq!(progress.xp, 10);
}

#[test]
fn test_retreat_grants_nothing() {
    let mut engine = engine_for(CharacterClass::Warrior);
    start(&mut engine, EnemyKind::Goblin);
    engine.queue_command(PlayerCommand::Retreat);
    engine.tick(100.0);

    assert_eq!(engine.phase(), GamePhase::Exploring);
    assert!(engine.enemy().is_none());
    let player = player(&engine);
    assert_eq!(engine.world().get::<&Progress>(player).unwrap().kills, 0);
}

#[test]
fn test_enemy_ids_are_unique() {
    let mut engine = engine_for(CharacterClass::Warrior);
    let first = start(&mut engine, EnemyKind::Goblin);
    engine.queue_command(PlayerCommand::Retreat);
    engine.tick(0.0);
    let second = start(&mut engine, EnemyKind::Goblin);

    assert_eq!(first.enemy.unwrap().enemy_id, Some(EnemyId(1)));
    assert_eq!(second.enemy.unwrap().enemy_id, Some(EnemyId(2)));
}

// ---- Paths ----

#[test]
fn test_choose_path_requires_level() {
    let mut engine = engine_for(CharacterClass::Warrior);
    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Berserker,
    });
    let snapshot = engine.tick(0.0);
    assert!(snapshot.path.is_none(), "Level 1 cannot choose a path");

    set_level(&mut engine, PATH_UNLOCK_LEVEL);
    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Archmage,
    });
    let snapshot = engine.tick(0.0);
    assert!(snapshot.path.is_none(), "Mage path is not available to a warrior");

    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Berserker,
    });
    let snapshot = engine.tick(0.0);
    assert_eq!(snapshot.path.unwrap().path, PathId::Berserker);

    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Guardian,
    });
    let snapshot = engine.tick(0.0);
    assert_eq!(snapshot.path.unwrap().path, PathId::Berserker, "Path choice is final");
}

#[test]
fn test_stance_switching() {
    let mut engine = engine_for(CharacterClass::Warrior);
    set_level(&mut engine, PATH_UNLOCK_LEVEL);
    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Guardian,
    });
    let snapshot = engine.tick(0.0);
    assert_eq!(snapshot.path.unwrap().stance, Some(Stance::Bulwark));

    engine.queue_command(PlayerCommand::SetStance {
        stance: Stance::Vengeance,
    });
    let snapshot = engine.tick(0.0);
    assert_eq!(snapshot.path.unwrap().stance, Some(Stance::Vengeance));

    engine.queue_command(PlayerCommand::SetStance { stance: Stance::Veil });
    let snapshot = engine.tick(0.0);
    assert_eq!(
        snapshot.path.unwrap().stance,
        Some(Stance::Vengeance),
        "Shadowdancer stance rejected on Guardian"
    );
}

#[test]
fn test_on_kill_counter_fires_once() {
    let mut engine = engine_for(CharacterClass::Warrior);
    set_level(&mut engine, PATH_UNLOCK_LEVEL);
    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Berserker,
    });
    start(&mut engine, EnemyKind::Goblin);

    let enemy = enemy(&engine);
    set_health(&mut engine, enemy, 0.0);
    for _ in 0..20 {
        engine.tick(100.0);
    }
    assert_eq!(engine.phase(), GamePhase::Victory);

    let player = player(&engine);
    let counter = engine
        .world()
        .get::<&PathState>(player)
        .unwrap()
        .counter(RAMPAGE_COUNTER);
    assert_eq!(counter, 1, "A kill is counted exactly once");
}

#[test]
fn test_rampage_buff_after_three_kills() {
    let mut engine = engine_for(CharacterClass::Warrior);
    set_level(&mut engine, PATH_UNLOCK_LEVEL);
    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Berserker,
    });

    for _ in 0..3 {
        start(&mut engine, EnemyKind::Goblin);
        let enemy = enemy(&engine);
        set_health(&mut engine, enemy, 0.0);
        for _ in 0..20 {
            engine.tick(100.0);
        }
    }

    let snapshot = start(&mut engine, EnemyKind::Goblin);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::AbilityTriggered { ability_id } if ability_id == "rampage")));
    let player = player(&engine);
    let state = engine.world().get::<&PathState>(player).unwrap();
    assert_eq!(state.counter(RAMPAGE_COUNTER), 0, "Counter resets once spent");
    let buffs = engine.world().get::<&ActiveBuffs>(player).unwrap();
    assert_eq!(buffs.buffs.len(), 1);
}

#[test]
fn test_triggers_do_not_leak_across_ticks() {
    let mut engine = engine_for(CharacterClass::Warrior);
    set_level(&mut engine, PATH_UNLOCK_LEVEL);
    start(&mut engine, EnemyKind::OrcBrute);
    fortify_enemy(&mut engine);
    let player = player(&engine);
    let ability_fired = |snapshot: &CombatSnapshot| {
        snapshot
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::AbilityTriggered { .. }))
    };
    let landed_hit = |snapshot: &CombatSnapshot| {
        snapshot
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::PlayerAttack { damage, .. } if *damage > 0.0))
    };

    // Land a hit with no path chosen, so nothing consumes its OnHit.
    let mut hit = false;
    for _ in 0..100 {
        set_health(&mut engine, player, 50.0);
        if landed_hit(&engine.tick(100.0)) {
            hit = true;
            break;
        }
    }
    assert!(hit, "Player should land a hit");

    // Blood frenzy would fire on that OnHit at this health.
    engine.queue_command(PlayerCommand::ChoosePath {
        path: PathId::Berserker,
    });
    set_health(&mut engine, player, 50.0);
    let snapshot = engine.tick(0.0);
    assert_eq!(snapshot.path.as_ref().unwrap().path, PathId::Berserker);
    assert!(!ability_fired(&snapshot), "OnHit from the previous tick leaked");

    // A fresh hit in a later tick does fire it.
    let mut fired = false;
    for _ in 0..100 {
        set_health(&mut engine, player, 50.0);
        let snapshot = engine.tick(100.0);
        if landed_hit(&snapshot) {
            fired = snapshot.events.iter().any(
                |e| matches!(e, CombatEvent::AbilityTriggered { ability_id } if ability_id == "blood_frenzy"),
            );
            break;
        }
    }
    assert!(fired, "Blood frenzy fires on a hit in its own tick");
}
