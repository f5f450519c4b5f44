//! Combat engine: the core of the game.
//!
//! `CombatEngine` owns the hecs ECS world, processes player commands at
//! tick boundaries, runs all systems in a fixed order and produces a
//! `CombatSnapshot` per tick. Completely headless, so a seeded engine is
//! fully deterministic.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use delve_core::commands::PlayerCommand;
use delve_core::components::*;
use delve_core::config::BalanceConfig;
use delve_core::constants::PATH_UNLOCK_LEVEL;
use delve_core::enums::*;
use delve_core::events::CombatEvent;
use delve_core::state::CombatSnapshot;
use delve_core::types::{EnemyId, SimTime};
use delve_paths::catalog::get_path;
use delve_paths::trigger::{TriggerBuffer, TriggerContext};

use crate::combat_log::TickLog;
use crate::encounter;
use crate::systems;
use crate::systems::buffs::refresh_stats;
use crate::systems::death::DeathLedger;
use crate::systems::{enemy_entity, player_entity, TickContext};

/// Configuration for starting a new engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same combat.
    pub seed: u64,
    pub combat_speed: CombatSpeed,
    pub balance: BalanceConfig,
    /// Class of the player spawned at construction.
    pub class: CharacterClass,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            combat_speed: CombatSpeed::default(),
            balance: BalanceConfig::default(),
            class: CharacterClass::Warrior,
        }
    }
}

/// The combat engine. Owns the ECS world and all simulation state.
pub struct CombatEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    combat_speed: CombatSpeed,
    balance: BalanceConfig,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    log: TickLog,
    ledger: DeathLedger,
    /// Scaled time not yet consumed by a status turn.
    status_clock_ms: f64,
    next_enemy_id: u64,
}

impl CombatEngine {
    /// Create an engine and spawn a level 1 player of the configured class.
    ///
    /// An invalid balance config is replaced by the defaults.
    pub fn new(config: SimConfig) -> Self {
        let balance = match config.balance.validate() {
            Ok(()) => config.balance,
            Err(err) => {
                tracing::warn!(%err, "invalid balance config, using defaults");
                BalanceConfig::default()
            }
        };

        let mut world = World::new();
        encounter::spawn_player(&mut world, config.class, 1);

        Self {
            world,
            time: SimTime::default(),
            phase: GamePhase::default(),
            combat_speed: config.combat_speed,
            balance,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            log: TickLog::new(),
            ledger: DeathLedger::default(),
            status_clock_ms: 0.0,
            next_enemy_id: 1,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `delta_ms` of wall time and return the
    /// resulting snapshot.
    ///
    /// A non-finite or negative delta is treated as zero.
    pub fn tick(&mut self, delta_ms: f64) -> CombatSnapshot {
        let delta_ms = if delta_ms.is_finite() && delta_ms >= 0.0 {
            delta_ms
        } else {
            tracing::warn!(delta_ms, "invalid tick delta, treating as 0");
            0.0
        };

        let mut triggers = TriggerBuffer::new();
        self.log.begin_tick(self.time.tick);
        self.process_commands(&mut triggers);

        if self.phase == GamePhase::Combat {
            let scaled = delta_ms * self.combat_speed.multiplier();
            self.run_systems(&mut triggers, scaled);
            self.time.advance(scaled);
        }

        let (events, log) = self.log.take();
        systems::snapshot::build_snapshot(
            &self.world,
            self.time,
            self.phase,
            self.combat_speed,
            events,
            log,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn combat_speed(&self) -> CombatSpeed {
        self.combat_speed
    }

    pub fn balance(&self) -> &BalanceConfig {
        &self.balance
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Option<Entity> {
        player_entity(&self.world)
    }

    pub fn enemy(&self) -> Option<Entity> {
        enemy_entity(&self.world)
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &DeathLedger {
        &self.ledger
    }

    /// Run the death pass directly, outside of a tick.
    #[cfg(test)]
    pub fn run_death_pass(&mut self) -> TriggerBuffer {
        let mut triggers = TriggerBuffer::new();
        let mut ctx = TickContext {
            rng: &mut self.rng,
            balance: &self.balance,
            combat_speed: self.combat_speed,
            scaled_delta_ms: 0.0,
            triggers: &mut triggers,
            log: &mut self.log,
            ledger: &mut self.ledger,
        };
        systems::death::run(&mut self.world, &mut ctx);
        triggers
    }

    fn process_commands(&mut self, triggers: &mut TriggerBuffer) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, triggers);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand, triggers: &mut TriggerBuffer) {
        match command {
            PlayerCommand::StartEncounter { enemy } => {
                if matches!(
                    self.phase,
                    GamePhase::Exploring | GamePhase::Victory | GamePhase::Defeat
                ) {
                    self.start_encounter(enemy, triggers);
                } else {
                    tracing::debug!(phase = ?self.phase, "encounter already running");
                }
            }
            PlayerCommand::Retreat => {
                if matches!(self.phase, GamePhase::Combat | GamePhase::Paused) {
                    self.retreat(triggers);
                }
            }
            PlayerCommand::UsePower { power_id } => {
                if self.phase != GamePhase::Combat {
                    tracing::debug!(power_id, phase = ?self.phase, "power rejected outside combat");
                    return;
                }
                let mut ctx = TickContext {
                    rng: &mut self.rng,
                    balance: &self.balance,
                    combat_speed: self.combat_speed,
                    scaled_delta_ms: 0.0,
                    triggers,
                    log: &mut self.log,
                    ledger: &mut self.ledger,
                };
                systems::powers::use_power(&mut self.world, &power_id, &mut ctx);
            }
            PlayerCommand::ActivateBlock => {
                if self.phase == GamePhase::Combat {
                    systems::block::activate(&mut self.world, &self.balance, &mut self.log);
                }
            }
            PlayerCommand::ChoosePath { path } => self.choose_path(path),
            PlayerCommand::SetStance { stance } => self.set_stance(stance),
            PlayerCommand::SetCombatSpeed { speed } => {
                self.combat_speed = speed;
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Combat {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Combat;
                }
            }
        }
    }

    fn start_encounter(&mut self, kind: EnemyKind, triggers: &mut TriggerBuffer) {
        self.despawn_enemies();

        let Some(player) = player_entity(&self.world) else {
            tracing::warn!("cannot start an encounter without a player");
            return;
        };
        self.prepare_player(player);

        let level = self
            .world
            .get::<&Progress>(player)
            .map_or(1, |progress| progress.level);
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        encounter::spawn_enemy(&mut self.world, kind, id, level);

        self.ledger.clear();
        self.status_clock_ms = 0.0;
        self.phase = GamePhase::Combat;

        let name = encounter::enemy_template(kind).name;
        tracing::info!(?kind, enemy_id = id.0, level, "encounter started");
        self.log.line(format!("A {name} appears!"));
        self.log.event(CombatEvent::EncounterStarted { enemy_id: id, enemy: kind });
        triggers.record(Trigger::CombatStart, TriggerContext::default());
    }

    /// Reset per-encounter player state. A defeated player is revived at full.
    fn prepare_player(&mut self, player: Entity) {
        if let Ok(mut flags) = self.world.get::<&mut CombatFlags>(player) {
            *flags = CombatFlags::default();
        }
        if let Ok(mut effects) = self.world.get::<&mut StatusEffects>(player) {
            effects.effects.clear();
        }
        if let Ok(mut buffs) = self.world.get::<&mut ActiveBuffs>(player) {
            buffs.buffs.clear();
        }
        if let Ok(mut timer) = self.world.get::<&mut AttackTimer>(player) {
            *timer = AttackTimer::default();
        }
        if let Ok(mut book) = self.world.get::<&mut PowerBook>(player) {
            for power in &mut book.powers {
                power.current_cooldown_ms = 0.0;
            }
        }
        refresh_stats(&mut self.world, player);

        if let Ok(mut stats) = self.world.get::<&mut Stats>(player) {
            if stats.is_dead() {
                stats.health = stats.max_health;
                stats.resource = stats.max_resource;
            }
        }
    }

    fn despawn_enemies(&mut self) {
        self.despawn_buffer.clear();
        self.despawn_buffer
            .extend(self.world.query::<&Enemy>().iter().map(|(entity, _)| entity));
        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
    }

    fn retreat(&mut self, triggers: &mut TriggerBuffer) {
        self.despawn_enemies();
        if let Some(player) = player_entity(&self.world) {
            self.prepare_player(player);
        }
        triggers.clear();
        self.phase = GamePhase::Exploring;
        tracing::info!("player retreated");
        self.log.line("You retreat.");
    }

    fn choose_path(&mut self, path: PathId) {
        let Some(player) = player_entity(&self.world) else {
            return;
        };
        let (class, level) = match self.world.get::<&Progress>(player) {
            Ok(progress) => (progress.class, progress.level),
            Err(_) => return,
        };
        if path.class() != class || level < PATH_UNLOCK_LEVEL {
            tracing::debug!(?path, ?class, level, "path not available");
            return;
        }

        let definition = get_path(path);
        match self.world.get::<&mut PathState>(player) {
            Ok(mut state) if state.path.is_none() => {
                state.path = Some(path);
                state.stance = definition.stances.first().copied();
                state.cooldowns.clear();
                state.counters.clear();
            }
            _ => {
                tracing::debug!(?path, "path already chosen");
                return;
            }
        }
        refresh_stats(&mut self.world, player);

        tracing::info!(?path, "path chosen");
        self.log
            .line(format!("You walk the path of the {}.", definition.name));
    }

    fn set_stance(&mut self, stance: Stance) {
        let Some(player) = player_entity(&self.world) else {
            return;
        };
        match self.world.get::<&mut PathState>(player) {
            Ok(mut state) if state.path == Some(stance.path()) => {
                state.stance = Some(stance);
            }
            _ => {
                tracing::debug!(?stance, "stance not available");
                return;
            }
        }
        refresh_stats(&mut self.world, player);
        self.log.line(format!("You shift into {stance:?} stance."));
    }

    /// Run all systems in order.
    fn run_systems(&mut self, triggers: &mut TriggerBuffer, scaled_delta_ms: f64) {
        let world = &mut self.world;
        let mut ctx = TickContext {
            rng: &mut self.rng,
            balance: &self.balance,
            combat_speed: self.combat_speed,
            scaled_delta_ms,
            triggers,
            log: &mut self.log,
            ledger: &mut self.ledger,
        };

        // 1. Attack timing (and power cooldown decay)
        systems::timing::run(world, &mut ctx);
        // 2. Attack resolution
        systems::attack::run(world, &mut ctx);
        // 3. Lethal-hit bookkeeping
        systems::death::run(world, &mut ctx);
        // 4. Path abilities (consumes the trigger buffer)
        systems::path_abilities::run(world, &mut ctx);
        // 5. Status decay, then bookkeeping for damage-over-time kills
        systems::status_decay::run(world, &mut ctx, &mut self.status_clock_ms);
        systems::death::run(world, &mut ctx);
        // 6. Buff decay
        systems::buffs::run(world, &mut ctx);
        // 7. Block decay
        systems::block::run(world, &mut ctx);
        // 8. Cleanup
        let outcome = systems::cleanup::run(world, &mut ctx, &mut self.despawn_buffer);
        ctx.triggers.clear();

        if let Some(outcome) = outcome {
            self.phase = outcome;
            tracing::info!(?outcome, "encounter ended");
            if outcome == GamePhase::Victory {
                self.log.line("Victory!");
            }
        }
    }
}
