//! Headless demo: runs one seeded encounter and logs the fight.
//!
//! Usage: `delve-app [class] [enemy] [seed] [--realtime]`

use std::error::Error;
use std::thread;

use tracing_subscriber::EnvFilter;

use delve_app::game_loop::{LogSink, SnapshotSink, TICK_DURATION};
use delve_app::host;
use delve_app::state::AppState;
use delve_core::commands::PlayerCommand;
use delve_core::constants::HOST_TICK_MS;
use delve_core::enums::GamePhase;
use delve_core::state::CombatSnapshot;
use delve_sim::encounter::{class_name, parse_class, parse_enemy};
use delve_sim::engine::{CombatEngine, SimConfig};

/// Upper bound on simulated ticks for the fast run.
const MAX_TICKS: u32 = 10_000;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut realtime = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--realtime" {
            realtime = true;
        } else {
            positional.push(arg);
        }
    }

    let class = parse_class(positional.first().map_or("warrior", String::as_str))?;
    let enemy = parse_enemy(positional.get(1).map_or("goblin", String::as_str))?;
    let seed = match positional.get(2) {
        Some(raw) => raw.parse()?,
        None => 42,
    };

    let config = SimConfig {
        seed,
        class,
        ..Default::default()
    };
    tracing::info!(class = class_name(class), ?enemy, seed, realtime, "starting encounter");

    let start = PlayerCommand::StartEncounter { enemy };
    let last = if realtime {
        run_realtime(config, start)?
    } else {
        run_fast(config, start)
    };

    if let Some(snapshot) = last {
        tracing::info!(phase = ?snapshot.phase, elapsed_ms = snapshot.time.elapsed_ms, "encounter finished");
        if let Some(progress) = &snapshot.progress {
            tracing::info!("{}", serde_json::to_string(progress)?);
        }
    }
    Ok(())
}

/// The first power the player could use right now, if any.
fn next_power(snapshot: &CombatSnapshot) -> Option<PlayerCommand> {
    snapshot
        .powers
        .iter()
        .find(|power| power.usable)
        .map(|power| PlayerCommand::UsePower {
            power_id: power.id.clone(),
        })
}

fn is_over(snapshot: &CombatSnapshot) -> bool {
    matches!(snapshot.phase, GamePhase::Victory | GamePhase::Defeat)
}

/// Simulate without sleeping, one host tick at a time.
fn run_fast(config: SimConfig, start: PlayerCommand) -> Option<CombatSnapshot> {
    let mut engine = CombatEngine::new(config);
    let mut sink = LogSink;
    engine.queue_command(start);

    let mut last = None;
    for _ in 0..MAX_TICKS {
        let snapshot = engine.tick(HOST_TICK_MS);
        sink.emit(&snapshot);
        if is_over(&snapshot) {
            return Some(snapshot);
        }
        if let Some(command) = next_power(&snapshot) {
            engine.queue_command(command);
        }
        last = Some(snapshot);
    }
    tracing::warn!(MAX_TICKS, "encounter did not finish");
    last
}

/// Run through the game loop thread at wall-clock pace.
fn run_realtime(config: SimConfig, start: PlayerCommand) -> Result<Option<CombatSnapshot>, Box<dyn Error>> {
    let state = AppState::new();
    host::start_simulation(&state, config, LogSink)?;
    host::send_command(&state, start)?;

    let mut last_tick = None;
    let result = loop {
        thread::sleep(TICK_DURATION);
        let Some(snapshot) = host::get_snapshot(&state)? else {
            continue;
        };
        if is_over(&snapshot) {
            break Some(snapshot);
        }
        // Act at most once per engine tick.
        if last_tick != Some(snapshot.time.tick) {
            last_tick = Some(snapshot.time.tick);
            if let Some(command) = next_power(&snapshot) {
                host::send_command(&state, command)?;
            }
        }
    };

    host::stop_simulation(&state)?;
    Ok(result)
}
