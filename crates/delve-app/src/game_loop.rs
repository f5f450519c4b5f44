//! Game loop thread: drives the combat engine at the host tick rate.
//!
//! The engine is created inside this thread so it never crosses threads.
//! Commands arrive via an `mpsc` channel. Snapshots go to a [`SnapshotSink`]
//! and are stored in shared state for synchronous polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use delve_core::constants::HOST_TICK_MS;
use delve_core::state::CombatSnapshot;
use delve_sim::engine::{CombatEngine, SimConfig};

use crate::state::GameLoopCommand;

/// Wall-clock duration of one host tick.
pub const TICK_DURATION: Duration = Duration::from_millis(HOST_TICK_MS as u64);

/// Receives every snapshot the loop produces.
pub trait SnapshotSink: Send + 'static {
    fn emit(&mut self, snapshot: &CombatSnapshot);
}

/// Forwards snapshots over a channel. A dropped receiver is ignored.
impl SnapshotSink for mpsc::Sender<CombatSnapshot> {
    fn emit(&mut self, snapshot: &CombatSnapshot) {
        let _ = self.send(snapshot.clone());
    }
}

/// Writes the tick's combat log lines through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl SnapshotSink for LogSink {
    fn emit(&mut self, snapshot: &CombatSnapshot) {
        for line in &snapshot.log {
            tracing::info!(tick = line.tick, "{}", line.message);
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the host API to use.
pub fn spawn_game_loop(
    config: SimConfig,
    sink: impl SnapshotSink,
    latest_snapshot: Arc<Mutex<Option<CombatSnapshot>>>,
) -> io::Result<mpsc::Sender<GameLoopCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("delve-game-loop".into())
        .spawn(move || {
            run_game_loop(config, sink, cmd_rx, &latest_snapshot);
        })?;

    Ok(cmd_tx)
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    mut sink: impl SnapshotSink,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<CombatSnapshot>>,
) {
    let mut engine = CombatEngine::new(config);
    let mut last_tick = Instant::now();
    let mut next_tick_time = last_tick;
    tracing::info!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::info!("game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the wall time since the last tick (engine handles pause)
        let now = Instant::now();
        let delta_ms = now.duration_since(last_tick).as_secs_f64() * 1000.0;
        last_tick = now;
        let snapshot = engine.tick(delta_ms);

        // 3. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 4. Emit
        sink.emit(&snapshot);

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
