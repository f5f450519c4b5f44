//! Host API: start the game loop, forward commands, poll snapshots.

use thiserror::Error;

use delve_core::commands::PlayerCommand;
use delve_core::state::CombatSnapshot;
use delve_sim::engine::SimConfig;

use crate::game_loop::{self, SnapshotSink};
use crate::state::{AppState, GameLoopCommand};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("host state lock poisoned")]
    Poisoned,
    #[error("failed to send command: game loop has stopped")]
    Disconnected,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(
    state: &AppState,
    config: SimConfig,
    sink: impl SnapshotSink,
) -> Result<(), HostError> {
    let mut running = state.running.lock().map_err(|_| HostError::Poisoned)?;
    if *running {
        return Err(HostError::AlreadyRunning);
    }

    let cmd_tx = game_loop::spawn_game_loop(config, sink, state.latest_snapshot.clone())?;

    let mut tx_lock = state.command_tx.lock().map_err(|_| HostError::Poisoned)?;
    *tx_lock = Some(cmd_tx);
    *running = true;
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), HostError> {
    let tx_lock = state.command_tx.lock().map_err(|_| HostError::Poisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::Player(command))
            .map_err(|_| HostError::Disconnected),
        None => Err(HostError::NotStarted),
    }
}

/// Get the latest snapshot synchronously.
pub fn get_snapshot(state: &AppState) -> Result<Option<CombatSnapshot>, HostError> {
    let lock = state.latest_snapshot.lock().map_err(|_| HostError::Poisoned)?;
    Ok(lock.clone())
}

/// Ask the game loop to stop. A loop that already exited is not an error.
pub fn stop_simulation(state: &AppState) -> Result<(), HostError> {
    let mut running = state.running.lock().map_err(|_| HostError::Poisoned)?;
    let mut tx_lock = state.command_tx.lock().map_err(|_| HostError::Poisoned)?;
    if let Some(tx) = tx_lock.take() {
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    *running = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_loop::LogSink;

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        let result = send_command(&state, PlayerCommand::Pause);
        assert!(matches!(result, Err(HostError::NotStarted)));
    }

    #[test]
    fn test_double_start_rejected() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default(), LogSink).unwrap();
        let second = start_simulation(&state, SimConfig::default(), LogSink);
        assert!(matches!(second, Err(HostError::AlreadyRunning)));

        stop_simulation(&state).unwrap();
        assert!(!*state.running.lock().unwrap());
        assert!(matches!(
            send_command(&state, PlayerCommand::Pause),
            Err(HostError::NotStarted)
        ));
    }
}
