//! DELVE host.
//!
//! Drives the combat engine from a game loop thread and exposes a small
//! command/snapshot API to whatever front end embeds it.

pub mod game_loop;
pub mod host;
pub mod state;

pub use delve_core as core;
