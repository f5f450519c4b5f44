//! Path abilities for DELVE.
//!
//! Declarative trigger → condition → effect rules layered on top of base
//! combat, the per-tick trigger buffer that feeds them, and the path and
//! stance catalog. Operates on plain data with no ECS dependency.

pub mod ability;
pub mod catalog;
pub mod condition;
pub mod pipeline;
pub mod trigger;

pub use delve_core as core;
