//! Playback engine.
//!
//! Wires the selector, health monitor and resume reconciler together:
//! - Coordinator: owns the pool and session, executes recovery actions
//!   against the player (sequential, generation-guarded)
//! - Driver: the ~1s periodic telemetry loop plus the player error channel

mod coordinator;
mod driver;
mod types;

pub use coordinator::PlaybackCoordinator;
pub use driver::TickDriver;
pub use types::*;
