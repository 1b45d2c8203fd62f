//! Testing utilities and mock implementations for integration tests.
//!
//! This module provides mock implementations of all external collaborator
//! traits, allowing full selection/recovery testing without real providers,
//! players or history stores.
//!
//! # Example
//!
//! ```rust,ignore
//! use showrunner_core::testing::{fixtures, MockPlayer, MockProber, MockProgressStore};
//!
//! let prober = MockProber::new();
//! prober.mark_dead("https://dead.example/v.mkv").await;
//!
//! let player = MockPlayer::new();
//! player.set_snapshot(fixtures::playing_snapshot(1000)).await;
//! ```

pub mod fixtures;

mod mock_catalog;
mod mock_player;
mod mock_prober;
mod mock_progress;
mod mock_resolver;

pub use mock_catalog::MockCandidateSource;
pub use mock_player::{MockPlayer, PlayerCall};
pub use mock_prober::MockProber;
pub use mock_progress::{MockProgressStore, PersistedProgress};
pub use mock_resolver::MockResolver;
