//! Adaptive stream selection and playback resilience engine.
//!
//! Given an unreliable pool of scraped stream candidates, this crate scores
//! and ranks them, probes reachability, reconciles the viewer's resume
//! position across disagreeing history stores, and keeps playback alive
//! through a recovery state machine (codec renegotiation, bounded retries,
//! failover to the next candidate).
//!
//! The host application supplies the outside world through traits: the
//! catalog ([`catalog::CandidateSource`]), per-provider resolution
//! ([`resolver::StreamResolver`]), the two progress stores
//! ([`resume::ProgressStore`]) and the player itself
//! ([`engine::PlayerHandle`]).

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod lang;
pub mod metrics;
pub mod monitor;
pub mod resolver;
pub mod resume;
pub mod scoring;
pub mod selector;
pub mod session;
pub mod testing;
pub mod units;

pub use catalog::{CandidateSource, StreamCandidate, SubtitleTrack, TitleKey};
pub use config::{load_config, load_config_from_str, validate_config, ConfigError, EngineConfig};
pub use engine::{PlaybackCoordinator, PlayerHandle, TickDriver};
pub use error::PlaybackError;
pub use lang::normalize_language;
pub use monitor::{
    HealthMonitor, MonitorConfig, MonitorState, PlayerErrorCategory, PlayerState, RecoveryAction,
    TelemetrySnapshot,
};
pub use resolver::{PassthroughResolver, ReachabilityProber, ResolvedStream, StreamResolver};
pub use resume::{reconcile, ProgressStore, ResumeConfig, ResumeDecision, ResumeRecord};
pub use scoring::ScoreWeights;
pub use selector::{SelectionOutcome, SelectionPrefs, SelectorConfig, SourceHint, StreamSelector};
pub use session::PlaybackSession;
pub use units::{format_byte_size, parse_byte_size};
