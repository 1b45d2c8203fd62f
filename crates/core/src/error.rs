//! Playback failure taxonomy shared by selection and recovery.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal playback failures surfaced to the caller.
///
/// Selection-time failures (`NoPlayableUrl`, `Unreachable`,
/// `ResolutionFailed`) are reported immediately. `StartupTimeout`,
/// `Decoder` and `Network` only surface after local remediation (retry,
/// codec fallback, failover) is exhausted. `Exhausted` is always terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackError {
    #[error("no playable url for this source")]
    NoPlayableUrl,

    #[error("source unreachable")]
    Unreachable,

    #[error("source resolution failed: {0}")]
    ResolutionFailed(String),

    #[error("source did not start in time")]
    StartupTimeout,

    #[error("decoder error: {0}")]
    Decoder(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("all sources exhausted")]
    Exhausted,
}

impl PlaybackError {
    /// The user-facing remediation hint for this failure category.
    pub fn remediation_hint(&self) -> &'static str {
        match self {
            Self::NoPlayableUrl => {
                "This source has no direct link. Install or sign in to a debrid add-on, or pick another source."
            }
            Self::Unreachable => "The source did not respond. Try another source.",
            Self::ResolutionFailed(_) => {
                "The provider could not resolve this source. Try another source."
            }
            Self::StartupTimeout => "Playback took too long to start. Try a lighter source.",
            Self::Decoder(_) => "This device could not decode the stream. Try a different quality.",
            Self::Network(_) => "The connection dropped. Check your network and retry.",
            Self::Exhausted => "All available sources failed. Refresh the source list or try again later.",
        }
    }
}
