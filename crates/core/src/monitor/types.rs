//! Types for the playback health monitor.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::StreamCandidate;
use crate::error::PlaybackError;
use crate::scoring::{is_dolby_vision, is_remux, quality_tier};

use super::config::MonitorConfig;

/// Player state as reported by the telemetry surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// One periodic telemetry sample from the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub state: PlayerState,
    pub is_playing: bool,
    pub position_ms: u64,
    pub buffered_ahead_ms: u64,
    pub video_width: u32,
    pub video_height: u32,
    pub has_selected_audio: bool,
}

/// Player error categories, as classified by the host's player integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerErrorCategory {
    DecoderInit,
    DecoderQuery,
    Decoding,
    FormatUnsupported,
    ContainerUnsupported,
    ContainerMalformed,
    IoGeneric,
    IoTimeout,
    IoConnection,
    Other,
}

impl PlayerErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DecoderInit => "decoder_init",
            Self::DecoderQuery => "decoder_query",
            Self::Decoding => "decoding",
            Self::FormatUnsupported => "format_unsupported",
            Self::ContainerUnsupported => "container_unsupported",
            Self::ContainerMalformed => "container_malformed",
            Self::IoGeneric => "io_generic",
            Self::IoTimeout => "io_timeout",
            Self::IoConnection => "io_connection",
            Self::Other => "other",
        }
    }

    /// Whether this category indicts the source (and so justifies
    /// retry/failover) rather than the app.
    pub fn is_source_failure(&self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Timeout-flavored errors get extra same-source retries on heavy
    /// candidates, which legitimately take long to open.
    pub fn is_timeout_flavored(&self) -> bool {
        matches!(self, Self::IoTimeout | Self::IoConnection)
    }

    /// Map to the user-facing failure taxonomy.
    pub fn to_playback_error(self) -> PlaybackError {
        match self {
            Self::IoGeneric | Self::IoTimeout | Self::IoConnection => {
                PlaybackError::Network(self.as_str().to_string())
            }
            _ => PlaybackError::Decoder(self.as_str().to_string()),
        }
    }
}

/// Preferred video codec for renegotiation, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecPreference {
    /// H.265 / HEVC.
    Hevc,
    /// H.264 / AVC.
    Avc,
}

/// Recovery strategies, in the order the cascade evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    CodecFallback,
    SameSourceRestart,
    HeavyRetry,
    SteadyRestart,
    ReResolve,
    Nudge,
    BlackVideoCodecSwap,
    Failover,
}

impl RecoveryStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodecFallback => "codec_fallback",
            Self::SameSourceRestart => "same_source_restart",
            Self::HeavyRetry => "heavy_retry",
            Self::SteadyRestart => "steady_restart",
            Self::ReResolve => "re_resolve",
            Self::Nudge => "nudge",
            Self::BlackVideoCodecSwap => "black_video_codec_swap",
            Self::Failover => "failover",
        }
    }
}

/// An action the monitor asks the playback shell to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Re-prepare the same source and resume at the given position.
    Restart {
        resume_position_ms: u64,
        delay_ms: u64,
    },
    /// Resolve the same candidate again (fresh URL) and restart.
    ReResolveAndRestart { resume_position_ms: u64 },
    /// Renegotiate the preferred video codec with a seek-in-place restart.
    SetCodecPreference {
        codec: CodecPreference,
        resume_position_ms: u64,
    },
    /// Nudge playback without a full re-prepare.
    Nudge,
    /// Fail over to the next untried candidate via the selector.
    Failover,
    /// Terminal: surface the error to the user.
    Fail(PlaybackError),
}

/// Monitor state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    Starting,
    Playing,
    Buffering,
    Recovering(RecoveryStrategy),
    Ended,
    Failed(PlaybackError),
}

/// Kind of a skip interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    Intro,
    Recap,
    Outro,
}

/// An externally supplied skippable segment, consumed only to time the
/// skip affordance in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipInterval {
    pub start_ms: u64,
    pub end_ms: u64,
    pub kind: SkipKind,
}

impl SkipInterval {
    pub fn contains(&self, position_ms: u64) -> bool {
        position_ms >= self.start_ms && position_ms < self.end_ms
    }
}

/// Per-candidate traits that shape recovery policy.
#[derive(Debug, Clone)]
pub struct CandidateProfile {
    /// Dolby-Vision-like: startup stalls renegotiate codec before anything
    /// else, because misreported DV decoder capability dominates that
    /// failure mode.
    pub dolby_vision: bool,
    /// Large/4K/remux/DV: allowed more startup time and timeout retries.
    pub heavy: bool,
    /// Startup budget before the first recovery step.
    pub startup_budget: Duration,
    /// Hard timeout: past this, one re-resolve then failure.
    pub hard_timeout: Duration,
}

impl CandidateProfile {
    /// Compute the profile for a candidate.
    pub fn for_candidate(
        candidate: &StreamCandidate,
        manually_selected: bool,
        config: &MonitorConfig,
    ) -> Self {
        let mut text = candidate.quality_label.clone();
        if let Some(ref hint) = candidate.file_name_hint {
            text.push(' ');
            text.push_str(hint);
        }

        let dolby_vision = is_dolby_vision(&text);
        let large = candidate.size_bytes() >= config.heavy_size_threshold_bytes;
        let uhd = quality_tier(&text) >= 4;
        let remux = is_remux(&text);

        let base = if manually_selected {
            config.manual_startup_timeout_secs
        } else {
            config.startup_timeout_secs
        };
        let bumps = [large, uhd, remux, dolby_vision]
            .iter()
            .filter(|flag| **flag)
            .count() as u64;
        let budget_secs =
            (base + bumps * config.startup_heavy_bump_secs).min(config.startup_timeout_cap_secs);
        let hard_secs = config.startup_hard_timeout_secs.max(budget_secs);

        Self {
            dolby_vision,
            heavy: large || uhd || remux || dolby_vision,
            startup_budget: Duration::from_secs(budget_secs),
            hard_timeout: Duration::from_secs(hard_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(quality: &str, size: &str, hint: &str) -> StreamCandidate {
        StreamCandidate {
            url: Some("https://cdn.example/v.mkv".to_string()),
            provider_id: "p".to_string(),
            provider_group_id: "g".to_string(),
            quality_label: quality.to_string(),
            size_text: size.to_string(),
            file_name_hint: if hint.is_empty() {
                None
            } else {
                Some(hint.to_string())
            },
            cached: false,
            web_ready: true,
            subtitles: vec![],
        }
    }

    #[test]
    fn test_profile_baseline() {
        let config = MonitorConfig::default();
        let profile = CandidateProfile::for_candidate(&candidate("1080p", "2 GB", ""), false, &config);
        assert!(!profile.heavy);
        assert!(!profile.dolby_vision);
        assert_eq!(profile.startup_budget, Duration::from_secs(15));
    }

    #[test]
    fn test_profile_manual_baseline() {
        let config = MonitorConfig::default();
        let profile = CandidateProfile::for_candidate(&candidate("1080p", "2 GB", ""), true, &config);
        assert_eq!(profile.startup_budget, Duration::from_secs(30));
    }

    #[test]
    fn test_profile_heavy_markers_raise_budget() {
        let config = MonitorConfig::default();
        let profile = CandidateProfile::for_candidate(
            &candidate("4K", "20 GB", "Movie.2160p.REMUX.mkv"),
            false,
            &config,
        );
        assert!(profile.heavy);
        // 15 base + 3 bumps (large, 4K, remux) of 15s.
        assert_eq!(profile.startup_budget, Duration::from_secs(60));
    }

    #[test]
    fn test_profile_budget_is_capped() {
        let config = MonitorConfig::default();
        let profile = CandidateProfile::for_candidate(
            &candidate("4K", "30 GB", "Movie.2160p.REMUX.DV.mkv"),
            true,
            &config,
        );
        // 30 + 4*15 = 90 would exceed the cap.
        assert_eq!(profile.startup_budget, Duration::from_secs(75));
        assert!(profile.dolby_vision);
    }

    #[test]
    fn test_error_category_classification() {
        assert!(PlayerErrorCategory::DecoderInit.is_source_failure());
        assert!(PlayerErrorCategory::IoTimeout.is_source_failure());
        assert!(!PlayerErrorCategory::Other.is_source_failure());

        assert!(PlayerErrorCategory::IoTimeout.is_timeout_flavored());
        assert!(PlayerErrorCategory::IoConnection.is_timeout_flavored());
        assert!(!PlayerErrorCategory::Decoding.is_timeout_flavored());

        assert!(matches!(
            PlayerErrorCategory::Decoding.to_playback_error(),
            PlaybackError::Decoder(_)
        ));
        assert!(matches!(
            PlayerErrorCategory::IoConnection.to_playback_error(),
            PlaybackError::Network(_)
        ));
    }

    #[test]
    fn test_skip_interval_contains() {
        let skip = SkipInterval {
            start_ms: 1000,
            end_ms: 2000,
            kind: SkipKind::Intro,
        };
        assert!(!skip.contains(999));
        assert!(skip.contains(1000));
        assert!(skip.contains(1999));
        assert!(!skip.contains(2000));
    }
}
