//! Shared fixtures for unit and integration tests.

use crate::catalog::StreamCandidate;
use crate::monitor::{PlayerState, TelemetrySnapshot};
use crate::resume::{ResumeRecord, StreamAffinity};

/// A direct-HTTP candidate hosted at `https://<provider>.example/`.
pub fn http_candidate(provider: &str, quality: &str, size: &str) -> StreamCandidate {
    StreamCandidate {
        url: Some(format!("https://{}.example/stream.mkv", provider)),
        provider_id: provider.to_string(),
        provider_group_id: provider.to_string(),
        quality_label: quality.to_string(),
        size_text: size.to_string(),
        file_name_hint: Some(format!("Movie.2021.{}.WEB-DL.mkv", quality)),
        cached: false,
        web_ready: true,
        subtitles: vec![],
    }
}

/// A magnet-only candidate (not directly playable).
pub fn magnet_candidate(provider: &str) -> StreamCandidate {
    StreamCandidate {
        url: Some("magnet:?xt=urn:btih:abcdef0123456789".to_string()),
        provider_id: provider.to_string(),
        provider_group_id: provider.to_string(),
        quality_label: "1080p".to_string(),
        size_text: "2 GB".to_string(),
        file_name_hint: Some("Movie.2021.1080p.mkv".to_string()),
        cached: false,
        web_ready: false,
        subtitles: vec![],
    }
}

/// A cached debrid-CDN candidate (trusted without probing).
pub fn debrid_candidate(provider: &str) -> StreamCandidate {
    StreamCandidate {
        url: Some(format!(
            "https://cdn3.real-debrid.com/d/{}/stream.mkv",
            provider
        )),
        provider_id: provider.to_string(),
        provider_group_id: provider.to_string(),
        quality_label: "1080p".to_string(),
        size_text: "4 GB".to_string(),
        file_name_hint: Some("Movie.2021.1080p.WEB-DL.mkv".to_string()),
        cached: true,
        web_ready: true,
        subtitles: vec![],
    }
}

/// A resume record with a stored position and affinity.
pub fn resume_record(position_secs: f64, provider: &str) -> ResumeRecord {
    ResumeRecord {
        position_secs: Some(position_secs),
        duration_secs: None,
        fraction_complete: None,
        season: None,
        episode: None,
        affinity: Some(StreamAffinity {
            provider_id: provider.to_string(),
            source_name: None,
        }),
    }
}

/// Telemetry: healthy playback at a position.
pub fn playing_snapshot(position_ms: u64) -> TelemetrySnapshot {
    TelemetrySnapshot {
        state: PlayerState::Ready,
        is_playing: true,
        position_ms,
        buffered_ahead_ms: 30_000,
        video_width: 1920,
        video_height: 1080,
        has_selected_audio: true,
    }
}

/// Telemetry: stuck buffering before any playback.
pub fn stalled_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        state: PlayerState::Buffering,
        is_playing: false,
        position_ms: 0,
        buffered_ahead_ms: 0,
        video_width: 0,
        video_height: 0,
        has_selected_audio: false,
    }
}
