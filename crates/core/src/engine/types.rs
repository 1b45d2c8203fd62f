//! Types for the playback engine.

use async_trait::async_trait;

use crate::monitor::{CodecPreference, TelemetrySnapshot};
use crate::resolver::ResolvedStream;
use crate::resume::StreamAffinity;
use crate::selector::SourceHint;

/// The player surface the engine drives.
///
/// Implemented by the host application over its actual media player. All
/// methods are fire-and-forget from the engine's point of view; the effects
/// show up in later telemetry snapshots.
#[async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Current telemetry sample.
    async fn snapshot(&self) -> TelemetrySnapshot;

    /// Prepare and start a stream at the given position.
    async fn load(&self, stream: &ResolvedStream, position_ms: u64);

    /// Re-prepare the current stream and resume at the given position,
    /// optionally after a delay.
    async fn restart(&self, position_ms: u64, delay_ms: u64);

    /// Renegotiate the preferred video codec with a seek-in-place restart.
    async fn set_codec_preference(&self, codec: CodecPreference, position_ms: u64);

    /// Nudge playback without a full re-prepare.
    async fn nudge(&self);

    /// Tear the player down.
    async fn stop(&self);
}

/// Turn a remembered stream affinity into a selection hint.
pub fn hint_from_affinity(affinity: &StreamAffinity) -> SourceHint {
    SourceHint {
        provider_id: affinity.provider_id.clone(),
        source_name: affinity.source_name.clone(),
    }
}
