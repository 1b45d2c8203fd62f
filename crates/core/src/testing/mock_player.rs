//! Mock player for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::PlayerHandle;
use crate::monitor::{CodecPreference, PlayerState, TelemetrySnapshot};
use crate::resolver::ResolvedStream;

/// A recorded player call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    Load { url: String, position_ms: u64 },
    Restart { position_ms: u64, delay_ms: u64 },
    SetCodec { codec: CodecPreference, position_ms: u64 },
    Nudge,
    Stop,
}

/// Mock implementation of the `PlayerHandle` trait.
///
/// Telemetry is whatever the test last set; every control call is recorded.
pub struct MockPlayer {
    snapshot: Arc<RwLock<TelemetrySnapshot>>,
    calls: Arc<RwLock<Vec<PlayerCall>>>,
}

impl Default for MockPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlayer {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(TelemetrySnapshot {
                state: PlayerState::Idle,
                is_playing: false,
                position_ms: 0,
                buffered_ahead_ms: 0,
                video_width: 0,
                video_height: 0,
                has_selected_audio: false,
            })),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the telemetry returned by subsequent `snapshot` calls.
    pub async fn set_snapshot(&self, snapshot: TelemetrySnapshot) {
        *self.snapshot.write().await = snapshot;
    }

    /// All recorded calls, in order.
    pub async fn calls(&self) -> Vec<PlayerCall> {
        self.calls.read().await.clone()
    }

    /// The URL of the most recent `Load` call, if any.
    pub async fn last_loaded_url(&self) -> Option<String> {
        self.calls
            .read()
            .await
            .iter()
            .rev()
            .find_map(|call| match call {
                PlayerCall::Load { url, .. } => Some(url.clone()),
                _ => None,
            })
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }
}

#[async_trait]
impl PlayerHandle for MockPlayer {
    async fn snapshot(&self) -> TelemetrySnapshot {
        self.snapshot.read().await.clone()
    }

    async fn load(&self, stream: &ResolvedStream, position_ms: u64) {
        self.calls.write().await.push(PlayerCall::Load {
            url: stream.url.clone(),
            position_ms,
        });
    }

    async fn restart(&self, position_ms: u64, delay_ms: u64) {
        self.calls.write().await.push(PlayerCall::Restart {
            position_ms,
            delay_ms,
        });
    }

    async fn set_codec_preference(&self, codec: CodecPreference, position_ms: u64) {
        self.calls.write().await.push(PlayerCall::SetCodec {
            codec,
            position_ms,
        });
    }

    async fn nudge(&self) {
        self.calls.write().await.push(PlayerCall::Nudge);
    }

    async fn stop(&self) {
        self.calls.write().await.push(PlayerCall::Stop);
    }
}
