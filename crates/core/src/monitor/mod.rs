//! Playback health monitor.
//!
//! A state machine fed by periodic player telemetry and asynchronous error
//! events. It detects stalled startup, mid-stream rebuffering, black video
//! and source-level errors, and answers each with a recovery action chosen
//! from an ordered cascade of guarded strategies: codec renegotiation for
//! Dolby-Vision-like stalls, same-source restart, re-resolve, failover to
//! the next untried candidate, and finally a terminal failure.
//!
//! The monitor never executes anything itself; it returns a
//! [`RecoveryAction`] for the playback shell to carry out. Each strategy
//! carries its own one-shot or bounded-retry gate in the session's counters,
//! and a shared cool-down keeps actions from overlapping.

mod config;
mod types;

pub use config::MonitorConfig;
pub use types::*;

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::StreamCandidate;
use crate::error::PlaybackError;
use crate::metrics;
use crate::session::PlaybackSession;

/// Watches one playback attempt and drives recovery.
pub struct HealthMonitor {
    config: MonitorConfig,
    profile: CandidateProfile,
    state: MonitorState,
    candidate_index: usize,
    /// When the current candidate was handed to the player.
    candidate_started_at: Instant,
    last_position_ms: u64,
    black_video_since: Option<Instant>,
    rebuffer_since: Option<Instant>,
    nudged_this_rebuffer: bool,
    last_action_at: Option<Instant>,
    skip_intervals: Vec<SkipInterval>,
}

impl HealthMonitor {
    /// Start monitoring a freshly committed candidate.
    pub fn new(
        config: MonitorConfig,
        candidate: &StreamCandidate,
        candidate_index: usize,
        manually_selected: bool,
    ) -> Self {
        let profile = CandidateProfile::for_candidate(candidate, manually_selected, &config);
        debug!(
            candidate = candidate_index,
            heavy = profile.heavy,
            dolby_vision = profile.dolby_vision,
            budget_secs = profile.startup_budget.as_secs(),
            "monitor armed"
        );
        Self {
            config,
            profile,
            state: MonitorState::Starting,
            candidate_index,
            candidate_started_at: Instant::now(),
            last_position_ms: 0,
            black_video_since: None,
            rebuffer_since: None,
            nudged_this_rebuffer: false,
            last_action_at: None,
            skip_intervals: Vec::new(),
        }
    }

    /// Re-arm the monitor for a new candidate after failover or manual
    /// reselection. Per-candidate counters live in the session and were
    /// already reset there.
    pub fn rebind(
        &mut self,
        candidate: &StreamCandidate,
        candidate_index: usize,
        manually_selected: bool,
    ) {
        self.profile = CandidateProfile::for_candidate(candidate, manually_selected, &self.config);
        self.state = MonitorState::Starting;
        self.candidate_index = candidate_index;
        self.candidate_started_at = Instant::now();
        self.last_position_ms = 0;
        self.black_video_since = None;
        self.rebuffer_since = None;
        self.nudged_this_rebuffer = false;
        self.last_action_at = None;
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn set_skip_intervals(&mut self, intervals: Vec<SkipInterval>) {
        self.skip_intervals = intervals;
    }

    /// The skip interval covering a position, for UI affordance timing.
    pub fn active_skip(&self, position_ms: u64) -> Option<&SkipInterval> {
        self.skip_intervals.iter().find(|s| s.contains(position_ms))
    }

    /// Consume one telemetry tick.
    pub fn on_tick(
        &mut self,
        session: &mut PlaybackSession,
        snapshot: &TelemetrySnapshot,
    ) -> Option<RecoveryAction> {
        if matches!(self.state, MonitorState::Ended | MonitorState::Failed(_)) {
            return None;
        }
        if snapshot.state == PlayerState::Ended {
            self.state = MonitorState::Ended;
            return None;
        }

        let now = Instant::now();

        let progressed = snapshot.is_playing && snapshot.position_ms > self.last_position_ms;
        if progressed {
            self.last_position_ms = snapshot.position_ms;
            if !session.has_started {
                session.mark_started();
                info!(candidate = self.candidate_index, "playback started");
            }
            self.state = MonitorState::Playing;
            self.rebuffer_since = None;
            self.nudged_this_rebuffer = false;
        }

        if let Some(action) = self.check_black_video(session, snapshot, now) {
            return Some(action);
        }

        if session.has_started {
            self.steady_tick(session, snapshot, now)
        } else {
            self.startup_tick(session, snapshot, now)
        }
    }

    /// Consume an asynchronous player error event.
    pub fn on_player_error(
        &mut self,
        session: &mut PlaybackSession,
        category: PlayerErrorCategory,
    ) -> Option<RecoveryAction> {
        if matches!(self.state, MonitorState::Ended | MonitorState::Failed(_)) {
            return None;
        }
        if !category.is_source_failure() {
            debug!(
                candidate = self.candidate_index,
                category = category.as_str(),
                "ignoring non-source player error"
            );
            return None;
        }

        let now = Instant::now();
        warn!(
            candidate = self.candidate_index,
            category = category.as_str(),
            has_started = session.has_started,
            "player error"
        );
        if !self.cooldown_open(now) {
            debug!("recovery suppressed, previous action still cooling down");
            return None;
        }

        if !session.has_started {
            if self.profile.heavy
                && category.is_timeout_flavored()
                && session.counters.heavy_retry_attempts < self.config.heavy_timeout_retry_limit
            {
                session.counters.heavy_retry_attempts += 1;
                let attempt = session.counters.heavy_retry_attempts;
                return Some(self.issue(
                    RecoveryStrategy::HeavyRetry,
                    attempt,
                    RecoveryAction::Restart {
                        resume_position_ms: 0,
                        delay_ms: self.config.steady_restart_delay_ms,
                    },
                    now,
                ));
            }
            if !session.manually_selected && session.has_untried() {
                return Some(self.issue(RecoveryStrategy::Failover, 1, RecoveryAction::Failover, now));
            }
            return Some(self.fail(category.to_playback_error()));
        }

        if session.counters.steady_restart_attempts < self.config.steady_restart_limit {
            session.counters.steady_restart_attempts += 1;
            let attempt = session.counters.steady_restart_attempts;
            return Some(self.issue(
                RecoveryStrategy::SteadyRestart,
                attempt,
                RecoveryAction::Restart {
                    resume_position_ms: self.last_position_ms,
                    delay_ms: self.config.steady_restart_delay_ms,
                },
                now,
            ));
        }
        Some(self.fail(category.to_playback_error()))
    }

    /// Black video: player claims ready and playing with audio selected but
    /// reports zero video dimensions. No error event fires for this, so it
    /// gets its own detector, independent of the generic error path.
    fn check_black_video(
        &mut self,
        session: &mut PlaybackSession,
        snapshot: &TelemetrySnapshot,
        now: Instant,
    ) -> Option<RecoveryAction> {
        let black = snapshot.is_playing
            && snapshot.state == PlayerState::Ready
            && snapshot.has_selected_audio
            && (snapshot.video_width == 0 || snapshot.video_height == 0);

        if !black {
            self.black_video_since = None;
            return None;
        }

        let since = *self.black_video_since.get_or_insert(now);
        if session.counters.black_video_attempts >= 2 {
            return None;
        }
        let window = if session.counters.black_video_attempts == 0 {
            Duration::from_millis(self.config.black_video_first_window_ms)
        } else {
            Duration::from_millis(self.config.black_video_second_window_ms)
        };
        if now.duration_since(since) < window || !self.cooldown_open(now) {
            return None;
        }

        session.counters.black_video_attempts += 1;
        let attempt = session.counters.black_video_attempts;
        // Re-arm: a second swap needs a fresh sustained recurrence.
        self.black_video_since = None;
        let codec = if attempt == 1 {
            CodecPreference::Hevc
        } else {
            CodecPreference::Avc
        };
        Some(self.issue(
            RecoveryStrategy::BlackVideoCodecSwap,
            attempt,
            RecoveryAction::SetCodecPreference {
                codec,
                resume_position_ms: snapshot.position_ms,
            },
            now,
        ))
    }

    /// Startup-phase stall handling: the cascade runs once the per-candidate
    /// budget is spent, one strategy per tick, each behind its own gate.
    fn startup_tick(
        &mut self,
        session: &mut PlaybackSession,
        snapshot: &TelemetrySnapshot,
        now: Instant,
    ) -> Option<RecoveryAction> {
        let stalled = matches!(snapshot.state, PlayerState::Buffering | PlayerState::Idle)
            || (snapshot.state == PlayerState::Ready && !snapshot.is_playing);
        if !stalled {
            return None;
        }

        let waited = now.duration_since(self.candidate_started_at);
        if waited < self.profile.startup_budget || !self.cooldown_open(now) {
            return None;
        }

        if self.profile.dolby_vision && session.counters.codec_fallback_attempts < 2 {
            session.counters.codec_fallback_attempts += 1;
            let attempt = session.counters.codec_fallback_attempts;
            let codec = if attempt == 1 {
                CodecPreference::Hevc
            } else {
                CodecPreference::Avc
            };
            return Some(self.issue(
                RecoveryStrategy::CodecFallback,
                attempt,
                RecoveryAction::SetCodecPreference {
                    codec,
                    resume_position_ms: 0,
                },
                now,
            ));
        }

        if session.counters.restart_attempts < 1 {
            session.counters.restart_attempts += 1;
            return Some(self.issue(
                RecoveryStrategy::SameSourceRestart,
                1,
                RecoveryAction::Restart {
                    resume_position_ms: 0,
                    delay_ms: 0,
                },
                now,
            ));
        }

        if !session.manually_selected && session.has_untried() {
            return Some(self.issue(RecoveryStrategy::Failover, 1, RecoveryAction::Failover, now));
        }

        if waited >= self.profile.hard_timeout {
            if session.counters.re_resolve_attempts < 1 {
                session.counters.re_resolve_attempts += 1;
                return Some(self.issue(
                    RecoveryStrategy::ReResolve,
                    1,
                    RecoveryAction::ReResolveAndRestart {
                        resume_position_ms: 0,
                    },
                    now,
                ));
            }
            return Some(self.fail(PlaybackError::StartupTimeout));
        }

        None
    }

    /// Steady-state rebuffer watchdog.
    fn steady_tick(
        &mut self,
        session: &mut PlaybackSession,
        snapshot: &TelemetrySnapshot,
        now: Instant,
    ) -> Option<RecoveryAction> {
        if !matches!(snapshot.state, PlayerState::Buffering) {
            self.rebuffer_since = None;
            self.nudged_this_rebuffer = false;
            return None;
        }

        self.state = MonitorState::Buffering;
        let since = *self.rebuffer_since.get_or_insert(now);
        if now.duration_since(since) < Duration::from_secs(self.config.rebuffer_watchdog_secs)
            || !self.cooldown_open(now)
        {
            return None;
        }

        if !self.nudged_this_rebuffer {
            self.nudged_this_rebuffer = true;
            session.counters.long_rebuffer_count += 1;
            let occurrence = session.counters.long_rebuffer_count;
            return Some(self.issue(RecoveryStrategy::Nudge, occurrence, RecoveryAction::Nudge, now));
        }

        // Mid-stream failover is deliberately conservative: disabled unless
        // policy opts in, and only after repeated long rebuffers.
        if self.config.allow_mid_playback_source_fallback
            && session.counters.long_rebuffer_count >= self.config.mid_playback_fallback_rebuffer_count
            && !session.manually_selected
            && session.has_untried()
        {
            return Some(self.issue(RecoveryStrategy::Failover, 1, RecoveryAction::Failover, now));
        }

        None
    }

    fn cooldown_open(&self, now: Instant) -> bool {
        self.last_action_at.map_or(true, |at| {
            now.duration_since(at) >= Duration::from_secs(self.config.recovery_cooldown_secs)
        })
    }

    fn issue(
        &mut self,
        strategy: RecoveryStrategy,
        attempt: u8,
        action: RecoveryAction,
        now: Instant,
    ) -> RecoveryAction {
        self.state = MonitorState::Recovering(strategy);
        self.last_action_at = Some(now);
        metrics::RECOVERY_ACTIONS
            .with_label_values(&[strategy.as_str()])
            .inc();
        if strategy == RecoveryStrategy::Failover {
            metrics::FAILOVERS.inc();
        }
        info!(
            candidate = self.candidate_index,
            strategy = strategy.as_str(),
            attempt,
            "issuing recovery action"
        );
        action
    }

    fn fail(&mut self, error: PlaybackError) -> RecoveryAction {
        warn!(
            candidate = self.candidate_index,
            error = %error,
            "playback failed, local remediation exhausted"
        );
        metrics::PLAYBACK_FAILURES
            .with_label_values(&[match error {
                PlaybackError::StartupTimeout => "startup_timeout",
                PlaybackError::Decoder(_) => "decoder",
                PlaybackError::Network(_) => "network",
                PlaybackError::Exhausted => "exhausted",
                PlaybackError::NoPlayableUrl => "no_playable_url",
                PlaybackError::Unreachable => "unreachable",
                PlaybackError::ResolutionFailed(_) => "resolution_failed",
            }])
            .inc();
        self.state = MonitorState::Failed(error.clone());
        RecoveryAction::Fail(error)
    }
}
