//! Playback coordinator.
//!
//! Owns the candidate pool and session for one playback attempt and turns
//! the monitor's recovery actions into player and selector calls. Every
//! mutation after an await revalidates the session generation, so recovery
//! work finishing after teardown or a source switch is dropped instead of
//! corrupting the newer state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{StreamCandidate, TitleKey};
use crate::error::PlaybackError;
use crate::monitor::{
    HealthMonitor, MonitorConfig, MonitorState, PlayerErrorCategory, RecoveryAction, SkipInterval,
};
use crate::resolver::StreamResolver;
use crate::resume::{
    self, ProgressStore, ResumeConfig, ResumeDecision, StreamAffinity,
};
use crate::selector::{SelectionOutcome, SelectionPrefs, StreamSelector};
use crate::session::PlaybackSession;

use super::types::PlayerHandle;

/// Coordinates one playback attempt end to end.
pub struct PlaybackCoordinator {
    selector: StreamSelector,
    monitor_config: MonitorConfig,
    resume_config: ResumeConfig,
    resolver: Arc<dyn StreamResolver>,
    player: Arc<dyn PlayerHandle>,
    cloud_store: Arc<dyn ProgressStore>,
    local_store: Arc<dyn ProgressStore>,

    key: Option<TitleKey>,
    pool: Vec<StreamCandidate>,
    session: Option<PlaybackSession>,
    monitor: Option<HealthMonitor>,
    terminal_error: Option<PlaybackError>,
}

impl PlaybackCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        selector: StreamSelector,
        monitor_config: MonitorConfig,
        resume_config: ResumeConfig,
        resolver: Arc<dyn StreamResolver>,
        player: Arc<dyn PlayerHandle>,
        cloud_store: Arc<dyn ProgressStore>,
        local_store: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            selector,
            monitor_config,
            resume_config,
            resolver,
            player,
            cloud_store,
            local_store,
            key: None,
            pool: Vec::new(),
            session: None,
            monitor: None,
            terminal_error: None,
        }
    }

    /// Reconcile the resume position for a title from both progress stores.
    pub async fn reconcile_resume(
        &self,
        key: &TitleKey,
        override_position_ms: Option<u64>,
        canonical_runtime_secs: Option<u32>,
    ) -> ResumeDecision {
        resume::gather_and_reconcile(
            &self.cloud_store,
            &self.local_store,
            key,
            override_position_ms,
            canonical_runtime_secs,
            &self.resume_config,
        )
        .await
    }

    /// Select a candidate from the pool and start playback.
    pub async fn start_playback(
        &mut self,
        key: TitleKey,
        pool: Vec<StreamCandidate>,
        prefs: &SelectionPrefs,
        start_position_ms: u64,
    ) -> Result<SelectionOutcome, PlaybackError> {
        let outcome = self.selector.select_initial(&pool, prefs).await?;

        let session = PlaybackSession::new(outcome.ranking.clone(), outcome.index, outcome.via_hint);
        let monitor = HealthMonitor::new(
            self.monitor_config.clone(),
            &outcome.candidate,
            outcome.index,
            outcome.via_hint,
        );

        self.key = Some(key);
        self.pool = pool;
        self.session = Some(session);
        self.monitor = Some(monitor);
        self.terminal_error = None;

        self.player.load(&outcome.resolved, start_position_ms).await;
        Ok(outcome)
    }

    /// Hand skip intervals to the monitor for UI affordance timing.
    pub fn set_skip_intervals(&mut self, intervals: Vec<SkipInterval>) {
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.set_skip_intervals(intervals);
        }
    }

    /// One telemetry tick: sample the player, consult the monitor, execute
    /// whatever it asks for.
    pub async fn tick(&mut self) {
        let action = {
            let (Some(monitor), Some(session)) = (self.monitor.as_mut(), self.session.as_mut())
            else {
                return;
            };
            let snapshot = self.player.snapshot().await;
            monitor.on_tick(session, &snapshot)
        };

        if let Some(action) = action {
            self.apply(action).await;
        }
    }

    /// An asynchronous player error event.
    pub async fn handle_player_error(&mut self, category: PlayerErrorCategory) {
        let action = {
            let (Some(monitor), Some(session)) = (self.monitor.as_mut(), self.session.as_mut())
            else {
                return;
            };
            monitor.on_player_error(session, category)
        };

        if let Some(action) = action {
            self.apply(action).await;
        }
    }

    /// The user explicitly picked a candidate: commit it verbatim, clear
    /// recovery counters and pin the source against automatic failover.
    pub async fn reselect_manual(&mut self, index: usize) -> Result<(), PlaybackError> {
        let candidate = self
            .pool
            .get(index)
            .cloned()
            .ok_or_else(|| PlaybackError::ResolutionFailed(format!("no candidate {}", index)))?;

        let resolved = self
            .resolver
            .resolve(&candidate)
            .await
            .map_err(|e| PlaybackError::ResolutionFailed(e.to_string()))?;

        if let Some(session) = self.session.as_mut() {
            session.reselect_manual(index);
        } else {
            self.session = Some(PlaybackSession::new(vec![index], index, true));
        }
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.rebind(&candidate, index, true);
        } else {
            self.monitor = Some(HealthMonitor::new(
                self.monitor_config.clone(),
                &candidate,
                index,
                true,
            ));
        }
        self.terminal_error = None;

        info!(index, provider = %candidate.provider_id, "manual source reselection");
        self.player.load(&resolved, 0).await;
        Ok(())
    }

    /// Persist final progress to both stores.
    pub async fn record_progress(&self, position_secs: f64, duration_secs: f64) {
        let Some(key) = self.key.as_ref() else {
            return;
        };
        let affinity = self.current_affinity();

        let (cloud, local) = tokio::join!(
            self.cloud_store
                .persist(key, position_secs, duration_secs, affinity.as_ref()),
            self.local_store
                .persist(key, position_secs, duration_secs, affinity.as_ref()),
        );
        if let Err(e) = cloud {
            warn!(store = self.cloud_store.name(), error = %e, "progress persist failed");
        }
        if let Err(e) = local {
            warn!(store = self.local_store.name(), error = %e, "progress persist failed");
        }
    }

    /// Tear the session down. In-flight recovery work is invalidated and
    /// will not touch state for whatever comes next.
    pub async fn teardown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.invalidate();
        }
        self.session = None;
        self.monitor = None;
        self.pool.clear();
        self.key = None;
        self.player.stop().await;
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn monitor_state(&self) -> Option<&MonitorState> {
        self.monitor.as_ref().map(|m| m.state())
    }

    pub fn terminal_error(&self) -> Option<&PlaybackError> {
        self.terminal_error.as_ref()
    }

    pub fn current_candidate(&self) -> Option<&StreamCandidate> {
        self.session
            .as_ref()
            .and_then(|s| self.pool.get(s.current))
    }

    fn current_affinity(&self) -> Option<StreamAffinity> {
        self.current_candidate().map(|c| StreamAffinity {
            provider_id: c.provider_id.clone(),
            source_name: c.file_name_hint.clone(),
        })
    }

    async fn apply(&mut self, action: RecoveryAction) {
        match action {
            RecoveryAction::Restart {
                resume_position_ms,
                delay_ms,
            } => {
                self.player.restart(resume_position_ms, delay_ms).await;
            }
            RecoveryAction::SetCodecPreference {
                codec,
                resume_position_ms,
            } => {
                self.player
                    .set_codec_preference(codec, resume_position_ms)
                    .await;
            }
            RecoveryAction::Nudge => {
                self.player.nudge().await;
            }
            RecoveryAction::ReResolveAndRestart { resume_position_ms } => {
                self.re_resolve(resume_position_ms).await;
            }
            RecoveryAction::Failover => {
                self.failover().await;
            }
            RecoveryAction::Fail(error) => {
                self.fail_terminal(error).await;
            }
        }
    }

    /// Resolve the current candidate again (fresh URL) and reload.
    async fn re_resolve(&mut self, resume_position_ms: u64) {
        let Some((generation, candidate)) = self
            .session
            .as_ref()
            .and_then(|s| self.pool.get(s.current).cloned().map(|c| (s.generation(), c)))
        else {
            return;
        };

        let resolved = self.resolver.resolve(&candidate).await;

        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.is_live(generation) {
            debug!("stale re-resolve result dropped");
            return;
        }

        match resolved {
            Ok(resolved) => self.player.load(&resolved, resume_position_ms).await,
            Err(e) => {
                // The monitor's hard-timeout path surfaces the failure on a
                // later tick; nothing more to do here.
                warn!(error = %e, "re-resolve failed");
            }
        }
    }

    /// Commit the next untried candidate, or fail the session for good.
    async fn failover(&mut self) {
        let Some(generation) = self.session.as_ref().map(|s| s.generation()) else {
            return;
        };

        let outcome = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            self.selector.next_failover(&self.pool, session).await
        };

        match outcome {
            Ok(outcome) => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                if !session.is_live(generation) {
                    debug!("stale failover result dropped");
                    return;
                }
                session.switch_to(outcome.index);
                if let Some(monitor) = self.monitor.as_mut() {
                    monitor.rebind(&outcome.candidate, outcome.index, false);
                }
                self.player.load(&outcome.resolved, 0).await;
            }
            Err(error) => {
                self.fail_terminal(error).await;
            }
        }
    }

    async fn fail_terminal(&mut self, error: PlaybackError) {
        warn!(
            error = %error,
            hint = error.remediation_hint(),
            "playback terminally failed"
        );
        self.terminal_error = Some(error);
        self.player.stop().await;
    }
}
