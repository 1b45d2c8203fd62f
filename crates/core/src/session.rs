//! Runtime state for one playback attempt.
//!
//! A `PlaybackSession` is created when a candidate is first committed and
//! torn down with the player. It owns everything recovery logic mutates:
//! the tried-candidate set, per-strategy attempt counters, and the
//! generation token that async callbacks must validate before writing state,
//! so work finishing after teardown cannot corrupt a newer session.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Bounded-retry gates, one per recovery strategy.
///
/// Each strategy checks and bumps its own counter, which is what keeps the
/// same stall from triggering the same remediation twice in a row without
/// forward progress.
#[derive(Debug, Clone, Default)]
pub struct RecoveryCounters {
    /// Same-source restarts during startup.
    pub restart_attempts: u8,
    /// Codec preference renegotiations for Dolby-Vision-like startup stalls.
    pub codec_fallback_attempts: u8,
    /// Codec renegotiations driven by black-video detection.
    pub black_video_attempts: u8,
    /// Same-source retries for timeout-flavored errors on heavy candidates.
    pub heavy_retry_attempts: u8,
    /// Delayed same-source restarts after playback had started.
    pub steady_restart_attempts: u8,
    /// One-shot re-resolve of the same source past the hard timeout.
    pub re_resolve_attempts: u8,
    /// Long-rebuffer occurrences seen this candidate.
    pub long_rebuffer_count: u8,
}

impl RecoveryCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Runtime state for one playback attempt over a candidate pool.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub id: Uuid,
    generation: u64,
    /// Pool indices ranked best-first at selection time.
    pub ranking: Vec<usize>,
    /// Pool index of the candidate currently playing (or starting).
    pub current: usize,
    /// Candidates already tried this session. Never retried automatically.
    tried: HashSet<usize>,
    /// Set when the user explicitly picked the current source; opts the
    /// session out of automatic failover.
    pub manually_selected: bool,
    /// The single gate between startup and steady-state failure handling.
    pub has_started: bool,
    /// When the current candidate was committed.
    pub selected_at: DateTime<Utc>,
    /// When the player first produced real playback, if it has.
    pub first_ready_at: Option<DateTime<Utc>>,
    pub counters: RecoveryCounters,
}

impl PlaybackSession {
    /// Start a session on the given candidate.
    pub fn new(ranking: Vec<usize>, initial: usize, manually_selected: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation: 0,
            ranking,
            current: initial,
            tried: HashSet::new(),
            manually_selected,
            has_started: false,
            selected_at: Utc::now(),
            first_ready_at: None,
            counters: RecoveryCounters::default(),
        }
    }

    /// Current liveness token. Capture before an await, validate after.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a captured token still refers to this session's live state.
    pub fn is_live(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Invalidate all in-flight work (teardown, or the user changed course).
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub fn mark_tried(&mut self, index: usize) {
        self.tried.insert(index);
    }

    pub fn was_tried(&self, index: usize) -> bool {
        self.tried.contains(&index)
    }

    /// Ranked pool indices not yet tried and not currently playing.
    pub fn untried(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranking
            .iter()
            .copied()
            .filter(|idx| *idx != self.current && !self.tried.contains(idx))
    }

    pub fn has_untried(&self) -> bool {
        self.untried().next().is_some()
    }

    /// Commit an automatic failover to another candidate.
    ///
    /// The previous candidate joins the tried set and all per-candidate
    /// recovery gates re-arm. The generation is bumped so recovery work
    /// still in flight for the old candidate is dropped.
    pub fn switch_to(&mut self, index: usize) {
        self.tried.insert(self.current);
        self.current = index;
        self.has_started = false;
        self.first_ready_at = None;
        self.selected_at = Utc::now();
        self.counters.reset();
        self.manually_selected = false;
        self.generation += 1;
    }

    /// Commit a manual source reselection.
    ///
    /// Clears every recovery counter and pins the source: no automatic
    /// failover will move off a candidate the user chose. The tried set is
    /// bypassed, not cleared; the user may deliberately retry a failed one.
    pub fn reselect_manual(&mut self, index: usize) {
        self.current = index;
        self.has_started = false;
        self.first_ready_at = None;
        self.selected_at = Utc::now();
        self.counters.reset();
        self.manually_selected = true;
        self.generation += 1;
    }

    /// Record the first sustained frame of real playback.
    pub fn mark_started(&mut self) {
        if !self.has_started {
            self.has_started = true;
            self.first_ready_at = Some(Utc::now());
        }
    }
}
