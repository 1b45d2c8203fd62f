//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Selection (attempts, probes, season-pack filtering)
//! - Recovery (actions by strategy, failovers, terminal failures)
//! - Resume reconciliation (which store won)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Selection Metrics
// =============================================================================

/// Selection attempts total by result.
pub static SELECTION_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "showrunner_selection_attempts_total",
            "Total stream selection attempts",
        ),
        &["result"], // "ok", "no_playable_url", "unreachable", "resolution_failed", "exhausted"
    )
    .unwrap()
});

/// Reachability probes total by outcome.
pub static PROBE_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "showrunner_probe_attempts_total",
            "Total reachability probes",
        ),
        &["outcome"], // "ok", "failed"
    )
    .unwrap()
});

/// Candidate pool sizes seen at selection time.
pub static POOL_SIZE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "showrunner_candidate_pool_size",
            "Number of candidates per selection",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Recovery Metrics
// =============================================================================

/// Recovery actions issued by the health monitor, by strategy.
pub static RECOVERY_ACTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "showrunner_recovery_actions_total",
            "Total recovery actions issued",
        ),
        &["strategy"],
    )
    .unwrap()
});

/// Automatic failovers to another candidate.
pub static FAILOVERS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "showrunner_failovers_total",
        "Total automatic source failovers",
    )
    .unwrap()
});

/// Sessions that reached a terminal failure, by error kind.
pub static PLAYBACK_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "showrunner_playback_failures_total",
            "Total terminal playback failures",
        ),
        &["kind"],
    )
    .unwrap()
});

// =============================================================================
// Resume Metrics
// =============================================================================

/// Which progress source won reconciliation.
pub static RESUME_SOURCE_WINS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "showrunner_resume_source_wins_total",
            "Which progress source produced the resume position",
        ),
        &["source"], // "override", "cloud", "local", "none"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SELECTION_ATTEMPTS.clone()),
        Box::new(PROBE_ATTEMPTS.clone()),
        Box::new(POOL_SIZE.clone()),
        Box::new(RECOVERY_ACTIONS.clone()),
        Box::new(FAILOVERS.clone()),
        Box::new(PLAYBACK_FAILURES.clone()),
        Box::new(RESUME_SOURCE_WINS.clone()),
    ]
}
