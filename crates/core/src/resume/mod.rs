//! Resume position reconciliation.
//!
//! Progress for one title can live in two places at once: a cloud history
//! store and a local continue-watching store, written by different app
//! versions on different devices, sometimes in different units. This module
//! merges those signals into one authoritative resume point.
//!
//! [`reconcile`] is deterministic and side-effect-free; all I/O lives in
//! [`gather`] and [`gather_and_reconcile`].

mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::TitleKey;
use crate::metrics;

/// Configuration for resume reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeConfig {
    /// Bound on waiting for any one progress store, so a stale history
    /// provider can never block the UI.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Positions below this are noise from failed-at-zero attempts; the
    /// persisted stream affinity is discarded under it.
    #[serde(default = "default_meaningful_position_secs")]
    pub meaningful_position_secs: u64,

    /// Seconds values above this ceiling are assumed to be legacy rows
    /// stored in milliseconds and are divided by 1000 before use.
    #[serde(default = "default_plausible_seconds_ceiling")]
    pub plausible_seconds_ceiling: f64,
}

fn default_store_timeout_ms() -> u64 {
    1200
}

fn default_meaningful_position_secs() -> u64 {
    30
}

fn default_plausible_seconds_ceiling() -> f64 {
    86_400.0
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            meaningful_position_secs: default_meaningful_position_secs(),
            plausible_seconds_ceiling: default_plausible_seconds_ceiling(),
        }
    }
}

/// Merge progress records into one resume decision.
///
/// Priority: an explicit navigation override wins outright; otherwise each
/// record's position is computed (stored position, then duration x fraction,
/// then canonical runtime x fraction) and the larger one wins, ties
/// preferring cloud. A final position under the meaningful-progress floor
/// keeps its position but drops the stream affinity.
pub fn reconcile(
    cloud: Option<&ResumeRecord>,
    local: Option<&ResumeRecord>,
    override_position_ms: Option<u64>,
    canonical_runtime_secs: Option<u32>,
    config: &ResumeConfig,
) -> ResumeDecision {
    let cloud_secs = cloud.and_then(|r| effective_position_secs(r, canonical_runtime_secs, config));
    let local_secs = local.and_then(|r| effective_position_secs(r, canonical_runtime_secs, config));

    let winner = match (cloud_secs, local_secs) {
        (Some(c), Some(l)) if l > c => Some((ResumeSource::Local, l)),
        (Some(c), _) => Some((ResumeSource::Cloud, c)),
        (None, Some(l)) => Some((ResumeSource::Local, l)),
        (None, None) => None,
    };

    let (source, position_ms) = match (override_position_ms, winner) {
        (Some(over), _) => (ResumeSource::Override, over),
        (None, Some((source, secs))) => (source, (secs * 1000.0).round() as u64),
        (None, None) => (ResumeSource::None, 0),
    };

    let affinity = match winner.map(|(s, _)| s) {
        _ if position_ms < config.meaningful_position_secs * 1000 => None,
        Some(ResumeSource::Cloud) => cloud.and_then(|r| r.affinity.clone()),
        Some(ResumeSource::Local) => local.and_then(|r| r.affinity.clone()),
        _ => None,
    };

    ResumeDecision {
        position_ms,
        affinity,
        source,
    }
}

/// Compute a record's position in seconds, with unit repair.
///
/// Fallback chain: stored position, duration x fraction, canonical runtime
/// x fraction. Anything implausible degrades to `None` rather than erroring.
fn effective_position_secs(
    record: &ResumeRecord,
    canonical_runtime_secs: Option<u32>,
    config: &ResumeConfig,
) -> Option<f64> {
    if let Some(position) = record.position_secs.filter(|p| *p > 0.0) {
        return repair_units(position, config.plausible_seconds_ceiling);
    }

    let fraction = record.fraction_complete.filter(|f| *f > 0.0 && *f <= 1.0)?;

    if let Some(duration) = record
        .duration_secs
        .filter(|d| *d > 0.0)
        .and_then(|d| repair_units(d, config.plausible_seconds_ceiling))
    {
        return Some(duration * fraction);
    }

    canonical_runtime_secs
        .filter(|r| *r > 0)
        .map(|r| r as f64 * fraction)
}

/// Repair seconds values that were actually stored in milliseconds.
/// A value still past the ceiling after repair is discarded as garbage.
fn repair_units(value: f64, ceiling: f64) -> Option<f64> {
    let repaired = if value > ceiling { value / 1000.0 } else { value };
    (repaired <= ceiling).then_some(repaired)
}

/// Fetch both progress records concurrently, each under its own bound.
///
/// A slow or failing store degrades to `None`; gathering never errors.
pub async fn gather(
    cloud_store: &Arc<dyn ProgressStore>,
    local_store: &Arc<dyn ProgressStore>,
    key: &TitleKey,
    config: &ResumeConfig,
) -> (Option<ResumeRecord>, Option<ResumeRecord>) {
    let bound = Duration::from_millis(config.store_timeout_ms);

    let (cloud, local) = futures::future::join(
        tokio::time::timeout(bound, cloud_store.fetch(key)),
        tokio::time::timeout(bound, local_store.fetch(key)),
    )
    .await;

    (
        flatten_fetch(cloud, cloud_store.name()),
        flatten_fetch(local, local_store.name()),
    )
}

fn flatten_fetch(
    result: Result<Result<Option<ResumeRecord>, ProgressError>, tokio::time::error::Elapsed>,
    store: &str,
) -> Option<ResumeRecord> {
    match result {
        Ok(Ok(record)) => record,
        Ok(Err(e)) => {
            warn!(store, error = %e, "progress store fetch failed");
            None
        }
        Err(_) => {
            warn!(store, "progress store fetch timed out");
            None
        }
    }
}

/// Gather both records and reconcile them in one call.
pub async fn gather_and_reconcile(
    cloud_store: &Arc<dyn ProgressStore>,
    local_store: &Arc<dyn ProgressStore>,
    key: &TitleKey,
    override_position_ms: Option<u64>,
    canonical_runtime_secs: Option<u32>,
    config: &ResumeConfig,
) -> ResumeDecision {
    let (cloud, local) = gather(cloud_store, local_store, key, config).await;
    let decision = reconcile(
        cloud.as_ref(),
        local.as_ref(),
        override_position_ms,
        canonical_runtime_secs,
        config,
    );

    metrics::RESUME_SOURCE_WINS
        .with_label_values(&[decision.source.as_str()])
        .inc();
    debug!(
        position_ms = decision.position_ms,
        source = decision.source.as_str(),
        has_affinity = decision.affinity.is_some(),
        "resume reconciled"
    );

    decision
}
