//! Resume reconciliation integration tests.
//!
//! Exercises the concurrent gather path against mocked progress stores:
//! disagreeing records, slow stores degrading under the per-store bound,
//! and store failures never surfacing to the caller.

use std::sync::Arc;
use std::time::Duration;

use showrunner_core::resume::{
    gather_and_reconcile, ProgressError, ProgressStore, ResumeConfig, ResumeRecord, ResumeSource,
};
use showrunner_core::testing::{fixtures, MockProgressStore};
use showrunner_core::TitleKey;

fn stores() -> (Arc<MockProgressStore>, Arc<MockProgressStore>) {
    (
        Arc::new(MockProgressStore::new("cloud")),
        Arc::new(MockProgressStore::new("local")),
    )
}

fn as_dyn(store: &Arc<MockProgressStore>) -> Arc<dyn ProgressStore> {
    Arc::clone(store) as Arc<dyn ProgressStore>
}

#[tokio::test(start_paused = true)]
async fn test_disagreeing_stores_further_progress_wins() {
    let (cloud, local) = stores();
    cloud
        .set_record(Some(fixtures::resume_record(120.0, "cloud-prov")))
        .await;
    local
        .set_record(Some(fixtures::resume_record(90.0, "local-prov")))
        .await;

    let decision = gather_and_reconcile(
        &as_dyn(&cloud),
        &as_dyn(&local),
        &TitleKey::movie("tt1"),
        None,
        None,
        &ResumeConfig::default(),
    )
    .await;

    assert_eq!(decision.position_ms, 120_000);
    assert_eq!(decision.source, ResumeSource::Cloud);
    assert_eq!(decision.affinity.unwrap().provider_id, "cloud-prov");
}

#[tokio::test(start_paused = true)]
async fn test_slow_store_degrades_within_bound() {
    let (cloud, local) = stores();
    cloud
        .set_record(Some(fixtures::resume_record(300.0, "cloud-prov")))
        .await;
    local
        .set_record(Some(fixtures::resume_record(3000.0, "local-prov")))
        .await;
    // Local would win, but it answers far past the 1.2s bound.
    local.set_fetch_delay(Duration::from_secs(10)).await;

    let decision = gather_and_reconcile(
        &as_dyn(&cloud),
        &as_dyn(&local),
        &TitleKey::movie("tt1"),
        None,
        None,
        &ResumeConfig::default(),
    )
    .await;

    assert_eq!(decision.position_ms, 300_000);
    assert_eq!(decision.source, ResumeSource::Cloud);
}

#[tokio::test(start_paused = true)]
async fn test_store_failure_never_raises() {
    let (cloud, local) = stores();
    cloud
        .set_next_error(ProgressError::ConnectionFailed("down".to_string()))
        .await;
    local
        .set_record(Some(fixtures::resume_record(45.0, "local-prov")))
        .await;

    let decision = gather_and_reconcile(
        &as_dyn(&cloud),
        &as_dyn(&local),
        &TitleKey::movie("tt1"),
        None,
        None,
        &ResumeConfig::default(),
    )
    .await;

    assert_eq!(decision.position_ms, 45_000);
    assert_eq!(decision.source, ResumeSource::Local);
}

#[tokio::test(start_paused = true)]
async fn test_both_stores_empty_starts_from_zero() {
    let (cloud, local) = stores();

    let decision = gather_and_reconcile(
        &as_dyn(&cloud),
        &as_dyn(&local),
        &TitleKey::movie("tt1"),
        None,
        None,
        &ResumeConfig::default(),
    )
    .await;

    assert_eq!(decision.position_ms, 0);
    assert!(decision.affinity.is_none());
    assert_eq!(decision.source, ResumeSource::None);
}

#[tokio::test(start_paused = true)]
async fn test_override_beats_both_stores() {
    let (cloud, local) = stores();
    cloud
        .set_record(Some(fixtures::resume_record(120.0, "cloud-prov")))
        .await;
    local
        .set_record(Some(fixtures::resume_record(2000.0, "local-prov")))
        .await;

    let decision = gather_and_reconcile(
        &as_dyn(&cloud),
        &as_dyn(&local),
        &TitleKey::movie("tt1"),
        Some(750_000),
        None,
        &ResumeConfig::default(),
    )
    .await;

    assert_eq!(decision.position_ms, 750_000);
    assert_eq!(decision.source, ResumeSource::Override);
}

#[tokio::test(start_paused = true)]
async fn test_legacy_fraction_only_row_with_canonical_runtime() {
    let (cloud, local) = stores();
    local
        .set_record(Some(ResumeRecord {
            fraction_complete: Some(0.5),
            ..ResumeRecord::default()
        }))
        .await;

    let decision = gather_and_reconcile(
        &as_dyn(&cloud),
        &as_dyn(&local),
        &TitleKey::movie("tt1"),
        None,
        Some(3600),
        &ResumeConfig::default(),
    )
    .await;

    assert_eq!(decision.position_ms, 1_800_000);
    assert_eq!(decision.source, ResumeSource::Local);
}
