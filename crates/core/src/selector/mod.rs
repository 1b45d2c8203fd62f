//! Stream selection.
//!
//! Orchestrates scoring, season-pack filtering, navigation hints and
//! reachability probing to commit one candidate out of a pool, and hands
//! back the residual ranking so the health monitor can fail over without
//! re-deriving order.

mod config;
mod types;

pub use config::SelectorConfig;
pub use types::{SelectionOutcome, SelectionPrefs, SourceHint};

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::catalog::StreamCandidate;
use crate::error::PlaybackError;
use crate::metrics;
use crate::resolver::{Prober, ResolveError, ResolvedStream, StreamResolver};
use crate::scoring::{rank_pool, ScoreWeights};
use crate::session::PlaybackSession;

/// Picks one playable candidate out of a pool.
pub struct StreamSelector {
    config: SelectorConfig,
    weights: ScoreWeights,
    resolver: Arc<dyn StreamResolver>,
    prober: Arc<dyn Prober>,
}

/// Why one candidate could not be committed; selection may continue.
enum CommitFailure {
    NoPlayableUrl,
    Resolution(String),
    ProbeFailed,
    BudgetExhausted,
}

impl StreamSelector {
    pub fn new(
        config: SelectorConfig,
        weights: ScoreWeights,
        resolver: Arc<dyn StreamResolver>,
        prober: Arc<dyn Prober>,
    ) -> Self {
        Self {
            config,
            weights,
            resolver,
            prober,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select the initial candidate for a playback attempt.
    pub async fn select_initial(
        &self,
        pool: &[StreamCandidate],
        prefs: &SelectionPrefs,
    ) -> Result<SelectionOutcome, PlaybackError> {
        metrics::POOL_SIZE
            .with_label_values(&[] as &[&str])
            .observe(pool.len() as f64);

        if pool.is_empty() {
            metrics::SELECTION_ATTEMPTS
                .with_label_values(&["exhausted"])
                .inc();
            return Err(PlaybackError::Exhausted);
        }

        let eligible = self.eligible_indices(pool);
        let ranking: Vec<usize> = rank_pool(pool, &prefs.preferred_language, &self.weights)
            .into_iter()
            .map(|s| s.index)
            .filter(|idx| eligible.contains(idx))
            .collect();

        let hinted = prefs
            .hint
            .as_ref()
            .and_then(|hint| Self::match_hint(pool, &eligible, hint));

        let primary = match hinted {
            Some(idx) => {
                debug!(index = idx, "navigation hint matched, bypassing scoring");
                idx
            }
            None => ranking[0],
        };

        let mut probes_used = 0u32;
        let result = self.commit(pool, primary, &mut probes_used).await;

        let (index, resolved) = match result {
            Ok(resolved) => (primary, resolved),
            Err(CommitFailure::ProbeFailed | CommitFailure::BudgetExhausted) => {
                // The chosen candidate is dead; advance through substitutable
                // candidates from the same provider group, in pool order with
                // wrap-around, until the probe budget runs out.
                match self
                    .advance_same_group(pool, &eligible, primary, &mut probes_used)
                    .await
                {
                    Some(found) => found,
                    None => {
                        metrics::SELECTION_ATTEMPTS
                            .with_label_values(&["unreachable"])
                            .inc();
                        return Err(PlaybackError::Unreachable);
                    }
                }
            }
            Err(CommitFailure::NoPlayableUrl) => {
                metrics::SELECTION_ATTEMPTS
                    .with_label_values(&["no_playable_url"])
                    .inc();
                return Err(PlaybackError::NoPlayableUrl);
            }
            Err(CommitFailure::Resolution(msg)) => {
                metrics::SELECTION_ATTEMPTS
                    .with_label_values(&["resolution_failed"])
                    .inc();
                return Err(PlaybackError::ResolutionFailed(msg));
            }
        };

        let via_hint = hinted == Some(index);
        metrics::SELECTION_ATTEMPTS.with_label_values(&["ok"]).inc();
        info!(
            index,
            provider = %pool[index].provider_id,
            quality = %pool[index].quality_label,
            via_hint,
            "stream selected"
        );

        Ok(SelectionOutcome {
            index,
            candidate: pool[index].clone(),
            resolved,
            ranking,
            via_hint,
        })
    }

    /// Commit the next untried candidate from the session's ranking.
    ///
    /// Candidates that fail resolution or probing on the way are marked
    /// tried so later failovers skip them.
    pub async fn next_failover(
        &self,
        pool: &[StreamCandidate],
        session: &mut PlaybackSession,
    ) -> Result<SelectionOutcome, PlaybackError> {
        let mut probes_used = 0u32;

        loop {
            let Some(index) = session.untried().next() else {
                metrics::SELECTION_ATTEMPTS
                    .with_label_values(&["exhausted"])
                    .inc();
                return Err(PlaybackError::Exhausted);
            };

            match self.commit(pool, index, &mut probes_used).await {
                Ok(resolved) => {
                    metrics::SELECTION_ATTEMPTS.with_label_values(&["ok"]).inc();
                    info!(
                        index,
                        provider = %pool[index].provider_id,
                        "failover candidate selected"
                    );
                    return Ok(SelectionOutcome {
                        index,
                        candidate: pool[index].clone(),
                        resolved,
                        ranking: session.ranking.clone(),
                        via_hint: false,
                    });
                }
                Err(CommitFailure::BudgetExhausted) => {
                    metrics::SELECTION_ATTEMPTS
                        .with_label_values(&["unreachable"])
                        .inc();
                    return Err(PlaybackError::Unreachable);
                }
                Err(failure) => {
                    match failure {
                        CommitFailure::NoPlayableUrl => {
                            debug!(index, "failover candidate has no playable url, skipping")
                        }
                        CommitFailure::Resolution(ref msg) => {
                            warn!(index, error = %msg, "failover candidate failed to resolve")
                        }
                        CommitFailure::ProbeFailed => {
                            debug!(index, "failover candidate unreachable, skipping")
                        }
                        CommitFailure::BudgetExhausted => unreachable!(),
                    }
                    session.mark_tried(index);
                }
            }
        }
    }

    /// Size-filter the pool, but never discard everything.
    fn eligible_indices(&self, pool: &[StreamCandidate]) -> Vec<usize> {
        let filtered: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, c)| c.size_bytes() <= self.config.season_pack_threshold_bytes)
            .map(|(i, _)| i)
            .collect();

        if filtered.is_empty() {
            (0..pool.len()).collect()
        } else {
            filtered
        }
    }

    /// First eligible candidate, in pool order, matching a navigation hint.
    fn match_hint(
        pool: &[StreamCandidate],
        eligible: &[usize],
        hint: &SourceHint,
    ) -> Option<usize> {
        pool.iter().enumerate().position(|(idx, c)| {
            eligible.contains(&idx)
                && c.provider_id == hint.provider_id
                && hint
                    .source_name
                    .as_ref()
                    .map(|name| c.file_name_hint.as_deref() == Some(name.as_str()))
                    .unwrap_or(true)
        })
    }

    /// Resolve one candidate and, when required, probe it.
    async fn commit(
        &self,
        pool: &[StreamCandidate],
        index: usize,
        probes_used: &mut u32,
    ) -> Result<ResolvedStream, CommitFailure> {
        let candidate = &pool[index];

        let resolved = match self.resolver.resolve(candidate).await {
            Ok(resolved) => resolved,
            Err(ResolveError::NoPlayableUrl) => return Err(CommitFailure::NoPlayableUrl),
            Err(e) => return Err(CommitFailure::Resolution(e.to_string())),
        };

        if resolved.url.is_empty() || resolved.is_magnet() {
            return Err(CommitFailure::NoPlayableUrl);
        }

        // Non-HTTP schemes are judged purely by having resolved at all;
        // debrid URLs are single-use, so probing one would burn it.
        if !resolved.is_http() || self.is_debrid_host(&resolved.url) {
            return Ok(resolved);
        }

        if *probes_used >= self.config.max_probe_attempts {
            return Err(CommitFailure::BudgetExhausted);
        }
        *probes_used += 1;

        if self.prober.probe(&resolved.url, &resolved.headers).await {
            metrics::PROBE_ATTEMPTS.with_label_values(&["ok"]).inc();
            Ok(resolved)
        } else {
            metrics::PROBE_ATTEMPTS.with_label_values(&["failed"]).inc();
            Err(CommitFailure::ProbeFailed)
        }
    }

    /// Walk same-provider-group candidates in pool order with wrap-around.
    async fn advance_same_group(
        &self,
        pool: &[StreamCandidate],
        eligible: &[usize],
        failed: usize,
        probes_used: &mut u32,
    ) -> Option<(usize, ResolvedStream)> {
        let group = &pool[failed].provider_group_id;
        let order = (failed + 1..pool.len()).chain(0..failed);

        for index in order {
            if !eligible.contains(&index) || pool[index].provider_group_id != *group {
                continue;
            }
            match self.commit(pool, index, probes_used).await {
                Ok(resolved) => return Some((index, resolved)),
                Err(CommitFailure::BudgetExhausted) => return None,
                Err(_) => continue,
            }
        }
        None
    }

    fn is_debrid_host(&self, raw_url: &str) -> bool {
        let Ok(parsed) = Url::parse(raw_url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.config
            .debrid_hosts
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::PassthroughResolver;
    use crate::testing::MockProber;

    fn candidate(url: Option<&str>, provider: &str, group: &str, size: &str) -> StreamCandidate {
        StreamCandidate {
            url: url.map(String::from),
            provider_id: provider.to_string(),
            provider_group_id: group.to_string(),
            quality_label: "1080p".to_string(),
            size_text: size.to_string(),
            file_name_hint: None,
            cached: false,
            web_ready: true,
            subtitles: vec![],
        }
    }

    fn selector(prober: Arc<MockProber>) -> StreamSelector {
        StreamSelector::new(
            SelectorConfig::default(),
            ScoreWeights::default(),
            Arc::new(PassthroughResolver::new()),
            prober,
        )
    }

    #[tokio::test]
    async fn test_never_selects_magnet_when_http_viable() {
        let prober = Arc::new(MockProber::new());
        let pool = vec![
            candidate(Some("magnet:?xt=urn:btih:abc"), "a", "a", "2 GB"),
            candidate(Some("https://cdn.example/v.mkv"), "b", "b", "2 GB"),
        ];
        let outcome = selector(prober)
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap();
        assert_eq!(outcome.index, 1);
    }

    #[tokio::test]
    async fn test_probe_failure_advances_within_provider_group() {
        let prober = Arc::new(MockProber::new());
        prober.mark_dead("https://mirror-a.example/v.mkv").await;

        let pool = vec![
            candidate(Some("https://mirror-a.example/v.mkv"), "p1", "grp", "2 GB"),
            candidate(Some("https://other.example/v.mkv"), "p2", "other", "2 GB"),
            candidate(Some("https://mirror-b.example/v.mkv"), "p1", "grp", "3 GB"),
        ];
        // mirror-a ranks first (pool order on equal scores); it is dead, so
        // selection must land on the same-group mirror, not the other group.
        let outcome = selector(Arc::clone(&prober))
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap();
        assert_eq!(outcome.index, 2);
        assert_eq!(prober.probe_count().await, 2);
    }

    #[tokio::test]
    async fn test_all_group_mirrors_dead_is_unreachable() {
        let prober = Arc::new(MockProber::new());
        prober.mark_all_dead().await;

        let pool = vec![
            candidate(Some("https://mirror-a.example/v.mkv"), "p1", "grp", "2 GB"),
            candidate(Some("https://mirror-b.example/v.mkv"), "p1", "grp", "2 GB"),
        ];
        let err = selector(prober)
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap_err();
        assert_eq!(err, PlaybackError::Unreachable);
    }

    #[tokio::test]
    async fn test_probe_budget_bounds_attempts() {
        let prober = Arc::new(MockProber::new());
        prober.mark_all_dead().await;

        let pool: Vec<StreamCandidate> = (0..20)
            .map(|i| {
                candidate(
                    Some(&format!("https://m{}.example/v.mkv", i)),
                    "p1",
                    "grp",
                    "2 GB",
                )
            })
            .collect();

        let err = selector(Arc::clone(&prober))
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap_err();
        assert_eq!(err, PlaybackError::Unreachable);
        assert_eq!(prober.probe_count().await, 8);
    }

    #[tokio::test]
    async fn test_debrid_hosts_skip_probing() {
        let prober = Arc::new(MockProber::new());
        prober.mark_all_dead().await; // would fail any probe

        let pool = vec![candidate(
            Some("https://cdn7.real-debrid.com/d/token/v.mkv"),
            "rd",
            "rd",
            "2 GB",
        )];
        let outcome = selector(Arc::clone(&prober))
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(prober.probe_count().await, 0);
    }

    #[tokio::test]
    async fn test_season_pack_filter_never_empties_pool() {
        let prober = Arc::new(MockProber::new());
        let pool = vec![
            candidate(Some("https://a.example/s.mkv"), "a", "a", "45 GB"),
            candidate(Some("https://b.example/s.mkv"), "b", "b", "32 GB"),
        ];
        // Everything is season-pack-sized; the filter must fall back to the
        // unfiltered pool instead of failing.
        let outcome = selector(prober)
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap();
        assert_eq!(outcome.ranking.len(), 2);
    }

    #[tokio::test]
    async fn test_season_pack_filter_excludes_oversized() {
        let prober = Arc::new(MockProber::new());
        let pool = vec![
            candidate(Some("https://big.example/s.mkv"), "a", "a", "45 GB"),
            candidate(Some("https://ep.example/e.mkv"), "b", "b", "2 GB"),
        ];
        let outcome = selector(prober)
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap();
        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.ranking, vec![1]);
    }

    #[tokio::test]
    async fn test_hint_bypasses_scoring() {
        let prober = Arc::new(MockProber::new());
        let pool = vec![
            candidate(Some("https://best.example/v.mkv"), "fancy", "fancy", "2 GB"),
            candidate(Some("https://meh.example/v.mkv"), "humble", "humble", "12 GB"),
        ];
        let prefs = SelectionPrefs {
            preferred_language: "en".to_string(),
            hint: Some(SourceHint {
                provider_id: "humble".to_string(),
                source_name: None,
            }),
        };
        let outcome = selector(prober).select_initial(&pool, &prefs).await.unwrap();
        assert_eq!(outcome.index, 1);
        assert!(outcome.via_hint);
    }

    #[tokio::test]
    async fn test_magnet_only_pool_is_no_playable_url() {
        let prober = Arc::new(MockProber::new());
        let pool = vec![candidate(Some("magnet:?xt=urn:btih:abc"), "a", "a", "2 GB")];
        let err = selector(prober)
            .select_initial(&pool, &SelectionPrefs::default())
            .await
            .unwrap_err();
        assert_eq!(err, PlaybackError::NoPlayableUrl);
    }

    #[tokio::test]
    async fn test_failover_skips_tried_candidates() {
        let prober = Arc::new(MockProber::new());
        let pool = vec![
            candidate(Some("https://a.example/v.mkv"), "a", "a", "2 GB"),
            candidate(Some("https://b.example/v.mkv"), "b", "b", "2 GB"),
            candidate(Some("https://c.example/v.mkv"), "c", "c", "2 GB"),
        ];
        let sel = selector(prober);
        let mut session = PlaybackSession::new(vec![0, 1, 2], 0, false);
        session.mark_tried(1);

        let outcome = sel.next_failover(&pool, &mut session).await.unwrap();
        assert_eq!(outcome.index, 2);
    }

    #[tokio::test]
    async fn test_failover_exhausted_when_everything_tried() {
        let prober = Arc::new(MockProber::new());
        let pool = vec![
            candidate(Some("https://a.example/v.mkv"), "a", "a", "2 GB"),
            candidate(Some("https://b.example/v.mkv"), "b", "b", "2 GB"),
        ];
        let sel = selector(prober);
        let mut session = PlaybackSession::new(vec![0, 1], 0, false);
        session.mark_tried(1);

        let err = sel.next_failover(&pool, &mut session).await.unwrap_err();
        assert_eq!(err, PlaybackError::Exhausted);
    }

    #[tokio::test]
    async fn test_failover_marks_dead_candidates_tried() {
        let prober = Arc::new(MockProber::new());
        prober.mark_dead("https://b.example/v.mkv").await;

        let pool = vec![
            candidate(Some("https://a.example/v.mkv"), "a", "a", "2 GB"),
            candidate(Some("https://b.example/v.mkv"), "b", "b", "2 GB"),
            candidate(Some("https://c.example/v.mkv"), "c", "c", "2 GB"),
        ];
        let sel = selector(prober);
        let mut session = PlaybackSession::new(vec![0, 1, 2], 0, false);

        let outcome = sel.next_failover(&pool, &mut session).await.unwrap();
        assert_eq!(outcome.index, 2);
        assert!(session.was_tried(1));
    }
}
