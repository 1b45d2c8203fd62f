//! Mock resolver for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::StreamCandidate;
use crate::resolver::{ResolveError, ResolvedStream, StreamResolver};

/// Mock implementation of the `StreamResolver` trait.
///
/// Passes candidate URLs through by default; individual providers can be
/// made to fail, or to resolve to a replacement URL (simulating a debrid
/// unlock step).
#[derive(Debug, Default)]
pub struct MockResolver {
    failing_providers: Arc<RwLock<HashSet<String>>>,
    url_overrides: Arc<RwLock<HashMap<String, String>>>,
    resolve_count: Arc<RwLock<usize>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make resolution fail for one provider.
    pub async fn fail_provider(&self, provider_id: &str) {
        self.failing_providers
            .write()
            .await
            .insert(provider_id.to_string());
    }

    /// Resolve a provider's candidates to a fixed replacement URL.
    pub async fn override_url(&self, provider_id: &str, url: &str) {
        self.url_overrides
            .write()
            .await
            .insert(provider_id.to_string(), url.to_string());
    }

    pub async fn resolve_count(&self) -> usize {
        *self.resolve_count.read().await
    }
}

#[async_trait]
impl StreamResolver for MockResolver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, candidate: &StreamCandidate) -> Result<ResolvedStream, ResolveError> {
        *self.resolve_count.write().await += 1;

        if self
            .failing_providers
            .read()
            .await
            .contains(&candidate.provider_id)
        {
            return Err(ResolveError::Provider(format!(
                "simulated failure for {}",
                candidate.provider_id
            )));
        }

        if let Some(url) = self.url_overrides.read().await.get(&candidate.provider_id) {
            return Ok(ResolvedStream::bare(url.clone()));
        }

        match candidate.url {
            Some(ref url) if !url.is_empty() => Ok(ResolvedStream::bare(url.clone())),
            _ => Err(ResolveError::NoPlayableUrl),
        }
    }
}
