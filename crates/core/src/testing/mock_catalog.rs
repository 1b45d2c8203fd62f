//! Mock candidate source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CandidateSource, CatalogError, StreamCandidate, TitleKey};

/// Mock implementation of the `CandidateSource` trait.
pub struct MockCandidateSource {
    candidates: Arc<RwLock<Vec<StreamCandidate>>>,
    next_error: Arc<RwLock<Option<CatalogError>>>,
    fetched_keys: Arc<RwLock<Vec<TitleKey>>>,
}

impl Default for MockCandidateSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCandidateSource {
    pub fn new() -> Self {
        Self {
            candidates: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            fetched_keys: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the pool returned by subsequent fetches.
    pub async fn set_candidates(&self, candidates: Vec<StreamCandidate>) {
        *self.candidates.write().await = candidates;
    }

    /// Fail the next fetch with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Keys fetched so far, in order.
    pub async fn fetched_keys(&self) -> Vec<TitleKey> {
        self.fetched_keys.read().await.clone()
    }
}

#[async_trait]
impl CandidateSource for MockCandidateSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_candidates(&self, key: &TitleKey) -> Result<Vec<StreamCandidate>, CatalogError> {
        self.fetched_keys.write().await.push(key.clone());
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(self.candidates.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_returns_configured_pool() {
        let source = MockCandidateSource::new();
        source
            .set_candidates(vec![fixtures::http_candidate("p", "1080p", "2 GB")])
            .await;

        let pool = source
            .fetch_candidates(&TitleKey::episode("tt1", 1, 2))
            .await
            .unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(source.fetched_keys().await.len(), 1);
    }

    #[tokio::test]
    async fn test_error_injection() {
        let source = MockCandidateSource::new();
        source
            .set_next_error(CatalogError::Timeout)
            .await;
        assert!(source
            .fetch_candidates(&TitleKey::movie("tt1"))
            .await
            .is_err());
    }
}
