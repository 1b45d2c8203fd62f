//! Mock progress store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::TitleKey;
use crate::resume::{ProgressError, ProgressStore, ResumeRecord, StreamAffinity};

/// A recorded persist call for test assertions.
#[derive(Debug, Clone)]
pub struct PersistedProgress {
    pub key: TitleKey,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub affinity: Option<StreamAffinity>,
}

/// Mock implementation of the `ProgressStore` trait.
///
/// Supports configurable records, injected errors and artificial latency
/// (for exercising the per-store fetch bound).
pub struct MockProgressStore {
    name: String,
    record: Arc<RwLock<Option<ResumeRecord>>>,
    fetch_delay: Arc<RwLock<Option<Duration>>>,
    next_error: Arc<RwLock<Option<ProgressError>>>,
    persisted: Arc<RwLock<Vec<PersistedProgress>>>,
}

impl MockProgressStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            record: Arc::new(RwLock::new(None)),
            fetch_delay: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            persisted: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the record returned by subsequent fetches.
    pub async fn set_record(&self, record: Option<ResumeRecord>) {
        *self.record.write().await = record;
    }

    /// Delay every fetch by the given duration.
    pub async fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.write().await = Some(delay);
    }

    /// Fail the next fetch with the given error.
    pub async fn set_next_error(&self, error: ProgressError) {
        *self.next_error.write().await = Some(error);
    }

    /// All recorded persists, in order.
    pub async fn persisted(&self) -> Vec<PersistedProgress> {
        self.persisted.read().await.clone()
    }
}

#[async_trait]
impl ProgressStore for MockProgressStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _key: &TitleKey) -> Result<Option<ResumeRecord>, ProgressError> {
        if let Some(delay) = *self.fetch_delay.read().await {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(self.record.read().await.clone())
    }

    async fn persist(
        &self,
        key: &TitleKey,
        position_secs: f64,
        duration_secs: f64,
        affinity: Option<&StreamAffinity>,
    ) -> Result<(), ProgressError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        self.persisted.write().await.push(PersistedProgress {
            key: key.clone(),
            position_secs,
            duration_secs,
            affinity: affinity.cloned(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_fetch_returns_configured_record() {
        let store = MockProgressStore::new("cloud");
        store
            .set_record(Some(fixtures::resume_record(120.0, "p")))
            .await;

        let record = store.fetch(&TitleKey::movie("tt1")).await.unwrap().unwrap();
        assert_eq!(record.position_secs, Some(120.0));
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let store = MockProgressStore::new("cloud");
        store
            .set_next_error(ProgressError::ConnectionFailed("down".to_string()))
            .await;

        assert!(store.fetch(&TitleKey::movie("tt1")).await.is_err());
        assert!(store.fetch(&TitleKey::movie("tt1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_persist_records_calls() {
        let store = MockProgressStore::new("local");
        store
            .persist(&TitleKey::movie("tt1"), 300.0, 5400.0, None)
            .await
            .unwrap();

        let persisted = store.persisted().await;
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].position_secs, 300.0);
    }
}
