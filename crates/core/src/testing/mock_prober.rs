//! Mock prober for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::resolver::Prober;

/// Mock implementation of the `Prober` trait.
///
/// Every URL is reachable unless marked dead (individually or wholesale).
/// Probed URLs are recorded for assertions.
#[derive(Debug, Default)]
pub struct MockProber {
    dead: Arc<RwLock<HashSet<String>>>,
    all_dead: Arc<RwLock<bool>>,
    probed: Arc<RwLock<Vec<String>>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one URL unreachable.
    pub async fn mark_dead(&self, url: &str) {
        self.dead.write().await.insert(url.to_string());
    }

    /// Mark every URL unreachable.
    pub async fn mark_all_dead(&self) {
        *self.all_dead.write().await = true;
    }

    /// Undo `mark_all_dead` and individual marks.
    pub async fn revive_all(&self) {
        *self.all_dead.write().await = false;
        self.dead.write().await.clear();
    }

    /// URLs probed so far, in order.
    pub async fn probed_urls(&self) -> Vec<String> {
        self.probed.read().await.clone()
    }

    /// Number of probes performed.
    pub async fn probe_count(&self) -> usize {
        self.probed.read().await.len()
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, url: &str, _headers: &[(String, String)]) -> bool {
        self.probed.write().await.push(url.to_string());
        if *self.all_dead.read().await {
            return false;
        }
        !self.dead.read().await.contains(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_is_reachable() {
        let prober = MockProber::new();
        assert!(prober.probe("https://x.example/v", &[]).await);
        assert_eq!(prober.probe_count().await, 1);
    }

    #[tokio::test]
    async fn test_mark_dead() {
        let prober = MockProber::new();
        prober.mark_dead("https://dead.example/v").await;
        assert!(!prober.probe("https://dead.example/v", &[]).await);
        assert!(prober.probe("https://alive.example/v", &[]).await);
    }

    #[tokio::test]
    async fn test_mark_all_dead_and_revive() {
        let prober = MockProber::new();
        prober.mark_all_dead().await;
        assert!(!prober.probe("https://any.example/v", &[]).await);
        prober.revive_all().await;
        assert!(prober.probe("https://any.example/v", &[]).await);
    }
}
