//! Types for candidate resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::StreamCandidate;

/// A candidate resolved to its final playable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedStream {
    /// Final playback URL.
    pub url: String,
    /// Request headers the player must send (referer, auth tokens).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
}

impl ResolvedStream {
    /// A resolved stream with no extra headers.
    pub fn bare(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: vec![],
        }
    }

    /// Whether the resolved URL is plain HTTP(S).
    pub fn is_http(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }

    /// Whether the resolved URL is a magnet link.
    pub fn is_magnet(&self) -> bool {
        self.url.starts_with("magnet:")
    }
}

/// Errors that can occur during candidate resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("provider resolution failed: {0}")]
    Provider(String),

    #[error("resolution timeout")]
    Timeout,

    #[error("candidate has no playable url")]
    NoPlayableUrl,
}

/// Trait for per-provider resolution backends.
#[async_trait]
pub trait StreamResolver: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Resolve a candidate to its final playback URL.
    async fn resolve(&self, candidate: &StreamCandidate) -> Result<ResolvedStream, ResolveError>;
}

/// Resolver for candidates whose scraped URL already is the playback URL.
///
/// This is the common case for debrid-cached links and is also the default
/// wiring when the host application has no provider-specific resolution.
#[derive(Debug, Default)]
pub struct PassthroughResolver;

impl PassthroughResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StreamResolver for PassthroughResolver {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn resolve(&self, candidate: &StreamCandidate) -> Result<ResolvedStream, ResolveError> {
        match candidate.url {
            Some(ref url) if !url.is_empty() => Ok(ResolvedStream::bare(url.clone())),
            _ => Err(ResolveError::NoPlayableUrl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: Option<&str>) -> StreamCandidate {
        StreamCandidate {
            url: url.map(|u| u.to_string()),
            provider_id: "p".to_string(),
            provider_group_id: "g".to_string(),
            quality_label: String::new(),
            size_text: String::new(),
            file_name_hint: None,
            cached: false,
            web_ready: true,
            subtitles: vec![],
        }
    }

    #[tokio::test]
    async fn test_passthrough_returns_candidate_url() {
        let resolver = PassthroughResolver::new();
        let resolved = resolver
            .resolve(&candidate(Some("https://cdn.example/v.mkv")))
            .await
            .unwrap();
        assert_eq!(resolved.url, "https://cdn.example/v.mkv");
        assert!(resolved.headers.is_empty());
        assert!(resolved.is_http());
    }

    #[tokio::test]
    async fn test_passthrough_rejects_missing_url() {
        let resolver = PassthroughResolver::new();
        assert!(matches!(
            resolver.resolve(&candidate(None)).await,
            Err(ResolveError::NoPlayableUrl)
        ));
        assert!(matches!(
            resolver.resolve(&candidate(Some(""))).await,
            Err(ResolveError::NoPlayableUrl)
        ));
    }

    #[test]
    fn test_resolved_stream_schemes() {
        assert!(ResolvedStream::bare("https://x/v").is_http());
        assert!(!ResolvedStream::bare("magnet:?xt=abc").is_http());
        assert!(ResolvedStream::bare("magnet:?xt=abc").is_magnet());
    }
}
