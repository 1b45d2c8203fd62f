//! Types for the stream catalog surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::parse_byte_size;

/// Key identifying one playable title (a movie, or one episode of a show).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleKey {
    /// Catalog identifier for the title.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl TitleKey {
    /// Key for a movie (no season/episode).
    pub fn movie(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            season: None,
            episode: None,
        }
    }

    /// Key for one episode of a show.
    pub fn episode(id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            id: id.into(),
            season: Some(season),
            episode: Some(episode),
        }
    }
}

/// An embedded subtitle track advertised by a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Language as reported by the provider (free text).
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One playable stream option scraped from an indexer or debrid service.
///
/// Immutable once produced by the catalog lookup. Identity is
/// `(url, provider_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamCandidate {
    /// Playback URL. Absent or magnet-scheme values are not directly playable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Which provider produced this candidate.
    pub provider_id: String,
    /// Candidates sharing a group are substitutable for one another.
    pub provider_group_id: String,
    /// Free text quality, e.g. "1080p", "4K HDR".
    #[serde(default)]
    pub quality_label: String,
    /// Free text size, e.g. "15.2 GB". Empty means unknown.
    #[serde(default)]
    pub size_text: String,
    /// Release/file name as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name_hint: Option<String>,
    /// Debrid-cache indicator: the link is already materialized.
    #[serde(default)]
    pub cached: bool,
    /// Whether the provider claims the stream plays over plain HTTP.
    #[serde(default = "default_web_ready")]
    pub web_ready: bool,
    /// Subtitle tracks embedded in the stream.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<SubtitleTrack>,
}

fn default_web_ready() -> bool {
    true
}

impl StreamCandidate {
    /// Whether the URL is a direct HTTP(S) link.
    pub fn is_http(&self) -> bool {
        self.url
            .as_deref()
            .map(|u| u.starts_with("http://") || u.starts_with("https://"))
            .unwrap_or(false)
    }

    /// Whether the URL is a magnet link (not directly playable).
    pub fn is_magnet(&self) -> bool {
        self.url
            .as_deref()
            .map(|u| u.starts_with("magnet:"))
            .unwrap_or(false)
    }

    /// Declared size in bytes; `0` when unknown or unparseable.
    pub fn size_bytes(&self) -> u64 {
        parse_byte_size(&self.size_text)
    }

    /// Provider name and title-hint fields concatenated for token scans.
    pub fn descriptor(&self) -> String {
        let mut text = String::with_capacity(
            self.provider_id.len()
                + self.quality_label.len()
                + self.file_name_hint.as_deref().map(str::len).unwrap_or(0)
                + 2,
        );
        text.push_str(&self.provider_id);
        text.push(' ');
        text.push_str(&self.quality_label);
        if let Some(ref hint) = self.file_name_hint {
            text.push(' ');
            text.push_str(hint);
        }
        text
    }

    /// Whether `other` refers to the same stream (`(url, provider_id)` identity).
    pub fn same_identity(&self, other: &StreamCandidate) -> bool {
        self.url == other.url && self.provider_id == other.provider_id
    }
}

/// Errors that can occur during catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog connection failed: {0}")]
    ConnectionFailed(String),

    #[error("catalog lookup failed: {0}")]
    LookupFailed(String),

    #[error("request timeout")]
    Timeout,
}

/// Trait for catalog backends producing stream candidates for a title.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch the candidate pool for a title.
    async fn fetch_candidates(&self, key: &TitleKey) -> Result<Vec<StreamCandidate>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: Option<&str>) -> StreamCandidate {
        StreamCandidate {
            url: url.map(|u| u.to_string()),
            provider_id: "torrentio".to_string(),
            provider_group_id: "torrentio".to_string(),
            quality_label: "1080p".to_string(),
            size_text: "2.5 GB".to_string(),
            file_name_hint: Some("Some.Movie.2021.1080p.WEB-DL.mkv".to_string()),
            cached: false,
            web_ready: true,
            subtitles: vec![],
        }
    }

    #[test]
    fn test_url_scheme_helpers() {
        assert!(candidate(Some("https://cdn.example/v.mkv")).is_http());
        assert!(candidate(Some("http://cdn.example/v.mkv")).is_http());
        assert!(!candidate(Some("magnet:?xt=urn:btih:abc")).is_http());
        assert!(candidate(Some("magnet:?xt=urn:btih:abc")).is_magnet());
        assert!(!candidate(None).is_http());
        assert!(!candidate(None).is_magnet());
    }

    #[test]
    fn test_size_bytes_parses_free_text() {
        let c = candidate(Some("https://x/v.mkv"));
        assert_eq!(c.size_bytes(), parse_byte_size("2.5 GB"));

        let mut unknown = candidate(None);
        unknown.size_text = String::new();
        assert_eq!(unknown.size_bytes(), 0);
    }

    #[test]
    fn test_descriptor_concatenates_name_fields() {
        let c = candidate(Some("https://x/v.mkv"));
        let d = c.descriptor();
        assert!(d.contains("torrentio"));
        assert!(d.contains("1080p"));
        assert!(d.contains("WEB-DL"));
        // Size is not part of the descriptor.
        assert!(!d.contains("2.5"));
    }

    #[test]
    fn test_candidate_serialization_defaults() {
        let json = r#"{"provider_id": "p", "provider_group_id": "g"}"#;
        let parsed: StreamCandidate = serde_json::from_str(json).unwrap();
        assert!(parsed.url.is_none());
        assert!(parsed.web_ready);
        assert!(!parsed.cached);
        assert!(parsed.subtitles.is_empty());
    }

    #[test]
    fn test_title_key_constructors() {
        let movie = TitleKey::movie("tt0133093");
        assert!(movie.season.is_none());

        let ep = TitleKey::episode("tt0944947", 3, 9);
        assert_eq!(ep.season, Some(3));
        assert_eq!(ep.episode, Some(9));
    }
}
