//! Types for resume reconciliation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::TitleKey;

/// Remembered hint of which stream a viewer last watched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamAffinity {
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

/// One progress observation from one store.
///
/// Different app generations wrote different subsets of these fields, and
/// some legacy rows wrote milliseconds into the seconds columns; the
/// reconciler repairs what it can and ignores the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// Fraction watched, 0..1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction_complete: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<StreamAffinity>,
}

/// Which input produced the final resume position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSource {
    Override,
    Cloud,
    Local,
    None,
}

impl ResumeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Cloud => "cloud",
            Self::Local => "local",
            Self::None => "none",
        }
    }
}

/// The authoritative resume point for one load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDecision {
    pub position_ms: u64,
    /// Only present when the position is meaningful progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<StreamAffinity>,
    pub source: ResumeSource,
}

/// Errors that can occur talking to a progress store.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress store connection failed: {0}")]
    ConnectionFailed(String),

    #[error("progress store error: {0}")]
    StoreError(String),

    #[error("request timeout")]
    Timeout,
}

/// Trait for a progress store (cloud history or local continue-watching).
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Store name for logging ("cloud", "local").
    fn name(&self) -> &str;

    /// Fetch the progress record for a title, if any.
    async fn fetch(&self, key: &TitleKey) -> Result<Option<ResumeRecord>, ProgressError>;

    /// Persist progress for a title.
    async fn persist(
        &self,
        key: &TitleKey,
        position_secs: f64,
        duration_secs: f64,
        affinity: Option<&StreamAffinity>,
    ) -> Result<(), ProgressError>;
}
