use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitor::MonitorConfig;
use crate::resume::ResumeConfig;
use crate::scoring::ScoreWeights;
use crate::selector::SelectorConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoreWeights,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub resume: ResumeConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Errors that can occur loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    ValidationError(String),
}
