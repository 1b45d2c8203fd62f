//! Engine configuration.
//!
//! One TOML file (plus `SHOWRUNNER_` environment overrides) carrying the
//! scoring weights, selector thresholds, resume bounds and monitor budgets.
//! Every field defaults to the shipped tuning, so an empty config is valid.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::{ConfigError, EngineConfig};
pub use validate::validate_config;
