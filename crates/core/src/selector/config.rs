//! Stream selector configuration.

use serde::{Deserialize, Serialize};

const GIB: u64 = 1024 * 1024 * 1024;

/// Configuration for stream selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Candidates above this size are treated as season packs and filtered
    /// out for single-episode playback, unless that would empty the pool.
    #[serde(default = "default_season_pack_threshold")]
    pub season_pack_threshold_bytes: u64,

    /// Maximum reachability probes per selection attempt. Bounds total
    /// latency when a whole provider group is down.
    #[serde(default = "default_max_probe_attempts")]
    pub max_probe_attempts: u32,

    /// Per-probe timeout in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Debrid-CDN hosts whose URLs are trusted without probing. These links
    /// are single-use and time-limited; probing one would spend it.
    /// Matched exactly or as a subdomain suffix.
    #[serde(default = "default_debrid_hosts")]
    pub debrid_hosts: Vec<String>,
}

fn default_season_pack_threshold() -> u64 {
    20 * GIB
}

fn default_max_probe_attempts() -> u32 {
    8
}

fn default_probe_timeout_ms() -> u64 {
    4000
}

fn default_debrid_hosts() -> Vec<String> {
    [
        "real-debrid.com",
        "rdeb.io",
        "alldebrid.com",
        "debrid.link",
        "premiumize.me",
        "torbox.app",
        "offcloud.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            season_pack_threshold_bytes: default_season_pack_threshold(),
            max_probe_attempts: default_max_probe_attempts(),
            probe_timeout_ms: default_probe_timeout_ms(),
            debrid_hosts: default_debrid_hosts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SelectorConfig::default();
        assert_eq!(config.season_pack_threshold_bytes, 20 * GIB);
        assert_eq!(config.max_probe_attempts, 8);
        assert!(config
            .debrid_hosts
            .contains(&"real-debrid.com".to_string()));
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            max_probe_attempts = 4
        "#;
        let config: SelectorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_probe_attempts, 4);
        assert_eq!(config.season_pack_threshold_bytes, 20 * GIB);
        assert!(!config.debrid_hosts.is_empty());
    }
}
