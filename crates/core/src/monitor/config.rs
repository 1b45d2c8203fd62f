//! Health monitor configuration.
//!
//! Every threshold here is a product-tuned heuristic. They are exposed as
//! configuration rather than re-derived.

use serde::{Deserialize, Serialize};

const GIB: u64 = 1024 * 1024 * 1024;

/// Configuration for the playback health monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Telemetry tick interval in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Baseline startup budget before the first recovery step.
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    /// Baseline startup budget when the user manually chose the source.
    #[serde(default = "default_manual_startup_timeout_secs")]
    pub manual_startup_timeout_secs: u64,

    /// Added to the budget for each heavy marker (large, 4K, remux,
    /// Dolby Vision) on the candidate.
    #[serde(default = "default_startup_heavy_bump_secs")]
    pub startup_heavy_bump_secs: u64,

    /// Hard cap on the computed startup budget.
    #[serde(default = "default_startup_timeout_cap_secs")]
    pub startup_timeout_cap_secs: u64,

    /// Second, larger timeout: past this, one re-resolve is attempted and
    /// then the session fails.
    #[serde(default = "default_startup_hard_timeout_secs")]
    pub startup_hard_timeout_secs: u64,

    /// Size above which a candidate counts as heavy.
    #[serde(default = "default_heavy_size_threshold_bytes")]
    pub heavy_size_threshold_bytes: u64,

    /// Sustained mid-stream buffering past this triggers the watchdog.
    #[serde(default = "default_rebuffer_watchdog_secs")]
    pub rebuffer_watchdog_secs: u64,

    /// Sustained black-video window before the first codec renegotiation.
    #[serde(default = "default_black_video_first_window_ms")]
    pub black_video_first_window_ms: u64,

    /// Black-video window before the second (final) renegotiation.
    #[serde(default = "default_black_video_second_window_ms")]
    pub black_video_second_window_ms: u64,

    /// Bounded same-source restarts after playback had started.
    #[serde(default = "default_steady_restart_limit")]
    pub steady_restart_limit: u8,

    /// Delay before a steady-state same-source restart.
    #[serde(default = "default_steady_restart_delay_ms")]
    pub steady_restart_delay_ms: u64,

    /// Same-source retries for timeout-flavored errors on heavy candidates.
    #[serde(default = "default_heavy_timeout_retry_limit")]
    pub heavy_timeout_retry_limit: u8,

    /// Minimum gap between recovery actions; a stall cannot re-trigger
    /// remediation inside this window.
    #[serde(default = "default_recovery_cooldown_secs")]
    pub recovery_cooldown_secs: u64,

    /// Permit failover on repeated long rebuffers mid-playback. Off by
    /// default: yanking a viewer to another source mid-episode is more
    /// disruptive than a stall.
    #[serde(default)]
    pub allow_mid_playback_source_fallback: bool,

    /// Long-rebuffer occurrences required before mid-playback failover
    /// (when enabled).
    #[serde(default = "default_mid_playback_fallback_rebuffer_count")]
    pub mid_playback_fallback_rebuffer_count: u8,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_startup_timeout_secs() -> u64 {
    15
}

fn default_manual_startup_timeout_secs() -> u64 {
    30
}

fn default_startup_heavy_bump_secs() -> u64 {
    15
}

fn default_startup_timeout_cap_secs() -> u64 {
    75
}

fn default_startup_hard_timeout_secs() -> u64 {
    120
}

fn default_heavy_size_threshold_bytes() -> u64 {
    10 * GIB
}

fn default_rebuffer_watchdog_secs() -> u64 {
    45
}

fn default_black_video_first_window_ms() -> u64 {
    6500
}

fn default_black_video_second_window_ms() -> u64 {
    9000
}

fn default_steady_restart_limit() -> u8 {
    2
}

fn default_steady_restart_delay_ms() -> u64 {
    2000
}

fn default_heavy_timeout_retry_limit() -> u8 {
    2
}

fn default_recovery_cooldown_secs() -> u64 {
    8
}

fn default_mid_playback_fallback_rebuffer_count() -> u8 {
    2
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            startup_timeout_secs: default_startup_timeout_secs(),
            manual_startup_timeout_secs: default_manual_startup_timeout_secs(),
            startup_heavy_bump_secs: default_startup_heavy_bump_secs(),
            startup_timeout_cap_secs: default_startup_timeout_cap_secs(),
            startup_hard_timeout_secs: default_startup_hard_timeout_secs(),
            heavy_size_threshold_bytes: default_heavy_size_threshold_bytes(),
            rebuffer_watchdog_secs: default_rebuffer_watchdog_secs(),
            black_video_first_window_ms: default_black_video_first_window_ms(),
            black_video_second_window_ms: default_black_video_second_window_ms(),
            steady_restart_limit: default_steady_restart_limit(),
            steady_restart_delay_ms: default_steady_restart_delay_ms(),
            heavy_timeout_retry_limit: default_heavy_timeout_retry_limit(),
            recovery_cooldown_secs: default_recovery_cooldown_secs(),
            allow_mid_playback_source_fallback: false,
            mid_playback_fallback_rebuffer_count: default_mid_playback_fallback_rebuffer_count(),
        }
    }
}
