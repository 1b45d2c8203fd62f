//! Scoring weights configuration.

use serde::{Deserialize, Serialize};

const GIB: u64 = 1024 * 1024 * 1024;

/// Weights and cutoffs for candidate scoring.
///
/// These are product-tuned heuristics, not derived values. They are exposed
/// as configuration so deployments can adjust them, but the defaults are the
/// shipped behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Multiplier applied to the 0-4 quality tier.
    #[serde(default = "default_quality_tier_weight")]
    pub quality_tier_weight: i64,

    /// Upper bound of the size sweet spot.
    #[serde(default = "default_size_sweet_max_bytes")]
    pub size_sweet_max_bytes: u64,
    /// Upper bound of the medium-bonus size band.
    #[serde(default = "default_size_mid_max_bytes")]
    pub size_mid_max_bytes: u64,
    /// Upper bound of the low-bonus size band.
    #[serde(default = "default_size_high_max_bytes")]
    pub size_high_max_bytes: u64,
    /// Upper bound of the penalized-but-tolerated size band.
    #[serde(default = "default_size_oversize_max_bytes")]
    pub size_oversize_max_bytes: u64,

    #[serde(default = "default_size_sweet_bonus")]
    pub size_sweet_bonus: i64,
    #[serde(default = "default_size_mid_bonus")]
    pub size_mid_bonus: i64,
    #[serde(default = "default_size_high_bonus")]
    pub size_high_bonus: i64,
    #[serde(default = "default_size_oversize_penalty")]
    pub size_oversize_penalty: i64,
    #[serde(default = "default_size_huge_penalty")]
    pub size_huge_penalty: i64,
    /// Unknown size is common for valid direct links, so it earns a mild
    /// bonus rather than a penalty.
    #[serde(default = "default_size_unknown_bonus")]
    pub size_unknown_bonus: i64,

    #[serde(default = "default_remux_penalty")]
    pub remux_penalty: i64,
    #[serde(default = "default_dolby_vision_penalty")]
    pub dolby_vision_penalty: i64,
    /// Cam/telesync rips get the largest textual penalty of all factors.
    #[serde(default = "default_cam_penalty")]
    pub cam_penalty: i64,

    #[serde(default = "default_web_source_bonus")]
    pub web_source_bonus: i64,
    #[serde(default = "default_efficient_codec_bonus")]
    pub efficient_codec_bonus: i64,
    #[serde(default = "default_legacy_codec_bonus")]
    pub legacy_codec_bonus: i64,

    /// Bonus for a debrid-cached flag or a direct HTTP URL.
    #[serde(default = "default_cached_bonus")]
    pub cached_bonus: i64,
    #[serde(default = "default_not_web_ready_penalty")]
    pub not_web_ready_penalty: i64,
    /// The single largest penalty. A magnet must never outrank an HTTP
    /// candidate when both are viable.
    #[serde(default = "default_magnet_penalty")]
    pub magnet_penalty: i64,

    /// Language affinity multiplier. Must dwarf the stability score spread
    /// so affinity dominates ranking and stability only breaks ties.
    #[serde(default = "default_affinity_weight")]
    pub affinity_weight: i64,
}

fn default_quality_tier_weight() -> i64 {
    100
}

fn default_size_sweet_max_bytes() -> u64 {
    8 * GIB
}

fn default_size_mid_max_bytes() -> u64 {
    15 * GIB
}

fn default_size_high_max_bytes() -> u64 {
    25 * GIB
}

fn default_size_oversize_max_bytes() -> u64 {
    40 * GIB
}

fn default_size_sweet_bonus() -> i64 {
    120
}

fn default_size_mid_bonus() -> i64 {
    70
}

fn default_size_high_bonus() -> i64 {
    30
}

fn default_size_oversize_penalty() -> i64 {
    -60
}

fn default_size_huge_penalty() -> i64 {
    -150
}

fn default_size_unknown_bonus() -> i64 {
    40
}

fn default_remux_penalty() -> i64 {
    -80
}

fn default_dolby_vision_penalty() -> i64 {
    -100
}

fn default_cam_penalty() -> i64 {
    -400
}

fn default_web_source_bonus() -> i64 {
    50
}

fn default_efficient_codec_bonus() -> i64 {
    30
}

fn default_legacy_codec_bonus() -> i64 {
    15
}

fn default_cached_bonus() -> i64 {
    250
}

fn default_not_web_ready_penalty() -> i64 {
    -250
}

fn default_magnet_penalty() -> i64 {
    -2000
}

fn default_affinity_weight() -> i64 {
    10_000
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            quality_tier_weight: default_quality_tier_weight(),
            size_sweet_max_bytes: default_size_sweet_max_bytes(),
            size_mid_max_bytes: default_size_mid_max_bytes(),
            size_high_max_bytes: default_size_high_max_bytes(),
            size_oversize_max_bytes: default_size_oversize_max_bytes(),
            size_sweet_bonus: default_size_sweet_bonus(),
            size_mid_bonus: default_size_mid_bonus(),
            size_high_bonus: default_size_high_bonus(),
            size_oversize_penalty: default_size_oversize_penalty(),
            size_huge_penalty: default_size_huge_penalty(),
            size_unknown_bonus: default_size_unknown_bonus(),
            remux_penalty: default_remux_penalty(),
            dolby_vision_penalty: default_dolby_vision_penalty(),
            cam_penalty: default_cam_penalty(),
            web_source_bonus: default_web_source_bonus(),
            efficient_codec_bonus: default_efficient_codec_bonus(),
            legacy_codec_bonus: default_legacy_codec_bonus(),
            cached_bonus: default_cached_bonus(),
            not_web_ready_penalty: default_not_web_ready_penalty(),
            magnet_penalty: default_magnet_penalty(),
            affinity_weight: default_affinity_weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = ScoreWeights::default();
        assert_eq!(w.quality_tier_weight, 100);
        assert_eq!(w.affinity_weight, 10_000);
        assert_eq!(w.size_sweet_max_bytes, 8 * GIB);
        assert!(w.magnet_penalty < w.cam_penalty);
    }

    #[test]
    fn test_deserialize_partial_override() {
        let toml = r#"
            cached_bonus = 300
        "#;
        let w: ScoreWeights = toml::from_str(toml).unwrap();
        assert_eq!(w.cached_bonus, 300);
        assert_eq!(w.quality_tier_weight, 100);
    }
}
