use super::{types::EngineConfig, ConfigError};

/// Validate cross-field configuration constraints the serde defaults cannot
/// express:
/// - monitor tick and timeout ordering
/// - selector probe budget is non-zero
/// - affinity weight still dominates the stability score spread
pub fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.monitor.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.tick_interval_ms cannot be 0".to_string(),
        ));
    }

    if config.monitor.startup_timeout_secs > config.monitor.startup_timeout_cap_secs {
        return Err(ConfigError::ValidationError(
            "monitor.startup_timeout_secs exceeds monitor.startup_timeout_cap_secs".to_string(),
        ));
    }

    if config.monitor.manual_startup_timeout_secs > config.monitor.startup_timeout_cap_secs {
        return Err(ConfigError::ValidationError(
            "monitor.manual_startup_timeout_secs exceeds monitor.startup_timeout_cap_secs"
                .to_string(),
        ));
    }

    if config.selector.max_probe_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "selector.max_probe_attempts cannot be 0".to_string(),
        ));
    }

    if config.resume.store_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "resume.store_timeout_ms cannot be 0".to_string(),
        ));
    }

    // Language affinity must outweigh any stability delta or the tier
    // ordering breaks down.
    let spread = config.scoring.quality_tier_weight * 4
        + config.scoring.size_sweet_bonus
        + config.scoring.cached_bonus
        + config.scoring.web_source_bonus
        + config.scoring.efficient_codec_bonus
        + config.scoring.magnet_penalty.abs()
        + config.scoring.cam_penalty.abs();
    if config.scoring.affinity_weight <= spread {
        return Err(ConfigError::ValidationError(format!(
            "scoring.affinity_weight ({}) must exceed the stability spread ({})",
            config.scoring.affinity_weight, spread
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_tick_fails() {
        let mut config = EngineConfig::default();
        config.monitor.tick_interval_ms = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_budget_over_cap_fails() {
        let mut config = EngineConfig::default();
        config.monitor.startup_timeout_secs = 90;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_weak_affinity_weight_fails() {
        let mut config = EngineConfig::default();
        config.scoring.affinity_weight = 100;
        assert!(validate_config(&config).is_err());
    }
}
