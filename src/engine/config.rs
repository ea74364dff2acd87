// src/engine/config.rs

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Inventory assumptions for the replenishment calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplenishmentConfig {
    pub lead_time_days: u32,
    /// Standard-normal multiplier for the target in-stock probability (1.65 ~ 95%).
    pub service_level_z: f64,
    pub min_order_qty: u32,
}

impl Default for ReplenishmentConfig {
    fn default() -> Self {
        Self {
            lead_time_days: 7,
            service_level_z: 1.65,
            min_order_qty: 50,
        }
    }
}

/// Thresholds and buffers used by the confidence classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    /// Above this WAPE the model is unreliable for the group.
    pub high_wape_threshold: f64,
    /// Coefficient of variation threshold on recent demand.
    pub volatility_cv_threshold: f64,
    /// Spike/drop threshold on the 7-vs-7 day regime score.
    pub regime_change_z: f64,
    pub min_history_days: u32,
    pub buffer_low_conf: f64,
    pub buffer_high_conf: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            high_wape_threshold: 0.25,
            volatility_cv_threshold: 0.35,
            regime_change_z: 2.5,
            min_history_days: 21,
            buffer_low_conf: 0.25,
            buffer_high_conf: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of the trailing diagnostics window, today included.
    pub lookback_days: u32,
    pub replenishment: ReplenishmentConfig,
    pub policy: ConfidencePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 28,
            replenishment: ReplenishmentConfig::default(),
            policy: ConfidencePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Loads a JSON config file. Missing keys fall back to their defaults.
    pub fn from_json_file(path: &Path) -> EngineResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.lookback_days == 0 {
            return Err(EngineError::invalid_config("lookback_days must be >= 1"));
        }

        let r = &self.replenishment;
        if r.lead_time_days == 0 {
            return Err(EngineError::invalid_config("lead_time_days must be >= 1"));
        }
        require_non_negative("service_level_z", r.service_level_z)?;

        let p = &self.policy;
        require_non_negative("high_wape_threshold", p.high_wape_threshold)?;
        require_non_negative("volatility_cv_threshold", p.volatility_cv_threshold)?;
        require_non_negative("regime_change_z", p.regime_change_z)?;

        // A buffer of -100% or less would wipe out (or invert) the reorder.
        for (name, value) in [
            ("buffer_low_conf", p.buffer_low_conf),
            ("buffer_high_conf", p.buffer_high_conf),
        ] {
            if !(value.is_finite() && value > -1.0) {
                return Err(EngineError::invalid_config(format!(
                    "{name} must be a finite number greater than -1 (got {value})"
                )));
            }
        }

        Ok(())
    }
}

fn require_non_negative(name: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_config(format!(
            "{name} must be a finite non-negative number (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lookback_days, 28);
        assert_eq!(config.replenishment.lead_time_days, 7);
        assert_eq!(config.policy.min_history_days, 21);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "policy": { "high_wape_threshold": 0.4 } }"#).unwrap();
        assert_eq!(config.policy.high_wape_threshold, 0.4);
        assert_eq!(config.policy.buffer_low_conf, 0.25);
        assert_eq!(config.replenishment, ReplenishmentConfig::default());
    }

    #[test]
    fn rejects_zero_lead_time() {
        let mut config = EngineConfig::default();
        config.replenishment.lead_time_days = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_buffers_and_thresholds() {
        let mut config = EngineConfig::default();
        config.policy.buffer_low_conf = -1.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.policy.regime_change_z = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{ "lookback_days": 14, "replenishment": { "min_order_qty": 0 } }"#)
            .unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.lookback_days, 14);
        assert_eq!(config.replenishment.min_order_qty, 0);
        assert_eq!(config.replenishment.lead_time_days, 7);
    }
}
