//! Injectable analysis configuration
//!
//! Every threshold the pipeline uses lives here so tests and installations can
//! vary them without touching the defaults in `lib.rs`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{
    ANALYSIS_DURATION_SECS, DEAD_SENSOR_FLOOR, DEAD_SENSOR_FRACTION, EMPTY_BUTTONS_SCORE,
    FALLBACK_SAMPLE_RATE_HZ, PHASE_GAP_SECS, RECORD_BASE_URL, SCL_MAX_STEP, SCL_MAX_VALID,
    SCL_MIN_VALID, SCL_START_DELAY_SECS, SLIDER_MAX_RAW, SLIDER_TOLERANCE_PCT, THRESHOLD_REL_SCL,
    WEIGHT_BUTTONS, WEIGHT_SCL, WEIGHT_SLIDER,
};

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Thresholds, durations and weights for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Gap between consecutive timestamps that marks the phase boundary
    pub phase_gap_secs: f64,
    /// Raw SCL below this is a dead reading
    pub dead_floor: f64,
    /// Dead-reading fraction at which the channel is dead
    pub dead_fraction: f64,
    /// Analysed span of the dynamic window
    pub analysis_duration_secs: f64,
    /// Skipped leading span of the dynamic window
    pub start_delay_secs: f64,
    pub scl_min_valid: f64,
    pub scl_max_valid: f64,
    pub scl_max_step: f64,
    /// Minimum relative SCL increase flagged as arousal
    pub arousal_threshold: f64,
    pub slider_max_raw: u16,
    pub slider_tolerance_pct: f64,
    pub empty_buttons_score: f64,
    pub weight_scl: f64,
    pub weight_slider: f64,
    pub weight_buttons: f64,
    pub fallback_sample_rate_hz: f64,
    pub record_base_url: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            phase_gap_secs: PHASE_GAP_SECS,
            dead_floor: DEAD_SENSOR_FLOOR,
            dead_fraction: DEAD_SENSOR_FRACTION,
            analysis_duration_secs: ANALYSIS_DURATION_SECS,
            start_delay_secs: SCL_START_DELAY_SECS,
            scl_min_valid: SCL_MIN_VALID,
            scl_max_valid: SCL_MAX_VALID,
            scl_max_step: SCL_MAX_STEP,
            arousal_threshold: THRESHOLD_REL_SCL,
            slider_max_raw: SLIDER_MAX_RAW,
            slider_tolerance_pct: SLIDER_TOLERANCE_PCT,
            empty_buttons_score: EMPTY_BUTTONS_SCORE,
            weight_scl: WEIGHT_SCL,
            weight_slider: WEIGHT_SLIDER,
            weight_buttons: WEIGHT_BUTTONS,
            fallback_sample_rate_hz: FALLBACK_SAMPLE_RATE_HZ,
            record_base_url: RECORD_BASE_URL.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Midpoint of the analysed span, relative to the end of the start delay
    pub fn half_duration_secs(&self) -> f64 {
        self.analysis_duration_secs / 2.0
    }

    /// Reject configurations the pipeline cannot evaluate meaningfully
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.phase_gap_secs > 0.0) {
            return Err(invalid("phase_gap_secs must be positive"));
        }
        if !(self.analysis_duration_secs > 0.0) {
            return Err(invalid("analysis_duration_secs must be positive"));
        }
        if !(self.start_delay_secs >= 0.0) {
            return Err(invalid("start_delay_secs cannot be negative"));
        }
        if !(self.dead_fraction > 0.0 && self.dead_fraction <= 1.0) {
            return Err(invalid("dead_fraction must be in (0, 1]"));
        }
        if !(self.scl_min_valid < self.scl_max_valid) {
            return Err(invalid("scl_min_valid must be below scl_max_valid"));
        }
        if !(self.scl_max_step > 0.0) {
            return Err(invalid("scl_max_step must be positive"));
        }
        if !(self.arousal_threshold > 0.0) {
            return Err(invalid("arousal_threshold must be positive"));
        }
        if self.slider_max_raw == 0 {
            return Err(invalid("slider_max_raw cannot be zero"));
        }
        if !(self.slider_tolerance_pct >= 0.0) {
            return Err(invalid("slider_tolerance_pct cannot be negative"));
        }
        if !(0.0..=1.0).contains(&self.empty_buttons_score) {
            return Err(invalid("empty_buttons_score must be in [0, 1]"));
        }

        let weights = [self.weight_scl, self.weight_slider, self.weight_buttons];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(invalid("weights cannot be negative"));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(invalid(format!("weights must sum to 1.0, got {sum}")));
        }

        if !(self.fallback_sample_rate_hz > 0.0) {
            return Err(invalid("fallback_sample_rate_hz must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_half_duration() {
        assert_eq!(AnalysisConfig::default().half_duration_secs(), 20.0);
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let config = AnalysisConfig {
            weight_scl: 0.6,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        for threshold in [0.0, -0.05, f64::NAN] {
            let config = AnalysisConfig {
                arousal_threshold: threshold,
                ..AnalysisConfig::default()
            };
            assert!(config.validate().is_err(), "{threshold}");
        }
    }

    #[test]
    fn test_rejects_inverted_scl_domain() {
        let config = AnalysisConfig {
            scl_min_valid: 500.0,
            scl_max_valid: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"arousal_threshold": 0.10, "slider_tolerance_pct": 5.0}}"#).unwrap();

        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.arousal_threshold, 0.10);
        assert_eq!(config.slider_tolerance_pct, 5.0);
        assert_eq!(config.dead_floor, DEAD_SENSOR_FLOOR);
    }

    #[test]
    fn test_invalid_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            AnalysisConfig::from_json_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
