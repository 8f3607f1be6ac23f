//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.image_size must be > 0".into(),
            ));
        }
        if self.classifier.resize_edge < self.classifier.image_size {
            return Err(ConfigError::ValidationError(
                "classifier.resize_edge must be >= classifier.image_size".into(),
            ));
        }
        if self.classifier.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.top_k must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        let portion = self.estimation.default_portion_grams;
        if !portion.is_finite() || portion <= 0.0 {
            return Err(ConfigError::ValidationError(
                "estimation.default_portion_grams must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.coach.temperature) {
            return Err(ConfigError::ValidationError(
                "coach.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.coach.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "coach.max_tokens must be > 0".into(),
            ));
        }
        if self.coach.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "coach.timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
