//! Error types for platelog.
//!
//! Estimation errors keep the pipeline's four-way taxonomy (bad image, model
//! unavailable, empty prediction list, bad portion) so callers can tell an
//! input problem from an environment problem. Journal, coach, and config
//! errors live alongside; the CLI folds them into `anyhow` at its boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by the classify → resolve → estimate pipeline.
///
/// The coordinator passes these through untouched.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// The bytes are not a decodable (or acceptable) raster image.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The inference artifact could not be loaded. Retryable on a later call.
    #[error("Model unavailable at {path}: {message}")]
    ModelUnavailable { path: PathBuf, message: String },

    /// A loaded model failed during the forward pass.
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// The resolver was handed no predictions.
    #[error("Cannot resolve a food from an empty prediction list")]
    EmptyInput,

    /// Portion mass must be a finite, positive number of grams.
    #[error("Invalid portion: {grams} g (must be > 0)")]
    InvalidPortion { grams: f64 },

    /// Calorie density must be finite and non-negative.
    #[error("Invalid calorie density: {kcal_per_100g} kcal/100g (must be >= 0)")]
    InvalidDensity { kcal_per_100g: f64 },
}

impl EstimateError {
    /// True for failures the caller can fix by changing the input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::InvalidPortion { .. } | Self::InvalidDensity { .. }
        )
    }

    /// True for failures caused by the model or runtime environment.
    pub fn is_resource_error(&self) -> bool {
        matches!(self, Self::ModelUnavailable { .. } | Self::Inference { .. })
    }
}

/// Meal / habit journal errors.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failed to prepare the database location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Habit id does not exist
    #[error("Unknown habit id: {0}")]
    UnknownHabit(i64),

    /// Habit names must contain something other than whitespace
    #[error("Habit name must not be empty")]
    EmptyHabitName,
}

/// Coach (chat completion) errors.
#[derive(Error, Debug)]
pub enum CoachError {
    /// HTTP or transport failure. `status_code` is set for non-2xx responses.
    #[error("Coach request failed: {message}")]
    Http {
        message: String,
        status_code: Option<u16>,
    },

    /// The request exceeded its deadline
    #[error("Coach request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The provider answered without any text
    #[error("Coach returned an empty reply")]
    EmptyReply,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_vs_resource_classification() {
        let decode = EstimateError::Decode {
            message: "bad header".into(),
        };
        assert!(decode.is_input_error());
        assert!(!decode.is_resource_error());

        let portion = EstimateError::InvalidPortion { grams: 0.0 };
        assert!(portion.is_input_error());

        let model = EstimateError::ModelUnavailable {
            path: PathBuf::from("/models/mobilenetv2.onnx"),
            message: "missing".into(),
        };
        assert!(model.is_resource_error());
        assert!(!model.is_input_error());

        // Contract breach: neither the user's fault nor the environment's.
        assert!(!EstimateError::EmptyInput.is_input_error());
        assert!(!EstimateError::EmptyInput.is_resource_error());
    }
}
