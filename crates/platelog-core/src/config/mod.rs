//! Configuration management for platelog.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for platelog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Label classifier settings
    pub classifier: ClassifierConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Estimation defaults
    pub estimation: EstimationConfig,

    /// Journal settings
    pub journal: JournalConfig,

    /// Coach settings
    pub coach: CoachConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.platelog.platelog/config.toml
    /// - Linux: ~/.config/platelog/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\platelog\config\config.toml
    ///
    /// Falls back to ~/.platelog/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "platelog", "platelog")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".platelog").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        let path_str = self.general.model_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Path of the classifier's ONNX file.
    pub fn classifier_model_path(&self) -> PathBuf {
        self.model_dir()
            .join(&self.classifier.model)
            .join(crate::classifier::MODEL_FILENAME)
    }

    /// Path of the classifier's label vocabulary.
    pub fn classifier_labels_path(&self) -> PathBuf {
        self.model_dir()
            .join(&self.classifier.model)
            .join(&self.classifier.labels_file)
    }

    /// Get the resolved journal database path (with ~ expansion).
    pub fn journal_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.journal.path);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.classifier.top_k, 5);
        assert_eq!(config.classifier.image_size, 224);
        assert_eq!(config.classifier.device, Device::Cpu);
        assert_eq!(config.estimation.source, "image_estimate");
        assert_eq!(config.coach.model, "gpt-4o-mini");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[classifier]"));
        assert!(toml.contains("[journal]"));
        assert!(toml.contains("[coach]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [classifier]
            top_k = 3
            device = "cuda"
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.top_k, 3);
        assert_eq!(config.classifier.device, Device::Accelerated);
        assert_eq!(config.classifier.image_size, 224);
        assert_eq!(config.estimation.default_portion_grams, 200.0);
    }

    #[test]
    fn test_from_toml_runs_validation() {
        let err = Config::from_toml("[classifier]\ntop_k = 0\n").unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_model_paths_share_model_dir() {
        let mut config = Config::default();
        config.general.model_dir = PathBuf::from("/opt/models");
        assert_eq!(
            config.classifier_model_path(),
            PathBuf::from("/opt/models/mobilenetv2-12/model.onnx")
        );
        assert_eq!(
            config.classifier_labels_path(),
            PathBuf::from("/opt/models/mobilenetv2-12/imagenet_classes.txt")
        );
    }

    #[test]
    fn test_device_parse() {
        assert_eq!(Device::parse("CPU"), Some(Device::Cpu));
        assert_eq!(Device::parse("cuda"), Some(Device::Accelerated));
        assert_eq!(Device::parse("accelerated"), Some(Device::Accelerated));
        assert_eq!(Device::parse("tpu"), None);
        assert_eq!(Device::Accelerated.to_string(), "accelerated");
    }
}
