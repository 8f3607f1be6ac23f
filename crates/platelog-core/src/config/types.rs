//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where models are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.platelog/models"),
        }
    }
}

/// Compute backend for classifier inference.
///
/// Only changes where the forward pass runs, never its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Run inference on the general-purpose processor
    #[default]
    Cpu,
    /// Run inference on an available hardware accelerator, falling back to CPU
    #[serde(alias = "cuda", alias = "gpu")]
    Accelerated,
}

impl Device {
    /// Parse a device name (case-insensitive). `cuda` and `gpu` map to `Accelerated`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cpu" => Some(Self::Cpu),
            "accelerated" | "cuda" | "gpu" => Some(Self::Accelerated),
            _ => None,
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Accelerated => write!(f, "accelerated"),
        }
    }
}

/// Label classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Model name; the ONNX file lives at `{model_dir}/{model}/model.onnx`
    pub model: String,

    /// Label vocabulary filename, next to the model file
    pub labels_file: String,

    /// Square input size the network expects
    pub image_size: u32,

    /// Shorter-edge length the image is resized to before the center crop
    pub resize_edge: u32,

    /// Number of ranked predictions to return
    pub top_k: usize,

    /// Default compute backend
    pub device: Device,

    /// Expected BLAKE3 checksum of the model file, verified after download
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_blake3: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "mobilenetv2-12".to_string(),
            labels_file: "imagenet_classes.txt".to_string(),
            image_size: 224,
            resize_edge: 256,
            top_k: 5,
            device: Device::Cpu,
            model_blake3: None,
        }
    }
}

/// Resource limits to protect against problematic uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 25,
            max_image_dimension: 10000,
        }
    }
}

/// Portion and provenance defaults for estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Portion size used when the caller does not give one
    pub default_portion_grams: f64,

    /// Source tag written with image-derived meal records
    pub source: String,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            default_portion_grams: 200.0,
            source: "image_estimate".to_string(),
        }
    }
}

/// Journal (SQLite) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Database file path (supports `~`)
    pub path: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: "~/.platelog/habits.db".to_string(),
        }
    }
}

/// Chat coach settings (OpenAI-compatible Chat Completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per reply
    pub max_tokens: u32,

    /// Chat Completions endpoint
    pub endpoint: String,

    /// Extra attempts after a retryable failure
    pub retry_attempts: u32,

    /// Base delay for exponential backoff in milliseconds
    pub retry_delay_ms: u64,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.6,
            max_tokens: 300,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            retry_attempts: 2,
            retry_delay_ms: 1000,
            timeout_ms: 60000,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
