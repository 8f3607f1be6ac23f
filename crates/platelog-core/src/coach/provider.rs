//! Coach provider trait and request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoachError;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A fully assembled chat completion request.
#[derive(Debug, Clone)]
pub struct CoachRequest {
    /// Conversation, system prompt first
    pub messages: Vec<ChatMessage>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// The provider's answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachResponse {
    /// Reply text, trimmed
    pub text: String,
    /// Model identifier reported by the provider
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that chat completion backends implement.
///
/// Uses `async_trait` so providers can live behind `Arc<dyn CoachProvider>`.
#[async_trait]
pub trait CoachProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Whether the provider is configured.
    async fn is_available(&self) -> bool;

    /// Send one chat completion request.
    async fn chat(&self, request: &CoachRequest) -> Result<CoachResponse, CoachError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Empty strings and unset variables resolve to `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    let resolved = match value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(var_name) => std::env::var(var_name).ok()?,
        None => value.to_string(),
    };

    if resolved.trim().is_empty() {
        None
    } else {
        Some(resolved)
    }
}
