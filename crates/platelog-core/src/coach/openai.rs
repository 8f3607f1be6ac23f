//! OpenAI coach using the Chat Completions API.

use super::provider::{ChatMessage, CoachProvider, CoachRequest, CoachResponse};
use crate::error::CoachError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default Chat Completions endpoint.
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Chat Completions client with bearer-token auth.
pub struct OpenAiCoach {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiCoach {
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoint(api_key, OPENAI_ENDPOINT)
    }

    /// Create with a custom (OpenAI-compatible) endpoint.
    pub fn with_endpoint(api_key: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

fn into_response(chat: ChatResponse, latency_ms: u64) -> Result<CoachResponse, CoachError> {
    let text = chat
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(CoachError::EmptyReply)?;

    Ok(CoachResponse {
        text,
        model: chat.model,
        tokens_used: chat.usage.map(|u| u.total_tokens),
        latency_ms,
    })
}

#[async_trait]
impl CoachProvider for OpenAiCoach {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn chat(&self, request: &CoachRequest) -> Result<CoachResponse, CoachError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoachError::Timeout {
                        timeout_ms: self.timeout().as_millis() as u64,
                    }
                } else {
                    CoachError::Http {
                        message: format!("OpenAI request failed: {e}"),
                        status_code: None,
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CoachError::Http {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| CoachError::Http {
            message: format!("Failed to parse OpenAI response: {e}"),
            status_code: None,
        })?;

        into_response(chat_resp, start.elapsed().as_millis() as u64)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
