//! Conversational habit coach.
//!
//! A stateless proxy to a chat completion API: the caller owns the
//! conversation, the coach prepends its system prompt and handles retries.
//! Without a configured API key every call returns [`CoachReply::Unavailable`]
//! instead of an error.

pub mod openai;
pub mod provider;
pub mod retry;

pub use openai::OpenAiCoach;
pub use provider::{ChatMessage, CoachProvider, CoachRequest, CoachResponse, Role};

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CoachConfig;
use crate::error::CoachError;
use crate::types::MealEstimate;

use self::provider::resolve_env_var;

/// Prepended to every conversation.
pub const SYSTEM_PROMPT: &str = "You are an encouraging habit coach. Be positive, specific, \
and actionable. When asked about meals, provide short feedback on portion control, meal \
balance, and a motivational closing sentence.";

/// Outcome of a coach call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoachReply {
    /// The provider answered.
    Text(CoachResponse),
    /// No credential is configured; nothing was sent.
    Unavailable { reason: String },
}

/// The coach front end: system prompt, defaults, retry policy.
pub struct Coach {
    provider: Option<Arc<dyn CoachProvider>>,
    config: CoachConfig,
}

impl Coach {
    /// Build from config. An unset or empty API key yields an unavailable coach.
    pub fn from_config(config: &CoachConfig) -> Self {
        let provider = resolve_env_var(&config.api_key).map(|key| {
            Arc::new(
                OpenAiCoach::with_endpoint(&key, &config.endpoint)
                    .with_timeout(Duration::from_millis(config.timeout_ms)),
            ) as Arc<dyn CoachProvider>
        });

        if provider.is_none() {
            tracing::debug!("Coach API key not set; coach unavailable");
        }

        Self {
            provider,
            config: config.clone(),
        }
    }

    /// Build around an explicit provider.
    pub fn with_provider(provider: Arc<dyn CoachProvider>, config: &CoachConfig) -> Self {
        Self {
            provider: Some(provider),
            config: config.clone(),
        }
    }

    /// Whether a provider is configured.
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Send `messages` to the coach.
    ///
    /// Overrides fall back to the configured model and temperature. Retryable
    /// failures (timeouts, 429, 5xx, connection errors) are retried with
    /// exponential backoff up to `retry_attempts` extra times.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model_override: Option<&str>,
        temperature_override: Option<f32>,
    ) -> Result<CoachReply, CoachError> {
        let Some(provider) = self.provider.as_ref() else {
            return Ok(CoachReply::Unavailable {
                reason: "No coach API key set. Set OPENAI_API_KEY or coach.api_key.".to_string(),
            });
        };
        if !provider.is_available().await {
            return Ok(CoachReply::Unavailable {
                reason: format!("Coach provider '{}' is not configured", provider.name()),
            });
        }

        let request = self.build_request(messages, model_override, temperature_override);
        let timeout = Duration::from_millis(self.config.timeout_ms);

        let mut attempt = 0;
        loop {
            let error = match tokio::time::timeout(timeout, provider.chat(&request)).await {
                Ok(Ok(response)) => {
                    tracing::debug!(
                        "Coach ({}) replied in {}ms",
                        provider.name(),
                        response.latency_ms
                    );
                    return Ok(CoachReply::Text(response));
                }
                Ok(Err(e)) => e,
                Err(_) => CoachError::Timeout {
                    timeout_ms: self.config.timeout_ms,
                },
            };

            if attempt >= self.config.retry_attempts || !retry::is_retryable(&error) {
                tracing::warn!("Coach request failed: {error}");
                return Err(error);
            }

            attempt += 1;
            let delay = retry::backoff_duration(attempt - 1, self.config.retry_delay_ms);
            tracing::debug!(
                "Retry {attempt}/{} after {delay:?}: {error}",
                self.config.retry_attempts
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        model_override: Option<&str>,
        temperature_override: Option<f32>,
    ) -> CoachRequest {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(ChatMessage::system(SYSTEM_PROMPT));
        all.extend_from_slice(messages);

        CoachRequest {
            messages: all,
            model: model_override
                .map(String::from)
                .unwrap_or_else(|| self.config.model.clone()),
            temperature: temperature_override.unwrap_or(self.config.temperature),
            max_tokens: self.config.max_tokens,
        }
    }
}

/// A conversation carried across coach calls, without the system prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Load a saved conversation. A missing file is an empty conversation.
    pub fn load(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(io::Error::other),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Write the conversation as pretty JSON.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)
    }

    /// History plus the next user message, ready for [`Coach::chat`].
    pub fn with_turn(&self, user: &ChatMessage) -> Vec<ChatMessage> {
        let mut messages = self.messages.clone();
        messages.push(user.clone());
        messages
    }

    /// Append a completed exchange. Unavailable replies are not recorded, so
    /// the message can be resent once a key is configured.
    pub fn record(&mut self, user: ChatMessage, reply: &CoachReply) {
        if let CoachReply::Text(response) = reply {
            self.messages.push(user);
            self.messages.push(ChatMessage::assistant(&response.text));
        }
    }
}

/// Phrase a meal estimate as a user message asking for feedback.
pub fn meal_feedback_prompt(estimate: &MealEstimate) -> String {
    let n = &estimate.nutrients;
    format!(
        "I just ate about {} g of {} (~{} kcal: {} g carbs, {} g protein, {} g fat). \
         How balanced was this meal?",
        estimate.portion_grams, estimate.food.food, n.kcal, n.carbs_g, n.protein_g, n.fat_g
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FoodInfo, NutrientEstimate};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Provider returning a scripted result per call index.
    struct MockProvider {
        response_fn: Box<dyn Fn(u32) -> Result<CoachResponse, CoachError> + Send + Sync>,
        call_count: Arc<AtomicU32>,
        last_request: Mutex<Option<CoachRequest>>,
        delay: Option<Duration>,
        available: bool,
    }

    impl MockProvider {
        fn new(
            response_fn: impl Fn(u32) -> Result<CoachResponse, CoachError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                response_fn: Box::new(response_fn),
                call_count: Arc::new(AtomicU32::new(0)),
                last_request: Mutex::new(None),
                delay: None,
                available: true,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    fn reply(text: &str) -> CoachResponse {
        CoachResponse {
            text: text.to_string(),
            model: "mock-v1".to_string(),
            tokens_used: Some(12),
            latency_ms: 5,
        }
    }

    fn http(code: u16) -> CoachError {
        CoachError::Http {
            message: format!("HTTP {code}"),
            status_code: Some(code),
        }
    }

    #[async_trait]
    impl CoachProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn chat(&self, request: &CoachRequest) -> Result<CoachResponse, CoachError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.response_fn)(idx)
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(60)
        }
    }

    fn fast_config() -> CoachConfig {
        CoachConfig {
            retry_attempts: 2,
            retry_delay_ms: 5,
            timeout_ms: 5000,
            ..CoachConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unavailable_without_key() {
        let config = CoachConfig {
            api_key: "${PLATELOG_UNSET_COACH_KEY_XYZ}".to_string(),
            ..CoachConfig::default()
        };
        let coach = Coach::from_config(&config);
        assert!(!coach.is_available());

        let reply = coach.chat(&[ChatMessage::user("hi")], None, None).await.unwrap();
        assert!(matches!(reply, CoachReply::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_system_prompt_and_defaults() {
        let provider = Arc::new(MockProvider::new(|_| Ok(reply("Keep it up!"))));
        let coach = Coach::with_provider(provider.clone(), &fast_config());

        let result = coach
            .chat(&[ChatMessage::user("I ate pizza")], None, None)
            .await
            .unwrap();
        assert_eq!(result, CoachReply::Text(reply("Keep it up!")));

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(request.messages[1], ChatMessage::user("I ate pizza"));
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, 0.6);
        assert_eq!(request.max_tokens, 300);
    }

    #[tokio::test]
    async fn test_overrides() {
        let provider = Arc::new(MockProvider::new(|_| Ok(reply("ok"))));
        let coach = Coach::with_provider(provider.clone(), &fast_config());
        coach
            .chat(&[ChatMessage::user("hi")], Some("gpt-4o"), Some(0.1))
            .await
            .unwrap();

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, 0.1);
    }

    #[tokio::test]
    async fn test_retry_on_rate_limit() {
        let provider = Arc::new(MockProvider::new(|idx| {
            if idx == 0 {
                Err(http(429))
            } else {
                Ok(reply("Recovered after retry."))
            }
        }));
        let calls = provider.call_count.clone();
        let coach = Coach::with_provider(provider, &fast_config());

        let result = coach.chat(&[ChatMessage::user("hi")], None, None).await;
        assert_eq!(
            result.unwrap(),
            CoachReply::Text(reply("Recovered after retry."))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_retry_on_auth_error() {
        let provider = Arc::new(MockProvider::new(|_| Err(http(401))));
        let calls = provider.call_count.clone();
        let coach = Coach::with_provider(provider, &fast_config());

        let err = coach
            .chat(&[ChatMessage::user("hi")], None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Http { status_code: Some(401), .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry_attempts() {
        let provider = Arc::new(MockProvider::new(|_| Err(http(503))));
        let calls = provider.call_count.clone();
        let coach = Coach::with_provider(provider, &fast_config());

        let err = coach
            .chat(&[ChatMessage::user("hi")], None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Http { status_code: Some(503), .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout() {
        let provider =
            Arc::new(MockProvider::new(|_| Ok(reply("late"))).with_delay(Duration::from_secs(5)));
        let config = CoachConfig {
            retry_attempts: 0,
            timeout_ms: 50,
            ..CoachConfig::default()
        };
        let coach = Coach::with_provider(provider, &config);

        let err = coach
            .chat(&[ChatMessage::user("hi")], None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Timeout { timeout_ms: 50 }));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_not_called() {
        let mut provider = MockProvider::new(|_| Ok(reply("unused")));
        provider.available = false;
        let provider = Arc::new(provider);
        let calls = provider.call_count.clone();
        let coach = Coach::with_provider(provider, &fast_config());

        let reply = coach.chat(&[ChatMessage::user("hi")], None, None).await.unwrap();
        match reply {
            CoachReply::Unavailable { reason } => assert!(reason.contains("mock"), "{reason}"),
            other => panic!("expected Unavailable, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conversation_sends_history() {
        let provider = Arc::new(MockProvider::new(|idx| Ok(reply(&format!("answer {idx}")))));
        let coach = Coach::with_provider(provider.clone(), &fast_config());
        let mut conversation = Conversation::default();

        for text in ["I ate pizza", "and a salad"] {
            let user = ChatMessage::user(text);
            let result = coach
                .chat(&conversation.with_turn(&user), None, None)
                .await
                .unwrap();
            conversation.record(user, &result);
        }

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[2], ChatMessage::assistant("answer 0"));
        assert_eq!(request.messages[3], ChatMessage::user("and a salad"));
        assert_eq!(conversation.messages.len(), 4);
    }

    #[test]
    fn test_conversation_skips_unavailable_replies() {
        let mut conversation = Conversation::default();
        let unavailable = CoachReply::Unavailable {
            reason: "no key".to_string(),
        };
        conversation.record(ChatMessage::user("hi"), &unavailable);
        assert!(conversation.messages.is_empty());
    }

    #[test]
    fn test_conversation_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coach.json");
        assert_eq!(Conversation::load(&path).unwrap(), Conversation::default());

        let mut conversation = Conversation::default();
        conversation.record(ChatMessage::user("hi"), &CoachReply::Text(reply("Hello!")));
        conversation.save(&path).unwrap();

        let loaded = Conversation::load(&path).unwrap();
        assert_eq!(loaded, conversation);
        assert_eq!(loaded.messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_conversation_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coach.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Conversation::load(&path).is_err());
    }

    #[test]
    fn test_meal_feedback_prompt() {
        let estimate = MealEstimate {
            food: FoodInfo {
                food: "cheeseburger".to_string(),
                confidence: 0.82,
                kcal_per_100g: 295.0,
            },
            nutrients: NutrientEstimate {
                kcal: 590.0,
                carbs_g: 59.0,
                protein_g: 22.1,
                fat_g: 29.5,
                notes: String::new(),
            },
            predictions: vec![],
            portion_grams: 200.0,
            content_hash: String::new(),
        };
        let prompt = meal_feedback_prompt(&estimate);
        assert!(prompt.contains("200 g of cheeseburger"));
        assert!(prompt.contains("~590 kcal"));
        assert!(prompt.contains("22.1 g protein"));
    }
}
