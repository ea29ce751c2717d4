//! Chat-completion client for OpenAI-compatible endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::InsightError;
use crate::http::{Authorization, EndpointRequest, FetchResult, HttpClient};
use crate::text::truncate_for_message;

/// Default endpoint root (Groq's OpenAI-compatible API).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Upper bound on generated tokens per request.
pub const MAX_TOKENS: u32 = 1024;

/// Sampling temperature for every request.
pub const TEMPERATURE: f64 = 0.2;

const ERROR_DETAIL_LIMIT: usize = 160;

/// Why a completion request produced no text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    /// No API key was configured.
    #[error("AI API key is required (set ai_api_key, REPOPULSE_AI_API_KEY, or GROQ_API_KEY)")]
    MissingApiKey,

    /// The request never produced a usable response.
    #[error("AI request transport failed: {message}")]
    Transport {
        /// Transport-level detail.
        message: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("AI request failed with status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Shortened response body.
        body: String,
    },

    /// The response did not carry assistant text.
    #[error("AI response did not contain assistant text")]
    EmptyResponse,
}

/// Connection settings for [`OpenAiCompletionService`].
#[derive(Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Endpoint root, e.g. `https://api.groq.com/openai/v1`.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Bearer credential.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
        }
    }
}

impl CompletionConfig {
    /// Constructs configuration with explicit settings.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }
}

/// Sends a single-turn prompt and returns the assistant's text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Completes `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when no text could be obtained.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Completes `prompt`, turning any failure into a readable notice.
///
/// Feature reports embed the notice in place of the model's answer so one
/// failed call never aborts a whole run.
pub async fn complete_or_notice(service: &dyn CompletionService, prompt: &str) -> String {
    match service.complete(prompt).await {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!("completion failed: {error}");
            format!("AI analysis unavailable: {error}")
        }
    }
}

/// OpenAI-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionService {
    config: CompletionConfig,
    http: HttpClient,
}

impl OpenAiCompletionService {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn new(config: CompletionConfig) -> Result<Self, InsightError> {
        let authorization = config
            .api_key
            .as_ref()
            .map(|key| Authorization::Bearer(key.clone()));
        let http = HttpClient::new(config.base_url.clone())?.with_authorization(authorization);
        Ok(Self { config, http })
    }

    fn has_api_key(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if !self.has_api_key() {
            return Err(CompletionError::MissingApiKey);
        }

        let payload = ChatCompletionsRequest {
            model: self.config.model.as_str(),
            messages: vec![ChatCompletionsMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = match self
            .http
            .post_json(&EndpointRequest::new("/chat/completions"), &payload)
            .await
        {
            FetchResult::Success(value) => value,
            FetchResult::NotFound => {
                return Err(CompletionError::Status {
                    code: 404,
                    body: "endpoint not found".to_owned(),
                });
            }
            FetchResult::TransportError(message) => {
                return Err(CompletionError::Transport { message });
            }
            FetchResult::StatusError { code, body } => {
                return Err(CompletionError::Status {
                    code,
                    body: truncate_for_message(&body, ERROR_DETAIL_LIMIT),
                });
            }
        };

        let decoded: ChatCompletionsResponse =
            serde_json::from_value(response).map_err(|error| CompletionError::Transport {
                message: format!("AI response JSON decoding failed: {error}"),
            })?;

        decoded
            .choices
            .first()
            .and_then(|choice| parse_content_value(&choice.message.content))
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToOwned::to_owned)
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionsMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: ChatContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
