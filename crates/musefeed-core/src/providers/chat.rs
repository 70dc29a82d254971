// SPDX-License-Identifier: Apache-2.0

//! Text generation via OpenAI-compatible chat completions.
//!
//! Works against any provider in the registry that exposes a chat endpoint
//! (OpenAI, xAI). Short-form content requests are framed by a content kind
//! (tweet, joke, fact) before being sent.

use std::time::Duration;

use backon::Retryable;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::{ProviderConfig, api_key_from_env, check_response, get_provider};
use crate::config::TextConfig;
use crate::error::MusefeedError;
use crate::retry::{is_retryable, retry_backoff};

/// System prompt applied to every short-form generation.
const SYSTEM_PROMPT: &str =
    "You generate short-form content that is concise, creative, and engaging.";

/// The kind of short-form content to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A social post, max 280 characters.
    Tweet,
    /// A short, clean joke.
    Joke,
    /// A brief educational fact.
    Fact,
    /// The user's prompt verbatim.
    Custom,
}

impl ContentKind {
    /// Frames a user topic as a full prompt for this content kind.
    #[must_use]
    pub fn frame(self, topic: &str) -> String {
        match self {
            ContentKind::Tweet => format!(
                "Write a Twitter/X post (max 280 characters) about: {topic}. Make it engaging and shareable."
            ),
            ContentKind::Joke => {
                format!("Write a short joke about: {topic}. Keep it clean and clever.")
            }
            ContentKind::Fact => format!(
                "Share a brief educational fact about: {topic}. Make it interesting and informative."
            ),
            ContentKind::Custom => topic.to_string(),
        }
    }
}

/// Client for OpenAI-compatible chat completions.
#[derive(Debug)]
pub struct ChatClient {
    provider: &'static ProviderConfig,
    endpoint: &'static str,
    http: Client,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatClient {
    /// Creates a chat client from configuration, reading the API key from
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unknown, lacks a chat endpoint,
    /// the API key environment variable is unset, or the HTTP client cannot
    /// be built.
    pub fn new(config: &TextConfig) -> Result<Self, MusefeedError> {
        let provider = get_provider(&config.provider).ok_or_else(|| MusefeedError::Config {
            message: format!("Unknown text provider: {}", config.provider),
        })?;
        let api_key = api_key_from_env(provider)?;
        Self::with_api_key(provider, api_key, config)
    }

    /// Creates a chat client with an explicitly provided API key.
    pub fn with_api_key(
        provider: &'static ProviderConfig,
        api_key: SecretString,
        config: &TextConfig,
    ) -> Result<Self, MusefeedError> {
        let endpoint = provider.chat_url.ok_or_else(|| MusefeedError::Config {
            message: format!("Provider {} has no chat endpoint", provider.name),
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            provider,
            endpoint,
            http,
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Generates short-form text for a topic.
    ///
    /// The topic is framed by `kind`, a fixed system prompt is prepended, and
    /// the first choice's content is returned trimmed. Transient failures are
    /// retried with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank topic, `Provider` for API errors or
    /// an empty completion, and `Network` for transport failures.
    #[instrument(skip(self, topic), fields(provider = self.provider.name, model = %self.model))]
    pub async fn generate(&self, kind: ContentKind, topic: &str) -> Result<String, MusefeedError> {
        if topic.trim().is_empty() {
            return Err(MusefeedError::validation("prompt must not be empty"));
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: kind.frame(topic),
                },
            ],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        };

        let completion = (|| async { self.send(&request).await })
            .retry(retry_backoff())
            .when(is_retryable)
            .notify(|err, dur| warn!(error = %err, delay = ?dur, "Retrying after error"))
            .await?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                MusefeedError::provider(self.provider.name, "No text content returned")
            })?;

        debug!(response_length = content.len(), "Received chat completion");
        Ok(content)
    }

    async fn send(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, MusefeedError> {
        let response = self
            .http
            .post(self.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(request)
            .send()
            .await?;

        let response = check_response(self.provider.name, response).await?;
        let completion: ChatCompletionResponse = response.json().await?;
        Ok(completion)
    }
}
