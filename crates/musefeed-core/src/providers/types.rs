// SPDX-License-Identifier: Apache-2.0

//! Wire types for the OpenAI-compatible generation APIs.
//!
//! Both OpenAI and xAI share these request/response shapes for chat
//! completions and image generation.

use serde::{Deserialize, Serialize};

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
}

/// Request body for the chat completions API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g., "gpt-4o", "grok-3-latest").
    pub model: String,
    /// List of messages in the conversation.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens in response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response from the chat completions API.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// List of choices (usually just one).
    pub choices: Vec<Choice>,
}

/// A single choice in the chat completion response.
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ChatMessage,
}

/// Request body for the image generations API.
#[derive(Debug, Serialize)]
pub struct ImageGenerationRequest {
    /// Model identifier (e.g., "gpt-image-1", "dall-e-3").
    pub model: String,
    /// Text prompt describing the image.
    pub prompt: String,
    /// Number of images to generate.
    pub n: u8,
    /// Image size (e.g., "1024x1024").
    pub size: String,
    /// Quality hint (model-dependent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Background mode ("transparent" or "auto").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Requested response format ("url" where supported).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}

/// Response from the image generations API.
#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    /// Generated images.
    pub data: Vec<ImageData>,
}

/// A single generated image, delivered by URL or inline base64.
#[derive(Debug, Deserialize)]
pub struct ImageData {
    /// URL of the generated image, if the provider hosts it.
    #[serde(default)]
    pub url: Option<String>,
    /// Base64-encoded image payload, if delivered inline.
    #[serde(default)]
    pub b64_json: Option<String>,
}
