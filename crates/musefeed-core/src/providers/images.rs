// SPDX-License-Identifier: Apache-2.0

//! Direct "create and return" image generation.
//!
//! Works against the OpenAI-style `/v1/images/generations` endpoint. The
//! response carries either a hosted URL or an inline base64 payload; inline
//! payloads are materialized to a file under the data directory and the path
//! is returned instead.

use std::path::PathBuf;
use std::time::Duration;

use backon::Retryable;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use super::{ProviderConfig, api_key_from_env, check_response, get_provider};
use crate::config::{ImageConfig, data_dir};
use crate::error::MusefeedError;
use crate::retry::{is_retryable, retry_backoff};

/// A generated image, hosted remotely or saved locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutput {
    /// Provider-hosted image URL.
    Url(String),
    /// Path of a locally saved image (base64 payloads are written to disk).
    File(PathBuf),
}

impl std::fmt::Display for ImageOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageOutput::Url(url) => write!(f, "{url}"),
            ImageOutput::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Client for the direct image generations endpoint.
#[derive(Debug)]
pub struct ImageClient {
    provider: &'static ProviderConfig,
    endpoint: &'static str,
    http: Client,
    api_key: SecretString,
    config: ImageConfig,
    /// Where inline base64 images are written.
    output_dir: PathBuf,
}

impl ImageClient {
    /// Creates an image client from configuration, reading the API key from
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unknown, lacks an images endpoint,
    /// the API key environment variable is unset, or the HTTP client cannot
    /// be built.
    pub fn new(config: &ImageConfig) -> Result<Self, MusefeedError> {
        let provider = get_provider(&config.provider).ok_or_else(|| MusefeedError::Config {
            message: format!("Unknown image provider: {}", config.provider),
        })?;
        let api_key = api_key_from_env(provider)?;
        Self::with_api_key(provider, api_key, config)
    }

    /// Creates an image client with an explicitly provided API key.
    pub fn with_api_key(
        provider: &'static ProviderConfig,
        api_key: SecretString,
        config: &ImageConfig,
    ) -> Result<Self, MusefeedError> {
        let endpoint = provider.images_url.ok_or_else(|| MusefeedError::Config {
            message: format!("Provider {} has no images endpoint", provider.name),
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            provider,
            endpoint,
            http,
            api_key,
            config: config.clone(),
            output_dir: data_dir().join("images"),
        })
    }

    /// Overrides where inline base64 images are written.
    #[must_use]
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Generates one image and returns its URL or saved file path.
    ///
    /// Transient failures are retried with exponential backoff. A response
    /// with neither a URL nor inline data is a generation failure.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank prompt, `Provider` for API errors or
    /// an empty response, and `Network` for transport failures.
    #[instrument(skip(self, prompt), fields(provider = self.provider.name, model = %self.config.model))]
    pub async fn generate(&self, prompt: &str) -> Result<ImageOutput, MusefeedError> {
        if prompt.trim().is_empty() {
            return Err(MusefeedError::validation("prompt must not be empty"));
        }

        let request = self.build_request(prompt);

        let generated = (|| async { self.send(&request).await })
            .retry(retry_backoff())
            .when(is_retryable)
            .notify(|err, dur| warn!(error = %err, delay = ?dur, "Retrying after error"))
            .await?;

        let Some(image) = generated.data.into_iter().next() else {
            return Err(MusefeedError::provider(
                self.provider.name,
                format!("No image returned from {}", self.config.model),
            ));
        };

        if let Some(url) = image.url {
            debug!("Image generation returned hosted URL");
            return Ok(ImageOutput::Url(url));
        }

        if let Some(b64) = image.b64_json {
            let path = self.save_inline(&b64)?;
            debug!(path = %path.display(), "Saved inline image payload");
            return Ok(ImageOutput::File(path));
        }

        Err(MusefeedError::provider(
            self.provider.name,
            format!("No image URL returned from {}", self.config.model),
        ))
    }

    /// Builds the request body the way each model family expects it.
    ///
    /// DALL-E models take an explicit `response_format`; gpt-image models
    /// reject it and take `quality`/`background` instead.
    fn build_request(&self, prompt: &str) -> ImageGenerationRequest {
        let is_dalle = self.config.model.starts_with("dall-e");
        ImageGenerationRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.config.size.clone(),
            quality: if is_dalle {
                None
            } else {
                self.config.quality.clone()
            },
            background: if is_dalle {
                None
            } else {
                self.config.background.clone()
            },
            response_format: is_dalle.then(|| "url".to_string()),
        }
    }

    async fn send(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, MusefeedError> {
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
        let generated: ImageGenerationResponse = response.json().await?;
        Ok(generated)
    }

    fn save_inline(&self, b64: &str) -> Result<PathBuf, MusefeedError> {
        let bytes = BASE64
            .decode(b64)
            .map_err(|e| MusefeedError::provider(self.provider.name, format!("Invalid base64 image payload: {e}")))?;

        std::fs::create_dir_all(&self.output_dir).map_err(|e| MusefeedError::Config {
            message: format!("Failed to create image directory: {e}"),
        })?;

        let path = self.output_dir.join(format!("{}.png", Uuid::new_v4()));
        std::fs::write(&path, bytes).map_err(|e| MusefeedError::Config {
            message: format!("Failed to write image file: {e}"),
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(config: &ImageConfig) -> ImageClient {
        let provider = get_provider("openai").unwrap();
        ImageClient::with_api_key(provider, SecretString::from("test_key"), config).unwrap()
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_before_network() {
        let client = test_client(&ImageConfig::default());
        let result = client.generate("").await;
        assert!(matches!(result, Err(MusefeedError::Validation { .. })));
    }

    #[test]
    fn test_dalle_request_uses_url_response_format() {
        let config = ImageConfig {
            model: "dall-e-3".to_string(),
            quality: Some("hd".to_string()),
            background: Some("transparent".to_string()),
            ..ImageConfig::default()
        };
        let request = test_client(&config).build_request("a fox");

        assert_eq!(request.response_format.as_deref(), Some("url"));
        assert!(request.quality.is_none());
        assert!(request.background.is_none());
    }

    #[test]
    fn test_gpt_image_request_passes_quality_and_background() {
        let config = ImageConfig {
            model: "gpt-image-1".to_string(),
            quality: Some("medium".to_string()),
            background: Some("transparent".to_string()),
            ..ImageConfig::default()
        };
        let request = test_client(&config).build_request("a fox");

        assert!(request.response_format.is_none());
        assert_eq!(request.quality.as_deref(), Some("medium"));
        assert_eq!(request.background.as_deref(), Some("transparent"));
    }

    #[test]
    fn test_save_inline_writes_decoded_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client =
            test_client(&ImageConfig::default()).with_output_dir(dir.path().to_path_buf());

        let b64 = BASE64.encode(b"not really a png");
        let path = client.save_inline(&b64).unwrap();

        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"not really a png");
    }

    #[test]
    fn test_save_inline_rejects_bad_base64() {
        let dir = tempfile::tempdir().expect("tempdir");
        let client =
            test_client(&ImageConfig::default()).with_output_dir(dir.path().to_path_buf());

        let result = client.save_inline("!!!not base64!!!");
        assert!(matches!(result, Err(MusefeedError::Provider { .. })));
    }

    #[test]
    fn test_image_output_display() {
        let url = ImageOutput::Url("https://x/img.png".to_string());
        assert_eq!(url.to_string(), "https://x/img.png");
    }
}
