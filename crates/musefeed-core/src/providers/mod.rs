// SPDX-License-Identifier: Apache-2.0

//! Generation provider clients.
//!
//! Three client styles exist, matching the external APIs:
//! - [`chat`] - OpenAI-compatible chat completions for text generation
//! - [`images`] - direct "create and return" image generation
//! - [`replicate`] - job-based image generation with a polling fallback
//!
//! Endpoint URLs and credential environment variables live in a static
//! provider registry so clients and error hints stay consistent.

pub mod chat;
pub mod images;
pub mod replicate;
pub mod types;

use std::env;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::error::MusefeedError;

/// Static configuration for a generation provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderConfig {
    /// Provider name (e.g., "openai", "xai", "replicate").
    pub name: &'static str,
    /// Chat completions endpoint, if the provider offers one.
    pub chat_url: Option<&'static str>,
    /// Direct image generation endpoint, if the provider offers one.
    pub images_url: Option<&'static str>,
    /// Environment variable holding the API key.
    pub api_key_env: &'static str,
}

/// Registry of known providers.
static PROVIDERS: &[ProviderConfig] = &[
    ProviderConfig {
        name: "openai",
        chat_url: Some("https://api.openai.com/v1/chat/completions"),
        images_url: Some("https://api.openai.com/v1/images/generations"),
        api_key_env: "OPENAI_API_KEY",
    },
    ProviderConfig {
        name: "xai",
        chat_url: Some("https://api.x.ai/v1/chat/completions"),
        images_url: Some("https://api.x.ai/v1/images/generations"),
        api_key_env: "XAI_API_KEY",
    },
    ProviderConfig {
        name: "replicate",
        chat_url: None,
        images_url: None,
        api_key_env: "REPLICATE_API_TOKEN",
    },
];

/// Looks up a provider by name.
#[must_use]
pub fn get_provider(name: &str) -> Option<&'static ProviderConfig> {
    PROVIDERS.iter().find(|p| p.name == name)
}

/// Fetches a provider's API key from the environment.
///
/// A missing or empty key is a configuration error: credentials are injected
/// via the environment, never embedded or defaulted.
pub fn api_key_from_env(provider: &ProviderConfig) -> Result<SecretString, MusefeedError> {
    match env::var(provider.api_key_env) {
        Ok(key) if !key.is_empty() => Ok(SecretString::new(key.into())),
        _ => Err(MusefeedError::Config {
            message: format!(
                "Missing {} environment variable. Set it with: export {}=your_api_key",
                provider.api_key_env, provider.api_key_env
            ),
        }),
    }
}

/// Checks an HTTP response for provider-level errors.
///
/// Maps 401 to a credential hint, 429 to `RateLimited` (parsing the
/// `Retry-After` header), and any other non-success status to a `Provider`
/// error carrying the response body.
pub(crate) async fn check_response(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, MusefeedError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 401 {
        return Err(MusefeedError::Provider {
            provider: provider.to_string(),
            status: Some(401),
            message: "Invalid API key".to_string(),
        });
    }

    if status.as_u16() == 429 {
        warn!(provider, "Rate limited by provider API");
        // Parse Retry-After header (seconds), default to 0 if not present
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        debug!(retry_after, "Parsed Retry-After header");
        return Err(MusefeedError::RateLimited {
            provider: provider.to_string(),
            retry_after,
        });
    }

    let error_body = response.text().await.unwrap_or_default();
    Err(MusefeedError::Provider {
        provider: provider.to_string(),
        status: Some(status.as_u16()),
        message: error_body,
    })
}

/// An image generator usable by the feed service.
///
/// Implemented by the Replicate job client in production and by scripted
/// doubles in tests.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image for `prompt` and returns its URL.
    async fn generate(&self, prompt: &str) -> Result<String, MusefeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert!(get_provider("openai").is_some());
        assert!(get_provider("xai").is_some());
        assert!(get_provider("replicate").is_some());
        assert!(get_provider("nonexistent").is_none());
    }

    #[test]
    fn test_registry_endpoints() {
        let openai = get_provider("openai").unwrap();
        assert!(openai.chat_url.unwrap().contains("api.openai.com"));
        assert!(openai.images_url.unwrap().contains("images/generations"));

        let replicate = get_provider("replicate").unwrap();
        assert!(replicate.chat_url.is_none());
        assert_eq!(replicate.api_key_env, "REPLICATE_API_TOKEN");
    }

    #[test]
    #[serial_test::serial]
    fn test_api_key_from_env_missing() {
        let provider = get_provider("xai").unwrap();
        let original = std::env::var(provider.api_key_env).ok();
        unsafe {
            std::env::remove_var(provider.api_key_env);
        }

        let result = api_key_from_env(provider);
        assert!(matches!(result, Err(MusefeedError::Config { .. })));

        // Cleanup
        if let Some(val) = original {
            unsafe {
                std::env::set_var(provider.api_key_env, val);
            }
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_api_key_from_env_present() {
        let provider = get_provider("xai").unwrap();
        let original = std::env::var(provider.api_key_env).ok();
        unsafe {
            std::env::set_var(provider.api_key_env, "xai-test-key");
        }

        assert!(api_key_from_env(provider).is_ok());

        // Cleanup
        unsafe {
            match original {
                Some(val) => std::env::set_var(provider.api_key_env, val),
                None => std::env::remove_var(provider.api_key_env),
            }
        }
    }
}
