// SPDX-License-Identifier: Apache-2.0

//! Error types for Musefeed.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur during Musefeed operations.
#[derive(Error, Debug)]
pub enum MusefeedError {
    /// Invalid input rejected before any network call (e.g., blank prompt).
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input.
        message: String,
    },

    /// Error reported by a generation provider (OpenAI, xAI, Replicate).
    #[error("Provider error from {provider}: {message}")]
    Provider {
        /// Name of the provider (e.g., "openai", "replicate").
        provider: String,
        /// Optional HTTP status code from the provider.
        status: Option<u16>,
        /// Error message from the provider.
        message: String,
    },

    /// A generation job never reached a terminal state within the poll budget.
    #[error("Generation on {provider} timed out after {attempts} status checks")]
    Timeout {
        /// Name of the provider that timed out.
        provider: String,
        /// Number of status checks performed before giving up.
        attempts: u32,
    },

    /// Rate limit exceeded on a provider.
    #[error("Rate limit exceeded on {provider}, retry after {retry_after}s")]
    RateLimited {
        /// Name of the provider that rate limited.
        provider: String,
        /// Number of seconds to wait before retrying.
        retry_after: u64,
    },

    /// Configuration error, including missing API credentials.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Network/HTTP error from reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<config::ConfigError> for MusefeedError {
    fn from(err: config::ConfigError) -> Self {
        MusefeedError::Config {
            message: err.to_string(),
        }
    }
}

impl MusefeedError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        MusefeedError::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a provider error without an HTTP status.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        MusefeedError::Provider {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = MusefeedError::validation("prompt is empty");
        assert_eq!(err.to_string(), "Invalid input: prompt is empty");
    }

    #[test]
    fn test_provider_display() {
        let err = MusefeedError::Provider {
            provider: "replicate".to_string(),
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Provider error from replicate: boom");
    }

    #[test]
    fn test_timeout_display() {
        let err = MusefeedError::Timeout {
            provider: "replicate".to_string(),
            attempts: 10,
        };
        assert!(err.to_string().contains("10 status checks"));
    }
}
