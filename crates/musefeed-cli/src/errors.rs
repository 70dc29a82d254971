// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! This module provides a formatting layer that downcasts `anyhow::Error` to
//! `MusefeedError` and adds hints for different error types. This separates
//! structured error data (library) from user-friendly presentation (CLI).

use std::fmt::Write;

use anyhow::Error;
use musefeed_core::{MusefeedError, get_provider};

/// Formats an error for CLI display with helpful hints.
///
/// Downcasts `anyhow::Error` to `MusefeedError` and adds provider-specific
/// hints. If the error is not a `MusefeedError`, returns the original error
/// message.
pub fn format_error(error: &Error) -> String {
    let Some(err) = error.downcast_ref::<MusefeedError>() else {
        return error.to_string();
    };

    match err {
        MusefeedError::Provider {
            provider,
            status,
            message,
        } => {
            let mut msg = format!("Provider error from {provider}: {message}");
            if let Some(code) = status {
                let _ = write!(msg, " (HTTP {code})");
            }
            if let Some(p) = get_provider(provider) {
                let _ = write!(
                    msg,
                    "\n\nTip: Check your {} environment variable.",
                    p.api_key_env
                );
            }
            msg
        }
        MusefeedError::RateLimited {
            provider,
            retry_after,
        } => {
            format!(
                "Rate limit exceeded on {provider}, retry after {retry_after}s\n\n\
                 Tip: Wait at least {retry_after} seconds before retrying."
            )
        }
        MusefeedError::Timeout { .. } => {
            format!("{err}\n\nTip: The job may still complete. Try again in a moment.")
        }
        MusefeedError::Config { message: _ } => {
            format!(
                "{err}\n\nTip: Check your config file at {}",
                musefeed_core::config_file_path().display()
            )
        }
        MusefeedError::Network(_) => {
            format!("{err}\n\nTip: Check your internet connection and try again.")
        }
        MusefeedError::Validation { .. } => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_provider_error_adds_api_key_hint() {
        let error = MusefeedError::Provider {
            provider: "openai".to_string(),
            status: Some(400),
            message: "Invalid request".to_string(),
        };
        let formatted = format_error(&anyhow::Error::new(error));

        assert!(formatted.contains("Invalid request"));
        assert!(formatted.contains("HTTP 400"));
        assert!(formatted.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_format_rate_limited_error() {
        let error = MusefeedError::RateLimited {
            provider: "replicate".to_string(),
            retry_after: 30,
        };
        let formatted = format_error(&anyhow::Error::new(error));

        assert!(formatted.contains("Rate limit exceeded on replicate"));
        assert!(formatted.contains("30 seconds"));
    }

    #[test]
    fn test_format_timeout_error() {
        let error = MusefeedError::Timeout {
            provider: "replicate".to_string(),
            attempts: 10,
        };
        let formatted = format_error(&anyhow::Error::new(error));

        assert!(formatted.contains("10 status checks"));
    }

    #[test]
    fn test_format_config_error_points_at_config_file() {
        let error = MusefeedError::Config {
            message: "bad toml".to_string(),
        };
        let formatted = format_error(&anyhow::Error::new(error));

        assert!(formatted.contains("config file"));
        assert!(formatted.contains("config.toml"));
    }

    #[test]
    fn test_format_non_musefeed_error() {
        let error = anyhow::anyhow!("Some generic error");
        assert_eq!(format_error(&error), "Some generic error");
    }
}
