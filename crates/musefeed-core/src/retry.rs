// SPDX-License-Identifier: Apache-2.0

//! Retry logic with exponential backoff for transient failures.
//!
//! Provides helpers to detect retryable errors and configure exponential
//! backoff with jitter for HTTP requests to generation providers.

use backon::ExponentialBuilder;

use crate::error::MusefeedError;

/// Determines if an HTTP status code is retryable.
///
/// Retryable status codes are:
/// - 429 (Too Many Requests / Rate Limited)
/// - 500 (Internal Server Error)
/// - 502 (Bad Gateway)
/// - 503 (Service Unavailable)
/// - 504 (Gateway Timeout)
#[must_use]
pub fn is_retryable_http(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Determines if a `MusefeedError` is transient and should be retried.
///
/// Network timeouts and connect failures, rate limits, and provider errors
/// with retryable status codes are transient. Validation, configuration, and
/// timeout errors are not.
#[must_use]
pub fn is_retryable(e: &MusefeedError) -> bool {
    match e {
        MusefeedError::Network(req_err) => {
            if req_err.is_timeout() || req_err.is_connect() {
                return true;
            }
            req_err
                .status()
                .is_some_and(|s| is_retryable_http(s.as_u16()))
        }
        MusefeedError::RateLimited { .. } => true,
        MusefeedError::Provider { status, .. } => status.is_some_and(is_retryable_http),
        _ => false,
    }
}

/// Creates a configured exponential backoff builder for retries.
///
/// - Factor: 2 (exponential growth)
/// - Min delay: 1 second
/// - Max times: 3
/// - Jitter: enabled
#[must_use]
pub fn retry_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_factor(2.0)
        .with_min_delay(std::time::Duration::from_secs(1))
        .with_max_times(3)
        .with_jitter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_http_retryable_codes() {
        assert!(is_retryable_http(429));
        assert!(is_retryable_http(500));
        assert!(is_retryable_http(502));
        assert!(is_retryable_http(503));
        assert!(is_retryable_http(504));
    }

    #[test]
    fn test_is_retryable_http_non_retryable_codes() {
        assert!(!is_retryable_http(400));
        assert!(!is_retryable_http(401));
        assert!(!is_retryable_http(403));
        assert!(!is_retryable_http(404));
        assert!(!is_retryable_http(200));
    }

    #[test]
    fn test_rate_limited_is_retryable() {
        let err = MusefeedError::RateLimited {
            provider: "openai".to_string(),
            retry_after: 30,
        };
        assert!(is_retryable(&err));
    }

    #[test]
    fn test_provider_error_retryable_by_status() {
        let retryable = MusefeedError::Provider {
            provider: "openai".to_string(),
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert!(is_retryable(&retryable));

        let terminal = MusefeedError::Provider {
            provider: "openai".to_string(),
            status: Some(400),
            message: "bad prompt".to_string(),
        };
        assert!(!is_retryable(&terminal));

        let unknown = MusefeedError::provider("openai", "no status");
        assert!(!is_retryable(&unknown));
    }

    #[test]
    fn test_validation_and_timeout_are_not_retryable() {
        assert!(!is_retryable(&MusefeedError::validation("blank prompt")));
        assert!(!is_retryable(&MusefeedError::Timeout {
            provider: "replicate".to_string(),
            attempts: 10,
        }));
        assert!(!is_retryable(&MusefeedError::Config {
            message: "missing key".to_string(),
        }));
    }

    #[test]
    fn test_retry_backoff_configuration() {
        let backoff = retry_backoff();
        let _: ExponentialBuilder = backoff;
    }
}
