// SPDX-License-Identifier: Apache-2.0

//! Job-based image generation via the Replicate predictions API.
//!
//! A generation request is submitted with `Prefer: wait`, which usually
//! returns a completed prediction synchronously. When it does not, the
//! client falls back to a bounded polling loop against the status endpoint.
//!
//! Attempt counting: the synchronous submit response does not count toward
//! the poll budget. `max_poll_attempts` bounds status fetches only, so a job
//! that never settles is observed `1 + max_poll_attempts` times in total.
//!
//! State machine per call:
//! `submitted -> {succeeded | failed | polling -> (succeeded | failed | timed_out)}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{ImageGenerator, api_key_from_env, check_response, get_provider};
use crate::config::ReplicateConfig;
use crate::error::MusefeedError;

/// Replicate API base URL.
const REPLICATE_API_URL: &str = "https://api.replicate.com/v1";

/// Provider name used in errors and logs.
const PROVIDER: &str = "replicate";

/// Input parameters for a prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionInput {
    /// Text prompt describing the image.
    pub prompt: String,
    /// Trade quality for speed where the model supports it.
    pub go_fast: bool,
    /// Number of outputs to generate.
    pub num_outputs: u8,
    /// Aspect ratio (e.g., "1:1").
    pub aspect_ratio: String,
    /// Output format (e.g., "webp").
    pub output_format: String,
    /// Output quality (0-100).
    pub output_quality: u8,
}

/// Request body for prediction creation.
#[derive(Debug, Serialize)]
pub struct PredictionRequest {
    /// Model input parameters.
    pub input: PredictionInput,
}

/// Lifecycle status of a prediction job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    /// Job accepted, not yet running.
    Starting,
    /// Job running.
    Processing,
    /// Terminal: job completed with output.
    Succeeded,
    /// Terminal: job failed.
    Failed,
    /// Terminal: job canceled.
    Canceled,
}

impl PredictionStatus {
    /// Returns true for terminal states.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }
}

/// A prediction job record.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    /// Job identifier used for status fetches.
    pub id: String,
    /// Current lifecycle status.
    pub status: PredictionStatus,
    /// Output URLs, present once succeeded.
    #[serde(default)]
    pub output: Option<Vec<String>>,
    /// Provider-reported error, present on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// Transport for the predictions API.
///
/// The HTTP implementation talks to Replicate; tests script responses to
/// drive the submit/poll state machine deterministically.
#[async_trait]
pub trait PredictionsApi: Send + Sync {
    /// Submits a prediction, requesting synchronous wait behavior.
    async fn create(&self, request: &PredictionRequest) -> Result<Prediction, MusefeedError>;

    /// Fetches the current state of a prediction by id.
    async fn status(&self, id: &str) -> Result<Prediction, MusefeedError>;
}

/// HTTP transport against the hosted Replicate API.
#[derive(Debug)]
pub struct HttpPredictionsApi {
    http: Client,
    api_key: SecretString,
    model: String,
}

impl HttpPredictionsApi {
    /// Creates the HTTP transport.
    pub fn new(api_key: SecretString, config: &ReplicateConfig) -> Result<Self, MusefeedError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl PredictionsApi for HttpPredictionsApi {
    async fn create(&self, request: &PredictionRequest) -> Result<Prediction, MusefeedError> {
        let url = format!("{REPLICATE_API_URL}/models/{}/predictions", self.model);
        let response = self
            .http
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            // Ask the API to hold the connection until the job completes
            .header("Prefer", "wait")
            .json(request)
            .send()
            .await?;

        let response = check_response(PROVIDER, response).await?;
        let prediction: Prediction = response.json().await?;
        Ok(prediction)
    }

    async fn status(&self, id: &str) -> Result<Prediction, MusefeedError> {
        let url = format!("{REPLICATE_API_URL}/predictions/{id}");
        let response = self
            .http
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await?;

        let response = check_response(PROVIDER, response).await?;
        let prediction: Prediction = response.json().await?;
        Ok(prediction)
    }
}

/// Job client for Replicate image generation.
pub struct ReplicateClient {
    api: Box<dyn PredictionsApi>,
    config: ReplicateConfig,
}

impl ReplicateClient {
    /// Creates a client from configuration, reading the API token from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `REPLICATE_API_TOKEN` is unset.
    pub fn new(config: &ReplicateConfig) -> Result<Self, MusefeedError> {
        let provider = get_provider(PROVIDER).expect("replicate registered");
        let api_key = api_key_from_env(provider)?;
        let api = HttpPredictionsApi::new(api_key, config)?;
        Ok(Self::with_api(Box::new(api), config.clone()))
    }

    /// Creates a client over an explicit transport (used by tests).
    #[must_use]
    pub fn with_api(api: Box<dyn PredictionsApi>, config: ReplicateConfig) -> Self {
        Self { api, config }
    }

    fn build_request(&self, prompt: &str) -> PredictionRequest {
        PredictionRequest {
            input: PredictionInput {
                prompt: prompt.to_string(),
                go_fast: true,
                num_outputs: 1,
                aspect_ratio: self.config.aspect_ratio.clone(),
                output_format: self.config.output_format.clone(),
                output_quality: self.config.output_quality,
            },
        }
    }

    /// Polls the status endpoint until the job settles or the attempt
    /// budget is exhausted. HTTP errors are transient: a failed poll is
    /// logged and the loop continues.
    async fn poll(&self, id: &str) -> Result<String, MusefeedError> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.max_poll_attempts {
            match self.api.status(id).await {
                Ok(prediction) => {
                    debug!(attempt, status = ?prediction.status, "Poll attempt");
                    if let Some(url) = settle(&prediction)? {
                        return Ok(url);
                    }
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Poll attempt failed, continuing");
                }
            }

            if attempt < self.config.max_poll_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(MusefeedError::Timeout {
            provider: PROVIDER.to_string(),
            attempts: self.config.max_poll_attempts,
        })
    }
}

/// Maps a prediction to its outcome.
///
/// Returns `Ok(Some(url))` on terminal success, `Ok(None)` while pending,
/// and an error on terminal failure (including success without output).
fn settle(prediction: &Prediction) -> Result<Option<String>, MusefeedError> {
    if prediction.status == PredictionStatus::Succeeded {
        return match prediction.output.as_ref().and_then(|o| o.first()) {
            Some(url) => Ok(Some(url.clone())),
            None => Err(MusefeedError::provider(
                PROVIDER,
                "Prediction succeeded without output",
            )),
        };
    }

    if prediction.status.is_terminal() || prediction.error.is_some() {
        let message = prediction
            .error
            .clone()
            .unwrap_or_else(|| format!("Prediction {:?}", prediction.status));
        return Err(MusefeedError::provider(
            PROVIDER,
            format!("Prediction failed: {message}"),
        ));
    }

    Ok(None)
}

#[async_trait]
impl ImageGenerator for ReplicateClient {
    /// Generates one image and returns the first output URL.
    ///
    /// Submits with synchronous wait behavior; if the response is still
    /// pending, falls back to the bounded polling loop.
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn generate(&self, prompt: &str) -> Result<String, MusefeedError> {
        if prompt.trim().is_empty() {
            return Err(MusefeedError::validation("prompt must not be empty"));
        }

        let request = self.build_request(prompt);
        let prediction = self.api.create(&request).await?;
        debug!(id = %prediction.id, status = ?prediction.status, "Prediction submitted");

        if let Some(url) = settle(&prediction)? {
            debug!("Prediction completed synchronously");
            return Ok(url);
        }

        debug!(id = %prediction.id, "Prediction pending, falling back to polling");
        self.poll(&prediction.id).await
    }
}
