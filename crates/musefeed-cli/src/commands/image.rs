// SPDX-License-Identifier: Apache-2.0

//! Image command: one-off direct image generation.

use anyhow::Result;
use musefeed_core::config::ImageConfig;
use musefeed_core::{ImageClient, ImageOutput};

/// Generates a single image and returns its URL or saved file path.
///
/// # Errors
///
/// Returns an error for a missing API key, a blank prompt, or a provider
/// failure.
pub async fn run(config: &ImageConfig, prompt: &str) -> Result<ImageOutput> {
    let client = ImageClient::new(config)?;
    Ok(client.generate(prompt).await?)
}
