// SPDX-License-Identifier: Apache-2.0

//! Text command: one-off short-form text generation.

use anyhow::Result;
use musefeed_core::config::TextConfig;
use musefeed_core::{ChatClient, ContentKind};

/// Generates short-form text for a topic.
///
/// # Errors
///
/// Returns an error for a missing API key, a blank topic, or a provider
/// failure.
pub async fn run(config: &TextConfig, kind: ContentKind, topic: &str) -> Result<String> {
    let client = ChatClient::new(config)?;
    Ok(client.generate(kind, topic).await?)
}
