// SPDX-License-Identifier: Apache-2.0

//! Configuration management for Musefeed.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `MUSEFEED_`)
//! 2. Config file: `~/.config/musefeed/config.toml`
//! 3. Built-in defaults
//!
//! API credentials are never read from the config file. They come from the
//! environment only (`OPENAI_API_KEY`, `XAI_API_KEY`, `REPLICATE_API_TOKEN`)
//! and a missing key is a construction-time error for the client that needs it.
//!
//! # Examples
//!
//! ```bash
//! # Override the feed cache bound via environment variable
//! MUSEFEED_FEED__MAX_CACHED_ITEMS=50 cargo run
//! ```

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::MusefeedError;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Feed generation and caching settings.
    pub feed: FeedConfig,
    /// Text generation settings.
    pub text: TextConfig,
    /// Direct image generation settings.
    pub image: ImageConfig,
    /// Job-based image generation settings (Replicate).
    pub replicate: ReplicateConfig,
}

/// Feed generation and caching settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Hours between feed regenerations (content younger than this is served
    /// from cache).
    pub interval_hours: u64,
    /// Maximum number of feed items kept in the cache.
    pub max_cached_items: usize,
    /// Number of items generated per refresh.
    pub items_per_refresh: usize,
    /// Delay between per-interest generation calls, in milliseconds.
    pub throttle_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval_hours: 24,
            max_cached_items: 20,
            items_per_refresh: 3,
            throttle_ms: 1000,
        }
    }
}

/// Text generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Text provider: "openai" or "xai".
    pub provider: String,
    /// Model identifier (e.g., "gpt-4o", "grok-3-latest").
    pub model: String,
    /// Maximum tokens for API responses.
    pub max_tokens: u32,
    /// Temperature for API requests (0.0-1.0).
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 300,
            temperature: 0.7,
            timeout_seconds: 30,
        }
    }
}

/// Direct image generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image provider: "openai" or "xai".
    pub provider: String,
    /// Model identifier (e.g., "gpt-image-1", "dall-e-3").
    pub model: String,
    /// Image size (e.g., "1024x1024").
    pub size: String,
    /// Image quality hint (model-dependent, e.g., "medium").
    pub quality: Option<String>,
    /// Background mode for models that support it ("transparent" or "auto").
    pub background: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-image-1".to_string(),
            size: "1024x1024".to_string(),
            quality: None,
            background: None,
            timeout_seconds: 120,
        }
    }
}

/// Job-based image generation settings (Replicate predictions API).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplicateConfig {
    /// Model path (e.g., "black-forest-labs/flux-schnell").
    pub model: String,
    /// Aspect ratio for generated images.
    pub aspect_ratio: String,
    /// Output format (e.g., "webp").
    pub output_format: String,
    /// Output quality (0-100).
    pub output_quality: u8,
    /// Maximum number of status fetches before a pending job is abandoned.
    /// The synchronous submit response does not count toward this budget.
    pub max_poll_attempts: u32,
    /// Delay between status fetches, in milliseconds.
    pub poll_interval_ms: u64,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            model: "black-forest-labs/flux-schnell".to_string(),
            aspect_ratio: "1:1".to_string(),
            output_format: "webp".to_string(),
            output_quality: 80,
            max_poll_attempts: 10,
            poll_interval_ms: 1000,
            timeout_seconds: 60,
        }
    }
}

/// Returns the Musefeed configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/musefeed`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("musefeed");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".config")
        .join("musefeed")
}

/// Returns the Musefeed data directory.
///
/// Respects the `XDG_DATA_HOME` environment variable if set,
/// otherwise defaults to `~/.local/share/musefeed`.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME")
        && !xdg_data.is_empty()
    {
        return PathBuf::from(xdg_data).join("musefeed");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".local")
        .join("share")
        .join("musefeed")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `MUSEFEED_` and double underscore
/// for nested keys (e.g., `MUSEFEED_FEED__INTERVAL_HOURS`).
///
/// # Errors
///
/// Returns `MusefeedError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, MusefeedError> {
    let config_path = config_file_path();

    let config = Config::builder()
        // Load from config file (optional - may not exist)
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        // Override with environment variables
        .add_source(
            Environment::with_prefix("MUSEFEED")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}
