// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Musefeed Core
//!
//! Core library for Musefeed - AI-generated content feeds driven by user
//! interests.
//!
//! This crate provides reusable components for:
//! - Interest and preference storage over a pluggable key-value store
//! - Feed generation with time-gated regeneration and a bounded cache
//! - Job-based image generation (Replicate predictions with polling)
//! - Direct image generation and chat-completion text generation
//!   (`OpenAI`/xAI)
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use musefeed_core::{
//!     FeedService, FileStore, ReplicateClient, load_config,
//! };
//!
//! # async fn example() -> Result<(), musefeed_core::MusefeedError> {
//! // Load configuration
//! let config = load_config()?;
//!
//! // Wire storage and the image job client
//! let store = Arc::new(FileStore::default_location());
//! let generator = Arc::new(ReplicateClient::new(&config.replicate)?);
//!
//! // Refresh the feed (serves cache when content is still fresh)
//! let feed = FeedService::new(store, generator, config.feed);
//! for item in feed.generate(false, 3).await {
//!     println!("@{}: {}", item.username, item.image_url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types
//! - [`feed`] - Feed generation and bounded caching
//! - [`prefs`] - Interests and preference storage
//! - [`providers`] - Generation provider clients (chat, images, replicate)
//! - [`store`] - Key-value storage backends

// ============================================================================
// Error Handling
// ============================================================================

pub use error::MusefeedError;

/// Convenience Result type for Musefeed operations.
///
/// This is equivalent to `std::result::Result<T, MusefeedError>`.
pub type Result<T> = std::result::Result<T, MusefeedError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, FeedConfig, ImageConfig, ReplicateConfig, TextConfig, config_dir, config_file_path,
    data_dir, load_config,
};

// ============================================================================
// Storage
// ============================================================================

pub use store::{FileStore, KvStore, MemoryStore};

// ============================================================================
// Preferences and Interests
// ============================================================================

pub use prefs::{Interest, Preferences, PreferencesStore, catalog};

// ============================================================================
// Feed Generation
// ============================================================================

pub use feed::{FeedItem, FeedService};

// ============================================================================
// Generation Providers
// ============================================================================

pub use providers::chat::{ChatClient, ContentKind};
pub use providers::images::{ImageClient, ImageOutput};
pub use providers::replicate::{
    HttpPredictionsApi, Prediction, PredictionStatus, PredictionsApi, ReplicateClient,
};
pub use providers::{ImageGenerator, ProviderConfig, get_provider};

// ============================================================================
// Retry Logic
// ============================================================================

pub use retry::{is_retryable, is_retryable_http, retry_backoff};

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod feed;
pub mod prefs;
pub mod providers;
pub mod retry;
pub mod store;
