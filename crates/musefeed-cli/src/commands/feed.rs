// SPDX-License-Identifier: Apache-2.0

//! Feed command: refresh or show the generated feed.

use std::sync::Arc;

use anyhow::Result;
use musefeed_core::{
    AppConfig, FeedConfig, FeedItem, FeedService, FileStore, KvStore, ReplicateClient,
};

/// Resolves the refresh size: an explicit `--count` wins, otherwise the
/// configured `items_per_refresh` applies.
fn refresh_count(requested: Option<usize>, config: &FeedConfig) -> usize {
    requested.unwrap_or(config.items_per_refresh)
}

/// Refreshes the feed (or serves it from cache) and returns the items.
///
/// # Errors
///
/// Returns an error when the Replicate client cannot be constructed
/// (missing `REPLICATE_API_TOKEN`). Generation itself never errors; failed
/// refreshes fall back to cached content.
pub async fn run(force: bool, count: Option<usize>, config: &AppConfig) -> Result<Vec<FeedItem>> {
    let store: Arc<dyn KvStore> = Arc::new(FileStore::default_location());
    let generator = Arc::new(ReplicateClient::new(&config.replicate)?);
    let service = FeedService::new(store, generator, config.feed.clone());

    Ok(service
        .generate(force, refresh_count(count, &config.feed))
        .await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_count_falls_back_to_config() {
        let config = FeedConfig {
            items_per_refresh: 5,
            ..FeedConfig::default()
        };

        assert_eq!(refresh_count(None, &config), 5);
        assert_eq!(refresh_count(Some(2), &config), 2);
    }
}
