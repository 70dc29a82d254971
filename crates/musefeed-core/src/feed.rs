// SPDX-License-Identifier: Apache-2.0

//! Feed generation and bounded caching.
//!
//! The feed is a list of AI-generated image posts derived from the user's
//! interests. Regeneration is time-gated: content younger than the configured
//! interval is served from cache. New items are prepended and the combined
//! list is truncated to a fixed maximum, so the oldest items fall off the
//! tail.
//!
//! Generation is best-effort by design: a failed interest is skipped, a
//! failed cache write is logged, and the top-level entry point never returns
//! an error. The caller always gets a list, cached or fresh or empty.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::prefs::{Interest, PreferencesStore};
use crate::providers::ImageGenerator;
use crate::store::KvStore;

/// Storage key for the cached feed items.
const FEED_KEY: &str = "feed.json";

/// Storage key for the last generation timestamp (epoch millis as a string).
const GENERATED_AT_KEY: &str = "feed_generated_at";

/// Display label for the generation model.
const MODEL_LABEL: &str = "Flux Schnell";

/// Usernames attributed to generated posts.
const USERNAMES: &[&str] = &[
    "ai_artist",
    "creative_mind",
    "dream_weaver",
    "visual_poet",
    "pixel_painter",
    "digital_dreamer",
    "image_alchemist",
    "art_explorer",
];

/// Suffixes appended to interest prompts to vary the output.
const ENHANCEMENTS: &[&str] = &[
    "with perfect lighting and composition",
    "in photorealistic style",
    "with dramatic lighting",
    "with beautiful details",
    "with cinematic quality",
    "with vibrant colors",
    "with stunning atmosphere",
    "with incredible detail",
    "in golden hour lighting",
];

/// A single generated post in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    /// Unique item id.
    pub id: String,
    /// URL of the generated image.
    pub image_url: String,
    /// The full prompt the image was generated from.
    pub prompt: String,
    /// Display label of the generating model.
    pub model: String,
    /// Randomized like count.
    pub likes: u32,
    /// Attributed username.
    pub username: String,
    /// Relative-time display label (e.g., "3 hours ago").
    pub timestamp: String,
    /// Id of the interest that produced this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
}

/// Generates and caches the feed.
pub struct FeedService {
    store: Arc<dyn KvStore>,
    generator: Arc<dyn ImageGenerator>,
    prefs: PreferencesStore,
    config: FeedConfig,
    rng: Mutex<fastrand::Rng>,
}

impl FeedService {
    /// Creates a feed service over a store and an image generator.
    #[must_use]
    pub fn new(
        store: Arc<dyn KvStore>,
        generator: Arc<dyn ImageGenerator>,
        config: FeedConfig,
    ) -> Self {
        Self {
            prefs: PreferencesStore::new(Arc::clone(&store)),
            store,
            generator,
            config,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Replaces the random source, letting tests seed it.
    #[must_use]
    pub fn with_rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// The preferences store this service reads interests from.
    #[must_use]
    pub fn preferences(&self) -> &PreferencesStore {
        &self.prefs
    }

    /// Returns the feed, regenerating if forced or the cache has gone stale.
    ///
    /// `count` caps how many interests are turned into new items. Never
    /// returns an error: per-interest failures are skipped, and a refresh
    /// that produces nothing falls back to the cached list.
    #[instrument(skip(self))]
    pub async fn generate(&self, force: bool, count: usize) -> Vec<FeedItem> {
        if !force && !self.is_stale() {
            debug!("Serving cached feed content");
            return self.cached_items();
        }

        debug!("Generating new feed content");

        let mut interests = self.prefs.interests();
        if interests.is_empty() {
            debug!("No interests selected, picking defaults");
            interests = self.prefs.random_defaults(count);
            self.prefs.update_interests(interests.clone());
        }

        let new_items = self.generate_items(&interests, count).await;
        if new_items.is_empty() {
            warn!("Feed refresh produced no items, falling back to cache");
            return self.cached_items();
        }

        self.cache_items(new_items)
    }

    /// Generates up to `count` items, one per interest, skipping failures.
    async fn generate_items(&self, interests: &[Interest], count: usize) -> Vec<FeedItem> {
        let mut items = Vec::new();
        let throttle = Duration::from_millis(self.config.throttle_ms);

        for (i, interest) in interests.iter().take(count).enumerate() {
            // Space out requests to stay under provider rate limits
            if i > 0 && !throttle.is_zero() {
                tokio::time::sleep(throttle).await;
            }

            let prompt = self.embellish(&interest.prompt);
            match self.generator.generate(&prompt).await {
                Ok(image_url) => {
                    items.push(self.build_item(interest, prompt, image_url));
                }
                Err(e) => {
                    warn!(interest = %interest.id, error = %e, "Skipping interest after generation failure");
                }
            }
        }

        items
    }

    fn build_item(&self, interest: &Interest, prompt: String, image_url: String) -> FeedItem {
        let mut rng = self.rng.lock().expect("rng lock poisoned");
        FeedItem {
            id: Uuid::new_v4().to_string(),
            image_url,
            prompt,
            model: MODEL_LABEL.to_string(),
            likes: rng.u32(50..=250),
            username: USERNAMES[rng.usize(..USERNAMES.len())].to_string(),
            timestamp: relative_label(&mut rng),
            interest: Some(interest.id.clone()),
        }
    }

    /// Appends a random stylistic suffix to an interest prompt.
    fn embellish(&self, base: &str) -> String {
        let mut rng = self.rng.lock().expect("rng lock poisoned");
        let suffix = ENHANCEMENTS[rng.usize(..ENHANCEMENTS.len())];
        format!("{base}, {suffix}")
    }

    /// True when no generation timestamp exists or the interval has elapsed.
    /// Unreadable metadata counts as stale.
    fn is_stale(&self) -> bool {
        let raw = match self.store.get(GENERATED_AT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return true,
            Err(e) => {
                warn!(error = %e, "Failed to read generation timestamp, treating as stale");
                return true;
            }
        };

        let Ok(generated_at) = raw.parse::<i64>() else {
            return true;
        };

        let elapsed_ms = Utc::now().timestamp_millis() - generated_at;
        // Saturate absurd intervals instead of overflowing the multiply
        let interval_ms = self
            .config
            .interval_hours
            .checked_mul(60 * 60 * 1000)
            .and_then(|ms| i64::try_from(ms).ok())
            .unwrap_or(i64::MAX);
        elapsed_ms >= interval_ms
    }

    /// The cached feed, or empty on a missing key or unreadable payload.
    #[must_use]
    pub fn cached_items(&self) -> Vec<FeedItem> {
        match self.store.get(FEED_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Failed to parse cached feed, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cached feed");
                Vec::new()
            }
        }
    }

    /// Prepends new items, truncates to the cache bound, and stamps the
    /// generation time. Write failures are logged, not surfaced.
    fn cache_items(&self, new_items: Vec<FeedItem>) -> Vec<FeedItem> {
        let mut combined = new_items;
        combined.extend(self.cached_items());
        combined.truncate(self.config.max_cached_items);

        match serde_json::to_string(&combined) {
            Ok(raw) => {
                if let Err(e) = self.store.set(FEED_KEY, &raw) {
                    warn!(error = %e, "Failed to cache feed items");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize feed items"),
        }

        let now = Utc::now().timestamp_millis().to_string();
        if let Err(e) = self.store.set(GENERATED_AT_KEY, &now) {
            warn!(error = %e, "Failed to record generation timestamp");
        }

        combined
    }
}

/// A random "N hours ago" / "N days ago" label.
fn relative_label(rng: &mut fastrand::Rng) -> String {
    if rng.bool() {
        format!("{} hours ago", rng.u32(1..=23))
    } else {
        format!("{} days ago", rng.u32(1..=6))
    }
}
