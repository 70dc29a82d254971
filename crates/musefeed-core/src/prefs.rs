// SPDX-License-Identifier: Apache-2.0

//! User interests and preference storage.
//!
//! Preferences are persisted wholesale as a single JSON record under one
//! store key. Reads never fail: a missing or unparseable record is replaced
//! with a freshly constructed default (a random subset of the fixed interest
//! catalog), and persistence failures are logged rather than surfaced.

use std::sync::{Arc, LazyLock, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::KvStore;

/// Store key for the serialized preferences record.
pub const PREFERENCES_KEY: &str = "preferences.json";

/// Number of catalog entries in a default interest set.
const DEFAULT_INTEREST_COUNT: usize = 3;

/// A topic used to seed personalized content generation prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interest {
    /// Stable identifier (e.g., "nature").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base image-generation prompt for this topic.
    pub prompt: String,
    /// Ordered tags describing the topic.
    pub tags: Vec<String>,
}

/// Persisted user preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Selected interests, insertion order preserved.
    #[serde(default)]
    pub interests: Vec<Interest>,
    /// When the preferences were last updated.
    pub last_updated: DateTime<Utc>,
}

macro_rules! interest {
    ($id:literal, $name:literal, $prompt:literal, [$($tag:literal),+]) => {
        Interest {
            id: $id.to_string(),
            name: $name.to_string(),
            prompt: $prompt.to_string(),
            tags: vec![$($tag.to_string()),+],
        }
    };
}

/// Fixed interest catalog available at build time.
static CATALOG: LazyLock<Vec<Interest>> = LazyLock::new(|| {
    vec![
        interest!(
            "nature",
            "Nature & Landscapes",
            "stunning landscape photography with mountains, lakes, and vibrant skies",
            ["nature", "landscape", "photography", "outdoors"]
        ),
        interest!(
            "scifi",
            "Sci-Fi & Future",
            "futuristic cityscape with flying vehicles, neon lights, and towering skyscrapers",
            ["scifi", "future", "technology", "cyberpunk"]
        ),
        interest!(
            "abstract",
            "Abstract Art",
            "colorful abstract art with fluid shapes, vibrant colors, and dynamic composition",
            ["abstract", "art", "colorful", "creative"]
        ),
        interest!(
            "fantasy",
            "Fantasy Worlds",
            "magical fantasy landscape with floating islands, castles, and mystical creatures",
            ["fantasy", "magic", "mythical", "imagination"]
        ),
        interest!(
            "food",
            "Food & Cuisine",
            "gourmet food photography with perfect lighting, vibrant ingredients, and professional plating",
            ["food", "cuisine", "culinary", "gourmet"]
        ),
        interest!(
            "animals",
            "Animals & Wildlife",
            "wildlife photography of exotic animals in their natural habitat",
            ["animals", "wildlife", "nature", "photography"]
        ),
        interest!(
            "architecture",
            "Architecture",
            "stunning architectural photography of modern buildings with dramatic lighting",
            ["architecture", "buildings", "design", "structure"]
        ),
        interest!(
            "space",
            "Space & Cosmos",
            "deep space photography of nebulae, galaxies, and cosmic phenomena",
            ["space", "cosmos", "astronomy", "stars"]
        ),
    ]
});

/// Returns the full fixed interest catalog.
#[must_use]
pub fn catalog() -> &'static [Interest] {
    &CATALOG
}

/// Preference storage service over a key-value store.
pub struct PreferencesStore {
    store: Arc<dyn KvStore>,
    rng: Mutex<fastrand::Rng>,
}

impl PreferencesStore {
    /// Creates a preferences store over the given key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_rng(store, fastrand::Rng::new())
    }

    /// Creates a preferences store with an explicit random source.
    ///
    /// Tests pass a seeded `fastrand::Rng` for deterministic default
    /// selection.
    #[must_use]
    pub fn with_rng(store: Arc<dyn KvStore>, rng: fastrand::Rng) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Returns stored preferences, or freshly constructed defaults.
    ///
    /// Missing records and parse failures both fall back to a default set of
    /// random catalog interests. This never fails.
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        match self.store.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Preferences>(&raw) {
                Ok(prefs) => prefs,
                Err(e) => {
                    warn!(error = %e, "Stored preferences unparseable, using defaults");
                    self.default_preferences()
                }
            },
            Ok(None) => {
                debug!("No stored preferences, using defaults");
                self.default_preferences()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read preferences, using defaults");
                self.default_preferences()
            }
        }
    }

    /// Returns the user's selected interests.
    #[must_use]
    pub fn interests(&self) -> Vec<Interest> {
        self.preferences().interests
    }

    /// Replaces the interest set and stamps the update time.
    ///
    /// Persistence failures are logged, not surfaced (best-effort write).
    pub fn update_interests(&self, interests: Vec<Interest>) {
        let prefs = Preferences {
            interests,
            last_updated: Utc::now(),
        };
        self.save(&prefs);
    }

    /// Adds a single interest, ignoring duplicates by id.
    pub fn add_interest(&self, interest: Interest) {
        let mut prefs = self.preferences();
        if prefs.interests.iter().any(|i| i.id == interest.id) {
            return;
        }
        prefs.interests.push(interest);
        prefs.last_updated = Utc::now();
        self.save(&prefs);
    }

    /// Removes an interest by id. Removing an unknown id is a no-op.
    pub fn remove_interest(&self, interest_id: &str) {
        let mut prefs = self.preferences();
        prefs.interests.retain(|i| i.id != interest_id);
        prefs.last_updated = Utc::now();
        self.save(&prefs);
    }

    /// Returns `count` distinct random catalog interests.
    ///
    /// If `count` exceeds the catalog size, the whole shuffled catalog is
    /// returned.
    #[must_use]
    pub fn random_defaults(&self, count: usize) -> Vec<Interest> {
        let mut shuffled: Vec<Interest> = CATALOG.clone();
        {
            let mut rng = self.rng.lock().expect("rng mutex poisoned");
            rng.shuffle(&mut shuffled);
        }
        shuffled.truncate(count);
        shuffled
    }

    fn default_preferences(&self) -> Preferences {
        Preferences {
            interests: self.random_defaults(DEFAULT_INTEREST_COUNT),
            last_updated: Utc::now(),
        }
    }

    fn save(&self, prefs: &Preferences) {
        let raw = match serde_json::to_string_pretty(prefs) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize preferences");
                return;
            }
        };
        if let Err(e) = self.store.set(PREFERENCES_KEY, &raw) {
            warn!(error = %e, "Failed to persist preferences");
        }
    }
}
