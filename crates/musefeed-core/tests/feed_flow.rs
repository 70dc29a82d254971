// SPDX-License-Identifier: Apache-2.0

//! End-to-end feed flow: preferences, the job-based image client, and the
//! bounded cache wired together over in-memory storage.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use musefeed_core::providers::replicate::{
    Prediction, PredictionRequest, PredictionStatus, PredictionsApi,
};
use musefeed_core::{
    FeedConfig, FeedService, KvStore, MemoryStore, MusefeedError, ReplicateClient, ReplicateConfig,
    catalog,
};

/// Predictions transport where each submit resolves after a scripted number
/// of pending polls.
struct SlowApi {
    /// Polls each job stays pending before succeeding.
    polls_until_done: u32,
    jobs: Mutex<VecDeque<u32>>,
    submits: AtomicU32,
}

impl SlowApi {
    fn new(polls_until_done: u32) -> Self {
        Self {
            polls_until_done,
            jobs: Mutex::new(VecDeque::new()),
            submits: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl PredictionsApi for SlowApi {
    async fn create(&self, _request: &PredictionRequest) -> Result<Prediction, MusefeedError> {
        let n = self.submits.fetch_add(1, Ordering::SeqCst);
        self.jobs.lock().unwrap().push_back(self.polls_until_done);
        Ok(Prediction {
            id: format!("job-{n}"),
            status: if self.polls_until_done == 0 {
                PredictionStatus::Succeeded
            } else {
                PredictionStatus::Starting
            },
            output: (self.polls_until_done == 0)
                .then(|| vec![format!("https://img.test/{n}.webp")]),
            error: None,
        })
    }

    async fn status(&self, id: &str) -> Result<Prediction, MusefeedError> {
        let mut jobs = self.jobs.lock().unwrap();
        let remaining = jobs.front_mut().expect("status without submit");
        *remaining = remaining.saturating_sub(1);

        if *remaining == 0 {
            jobs.pop_front();
            let n = self.submits.load(Ordering::SeqCst) - 1;
            return Ok(Prediction {
                id: id.to_string(),
                status: PredictionStatus::Succeeded,
                output: Some(vec![format!("https://img.test/{n}.webp")]),
                error: None,
            });
        }

        Ok(Prediction {
            id: id.to_string(),
            status: PredictionStatus::Processing,
            output: None,
            error: None,
        })
    }
}

fn feed_service(polls_until_done: u32) -> (FeedService, Arc<dyn KvStore>) {
    let replicate_config = ReplicateConfig {
        max_poll_attempts: 5,
        poll_interval_ms: 0,
        ..ReplicateConfig::default()
    };
    let generator = ReplicateClient::with_api(Box::new(SlowApi::new(polls_until_done)), replicate_config);

    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let feed_config = FeedConfig {
        max_cached_items: 4,
        throttle_ms: 0,
        ..FeedConfig::default()
    };

    (
        FeedService::new(Arc::clone(&store), Arc::new(generator), feed_config),
        store,
    )
}

#[tokio::test]
async fn test_feed_refresh_through_job_client() {
    let (service, store) = feed_service(2);
    service
        .preferences()
        .update_interests(catalog().iter().take(3).cloned().collect());

    let items = service.generate(false, 3).await;

    assert_eq!(items.len(), 3);
    for item in &items {
        assert!(item.image_url.starts_with("https://img.test/"));
        assert_eq!(item.model, "Flux Schnell");
    }

    // Cache and generation timestamp landed in the store
    assert!(store.get("feed.json").unwrap().is_some());
    assert!(store.get("feed_generated_at").unwrap().is_some());
}

#[tokio::test]
async fn test_second_refresh_is_served_from_cache() {
    let (service, _) = feed_service(0);
    service
        .preferences()
        .update_interests(catalog().iter().take(2).cloned().collect());

    let first = service.generate(false, 2).await;
    let second = service.generate(false, 2).await;

    let first_ids: Vec<_> = first.iter().map(|i| i.id.clone()).collect();
    let second_ids: Vec<_> = second.iter().map(|i| i.id.clone()).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn test_forced_refreshes_respect_cache_bound() {
    let (service, _) = feed_service(0);
    service
        .preferences()
        .update_interests(catalog().iter().take(3).cloned().collect());

    service.generate(true, 3).await;
    let after_second = service.generate(true, 3).await;

    // max_cached_items is 4: three new items plus one survivor
    assert_eq!(after_second.len(), 4);
}

#[tokio::test]
async fn test_jobs_slower_than_poll_budget_leave_feed_cached() {
    // Jobs need more polls than the budget of 5 allows, so every interest
    // fails and the previously cached feed is returned.
    let (service, _) = feed_service(100);
    service
        .preferences()
        .update_interests(catalog().iter().take(2).cloned().collect());

    let items = service.generate(true, 2).await;
    assert!(items.is_empty());
}
