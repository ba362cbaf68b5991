//! Shared test doubles for the fan-out crate

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use firetap_cache::{CacheError, ProfileCache, ProfileFetcher};
use firetap_protocol::{AuthorProfile, DeliverableEvent, RawEvent};

use crate::error::Result;
use crate::sink::EventSink;

/// Sink that records every delivered event.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DeliverableEvent>>,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.text.clone()).collect()
    }

    pub fn events(&self) -> Vec<DeliverableEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventSink for CollectingSink {
    async fn deliver(&self, event: &DeliverableEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Fetcher over a fixed profile table; unknown DIDs fail with a 404.
pub struct StubFetcher {
    profiles: HashMap<String, AuthorProfile>,
    delay: Duration,
    calls: AtomicU64,
}

impl StubFetcher {
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
            delay: Duration::ZERO,
            calls: AtomicU64::new(0),
        }
    }

    pub fn with_profile(mut self, profile: AuthorProfile) -> Self {
        self.profiles.insert(profile.did.clone(), profile);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileFetcher for StubFetcher {
    async fn fetch(&self, did: &str) -> firetap_cache::Result<AuthorProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.profiles
            .get(did)
            .cloned()
            .ok_or_else(|| CacheError::Status {
                did: did.to_string(),
                status: 404,
            })
    }
}

pub fn profile(did: &str, handle: &str) -> AuthorProfile {
    AuthorProfile {
        did: did.into(),
        handle: handle.into(),
        display_name: Some(handle.to_uppercase()),
        avatar: Some(format!("https://cdn.test/{did}.jpg")),
    }
}

pub fn cache_with(fetcher: StubFetcher) -> Arc<ProfileCache> {
    Arc::new(ProfileCache::new(
        Arc::new(fetcher),
        firetap_cache::DEFAULT_TTL,
    ))
}

/// A post commit event, ready for dispatch.
pub fn post_event(did: &str, rkey: &str, cid: &str, text: &str) -> Arc<RawEvent> {
    let frame = serde_json::json!({
        "did": did,
        "kind": "commit",
        "commit": {
            "collection": "app.bsky.feed.post",
            "rkey": rkey,
            "cid": cid,
            "record": { "text": text, "createdAt": "2024-09-09T19:46:02.102Z" }
        }
    });
    Arc::new(RawEvent::decode(&frame.to_string()).unwrap())
}

/// A commit without any post text (a delete).
pub fn textless_event(did: &str) -> Arc<RawEvent> {
    let frame = serde_json::json!({
        "did": did,
        "kind": "commit",
        "commit": {
            "operation": "delete",
            "collection": "app.bsky.feed.post",
            "rkey": "gone"
        }
    });
    Arc::new(RawEvent::decode(&frame.to_string()).unwrap())
}

/// Let spawned tasks (enrichment, delivery) run to completion.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
