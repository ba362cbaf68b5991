//! TTL'd profile store with single-flight fetch de-duplication
//!
//! # Design
//!
//! The map holds one slot per DID: either a live profile with its expiry
//! instant, or an in-flight fetch. A lookup that finds an in-flight slot
//! clones its watch receiver and awaits the shared outcome, so at most
//! one fetch is ever in flight per key. The fetch runs on its own task,
//! which keeps it making progress even if every waiter is cancelled.
//!
//! Removal is timer-driven: a successful insert arms one expiry task for
//! that entry. There is no periodic scan and no size cap; every entry
//! eventually leaves the map.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use firetap_protocol::AuthorProfile;

use crate::fetcher::ProfileFetcher;

/// Reference TTL for cached profiles.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Outcome of one fetch, shared by every caller that coalesced onto it.
/// `None` means the fetch failed; failures are not cached.
type FetchOutcome = Option<Arc<AuthorProfile>>;

enum Slot {
    /// A live profile, valid until `expires_at`.
    Ready {
        profile: Arc<AuthorProfile>,
        expires_at: Instant,
    },
    /// A fetch in flight; waiters await the watch result.
    Fetching(watch::Receiver<Option<FetchOutcome>>),
}

/// Author profile cache.
///
/// Shared-mutable across all sessions; lookups for different DIDs never
/// interfere, lookups for the same in-flight DID coalesce.
pub struct ProfileCache {
    entries: Mutex<HashMap<String, Slot>>,
    fetcher: Arc<dyn ProfileFetcher>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    failures: AtomicU64,
    expirations: AtomicU64,
}

impl ProfileCache {
    /// Create a cache over the given fetcher.
    pub fn new(fetcher: Arc<dyn ProfileFetcher>, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fetcher,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    /// Look up a profile, fetching on miss.
    ///
    /// Returns `None` when the fetch fails; the failure is not cached,
    /// so the next call for the same DID retries.
    pub async fn get(self: &Arc<Self>, did: &str) -> Option<Arc<AuthorProfile>> {
        let mut rx = {
            let mut entries = self.entries.lock();
            match entries.get(did) {
                Some(Slot::Ready {
                    profile,
                    expires_at,
                }) if *expires_at > Instant::now() => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(Arc::clone(profile));
                }
                Some(Slot::Fetching(rx)) => {
                    self.coalesced.fetch_add(1, Ordering::Relaxed);
                    rx.clone()
                }
                // Absent, or expired but not yet reaped: become the leader.
                _ => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    let (tx, rx) = watch::channel(None);
                    entries.insert(did.to_string(), Slot::Fetching(rx.clone()));
                    self.spawn_fetch(did.to_string(), tx);
                    rx
                }
            }
        };

        loop {
            let outcome = rx.borrow_and_update().as_ref().cloned();
            if let Some(outcome) = outcome {
                return outcome;
            }
            if rx.changed().await.is_err() {
                // Fetch task dropped without reporting; treat as a miss.
                return None;
            }
        }
    }

    fn spawn_fetch(self: &Arc<Self>, did: String, tx: watch::Sender<Option<FetchOutcome>>) {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = match cache.fetcher.fetch(&did).await {
                Ok(profile) => {
                    let profile = Arc::new(profile);
                    let expires_at = Instant::now() + cache.ttl;
                    cache.entries.lock().insert(
                        did.clone(),
                        Slot::Ready {
                            profile: Arc::clone(&profile),
                            expires_at,
                        },
                    );
                    cache.spawn_expiry(did, expires_at);
                    Some(profile)
                }
                Err(e) => {
                    cache.failures.fetch_add(1, Ordering::Relaxed);
                    warn!(did = %did, error = %e, "profile fetch failed");
                    cache.entries.lock().remove(&did);
                    None
                }
            };
            let _ = tx.send(Some(outcome));
        });
    }

    fn spawn_expiry(self: &Arc<Self>, did: String, expires_at: Instant) {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            let mut entries = cache.entries.lock();
            // A newer entry may have replaced this one; only reap if expired.
            if let Some(Slot::Ready { expires_at, .. }) = entries.get(&did)
                && *expires_at <= Instant::now()
            {
                entries.remove(&did);
                cache.expirations.fetch_add(1, Ordering::Relaxed);
                debug!(did = %did, "profile entry expired");
            }
        });
    }

    /// Number of slots currently held (live or in flight).
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when the cache holds no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Lookups answered from a live entry.
    pub hits: u64,
    /// Lookups that started a fetch.
    pub misses: u64,
    /// Lookups that attached to an in-flight fetch.
    pub coalesced: u64,
    /// Failed fetches.
    pub failures: u64,
    /// Entries removed by their expiry timer.
    pub expirations: u64,
    /// Slots currently held.
    pub entries: usize,
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
