//! Fetcher seam for profile lookups

use async_trait::async_trait;
use firetap_protocol::AuthorProfile;

use crate::error::Result;

/// Upstream lookup for author profiles.
///
/// Implementations perform exactly one lookup per call; the cache owns
/// call discipline (single-flight coalescing, expiry, no retries).
#[async_trait]
pub trait ProfileFetcher: Send + Sync + 'static {
    /// Fetch the profile for one DID.
    async fn fetch(&self, did: &str) -> Result<AuthorProfile>;
}
