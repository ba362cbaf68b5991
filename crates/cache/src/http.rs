//! Bluesky AppView profile fetcher
//!
//! Fetches author display data from the public AppView
//! `app.bsky.actor.getProfile` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use firetap_protocol::AuthorProfile;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::fetcher::ProfileFetcher;

/// Default AppView base URL.
pub const DEFAULT_API_URL: &str = "https://public.api.bsky.app";

/// Per-request timeout for profile lookups.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Profile fetcher backed by the AppView HTTP API.
pub struct BskyProfileFetcher {
    client: reqwest::Client,
    api_url: String,
}

impl BskyProfileFetcher {
    /// Create a fetcher against the given AppView base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Init`] if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("firetap/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CacheError::Init(format!("profile HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl ProfileFetcher for BskyProfileFetcher {
    async fn fetch(&self, did: &str) -> Result<AuthorProfile> {
        let url = format!("{}/xrpc/app.bsky.actor.getProfile", self.api_url);
        let response = self
            .client
            .get(&url)
            .query(&[("actor", did)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Status {
                did: did.to_string(),
                status: status.as_u16(),
            });
        }

        let profile = response.json::<AuthorProfile>().await?;
        debug!(did, handle = %profile.handle, "fetched author profile");
        Ok(profile)
    }
}
