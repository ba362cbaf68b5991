//! Transport-ready event projection
//!
//! A [`DeliverableEvent`] is what one session queues and its sink
//! serializes: the post fields, the derived permalink, the optional
//! author profile, and the queue-depth metadata clients use to judge
//! their own lag.

use serde::Serialize;

use crate::event::RawEvent;
use crate::profile::AuthorProfile;

/// Canonical post permalink.
pub fn post_url(did: &str, rkey: &str) -> String {
    format!("https://bsky.app/profile/{did}/post/{rkey}")
}

/// One event as delivered to a downstream consumer.
///
/// Owned exclusively by one session from enqueue to delivery; every
/// session builds its own copy, even for the same upstream event.
#[derive(Debug, Clone, Serialize)]
pub struct DeliverableEvent {
    /// Record key of the post.
    pub id: String,

    /// Content identifier.
    pub cid: String,

    /// Post text.
    pub text: String,

    /// Creation timestamp, passed through from the record.
    #[serde(rename = "createdAt")]
    pub created_at: String,

    /// Permalink derived from the author DID and record key.
    pub url: String,

    /// Author DID.
    pub did: String,

    /// Author profile, when enrichment was on and the lookup resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorProfile>,

    /// Delivery metadata.
    pub meta: DeliveryMeta,
}

/// Per-event delivery metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryMeta {
    /// Session queue depth sampled when this event was built, before it
    /// was appended. Clients rely on the stale snapshot; keep it.
    #[serde(rename = "queueSize")]
    pub queue_size: usize,
}

impl DeliverableEvent {
    /// Project a raw commit into a deliverable.
    ///
    /// Returns `None` when the message carries no post text; such
    /// messages are ignored by every session.
    pub fn from_raw(event: &RawEvent, queue_size: usize) -> Option<Self> {
        let commit = event.commit.as_ref()?;
        let record = commit.record.as_ref()?;
        let text = record.text.clone()?;

        Some(Self {
            id: commit.rkey.clone(),
            cid: commit.cid.clone(),
            text,
            created_at: record.created_at.clone().unwrap_or_default(),
            url: post_url(&event.did, &commit.rkey),
            did: event.did.clone(),
            author: None,
            meta: DeliveryMeta { queue_size },
        })
    }

    /// Attach an author profile.
    pub fn with_author(mut self, author: AuthorProfile) -> Self {
        self.author = Some(author);
        self
    }
}

#[cfg(test)]
#[path = "deliverable_test.rs"]
mod tests;
