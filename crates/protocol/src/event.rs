//! Jetstream firehose message types
//!
//! One JSON object arrives per WebSocket text frame. Post writes carry a
//! `commit` payload with the record; identity and account messages do not.

use serde::Deserialize;

use crate::error::Result;

/// One decoded firehose message.
///
/// Owned by the upstream link until handed to the hub, which wraps it in
/// an `Arc` for the single dispatch pass. Never mutated after decode.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    /// Author DID.
    pub did: String,

    /// Message kind ("commit" for repo writes).
    #[serde(default)]
    pub kind: String,

    /// Commit payload; absent for identity/account messages.
    #[serde(default)]
    pub commit: Option<Commit>,
}

/// A repo commit: one write to a collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    /// Collection NSID (e.g. "app.bsky.feed.post").
    pub collection: String,

    /// Record key within the collection.
    pub rkey: String,

    /// Content identifier of the record.
    #[serde(default)]
    pub cid: String,

    /// The written record; absent for deletes.
    #[serde(default)]
    pub record: Option<PostRecord>,
}

/// The post record payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRecord {
    /// Free text of the post.
    #[serde(default)]
    pub text: Option<String>,

    /// Creation timestamp as written by the client (RFC 3339 string,
    /// passed through untouched).
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl RawEvent {
    /// Decode one wire frame.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProtocolError::Decode`] when the frame is not a
    /// well-formed firehose message. The caller discards the frame; a
    /// decode failure is never fatal to the connection.
    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Post text, when this message carries a record with text.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.commit.as_ref()?.record.as_ref()?.text.as_deref()
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
