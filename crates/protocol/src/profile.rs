//! Author profile metadata
//!
//! The same struct deserializes the AppView `getProfile` response and
//! serializes as the `author` sub-object of a delivered event; the wire
//! field names match on both sides.

use serde::{Deserialize, Serialize};

/// Author display data. Immutable once fetched; shared via `Arc` between
/// the cache and any number of enriched events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// Author DID.
    pub did: String,

    /// Handle (e.g. "alice.bsky.social").
    pub handle: String,

    /// Display name, when the author has set one.
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
