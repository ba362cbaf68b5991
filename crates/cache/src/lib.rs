//! firetap profile cache
//!
//! Memoizes the slow AppView author lookup behind a key→value store with
//! per-entry expiry and single-flight fetch de-duplication:
//!
//! - A live entry is returned without any network call.
//! - Concurrent lookups for the same DID coalesce onto one in-flight
//!   fetch and all observe its result.
//! - Entries expire after a fixed TTL (reference value: 24 hours); each
//!   insertion arms its own removal timer, so there is no scanning.
//! - Failures are returned as absent and never cached; the next lookup
//!   for the same DID retries.

mod error;
mod fetcher;
mod http;
mod profiles;

pub use error::{CacheError, Result};
pub use fetcher::ProfileFetcher;
pub use http::{BskyProfileFetcher, DEFAULT_API_URL};
pub use profiles::{CacheStats, DEFAULT_TTL, ProfileCache};
