//! firetap wire types
//!
//! Typed representations of the three shapes that cross process
//! boundaries:
//!
//! - [`RawEvent`] - one decoded Jetstream firehose message
//! - [`AuthorProfile`] - author metadata from the AppView lookup endpoint
//! - [`DeliverableEvent`] - the transport-ready projection sent to a
//!   downstream consumer
//!
//! Decoding is strict enough to reject garbage and lenient enough to
//! survive schema drift: unknown fields are ignored, optional fields
//! default to absent.

mod deliverable;
mod error;
mod event;
mod profile;

pub use deliverable::{DeliverableEvent, DeliveryMeta, post_url};
pub use error::{ProtocolError, Result};
pub use event::{Commit, PostRecord, RawEvent};
pub use profile::AuthorProfile;
