//! cmdreply core: reply state, validation, wire envelopes, and attachment encoding.
//!
//! This crate decides what gets sent in reply to an interaction (deferred
//! acknowledgement or full channel message) and how it is framed (plain JSON
//! document or multi-part body). It carries no transport or runtime
//! dependencies; the async dispatch path lives in `cmdreply-dispatch`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `ReplyError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod reply;

/// Shared result type.
pub use error::{ErrorCode, InteractionFailure, ReplyError, Result};
pub use protocol::envelope::{MessageData, ResponseEnvelope, ResponseType};
pub use protocol::multipart::{AttachmentData, FormPart, MultipartBody, PartBody, RequestBody};
pub use reply::embed::Embed;
pub use reply::flags::MessageFlags;
pub use reply::limits::ReplyLimits;
pub use reply::mention::{MentionPolicy, MentionType, Mentionable};
pub use reply::state::{AttachmentOption, ReplyState};
