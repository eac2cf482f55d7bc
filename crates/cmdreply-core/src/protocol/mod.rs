//! Protocol modules (envelope + body framing).
//!
//! - `envelope`: JSON interaction response, deferred or immediate.
//! - `multipart`: wraps the envelope with attachment streams when files are
//!   present, otherwise leaves it as a single JSON document.

pub mod envelope;
pub mod multipart;
