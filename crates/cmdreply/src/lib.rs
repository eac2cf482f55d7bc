//! Top-level facade crate for cmdreply.
//!
//! Re-exports the core reply types and the dispatch library so users can depend on a single crate.

pub mod core {
    pub use cmdreply_core::*;
}

pub mod dispatch {
    pub use cmdreply_dispatch::*;
}

pub use cmdreply_core::{Embed, ReplyError, ReplyState, Result};
pub use cmdreply_dispatch::dispatch::{ReplyAction, ReplyDispatcher};
pub use cmdreply_dispatch::interaction::{ContinuationHandle, Interaction};
