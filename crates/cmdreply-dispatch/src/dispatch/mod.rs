//! Dispatch module exports.
//!
//! `ReplyDispatcher` hands out `ReplyAction`s; submitting one finalizes the
//! reply, sends it through the transport, and routes the outcome in
//! `completion`.

pub mod action;
pub mod completion;
pub mod dispatcher;

pub use action::ReplyAction;
pub use completion::handle_outcome;
pub use dispatcher::ReplyDispatcher;
