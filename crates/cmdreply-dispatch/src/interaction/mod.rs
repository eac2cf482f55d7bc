//! Interaction identity and its continuation handle.

mod continuation;

pub use continuation::{ContinuationHandle, HandleState};

/// The invocation being answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// Interaction snowflake.
    pub id: u64,
    /// Single-use callback token.
    pub token: String,
}

impl Interaction {
    pub fn new(id: u64, token: impl Into<String>) -> Self {
        Self { id, token: token.into() }
    }
}
