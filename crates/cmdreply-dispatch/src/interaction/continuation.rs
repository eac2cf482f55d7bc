//! Continuation handle: the interaction's post-reply lifecycle.
//!
//! `Pending -> Ready` or `Pending -> Failed`, exactly once. The state lives in
//! a `watch` channel; `send_if_modified` gives the compare-and-set, so a second
//! outcome from a misbehaving transport is rejected rather than applied.

use std::sync::Arc;

use tokio::sync::watch;

use cmdreply_core::error::{InteractionFailure, ReplyError, Result};

use crate::interaction::Interaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleState {
    Pending,
    Ready,
    Failed(InteractionFailure),
}

impl HandleState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HandleState::Pending)
    }
}

#[derive(Clone)]
pub struct ContinuationHandle {
    inner: Arc<Inner>,
}

struct Inner {
    interaction: Interaction,
    state: watch::Sender<HandleState>,
}

impl ContinuationHandle {
    pub fn new(interaction: Interaction) -> Self {
        let (state, _) = watch::channel(HandleState::Pending);
        Self {
            inner: Arc::new(Inner { interaction, state }),
        }
    }

    pub fn interaction(&self) -> &Interaction {
        &self.inner.interaction
    }

    pub fn state(&self) -> HandleState {
        self.inner.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == HandleState::Ready
    }

    pub fn mark_ready(&self) -> Result<()> {
        self.transition(HandleState::Ready)
    }

    pub fn mark_failed(&self, failure: InteractionFailure) -> Result<()> {
        self.transition(HandleState::Failed(failure))
    }

    fn transition(&self, next: HandleState) -> Result<()> {
        let applied = self.inner.state.send_if_modified(|s| {
            if s.is_terminal() {
                return false;
            }
            *s = next;
            true
        });
        if applied {
            Ok(())
        } else {
            Err(ReplyError::AlreadyCompleted)
        }
    }

    /// Wait until the handle leaves `Pending`.
    pub async fn wait(&self) -> std::result::Result<(), InteractionFailure> {
        let mut rx = self.inner.state.subscribe();
        let done = match rx.wait_for(HandleState::is_terminal).await {
            Ok(state) => state.clone(),
            // sender lives in `inner`, which we hold
            Err(_) => HandleState::Failed(InteractionFailure),
        };
        match done {
            HandleState::Failed(f) => Err(f),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for ContinuationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuationHandle")
            .field("interaction", &self.inner.interaction.id)
            .field("state", &self.state())
            .finish()
    }
}
