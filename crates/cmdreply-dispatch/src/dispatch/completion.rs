//! Completion routing: transport outcome -> continuation handle + caller.
//!
//! Failures are reported twice on purpose: the handle moves to `Failed` so
//! anyone awaiting the interaction sees it, and the raw error still goes back
//! to the caller.

use cmdreply_core::error::{InteractionFailure, ReplyError, Result};

use crate::interaction::ContinuationHandle;
use crate::obs::ReplyMetrics;
use crate::transport::{TransportError, TransportResponse};

pub fn handle_outcome(
    handle: &ContinuationHandle,
    metrics: &ReplyMetrics,
    outcome: std::result::Result<TransportResponse, TransportError>,
) -> Result<ContinuationHandle> {
    let interaction = handle.interaction().id;

    let err = match outcome {
        Ok(resp) if resp.is_ok() => {
            handle.mark_ready()?;
            metrics.dispatch_outcomes.inc(&[("outcome", "ok")]);
            tracing::debug!(interaction, status = resp.status, "reply accepted");
            return Ok(handle.clone());
        }
        Ok(resp) => {
            metrics.dispatch_outcomes.inc(&[("outcome", "http_error")]);
            ReplyError::Http { status: resp.status }
        }
        Err(e) => {
            metrics.dispatch_outcomes.inc(&[("outcome", "transport_error")]);
            ReplyError::Transport(e.to_string())
        }
    };

    if handle.mark_failed(InteractionFailure).is_err() {
        tracing::warn!(interaction, "outcome delivered to an already completed handle");
    }
    tracing::warn!(interaction, error = %err, "reply failed");
    Err(err)
}
