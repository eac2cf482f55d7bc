use std::sync::Arc;

use cmdreply_core::{ReplyLimits, ReplyState};

use crate::config::ReplyConfig;
use crate::dispatch::action::ReplyAction;
use crate::interaction::{ContinuationHandle, Interaction};
use crate::obs::ReplyMetrics;
use crate::transport::{SubmitOptions, Transport};

/// Creates reply actions bound to one transport, limit set, and metrics registry.
pub struct ReplyDispatcher {
    transport: Arc<dyn Transport>,
    limits: ReplyLimits,
    defaults: SubmitOptions,
    metrics: Arc<ReplyMetrics>,
}

impl ReplyDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            limits: ReplyLimits::default(),
            defaults: SubmitOptions::default(),
            metrics: Arc::new(ReplyMetrics::default()),
        }
    }

    pub fn from_config(cfg: &ReplyConfig, transport: Arc<dyn Transport>) -> Self {
        let mut d = Self::new(transport);
        d.limits = cfg.limits.to_limits();
        d.defaults.timeout = cfg.dispatch.timeout();
        d
    }

    pub fn limits(&self) -> ReplyLimits {
        self.limits
    }

    pub fn metrics(&self) -> Arc<ReplyMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Start a reply. The continuation handle exists (pending) from here on.
    pub fn reply(&self, interaction: Interaction) -> ReplyAction {
        tracing::debug!(interaction = interaction.id, "reply started");
        ReplyAction::new(
            ReplyState::with_limits(self.limits),
            ContinuationHandle::new(interaction),
            Arc::clone(&self.transport),
            Arc::clone(&self.metrics),
            self.defaults,
        )
    }
}
