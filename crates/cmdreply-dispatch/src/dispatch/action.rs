//! Pending reply to one interaction.
//!
//! Wraps a `ReplyState` with everything needed to send it: route, transport,
//! submit options, and the continuation handle the outcome is routed to.
//! An action that ends without a transport outcome (failed check, rejected
//! by validation, dropped unsent) fails its handle so waiters are released.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::Instrument;

use cmdreply_core::error::{InteractionFailure, ReplyError, Result};
use cmdreply_core::{
    AttachmentData, AttachmentOption, Embed, MentionType, Mentionable, MessageData, ReplyState,
};

use crate::dispatch::completion::handle_outcome;
use crate::interaction::ContinuationHandle;
use crate::obs::ReplyMetrics;
use crate::transport::{Route, SubmitOptions, SubmitRequest, Transport};

type Check = Box<dyn Fn() -> bool + Send + Sync>;

pub struct ReplyAction {
    state: ReplyState,
    route: Route,
    handle: ContinuationHandle,
    transport: Arc<dyn Transport>,
    metrics: Arc<ReplyMetrics>,
    options: SubmitOptions,
    check: Option<Check>,
}

impl ReplyAction {
    pub(crate) fn new(
        state: ReplyState,
        handle: ContinuationHandle,
        transport: Arc<dyn Transport>,
        metrics: Arc<ReplyMetrics>,
        options: SubmitOptions,
    ) -> Self {
        let route = Route::interaction_callback(handle.interaction());
        Self {
            state,
            route,
            handle,
            transport,
            metrics,
            options,
            check: None,
        }
    }

    /// Handle that will be completed by this reply's outcome.
    pub fn handle(&self) -> ContinuationHandle {
        self.handle.clone()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn options(&self) -> SubmitOptions {
        self.options
    }

    pub fn state(&self) -> &ReplyState {
        &self.state
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.state.set_content(content);
        self
    }

    pub fn tts(mut self, tts: bool) -> Self {
        self.state.set_tts(tts);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.state.set_ephemeral(ephemeral);
        self
    }

    pub fn add_embeds(mut self, embeds: impl IntoIterator<Item = Embed>) -> Result<Self> {
        self.state.add_embeds(embeds)?;
        Ok(self)
    }

    pub fn add_file(
        mut self,
        data: impl Into<AttachmentData>,
        name: &str,
        options: &[AttachmentOption],
    ) -> Result<Self> {
        self.state.add_file(data, name, options)?;
        Ok(self)
    }

    pub fn allowed_mentions<I>(mut self, types: Option<I>) -> Self
    where
        I: IntoIterator<Item = MentionType>,
    {
        self.state.set_allowed_mentions(types);
        self
    }

    pub fn mention(mut self, targets: &[Mentionable]) -> Self {
        self.state.mention(targets);
        self
    }

    pub fn mention_users<S: AsRef<str>>(mut self, ids: &[S]) -> Result<Self> {
        self.state.mention_users(ids)?;
        Ok(self)
    }

    pub fn mention_roles<S: AsRef<str>>(mut self, ids: &[S]) -> Result<Self> {
        self.state.mention_roles(ids)?;
        Ok(self)
    }

    pub fn apply_message(mut self, message: MessageData) -> Result<Self> {
        self.state.apply_message(message)?;
        Ok(self)
    }

    pub fn reset(mut self) -> Self {
        self.state.reset();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.options.deadline = Some(deadline);
        self
    }

    /// Checked right before submission; `false` cancels the request.
    pub fn set_check(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    /// Finalize and send. Resolves once the transport delivers its outcome.
    pub async fn submit(mut self) -> Result<ContinuationHandle> {
        let interaction = self.handle.interaction().id;
        let span = tracing::info_span!("reply", interaction);

        async move {
            if let Some(check) = &self.check {
                if !check() {
                    self.metrics.rejected.inc(&[("code", "CHECK_FAILED")]);
                    tracing::debug!("check failed, reply not sent");
                    self.abandon();
                    return Err(ReplyError::CheckFailed);
                }
            }

            let (kind, body) = match self.state.finalize_tagged() {
                Ok(tagged) => tagged,
                Err(e) => {
                    self.metrics.rejected.inc(&[("code", e.code().as_str())]);
                    self.abandon();
                    return Err(e);
                }
            };
            self.metrics.envelopes.inc(&[("kind", kind)]);

            let request = SubmitRequest {
                route: self.route.clone(),
                body,
                options: self.options,
            };
            tracing::info!(kind, multipart = request.body.is_multipart(), "submitting reply");

            self.metrics.in_flight.inc();
            let started = Instant::now();
            let outcome = self.transport.submit(request).await;
            self.metrics.in_flight.dec();
            self.metrics
                .dispatch_duration
                .observe(&[("kind", kind)], started.elapsed());

            handle_outcome(&self.handle, &self.metrics, outcome)
        }
        .instrument(span)
        .await
    }

    /// Fail a still-pending handle; no outcome will ever arrive for it.
    fn abandon(&self) {
        if !self.handle.state().is_terminal() {
            // a racing outcome may land first; AlreadyCompleted is fine here
            let _ = self.handle.mark_failed(InteractionFailure);
        }
    }

    /// Submit in the background and invoke exactly one of the callbacks.
    pub fn queue<S, F>(self, on_success: S, on_failure: F) -> JoinHandle<()>
    where
        S: FnOnce(ContinuationHandle) + Send + 'static,
        F: FnOnce(ReplyError) + Send + 'static,
    {
        tokio::spawn(async move {
            match self.submit().await {
                Ok(handle) => on_success(handle),
                Err(e) => on_failure(e),
            }
        })
    }
}

impl Drop for ReplyAction {
    fn drop(&mut self) {
        self.abandon();
    }
}
