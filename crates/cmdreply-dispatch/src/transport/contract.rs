//! Transport contract consumed by the dispatch path.
//!
//! The transport owns queueing, rate limiting, and retries. This crate only
//! hands it a finalized request and reacts to the single outcome it returns.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

use cmdreply_core::RequestBody;

use crate::interaction::Interaction;

/// Compiled callback route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: &'static str,
    pub path: String,
}

impl Route {
    /// `POST interactions/{id}/{token}/callback`
    pub fn interaction_callback(interaction: &Interaction) -> Self {
        Self {
            method: "POST",
            path: format!("interactions/{}/{}/callback", interaction.id, interaction.token),
        }
    }
}

/// Passed through to the transport untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub timeout: Option<Duration>,
    pub deadline: Option<Instant>,
}

#[derive(Debug)]
pub struct SubmitRequest {
    pub route: Route,
    pub body: RequestBody,
    pub options: SubmitOptions,
}

/// Response from the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
}

impl TransportResponse {
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("request cancelled")]
    Cancelled,
    #[error("{0}")]
    Other(String),
}

/// Submit a request and receive exactly one outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, request: SubmitRequest) -> Result<TransportResponse, TransportError>;
}
