//! Service-imposed limits and the validator that enforces them.

use crate::error::{ReplyError, Result};
use crate::reply::embed::{Embed, EMBED_MAX_LENGTH_BOT};

/// Embeds allowed in one message.
pub const MAX_EMBEDS: usize = 10;

/// Characters allowed in message content.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Limits checked when embeds are added and again at finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyLimits {
    pub max_embeds: usize,
    pub embed_max_length: usize,
    pub max_content_length: usize,
}

impl Default for ReplyLimits {
    fn default() -> Self {
        Self {
            max_embeds: MAX_EMBEDS,
            embed_max_length: EMBED_MAX_LENGTH_BOT,
            max_content_length: MAX_CONTENT_LENGTH,
        }
    }
}

impl ReplyLimits {
    /// Reject if appending `incoming` to `existing` embeds breaks a limit.
    pub fn check_embeds(&self, existing: usize, incoming: &[Embed]) -> Result<()> {
        if incoming
            .iter()
            .any(|e| !e.is_sendable_within(self.embed_max_length))
        {
            return Err(ReplyError::UnsendableEmbed { max_length: self.embed_max_length });
        }
        if existing + incoming.len() > self.max_embeds {
            return Err(ReplyError::TooManyEmbeds { max: self.max_embeds });
        }
        Ok(())
    }

    /// Full check of an accumulated reply.
    pub fn validate(&self, content: &str, embeds: &[Embed]) -> Result<()> {
        self.check_embeds(0, embeds)?;
        if content.chars().count() > self.max_content_length {
            return Err(ReplyError::ContentTooLong { max: self.max_content_length });
        }
        Ok(())
    }
}
