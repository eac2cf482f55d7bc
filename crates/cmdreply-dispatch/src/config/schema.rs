use std::time::Duration;

use serde::Deserialize;

use cmdreply_core::error::{ReplyError, Result};
use cmdreply_core::reply::embed::EMBED_MAX_LENGTH_BOT;
use cmdreply_core::reply::limits::{MAX_CONTENT_LENGTH, MAX_EMBEDS};
use cmdreply_core::ReplyLimits;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyConfig {
    pub version: u32,

    #[serde(default)]
    pub limits: LimitsSection,

    #[serde(default)]
    pub dispatch: DispatchSection,
}

impl ReplyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReplyError::UnsupportedVersion);
        }
        self.limits.validate()?;
        self.dispatch.validate()?;
        Ok(())
    }
}

/// Limits may be tightened below the service ceilings, never raised.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSection {
    #[serde(default = "default_max_embeds")]
    pub max_embeds: usize,

    #[serde(default = "default_embed_max_length")]
    pub embed_max_length: usize,

    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_embeds: default_max_embeds(),
            embed_max_length: default_embed_max_length(),
            max_content_length: default_max_content_length(),
        }
    }
}

impl LimitsSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_EMBEDS).contains(&self.max_embeds) {
            return Err(ReplyError::Config(format!(
                "limits.max_embeds must be between 1 and {MAX_EMBEDS}"
            )));
        }
        if !(1..=EMBED_MAX_LENGTH_BOT).contains(&self.embed_max_length) {
            return Err(ReplyError::Config(format!(
                "limits.embed_max_length must be between 1 and {EMBED_MAX_LENGTH_BOT}"
            )));
        }
        if !(1..=MAX_CONTENT_LENGTH).contains(&self.max_content_length) {
            return Err(ReplyError::Config(format!(
                "limits.max_content_length must be between 1 and {MAX_CONTENT_LENGTH}"
            )));
        }
        Ok(())
    }

    pub fn to_limits(&self) -> ReplyLimits {
        ReplyLimits {
            max_embeds: self.max_embeds,
            embed_max_length: self.embed_max_length,
            max_content_length: self.max_content_length,
        }
    }
}

fn default_max_embeds() -> usize {
    MAX_EMBEDS
}
fn default_embed_max_length() -> usize {
    EMBED_MAX_LENGTH_BOT
}
fn default_max_content_length() -> usize {
    MAX_CONTENT_LENGTH
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Per-request timeout handed to the transport. 0 disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl DispatchSection {
    pub fn validate(&self) -> Result<()> {
        // interaction tokens expire after 15 minutes
        if self.timeout_ms > 900_000 {
            return Err(ReplyError::Config(
                "dispatch.timeout_ms must be at most 900000".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

fn default_timeout_ms() -> u64 {
    3000
}
