//! Reply accumulator.
//!
//! Callers mutate a `ReplyState` through fluent setters, then `finalize` it
//! into a request body. A state belongs to one in-flight reply and is not
//! shared across invocations.

use crate::error::{ReplyError, Result};
use crate::protocol::envelope::{MessageData, ResponseEnvelope};
use crate::protocol::multipart::{encode_body, AttachmentData, RequestBody};
use crate::reply::embed::Embed;
use crate::reply::flags::MessageFlags;
use crate::reply::limits::ReplyLimits;
use crate::reply::mention::{parse_snowflakes, MentionPolicy, MentionType, Mentionable};

/// Prefix the client uses to blur an attachment until clicked.
pub const SPOILER_PREFIX: &str = "SPOILER_";

/// Per-file presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentOption {
    Spoiler,
}

#[derive(Debug, Default)]
pub struct ReplyState {
    content: String,
    tts: bool,
    flags: MessageFlags,
    embeds: Vec<Embed>,
    // name-keyed; a repeated name replaces the earlier stream in place
    attachments: Vec<(String, AttachmentData)>,
    mentions: MentionPolicy,
    limits: ReplyLimits,
}

impl ReplyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ReplyLimits) -> Self {
        Self { limits, ..Self::default() }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tts(&self) -> bool {
        self.tts
    }

    pub fn flags(&self) -> MessageFlags {
        self.flags
    }

    pub fn embeds(&self) -> &[Embed] {
        &self.embeds
    }

    pub fn mentions(&self) -> &MentionPolicy {
        &self.mentions
    }

    pub fn limits(&self) -> ReplyLimits {
        self.limits
    }

    pub fn attachment_names(&self) -> impl Iterator<Item = &str> {
        self.attachments.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// No content and no embeds. Attachments and flags do not count.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.embeds.is_empty()
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn set_tts(&mut self, tts: bool) -> &mut Self {
        self.tts = tts;
        self
    }

    pub fn set_ephemeral(&mut self, ephemeral: bool) -> &mut Self {
        self.flags.toggle(MessageFlags::EPHEMERAL, ephemeral);
        self
    }

    /// Append embeds. Rejected as a whole if any embed is unsendable or the
    /// total would exceed the embed ceiling.
    pub fn add_embeds(&mut self, embeds: impl IntoIterator<Item = Embed>) -> Result<&mut Self> {
        let embeds: Vec<Embed> = embeds.into_iter().collect();
        self.limits.check_embeds(self.embeds.len(), &embeds)?;
        self.embeds.extend(embeds);
        Ok(self)
    }

    pub fn add_file(
        &mut self,
        data: impl Into<AttachmentData>,
        name: &str,
        options: &[AttachmentOption],
    ) -> Result<&mut Self> {
        if name.is_empty() {
            return Err(ReplyError::InvalidParameter("attachment name may not be empty".into()));
        }
        let name = if options.is_empty() {
            name.to_string()
        } else {
            format!("{SPOILER_PREFIX}{name}")
        };

        let data = data.into();
        match self.attachments.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = data,
            None => self.attachments.push((name, data)),
        }
        Ok(self)
    }

    /// `None` restores the default mention categories.
    pub fn set_allowed_mentions<I>(&mut self, types: Option<I>) -> &mut Self
    where
        I: IntoIterator<Item = MentionType>,
    {
        self.mentions.set_allowed(types);
        self
    }

    pub fn mention(&mut self, targets: &[Mentionable]) -> &mut Self {
        for t in targets {
            self.mentions.allow(*t);
        }
        self
    }

    pub fn mention_users<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<&mut Self> {
        let ids = parse_snowflakes(ids, "user")?;
        self.mentions.allow_users(ids);
        Ok(self)
    }

    pub fn mention_user_ids(&mut self, ids: &[u64]) -> &mut Self {
        self.mentions.allow_users(ids.iter().copied());
        self
    }

    pub fn mention_roles<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<&mut Self> {
        let ids = parse_snowflakes(ids, "role")?;
        self.mentions.allow_roles(ids);
        Ok(self)
    }

    pub fn mention_role_ids(&mut self, ids: &[u64]) -> &mut Self {
        self.mentions.allow_roles(ids.iter().copied());
        self
    }

    /// Replace content, tts, flags and embeds with those of an existing
    /// message body. Attachments and mention policy are kept.
    pub fn apply_message(&mut self, message: MessageData) -> Result<&mut Self> {
        self.limits.check_embeds(0, &message.embeds)?;
        self.content = message.content;
        self.tts = message.tts;
        self.flags = MessageFlags::from_bits(message.flags);
        self.embeds = message.embeds;
        Ok(self)
    }

    /// Back to a fresh accumulator. Limits are kept; pending attachment
    /// streams are dropped unread.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::with_limits(self.limits);
        self
    }

    /// Validate, assemble the envelope, and frame it as a request body.
    ///
    /// Attachments are drained into the body, so finalizing again without
    /// adding new files yields a plain JSON body.
    pub fn finalize(&mut self) -> Result<RequestBody> {
        self.finalize_tagged().map(|(_, body)| body)
    }

    /// `finalize`, also returning the envelope kind (`deferred_ack` or
    /// `channel_message`) the body carries.
    pub fn finalize_tagged(&mut self) -> Result<(&'static str, RequestBody)> {
        self.limits.validate(&self.content, &self.embeds)?;

        let envelope = ResponseEnvelope::assemble(self);
        let kind = envelope.kind();
        let document = envelope.to_json_string()?;
        let files = std::mem::take(&mut self.attachments);

        tracing::debug!(kind, files = files.len(), "reply finalized");
        Ok((kind, encode_body(document, files)))
    }
}
