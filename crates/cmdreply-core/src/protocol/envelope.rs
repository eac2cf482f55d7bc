//! Interaction response envelope (JSON).
//!
//! Wire shapes:
//! - deferred: `{"type":5}` or `{"type":5,"data":{"flags":N}}`
//! - immediate: `{"type":4,"data":{"content":..,"tts":..,"flags":..,"embeds"?:[..]}}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReplyError, Result};
use crate::reply::embed::Embed;
use crate::reply::state::ReplyState;

/// Interaction callback type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Pong,
    ChannelMessageWithSource,
    DeferredChannelMessageWithSource,
}

impl ResponseType {
    pub const fn raw(self) -> u8 {
        match self {
            ResponseType::Pong => 1,
            ResponseType::ChannelMessageWithSource => 4,
            ResponseType::DeferredChannelMessageWithSource => 5,
        }
    }

    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(ResponseType::Pong),
            4 => Some(ResponseType::ChannelMessageWithSource),
            5 => Some(ResponseType::DeferredChannelMessageWithSource),
            _ => None,
        }
    }
}

/// Body of a visible reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageData {
    pub content: String,
    pub tts: bool,
    pub flags: u32,
    pub embeds: Vec<Embed>,
}

/// The reply kinds this crate can send. Selection is an exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope {
    /// Acknowledge now, send the message later through a followup edit.
    DeferredAck { flags: u32 },
    /// Visible message sent with the acknowledgement.
    ChannelMessage(MessageData),
}

#[derive(Debug, Serialize, Deserialize)]
struct WireEnvelope {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<WireData>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tts: Option<bool>,
    #[serde(default)]
    flags: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed>,
}

impl ResponseEnvelope {
    /// Pick the envelope for an accumulated reply.
    pub fn assemble(state: &ReplyState) -> Self {
        if state.is_empty() {
            ResponseEnvelope::DeferredAck { flags: state.flags().bits() }
        } else {
            // TODO: carry state.mentions() into the body once the allow-list
            // wire shape is settled; until then it is collected only.
            ResponseEnvelope::ChannelMessage(MessageData {
                content: state.content().to_string(),
                tts: state.tts(),
                flags: state.flags().bits(),
                embeds: state.embeds().to_vec(),
            })
        }
    }

    pub fn response_type(&self) -> ResponseType {
        match self {
            ResponseEnvelope::DeferredAck { .. } => ResponseType::DeferredChannelMessageWithSource,
            ResponseEnvelope::ChannelMessage(_) => ResponseType::ChannelMessageWithSource,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseEnvelope::DeferredAck { .. } => "deferred_ack",
            ResponseEnvelope::ChannelMessage(_) => "channel_message",
        }
    }

    fn to_wire(&self) -> WireEnvelope {
        let data = match self {
            ResponseEnvelope::DeferredAck { flags: 0 } => None,
            ResponseEnvelope::DeferredAck { flags } => Some(WireData { flags: *flags, ..WireData::default() }),
            ResponseEnvelope::ChannelMessage(m) => Some(WireData {
                content: Some(m.content.clone()),
                tts: Some(m.tts),
                flags: m.flags,
                embeds: m.embeds.clone(),
            }),
        };
        WireEnvelope { kind: self.response_type().raw(), data }
    }

    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self.to_wire())
            .map_err(|e| ReplyError::BadPayload(format!("json encode failed: {e}")))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.to_wire())
            .map_err(|e| ReplyError::BadPayload(format!("json encode failed: {e}")))
    }

    /// Decode either wire shape.
    pub fn from_json(s: &str) -> Result<Self> {
        let wire: WireEnvelope = serde_json::from_str(s)
            .map_err(|e| ReplyError::BadPayload(format!("invalid envelope json: {e}")))?;

        match ResponseType::from_raw(wire.kind) {
            Some(ResponseType::DeferredChannelMessageWithSource) => Ok(ResponseEnvelope::DeferredAck {
                flags: wire.data.map_or(0, |d| d.flags),
            }),
            Some(ResponseType::ChannelMessageWithSource) => {
                let d = wire
                    .data
                    .ok_or_else(|| ReplyError::BadPayload("channel message requires data".into()))?;
                Ok(ResponseEnvelope::ChannelMessage(MessageData {
                    content: d.content.unwrap_or_default(),
                    tts: d.tts.unwrap_or(false),
                    flags: d.flags,
                    embeds: d.embeds,
                }))
            }
            _ => Err(ReplyError::BadPayload(format!(
                "unsupported response type: {}",
                wire.kind
            ))),
        }
    }
}
