//! Shared error type across cmdreply crates.

use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Required parameter missing or malformed.
    InvalidParameter,
    /// Reply exceeds a service-imposed limit.
    LimitExceeded,
    /// Wire document could not be encoded or decoded.
    BadPayload,
    /// Transport failed or the service rejected the request.
    Transport,
    /// Interaction lifecycle violation.
    Interaction,
    /// Invalid configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
}

impl ErrorCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::LimitExceeded => "LIMIT_EXCEEDED",
            ErrorCode::BadPayload => "BAD_PAYLOAD",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Interaction => "INTERACTION",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReplyError>;

/// Signal carried by a continuation handle that failed to reach `Ready`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("interaction failed: the service did not accept the reply")]
pub struct InteractionFailure;

/// Unified error type used by core and dispatch.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(
        "embed is empty or longer than {max_length} characters, which is the max for bot accounts"
    )]
    UnsendableEmbed { max_length: usize },
    #[error("cannot have more than {max} embeds per message")]
    TooManyEmbeds { max: usize },
    #[error("content may not be longer than {max} characters")]
    ContentTooLong { max: usize },
    #[error("bad payload: {0}")]
    BadPayload(String),
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("request failed with http status {status}")]
    Http { status: u16 },
    #[error(transparent)]
    InteractionFailure(#[from] InteractionFailure),
    #[error("continuation already completed")]
    AlreadyCompleted,
    #[error("request check failed before submission")]
    CheckFailed,
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
}

impl ReplyError {
    /// Map internal error to a stable caller-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReplyError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            ReplyError::UnsendableEmbed { .. }
            | ReplyError::TooManyEmbeds { .. }
            | ReplyError::ContentTooLong { .. } => ErrorCode::LimitExceeded,
            ReplyError::BadPayload(_) => ErrorCode::BadPayload,
            ReplyError::Transport(_) | ReplyError::Http { .. } => ErrorCode::Transport,
            ReplyError::InteractionFailure(_)
            | ReplyError::AlreadyCompleted
            | ReplyError::CheckFailed => ErrorCode::Interaction,
            ReplyError::Config(_) => ErrorCode::Config,
            ReplyError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
        }
    }

    /// True for errors raised by limit checks (synchronous, pre-network).
    pub fn is_validation(&self) -> bool {
        self.code() == ErrorCode::LimitExceeded
    }
}
