use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedFrame,
    MalformedPayload,
    UnknownEvent,
    TopicMismatch,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),
    #[error("malformed payload for {event}: {source}")]
    MalformedPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown button event {0:?}")]
    UnknownButtonEvent(String),
    #[error("frame for topic {actual:?} arrived on topic {expected:?}")]
    TopicMismatch { expected: String, actual: String },
}

impl ProtocolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::MalformedFrame(_) => ErrorCode::MalformedFrame,
            ProtocolError::MalformedPayload { .. } => ErrorCode::MalformedPayload,
            ProtocolError::UnknownButtonEvent(_) => ErrorCode::UnknownEvent,
            ProtocolError::TopicMismatch { .. } => ErrorCode::TopicMismatch,
        }
    }
}
