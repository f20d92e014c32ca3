use serde::{de, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{domain::ButtonEvent, error::ProtocolError};

pub const SET_INDIGLO: &str = "setIndiglo";
pub const UNSET_INDIGLO: &str = "unsetIndiglo";
pub const SET_TIME_DISPLAY: &str = "setTimeDisplay";
pub const SET_DATE_DISPLAY: &str = "setDateDisplay";

/// Inbound event names the client understands.
pub const CONTROLLER_EVENTS: [&str; 4] =
    [SET_INDIGLO, UNSET_INDIGLO, SET_TIME_DISPLAY, SET_DATE_DISPLAY];

pub const DEFAULT_TOPIC: &str = "watch:lobby";

/// Display update pushed by the controller.
///
/// Names outside [`CONTROLLER_EVENTS`] decode to `Unknown` so newer
/// controllers can add events without breaking older clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    SetIndiglo,
    UnsetIndiglo,
    SetTimeDisplay { time: String },
    SetDateDisplay { date: String },
    Unknown { name: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct TimeDisplayPayload {
    time: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DateDisplayPayload {
    date: String,
}

impl ControllerEvent {
    pub fn decode(name: &str, payload: &Value) -> Result<Self, ProtocolError> {
        let malformed = |source| ProtocolError::MalformedPayload {
            event: name.to_string(),
            source,
        };

        match name {
            SET_INDIGLO => Ok(Self::SetIndiglo),
            UNSET_INDIGLO => Ok(Self::UnsetIndiglo),
            SET_TIME_DISPLAY => {
                let payload: TimeDisplayPayload = object_payload(payload).map_err(malformed)?;
                Ok(Self::SetTimeDisplay { time: payload.time })
            }
            SET_DATE_DISPLAY => {
                let payload: DateDisplayPayload = object_payload(payload).map_err(malformed)?;
                Ok(Self::SetDateDisplay { date: payload.date })
            }
            other => Ok(Self::Unknown {
                name: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::SetIndiglo => SET_INDIGLO,
            Self::UnsetIndiglo => UNSET_INDIGLO,
            Self::SetTimeDisplay { .. } => SET_TIME_DISPLAY,
            Self::SetDateDisplay { .. } => SET_DATE_DISPLAY,
            Self::Unknown { name } => name,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::SetTimeDisplay { time } => json!({ "time": time }),
            Self::SetDateDisplay { date } => json!({ "date": date }),
            Self::SetIndiglo | Self::UnsetIndiglo | Self::Unknown { .. } => empty_payload(),
        }
    }
}

/// Struct payloads must be keyed objects; serde would otherwise accept a
/// positional array such as `["07:45:12"]`.
fn object_payload<'a, T: Deserialize<'a>>(payload: &'a Value) -> Result<T, serde_json::Error> {
    if !payload.is_object() {
        return Err(de::Error::custom("payload must be a JSON object"));
    }
    T::deserialize(payload)
}

/// One text message on the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

impl Frame {
    pub fn new(topic: impl Into<String>, event: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            event: event.into(),
            payload,
        }
    }

    pub fn button(topic: impl Into<String>, event: ButtonEvent) -> Self {
        Self::new(topic, event.event_name(), empty_payload())
    }

    pub fn controller(topic: impl Into<String>, event: &ControllerEvent) -> Self {
        Self::new(topic, event.name(), event.payload())
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::MalformedFrame)
    }

    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::MalformedFrame)
    }

    /// Decodes a frame and rejects it unless it belongs to `topic`.
    pub fn decode_for_topic(raw: &str, topic: &str) -> Result<Self, ProtocolError> {
        let frame = Self::decode(raw)?;
        if frame.topic != topic {
            return Err(ProtocolError::TopicMismatch {
                expected: topic.to_string(),
                actual: frame.topic,
            });
        }
        Ok(frame)
    }

    pub fn button_event(&self) -> Result<ButtonEvent, ProtocolError> {
        ButtonEvent::from_event_name(&self.event)
            .ok_or_else(|| ProtocolError::UnknownButtonEvent(self.event.clone()))
    }

    pub fn controller_event(&self) -> Result<ControllerEvent, ProtocolError> {
        ControllerEvent::decode(&self.event, &self.payload)
    }
}

pub fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
