//! Viber webhook callbacks.
//!
//! Viber posts one JSON callback per event to the bot's webhook:
//!
//! ```json
//! {
//!   "event": "message",
//!   "timestamp": 1457764197627,
//!   "message_token": 4912661846655238145,
//!   "sender": {"id": "01234567890A=", "name": "John McClane"},
//!   "message": {"type": "text", "text": "a message to the service"}
//! }
//! ```
//!
//! Only `message` callbacks carry user content; every other event type is
//! surfaced as [`Callback::Other`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vibra_core::{AdapterError, AdapterResult};

/// A Viber user as seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Raw Viber user identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,
}

impl UserProfile {
    /// Creates a profile from an id and a display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// The `message` object of a message callback.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceivedMessage {
    /// Declared message type (`text`, `picture`, `sticker`, `location`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Media URL for picture, video and file messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_data: Option<String>,
    /// Type-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReceivedMessage {
    /// Creates a text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates a picture message.
    pub fn picture(media: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            kind: "picture".to_string(),
            text: caption,
            media: Some(media.into()),
            ..Default::default()
        }
    }

    /// Returns the message as raw JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// A `message` callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Event time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_token: Option<u64>,
    pub sender: UserProfile,
    pub message: ReceivedMessage,
}

/// A parsed webhook callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Callback {
    /// A user sent the bot a message.
    Message(MessageEvent),
    /// Any other event (`subscribed`, `delivered`, `seen`, `webhook`, ...).
    Other {
        event: String,
        timestamp: Option<i64>,
    },
}

impl Callback {
    /// Returns the callback's event name.
    pub fn event_name(&self) -> &str {
        match self {
            Callback::Message(_) => "message",
            Callback::Other { event, .. } => event,
        }
    }
}

/// Parses a raw webhook body.
///
/// # Errors
///
/// Returns [`AdapterError::Parse`] if the body is not JSON, lacks an `event`
/// field, or is a `message` callback of the wrong shape.
pub fn parse_callback(data: &[u8]) -> AdapterResult<Callback> {
    let value: Value = serde_json::from_slice(data)?;

    let event = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::parse("missing 'event' field"))?
        .to_string();

    if event == "message" {
        return Ok(Callback::Message(serde_json::from_value(value)?));
    }

    Ok(Callback::Other {
        timestamp: value.get("timestamp").and_then(Value::as_i64),
        event,
    })
}
