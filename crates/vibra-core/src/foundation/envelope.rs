//! The canonical message envelope.
//!
//! An [`Envelope`] is one message exchanged with a user, in the shape the
//! framework understands. Inbound envelopes are produced by a connector from
//! platform events; outbound envelopes are produced by the framework and
//! translated by the connector into platform messages.
//!
//! Envelopes are built once and then only read, so all mutation goes through
//! the consuming `with_*` builder methods.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::address::Address;

// ============================================================================
// Envelope Kind
// ============================================================================

/// Distinguishes real messages from activity pseudo-messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    /// A regular message.
    #[default]
    Message,
    /// A "typing" indicator.
    Typing,
}

// ============================================================================
// Attachment Layout
// ============================================================================

/// How a multi-attachment message should be arranged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttachmentLayout {
    /// Attachments stacked vertically.
    List,
    /// Attachments arranged side by side as swipeable cards.
    Carousel,
    /// A layout tag this crate does not know about.
    Other(String),
}

impl AttachmentLayout {
    /// Returns the wire tag of this layout.
    pub fn as_str(&self) -> &str {
        match self {
            AttachmentLayout::List => "list",
            AttachmentLayout::Carousel => "carousel",
            AttachmentLayout::Other(tag) => tag,
        }
    }
}

impl From<String> for AttachmentLayout {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "list" => AttachmentLayout::List,
            "carousel" => AttachmentLayout::Carousel,
            _ => AttachmentLayout::Other(tag),
        }
    }
}

impl From<AttachmentLayout> for String {
    fn from(layout: AttachmentLayout) -> Self {
        match layout {
            AttachmentLayout::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for AttachmentLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Attachment
// ============================================================================

/// One attachment of an envelope.
///
/// `content` is an opaque JSON blob whose shape depends on `content_type`
/// (a card, a keyboard, a raw platform payload, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// MIME type or framework content tag.
    pub content_type: String,
    /// Location of the media, when the attachment is a media file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    /// Structured content.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub content: Value,
    /// File name shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Preview image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl Attachment {
    /// Creates an attachment carrying structured content.
    pub fn new(content_type: impl Into<String>, content: Value) -> Self {
        Self {
            content_type: content_type.into(),
            content,
            ..Default::default()
        }
    }

    /// Creates a media attachment pointing at `url`.
    ///
    /// The URL is stored both as `content_url` and as the string `content`,
    /// so consumers reading either field find it.
    pub fn media(content_type: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            content_type: content_type.into(),
            content: Value::String(url.clone()),
            content_url: Some(url),
            ..Default::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolves the media URL of this attachment.
    ///
    /// Looks at `content_url` first, then at `content.contentUrl`, then at
    /// `content` itself when it is a bare string.
    pub fn url(&self) -> Option<&str> {
        self.content_url.as_deref().or_else(|| match &self.content {
            Value::String(url) => Some(url.as_str()),
            Value::Object(map) => map.get("contentUrl").and_then(Value::as_str),
            _ => None,
        })
    }
}

// ============================================================================
// Source Event
// ============================================================================

/// A reference to a platform-native event the framework wants replayed.
///
/// Frameworks use this to send content they have no canonical shape for,
/// such as stickers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceEvent {
    /// Platform event type, e.g. `"sticker"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sticker identifier for `sticker` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker_id: Option<u64>,
    /// Remaining platform fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceEvent {
    /// Creates a sticker source event.
    pub fn sticker(sticker_id: u64) -> Self {
        Self {
            kind: "sticker".to_string(),
            sticker_id: Some(sticker_id),
            extra: Map::new(),
        }
    }

    /// Returns the sticker id when this is a sticker event that carries one.
    pub fn as_sticker(&self) -> Option<u64> {
        if self.kind == "sticker" {
            self.sticker_id
        } else {
            None
        }
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// A platform-agnostic message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(rename = "type", default)]
    kind: EnvelopeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment_layout: Option<AttachmentLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_event: Option<SourceEvent>,
}

impl Envelope {
    /// Creates an empty message envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a typing-indicator envelope.
    pub fn typing() -> Self {
        Self {
            kind: EnvelopeKind::Typing,
            ..Self::default()
        }
    }

    /// Creates an empty envelope addressed to the sender of `self`.
    pub fn reply(&self) -> Self {
        Self {
            address: self.address.clone(),
            ..Self::default()
        }
    }

    /// Sets the address.
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Sets the timestamp.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the text body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets the attachment layout.
    pub fn with_layout(mut self, layout: AttachmentLayout) -> Self {
        self.attachment_layout = Some(layout);
        self
    }

    /// Sets the source event.
    pub fn with_source_event(mut self, event: SourceEvent) -> Self {
        self.source_event = Some(event);
        self
    }

    pub fn kind(&self) -> EnvelopeKind {
        self.kind
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn attachment_layout(&self) -> Option<&AttachmentLayout> {
        self.attachment_layout.as_ref()
    }

    pub fn source_event(&self) -> Option<&SourceEvent> {
        self.source_event.as_ref()
    }

    /// Returns true if this is a typing indicator.
    pub fn is_typing(&self) -> bool {
        self.kind == EnvelopeKind::Typing
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_attachment_url_resolution() {
        let top_level = Attachment {
            content_type: "video/mp4".to_string(),
            content_url: Some("http://x/a.mp4".to_string()),
            content: json!({"contentUrl": "http://x/ignored.mp4"}),
            ..Default::default()
        };
        assert_eq!(top_level.url(), Some("http://x/a.mp4"));

        let nested = Attachment::new("image/png", json!({"contentUrl": "http://x/y.png"}));
        assert_eq!(nested.url(), Some("http://x/y.png"));

        let bare = Attachment::new("url", json!("http://x/page"));
        assert_eq!(bare.url(), Some("http://x/page"));

        let none = Attachment::new("object", json!({"type": "location"}));
        assert_eq!(none.url(), None);
    }

    #[test]
    fn test_layout_tags() {
        let layout: AttachmentLayout = serde_json::from_value(json!("carousel")).unwrap();
        assert_eq!(layout, AttachmentLayout::Carousel);

        let layout: AttachmentLayout = serde_json::from_value(json!("grid")).unwrap();
        assert_eq!(layout, AttachmentLayout::Other("grid".to_string()));
        assert_eq!(serde_json::to_value(&layout).unwrap(), json!("grid"));
    }

    #[test]
    fn test_envelope_deserialize_framework_shape() {
        let envelope: Envelope = serde_json::from_value(json!({
            "type": "message",
            "text": "hi",
            "attachmentLayout": "carousel",
            "attachments": [
                {"contentType": "application/vnd.microsoft.card.hero", "content": {"title": "A"}}
            ],
            "sourceEvent": {"type": "sticker", "sticker_id": 40133}
        }))
        .unwrap();

        assert_eq!(envelope.kind(), EnvelopeKind::Message);
        assert_eq!(envelope.text(), "hi");
        assert_eq!(envelope.attachment_layout(), Some(&AttachmentLayout::Carousel));
        assert_eq!(envelope.attachments()[0].content["title"], "A");
        assert_eq!(
            envelope.source_event().and_then(SourceEvent::as_sticker),
            Some(40133)
        );
    }

    #[test]
    fn test_typing_envelope() {
        let envelope: Envelope = serde_json::from_value(json!({"type": "typing"})).unwrap();
        assert!(envelope.is_typing());
        assert!(Envelope::typing().is_typing());
        assert!(!Envelope::new().is_typing());
    }

    #[test]
    fn test_non_sticker_source_event() {
        let event = SourceEvent {
            kind: "location".to_string(),
            sticker_id: Some(1),
            extra: Map::new(),
        };
        assert_eq!(event.as_sticker(), None);
    }
}
