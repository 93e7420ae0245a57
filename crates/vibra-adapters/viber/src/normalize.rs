//! Inbound normalization: Viber message callbacks to framework envelopes.

use tracing::{debug, info};
use vibra_core::{Attachment, Envelope};

use crate::address::address_for;
use crate::config::ViberConfig;
use crate::model::event::MessageEvent;

/// Content type given to received pictures.
pub const PICTURE_CONTENT_TYPE: &str = "image/jpeg";

/// File name given to received pictures.
pub const PICTURE_NAME: &str = "viberimage.jpeg";

/// Content type of the attachment carrying raw, untranslated payloads.
pub const RAW_CONTENT_TYPE: &str = "object";

/// Converts message callbacks into envelopes.
///
/// Normalization never fails: message types without a dedicated mapping
/// are forwarded as a raw payload attachment.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: ViberConfig,
}

impl Normalizer {
    pub fn new(config: ViberConfig) -> Self {
        Self { config }
    }

    /// Builds the envelope for one received message.
    pub fn normalize(&self, event: &MessageEvent) -> Envelope {
        let message = &event.message;
        let envelope = Envelope::new()
            .with_address(address_for(&self.config, &event.sender))
            .with_timestamp(event.timestamp);

        info!(
            sender = %event.sender.id,
            kind = %message.kind,
            text = message.text.as_deref().unwrap_or_default(),
            "Message received"
        );

        match message.kind.as_str() {
            "text" => envelope.with_text(message.text.clone().unwrap_or_default()),
            "picture" => {
                let caption = message
                    .text
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "picture".to_string());
                let media = message.media.clone().unwrap_or_default();
                envelope.with_text(caption).with_attachment(
                    Attachment::media(PICTURE_CONTENT_TYPE, media).with_name(PICTURE_NAME),
                )
            }
            other => {
                debug!(kind = %other, "Forwarding message as raw payload");
                let text = message
                    .text
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "[json]".to_string());
                envelope
                    .with_text(text)
                    .with_attachment(Attachment::new(RAW_CONTENT_TYPE, message.to_json()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::event::{ReceivedMessage, UserProfile};

    fn event(message: ReceivedMessage) -> MessageEvent {
        MessageEvent {
            timestamp: 1457764197627,
            message_token: None,
            sender: UserProfile::new("01234567890A=", "John"),
            message,
        }
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(ViberConfig::named("Shop"))
    }

    #[test]
    fn test_text_message() {
        let envelope = normalizer().normalize(&event(ReceivedMessage::text("hi there")));

        assert_eq!(envelope.text(), "hi there");
        assert_eq!(envelope.timestamp(), Some(1457764197627));
        assert!(envelope.attachments().is_empty());

        let address = envelope.address().unwrap();
        assert_eq!(address.user.id, "01234567890A%3D");
        assert_eq!(address.conversation.id, "01234567890A%3D");
        assert_eq!(address.bot.id, "viberbot");
        assert_eq!(address.bot.name, "Shop");
    }

    #[test]
    fn test_picture_without_caption() {
        let envelope = normalizer().normalize(&event(ReceivedMessage::picture(
            "http://x/z.jpg",
            Some(String::new()),
        )));

        assert_eq!(envelope.text(), "picture");
        assert_eq!(envelope.attachments().len(), 1);
        let attachment = &envelope.attachments()[0];
        assert_eq!(attachment.content_type, "image/jpeg");
        assert_eq!(attachment.content, json!("http://x/z.jpg"));
        assert_eq!(attachment.url(), Some("http://x/z.jpg"));
        assert_eq!(attachment.name.as_deref(), Some("viberimage.jpeg"));
    }

    #[test]
    fn test_picture_with_caption() {
        let envelope = normalizer().normalize(&event(ReceivedMessage::picture(
            "http://x/z.jpg",
            Some("my cat".to_string()),
        )));
        assert_eq!(envelope.text(), "my cat");
    }

    #[test]
    fn test_other_type_forwards_raw_payload() {
        let mut message = ReceivedMessage {
            kind: "sticker".to_string(),
            ..Default::default()
        };
        message.extra.insert("sticker_id".to_string(), json!(40133));

        let envelope = normalizer().normalize(&event(message));

        assert_eq!(envelope.text(), "[json]");
        assert_eq!(envelope.attachments().len(), 1);
        let attachment = &envelope.attachments()[0];
        assert_eq!(attachment.content_type, "object");
        assert_eq!(attachment.content["type"], "sticker");
        assert_eq!(attachment.content["sticker_id"], 40133);
    }

    #[test]
    fn test_other_type_keeps_text() {
        let message = ReceivedMessage {
            kind: "url".to_string(),
            text: Some("look".to_string()),
            media: Some("http://x".to_string()),
            ..Default::default()
        };
        let envelope = normalizer().normalize(&event(message));
        assert_eq!(envelope.text(), "look");
        assert_eq!(envelope.attachments()[0].content["media"], "http://x");
    }
}
