//! Viber outbound message types.
//!
//! A [`PlatformMessage`] is one unit accepted by Viber's `send_message`
//! endpoint. Messages are built by the outbound converter, never mutated,
//! and consumed once by the sequencer.
//!
//! # Wire Format
//!
//! Messages serialize with a `type` tag and snake_case fields, matching the
//! Viber REST API:
//!
//! ```json
//! {"type":"text","text":"Hello","timestamp":1700000000000,"tracking_data":""}
//! ```
//!
//! Keyboards and rich media payloads use Viber's PascalCase field names.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Placeholder size sent for media whose real size is unknown.
pub const DEFAULT_MEDIA_SIZE: u64 = 10000;

/// Placeholder duration sent for videos whose real duration is unknown.
pub const DEFAULT_VIDEO_DURATION: u64 = 10000;

// ============================================================================
// Message Metadata
// ============================================================================

/// Fields shared by every outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    /// Construction time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Opaque tracking token echoed back by Viber on the user's reply.
    #[serde(default)]
    pub tracking_data: String,
}

impl MessageMeta {
    /// Creates metadata stamped with the current time.
    pub fn now() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self {
            timestamp,
            tracking_data: String::new(),
        }
    }
}

// ============================================================================
// Keyboard
// ============================================================================

/// What happens when a keyboard button or rich media tile is tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    /// Sends `ActionBody` back as a text message.
    Reply,
    /// Opens `ActionBody` as a URL.
    OpenUrl,
    /// Not interactive.
    None,
}

/// Button label size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    Regular,
    Large,
}

/// A custom keyboard shown under a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type", rename = "keyboard", rename_all = "PascalCase")]
pub struct Keyboard {
    /// Whether Viber should use its default keyboard height.
    pub default_height: bool,
    /// Buttons in display order.
    pub buttons: Vec<KeyboardButton>,
}

impl Keyboard {
    /// Creates a default-height keyboard from the given buttons.
    pub fn new(buttons: Vec<KeyboardButton>) -> Self {
        Self {
            default_height: true,
            buttons,
        }
    }
}

/// One keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyboardButton {
    pub action_type: ActionType,
    pub action_body: String,
    pub text: String,
    pub text_size: TextSize,
}

impl KeyboardButton {
    /// Creates a large reply button whose label is also its reply body.
    pub fn reply(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            action_type: ActionType::Reply,
            action_body: label.clone(),
            text: label,
            text_size: TextSize::Large,
        }
    }
}

// ============================================================================
// Rich Media
// ============================================================================

/// Vertical text alignment inside a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Horizontal text alignment inside a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// A grid of tiles rendered as a swipeable carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type", rename = "rich_media", rename_all = "PascalCase")]
pub struct RichMedia {
    pub buttons_group_columns: u8,
    pub buttons_group_rows: u8,
    pub bg_color: String,
    /// Tiles in layout order.
    pub buttons: Vec<Tile>,
}

/// One positioned cell of a rich media grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tile {
    Image(ImageTile),
    Button(ButtonTile),
    Text(TextTile),
}

impl Tile {
    /// Height of the tile in grid rows.
    pub fn rows(&self) -> u8 {
        match self {
            Tile::Image(t) => t.rows,
            Tile::Text(t) => t.rows,
            Tile::Button(t) => t.rows,
        }
    }

    /// Width of the tile in grid columns.
    pub fn columns(&self) -> u8 {
        match self {
            Tile::Image(t) => t.columns,
            Tile::Text(t) => t.columns,
            Tile::Button(t) => t.columns,
        }
    }
}

/// A non-interactive image cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageTile {
    pub rows: u8,
    pub columns: u8,
    pub action_type: ActionType,
    pub image: String,
}

/// A non-interactive text cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextTile {
    pub rows: u8,
    pub columns: u8,
    pub action_type: ActionType,
    pub text: String,
    pub text_v_align: VerticalAlign,
    pub text_h_align: HorizontalAlign,
}

/// A tappable button cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ButtonTile {
    pub rows: u8,
    pub columns: u8,
    pub action_type: ActionType,
    pub action_body: String,
    pub text: String,
    pub bg_color: String,
    pub text_size: TextSize,
    pub text_v_align: VerticalAlign,
    pub text_h_align: HorizontalAlign,
}

// ============================================================================
// Platform Message
// ============================================================================

/// A Viber message ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformMessage {
    Text(TextMessage),
    Picture(PictureMessage),
    Video(VideoMessage),
    Url(UrlMessage),
    File(FileMessage),
    RichMedia(RichMediaMessage),
    Sticker(StickerMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
    #[serde(flatten)]
    pub meta: MessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureMessage {
    pub media: String,
    /// Caption.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(flatten)]
    pub meta: MessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMessage {
    pub media: String,
    pub size: u64,
    pub duration: u64,
    /// Caption.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(flatten)]
    pub meta: MessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMessage {
    pub media: String,
    #[serde(flatten)]
    pub meta: MessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMessage {
    pub media: String,
    pub size: u64,
    pub file_name: String,
    #[serde(flatten)]
    pub meta: MessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichMediaMessage {
    pub rich_media: RichMedia,
    /// Fallback text for clients that cannot render rich media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(flatten)]
    pub meta: MessageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerMessage {
    pub sticker_id: u64,
    #[serde(flatten)]
    pub meta: MessageMeta,
}

impl PlatformMessage {
    /// Creates a text message with an optional keyboard.
    pub fn text(text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        PlatformMessage::Text(TextMessage {
            text: text.into(),
            keyboard,
            meta: MessageMeta::now(),
        })
    }

    /// Creates a captioned picture message.
    pub fn picture(media: impl Into<String>, caption: impl Into<String>) -> Self {
        PlatformMessage::Picture(PictureMessage {
            media: media.into(),
            text: caption.into(),
            thumbnail: None,
            meta: MessageMeta::now(),
        })
    }

    /// Creates a captioned video message with placeholder size and duration.
    pub fn video(media: impl Into<String>, caption: impl Into<String>) -> Self {
        PlatformMessage::Video(VideoMessage {
            media: media.into(),
            size: DEFAULT_MEDIA_SIZE,
            duration: DEFAULT_VIDEO_DURATION,
            text: caption.into(),
            thumbnail: None,
            meta: MessageMeta::now(),
        })
    }

    /// Creates a link message.
    pub fn url(media: impl Into<String>) -> Self {
        PlatformMessage::Url(UrlMessage {
            media: media.into(),
            meta: MessageMeta::now(),
        })
    }

    /// Creates a file message with a placeholder size.
    pub fn file(media: impl Into<String>, file_name: impl Into<String>) -> Self {
        PlatformMessage::File(FileMessage {
            media: media.into(),
            size: DEFAULT_MEDIA_SIZE,
            file_name: file_name.into(),
            meta: MessageMeta::now(),
        })
    }

    /// Creates a rich media message.
    pub fn rich_media(rich_media: RichMedia) -> Self {
        PlatformMessage::RichMedia(RichMediaMessage {
            rich_media,
            alt_text: None,
            meta: MessageMeta::now(),
        })
    }

    /// Creates a sticker message.
    pub fn sticker(sticker_id: u64) -> Self {
        PlatformMessage::Sticker(StickerMessage {
            sticker_id,
            meta: MessageMeta::now(),
        })
    }

    /// Returns the wire `type` tag of this message.
    pub fn message_type(&self) -> &'static str {
        match self {
            PlatformMessage::Text(_) => "text",
            PlatformMessage::Picture(_) => "picture",
            PlatformMessage::Video(_) => "video",
            PlatformMessage::Url(_) => "url",
            PlatformMessage::File(_) => "file",
            PlatformMessage::RichMedia(_) => "rich_media",
            PlatformMessage::Sticker(_) => "sticker",
        }
    }
}

impl fmt::Display for PlatformMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformMessage::Text(m) => write!(f, "{}", m.text),
            PlatformMessage::Picture(m) => write!(f, "[picture:{}]", m.media),
            PlatformMessage::Video(m) => write!(f, "[video:{}]", m.media),
            PlatformMessage::Url(m) => write!(f, "[url:{}]", m.media),
            PlatformMessage::File(m) => write!(f, "[file:{}]", m.file_name),
            PlatformMessage::RichMedia(m) => {
                write!(f, "[rich_media:{} tiles]", m.rich_media.buttons.len())
            }
            PlatformMessage::Sticker(m) => write!(f, "[sticker:{}]", m.sticker_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_with_keyboard_serialize() {
        let keyboard = Keyboard::new(vec![KeyboardButton::reply("Yes")]);
        let message = PlatformMessage::text("Continue?", Some(keyboard));
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "text");
        assert_eq!(value["text"], "Continue?");
        assert_eq!(value["tracking_data"], "");
        assert!(value["timestamp"].as_u64().unwrap() > 0);
        assert_eq!(
            value["keyboard"],
            json!({
                "Type": "keyboard",
                "DefaultHeight": true,
                "Buttons": [{
                    "ActionType": "reply",
                    "ActionBody": "Yes",
                    "Text": "Yes",
                    "TextSize": "large"
                }]
            })
        );
    }

    #[test]
    fn test_text_without_keyboard_omits_field() {
        let value = serde_json::to_value(PlatformMessage::text("", None)).unwrap();
        assert!(value.get("keyboard").is_none());
        assert_eq!(value["text"], "");
    }

    #[test]
    fn test_rich_media_serialize() {
        let rich_media = RichMedia {
            buttons_group_columns: 6,
            buttons_group_rows: 6,
            bg_color: "#C5C5C5".to_string(),
            buttons: vec![
                Tile::Image(ImageTile {
                    rows: 3,
                    columns: 6,
                    action_type: ActionType::None,
                    image: "http://x/a.png".to_string(),
                }),
                Tile::Button(ButtonTile {
                    rows: 1,
                    columns: 6,
                    action_type: ActionType::OpenUrl,
                    action_body: "http://x".to_string(),
                    text: "Open".to_string(),
                    bg_color: "#7536D1".to_string(),
                    text_size: TextSize::Large,
                    text_v_align: VerticalAlign::Middle,
                    text_h_align: HorizontalAlign::Center,
                }),
            ],
        };
        let value = serde_json::to_value(PlatformMessage::rich_media(rich_media)).unwrap();

        assert_eq!(value["type"], "rich_media");
        let rich = &value["rich_media"];
        assert_eq!(rich["Type"], "rich_media");
        assert_eq!(rich["ButtonsGroupColumns"], 6);
        assert_eq!(rich["BgColor"], "#C5C5C5");
        assert_eq!(rich["Buttons"][0]["ActionType"], "none");
        assert_eq!(rich["Buttons"][0]["Image"], "http://x/a.png");
        assert_eq!(rich["Buttons"][1]["ActionType"], "open-url");
        assert_eq!(rich["Buttons"][1]["TextVAlign"], "middle");
        assert_eq!(rich["Buttons"][1]["TextHAlign"], "center");
    }

    #[test]
    fn test_media_placeholders() {
        match PlatformMessage::video("http://x/v.mp4", "clip") {
            PlatformMessage::Video(v) => {
                assert_eq!(v.size, DEFAULT_MEDIA_SIZE);
                assert_eq!(v.duration, DEFAULT_VIDEO_DURATION);
                assert_eq!(v.text, "clip");
            }
            other => panic!("Expected Video, got {other:?}"),
        }

        let value = serde_json::to_value(PlatformMessage::file("http://x/f.pdf", "f.pdf")).unwrap();
        assert_eq!(value["type"], "file");
        assert_eq!(value["size"], DEFAULT_MEDIA_SIZE);
        assert_eq!(value["file_name"], "f.pdf");
    }

    #[test]
    fn test_message_type_and_display() {
        let sticker = PlatformMessage::sticker(40133);
        assert_eq!(sticker.message_type(), "sticker");
        assert_eq!(sticker.to_string(), "[sticker:40133]");
        assert_eq!(PlatformMessage::url("http://x").to_string(), "[url:http://x]");
    }
}
