//! Outbound conversion: framework envelopes to Viber messages.
//!
//! One envelope becomes an ordered, never-empty list of [`PlatformMessage`]s.
//! Dispatch looks at, in order:
//!
//! 1. a sticker source event, which replaces everything else;
//! 2. the content type of the first attachment;
//! 3. otherwise the envelope text alone.
//!
//! Carousels of hero cards are laid out on Viber's 6×6 rich media grid:
//!
//! ```text
//! ┌─────────┬─────────┐
//! │  image  │  image  │  3 rows, 6 / image count columns each
//! ├─────────┴─────────┤
//! │ title / subtitle  │  2 rows, full width
//! ├──────┬──────┬─────┤
//! │ btn  │ btn  │ btn │  1 row, 6 / button count columns each
//! └──────┴──────┴─────┘
//! ```

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};
use vibra_core::{Attachment, AttachmentLayout, Envelope, SourceEvent};

use crate::model::card::{CardAction, HeroCard, KeyboardCard};
use crate::model::message::{
    ActionType, ButtonTile, HorizontalAlign, ImageTile, Keyboard, KeyboardButton, PlatformMessage,
    RichMedia, TextSize, TextTile, Tile, VerticalAlign,
};

/// Content type of keyboard attachments.
pub const KEYBOARD_CONTENT_TYPE: &str = "application/vnd.microsoft.keyboard";

/// Content type of hero card attachments.
pub const HERO_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.hero";

/// Rows and columns of the rich media grid.
const GRID_SIZE: u8 = 6;
const IMAGE_ROWS: u8 = 3;
const TEXT_ROWS: u8 = 2;
const BUTTON_ROWS: u8 = 1;

const RICH_MEDIA_BG_COLOR: &str = "#C5C5C5";
const BUTTON_BG_COLOR: &str = "#7536D1";

// ============================================================================
// Content Kind
// ============================================================================

/// The translation rule an attachment falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Keyboard,
    HeroCard,
    Video,
    /// Links and animated images, sent as a URL message.
    Link,
    /// PNG and JPEG images.
    StillImage,
    /// Anything else, sent as a file.
    Other,
}

impl ContentKind {
    /// Classifies an attachment content type.
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type {
            KEYBOARD_CONTENT_TYPE => ContentKind::Keyboard,
            HERO_CARD_CONTENT_TYPE => ContentKind::HeroCard,
            "video/mp4" => ContentKind::Video,
            "url" | "image/gif" => ContentKind::Link,
            "image/png" | "image/jpeg" => ContentKind::StillImage,
            _ => ContentKind::Other,
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// The part of a carousel card that was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCardField {
    /// The content is not a card object.
    Content,
    /// The first button declares no action type.
    ButtonType,
    /// The first image has no URL.
    ImageUrl,
}

impl fmt::Display for MissingCardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingCardField::Content => f.write_str("card content"),
            MissingCardField::ButtonType => f.write_str("buttons.type"),
            MissingCardField::ImageUrl => f.write_str("images.url"),
        }
    }
}

/// A carousel card that was skipped because it lacks required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hero card {index} ('{title}') is missing {missing}")]
pub struct StructuralAttachmentError {
    /// Position of the card in the attachment list.
    pub index: usize,
    /// Card title, empty if it had none.
    pub title: String,
    pub missing: MissingCardField,
}

/// Result of converting one envelope.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// Messages to send, in order. Never empty.
    pub messages: Vec<PlatformMessage>,
    /// Cards skipped while building a carousel.
    pub diagnostics: Vec<StructuralAttachmentError>,
}

impl Conversion {
    fn of(messages: Vec<PlatformMessage>) -> Self {
        Self {
            messages,
            diagnostics: Vec::new(),
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts an envelope into the Viber messages that represent it.
pub fn convert(envelope: &Envelope) -> Conversion {
    if let Some(sticker_id) = envelope.source_event().and_then(SourceEvent::as_sticker) {
        return Conversion::of(vec![PlatformMessage::sticker(sticker_id)]);
    }

    let Some(attachment) = envelope.attachments().first() else {
        return plain_text(envelope);
    };

    let kind = ContentKind::from_content_type(&attachment.content_type);
    debug!(content_type = %attachment.content_type, ?kind, "Converting attachment");

    let text = envelope.text();
    let url = attachment.url().unwrap_or_default();

    match kind {
        ContentKind::Keyboard => {
            Conversion::of(vec![PlatformMessage::text(text, keyboard_for(attachment))])
        }
        ContentKind::HeroCard => match envelope.attachment_layout() {
            Some(AttachmentLayout::Carousel) => carousel(envelope),
            layout => {
                debug!(
                    layout = layout.map(AttachmentLayout::as_str),
                    "Hero card outside a carousel, sending text only"
                );
                plain_text(envelope)
            }
        },
        ContentKind::Video => Conversion::of(vec![PlatformMessage::video(url, text)]),
        ContentKind::Link => {
            let mut messages = Vec::with_capacity(2);
            if !text.is_empty() {
                messages.push(PlatformMessage::text(text, None));
            }
            messages.push(PlatformMessage::url(url));
            Conversion::of(messages)
        }
        ContentKind::StillImage => Conversion::of(vec![PlatformMessage::picture(url, text)]),
        ContentKind::Other => Conversion::of(vec![PlatformMessage::file(
            url,
            attachment.name.clone().unwrap_or_default(),
        )]),
    }
}

/// Builds a text message with a single reply button when `button` is given.
pub fn text_message(text: impl Into<String>, button: Option<&str>) -> PlatformMessage {
    let keyboard = button.map(|label| Keyboard::new(vec![KeyboardButton::reply(label)]));
    PlatformMessage::text(text, keyboard)
}

fn plain_text(envelope: &Envelope) -> Conversion {
    Conversion::of(vec![PlatformMessage::text(envelope.text(), None)])
}

fn keyboard_for(attachment: &Attachment) -> Option<Keyboard> {
    let card: KeyboardCard = serde_json::from_value(attachment.content.clone()).ok()?;
    let buttons: Vec<KeyboardButton> = card
        .buttons
        .iter()
        .map(|b| {
            KeyboardButton::reply(b.title.as_deref().or(b.value.as_deref()).unwrap_or_default())
        })
        .collect();

    if buttons.is_empty() {
        None
    } else {
        Some(Keyboard::new(buttons))
    }
}

fn carousel(envelope: &Envelope) -> Conversion {
    let mut tiles = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, attachment) in envelope.attachments().iter().enumerate() {
        match card_tiles(index, attachment) {
            Ok(card) => tiles.extend(card),
            Err(e) => {
                warn!(error = %e, "Skipping carousel card");
                diagnostics.push(e);
            }
        }
    }

    let rich_media = RichMedia {
        buttons_group_columns: GRID_SIZE,
        buttons_group_rows: GRID_SIZE,
        bg_color: RICH_MEDIA_BG_COLOR.to_string(),
        buttons: tiles,
    };

    let mut messages = Vec::with_capacity(2);
    if !envelope.text().is_empty() {
        messages.push(PlatformMessage::text(envelope.text(), None));
    }
    messages.push(PlatformMessage::rich_media(rich_media));

    Conversion {
        messages,
        diagnostics,
    }
}

fn card_tiles(
    index: usize,
    attachment: &Attachment,
) -> Result<Vec<Tile>, StructuralAttachmentError> {
    let Some(card) = HeroCard::from_content(&attachment.content) else {
        return Err(StructuralAttachmentError {
            index,
            title: String::new(),
            missing: MissingCardField::Content,
        });
    };

    let missing = if !card.has_button_type() {
        Some(MissingCardField::ButtonType)
    } else if !card.has_image_url() {
        Some(MissingCardField::ImageUrl)
    } else {
        None
    };
    if let Some(missing) = missing {
        return Err(StructuralAttachmentError {
            index,
            title: card.title.clone().unwrap_or_default(),
            missing,
        });
    }

    let images: Vec<&str> = card.image_urls().collect();
    let actions = card.actions();
    let mut tiles = Vec::with_capacity(images.len() + actions.len() + 1);

    let image_columns = share_of_grid(images.len());
    tiles.extend(images.into_iter().map(|url| {
        Tile::Image(ImageTile {
            rows: IMAGE_ROWS,
            columns: image_columns,
            action_type: ActionType::None,
            image: url.to_string(),
        })
    }));

    tiles.push(Tile::Text(TextTile {
        rows: TEXT_ROWS,
        columns: GRID_SIZE,
        action_type: ActionType::None,
        text: card_markup(&card),
        text_v_align: VerticalAlign::Middle,
        text_h_align: HorizontalAlign::Left,
    }));

    let button_columns = share_of_grid(actions.len());
    let text_size = if actions.len() == 1 {
        TextSize::Large
    } else {
        TextSize::Small
    };
    tiles.extend(
        actions
            .into_iter()
            .map(|action| button_tile(action, button_columns, text_size)),
    );

    Ok(tiles)
}

fn button_tile(action: &CardAction, columns: u8, text_size: TextSize) -> Tile {
    let action_type = if action.is_reply() {
        ActionType::Reply
    } else {
        ActionType::OpenUrl
    };
    Tile::Button(ButtonTile {
        rows: BUTTON_ROWS,
        columns,
        action_type,
        action_body: action.value.clone().unwrap_or_default(),
        text: format!(
            r##"<b><font size="4" color="#FFFFFF">{}</font></b>"##,
            action.title.as_deref().unwrap_or_default()
        ),
        bg_color: BUTTON_BG_COLOR.to_string(),
        text_size,
        text_v_align: VerticalAlign::Middle,
        text_h_align: HorizontalAlign::Center,
    })
}

/// Title, subtitle and body stacked in decreasing emphasis.
fn card_markup(card: &HeroCard) -> String {
    let mut markup = String::new();
    if let Some(title) = card.title.as_deref().filter(|s| !s.is_empty()) {
        markup.push_str(&format!(
            r##"<font size="4" color="#323232"><b>{title}</b></font>"##
        ));
    }
    if let Some(subtitle) = card.subtitle.as_deref().filter(|s| !s.is_empty()) {
        markup.push_str(&format!(
            r##"<font size="2" color="#4C4C4C"><br>{subtitle}</font>"##
        ));
    }
    if let Some(text) = card.text.as_deref().filter(|s| !s.is_empty()) {
        markup.push_str(&format!(
            r##"<font size="1" color="#969696"><br>{text}</font>"##
        ));
    }
    markup
}

/// Columns each of `count` side-by-side tiles gets; at least one.
fn share_of_grid(count: usize) -> u8 {
    let count = u8::try_from(count).unwrap_or(u8::MAX).max(1);
    (GRID_SIZE / count).max(1)
}
