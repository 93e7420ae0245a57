//! Framework card content as it arrives in outbound attachments.
//!
//! Hero card buttons come in two shapes depending on which framework
//! helper built them:
//!
//! ```json
//! {"type": "imBack", "title": "Yes", "value": "yes"}
//! [[{"data": {"type": "imBack", "title": "Yes", "value": "yes"}}]]
//! ```
//!
//! Both are accepted and resolved to a [`CardAction`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content of an `application/vnd.microsoft.card.hero` attachment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroCard {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text: Option<String>,
    pub images: Vec<CardImage>,
    pub buttons: Vec<CardButton>,
}

impl HeroCard {
    /// Parses card content, treating anything that is not a card object as empty.
    pub fn from_content(content: &Value) -> Option<Self> {
        serde_json::from_value(content.clone()).ok()
    }

    /// Resolves every button to its action, dropping empty nested entries.
    pub fn actions(&self) -> Vec<&CardAction> {
        self.buttons.iter().filter_map(CardButton::action).collect()
    }

    /// Returns true if the first button declares an action type.
    pub fn has_button_type(&self) -> bool {
        self.buttons
            .first()
            .and_then(CardButton::action)
            .and_then(|a| a.kind.as_deref())
            .is_some_and(|kind| !kind.is_empty())
    }

    /// Returns true if the first image has a URL.
    pub fn has_image_url(&self) -> bool {
        self.images
            .first()
            .and_then(|image| image.url.as_deref())
            .is_some_and(|url| !url.is_empty())
    }

    /// Image URLs in order, one per image; empty for images without one.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.images
            .iter()
            .map(|image| image.url.as_deref().unwrap_or_default())
    }
}

/// An image on a card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardImage {
    pub url: Option<String>,
}

/// A card button in either of its accepted shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardButton {
    /// `[[{"data": {...}}]]`
    Nested(Vec<Vec<NestedAction>>),
    /// `{"type": ..., "title": ..., "value": ...}`
    Flat(CardAction),
}

impl CardButton {
    /// Resolves the action this button triggers.
    pub fn action(&self) -> Option<&CardAction> {
        match self {
            CardButton::Flat(action) => Some(action),
            CardButton::Nested(rows) => rows.first()?.first().map(|n| &n.data),
        }
    }
}

/// Wrapper used by the nested button shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedAction {
    pub data: CardAction,
}

/// A button action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardAction {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub value: Option<String>,
}

impl CardAction {
    /// Returns true for actions that post their value back as a message.
    pub fn is_reply(&self) -> bool {
        matches!(self.kind.as_deref(), Some("reply" | "imBack"))
    }
}

/// Content of an `application/vnd.microsoft.keyboard` attachment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardCard {
    pub buttons: Vec<CardAction>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_flat_buttons() {
        let card = HeroCard::from_content(&json!({
            "title": "Shoes",
            "images": [{"url": "http://x/a.png"}],
            "buttons": [
                {"type": "imBack", "title": "Buy", "value": "buy"},
                {"type": "openUrl", "title": "Site", "value": "http://x"}
            ]
        }))
        .unwrap();

        assert!(card.has_button_type());
        assert!(card.has_image_url());
        let actions = card.actions();
        assert_eq!(actions.len(), 2);
        assert!(actions[0].is_reply());
        assert!(!actions[1].is_reply());
        assert_eq!(actions[1].value.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_nested_buttons() {
        let card = HeroCard::from_content(&json!({
            "images": [{"url": "http://x/a.png"}],
            "buttons": [
                [[{"data": {"type": "reply", "title": "One", "value": "1"}}]],
                [[{"data": {"type": "reply", "title": "Two", "value": "2"}}]]
            ]
        }))
        .unwrap();

        assert!(card.has_button_type());
        let titles: Vec<_> = card
            .actions()
            .iter()
            .filter_map(|a| a.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_missing_markers() {
        let card = HeroCard::from_content(&json!({
            "title": "Bare",
            "images": [{}],
            "buttons": [{"title": "No type"}]
        }))
        .unwrap();

        assert!(!card.has_button_type());
        assert!(!card.has_image_url());
        assert!(!HeroCard::default().has_button_type());
    }

    #[test]
    fn test_image_urls_keep_every_image() {
        let card = HeroCard::from_content(&json!({
            "images": [{"url": "http://x/a.png"}, {"alt": "no url"}, {"url": "http://x/c.png"}]
        }))
        .unwrap();

        let urls: Vec<_> = card.image_urls().collect();
        assert_eq!(urls, vec!["http://x/a.png", "", "http://x/c.png"]);
    }

    #[test]
    fn test_non_object_content() {
        assert!(HeroCard::from_content(&json!("just a string")).is_none());
    }
}
