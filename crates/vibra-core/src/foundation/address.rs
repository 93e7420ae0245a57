//! Conversation addressing.
//!
//! An [`Address`] tells the framework which channel, user, bot and
//! conversation a message belongs to. Connectors build one per inbound
//! message and the framework hands it back unchanged on replies.

use serde::{Deserialize, Serialize};

/// A participant in a conversation (either the user or the bot).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    /// Channel-scoped identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Account {
    /// Creates an account from an id and a display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A conversation reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Channel-scoped conversation identifier.
    pub id: String,
}

/// The addressing tuple attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Channel tag the framework uses to pick a connector.
    pub channel_id: String,
    /// The human side of the conversation.
    pub user: Account,
    /// The bot side of the conversation.
    pub bot: Account,
    /// The conversation itself.
    pub conversation: Conversation,
}

impl Address {
    /// Returns a copy of this address pointing at a different conversation.
    pub fn with_conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation = Conversation { id: id.into() };
        self
    }
}
