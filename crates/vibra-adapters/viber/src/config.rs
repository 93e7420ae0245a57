//! Configuration types for the Viber adapter.
//!
//! This section is read from the `viber` table of `vibra.toml`:
//!
//! ```toml
//! [viber]
//! name = "Vibra"
//! auth_token = "445da6az1s345z78-dazcczb2542zv51a-e0vc5fva17480im9"
//! # 720x720, <100kB
//! avatar_url = "https://example.com/avatar.jpg"
//! ```
//!
//! `bot_id` and `channel_id` rarely need changing: the framework keys user
//! data by channel, and `kik` is a channel it already knows supports buttons.

use serde::{Deserialize, Serialize};

/// Channel tag reported to the framework.
pub const DEFAULT_CHANNEL_ID: &str = "kik";

/// Bot identifier placed in every inbound address.
pub const DEFAULT_BOT_ID: &str = "viberbot";

/// Viber adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViberConfig {
    /// Bot display name.
    pub name: String,

    /// Viber authentication token, handed to the transport.
    pub auth_token: Option<String>,

    /// Bot avatar URL.
    pub avatar_url: Option<String>,

    /// Bot identifier placed in inbound addresses.
    pub bot_id: String,

    /// Channel tag placed in inbound addresses.
    pub channel_id: String,
}

impl Default for ViberConfig {
    fn default() -> Self {
        Self {
            name: "Vibra".to_string(),
            auth_token: None,
            avatar_url: None,
            bot_id: DEFAULT_BOT_ID.to_string(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
        }
    }
}

impl ViberConfig {
    /// Creates a configuration with the given bot display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_config() {
        let config: ViberConfig = serde_json::from_str(r#"{"name": "Shop", "auth_token": "t"}"#)
            .unwrap();

        assert_eq!(config.name, "Shop");
        assert_eq!(config.auth_token.as_deref(), Some("t"));
        assert_eq!(config.bot_id, DEFAULT_BOT_ID);
        assert_eq!(config.channel_id, DEFAULT_CHANNEL_ID);
    }
}
