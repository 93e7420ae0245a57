//! Mapping between Viber user ids and framework addresses.
//!
//! Viber ids are base64-like strings (`01234567890A=`) that may contain
//! characters the framework treats specially, so they are percent-encoded
//! before being used as `user.id` and `conversation.id`.

use vibra_core::{Account, Address, CodecError, CodecResult, Conversation};

use crate::config::ViberConfig;
use crate::model::event::UserProfile;

/// Percent-encodes a raw Viber user id.
pub fn encode_identifier(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Reverses [`encode_identifier`].
///
/// # Errors
///
/// Returns [`CodecError::MalformedIdentifier`] if a `%` is not followed by
/// two hex digits or the decoded bytes are not valid UTF-8.
pub fn decode_identifier(encoded: &str) -> CodecResult<String> {
    let bytes = encoded.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(CodecError::malformed(
                encoded,
                format!("invalid escape at byte {i}"),
            ));
        }
    }

    urlencoding::decode(encoded)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| CodecError::malformed(encoded, e.to_string()))
}

/// Builds the framework address for a message from `sender`.
pub fn address_for(config: &ViberConfig, sender: &UserProfile) -> Address {
    let id = encode_identifier(&sender.id);
    Address {
        channel_id: config.channel_id.clone(),
        user: Account::new(id.clone(), sender.name.clone()),
        bot: Account::new(config.bot_id.clone(), config.name.clone()),
        conversation: Conversation { id },
    }
}

/// Resolves the Viber recipient of an outbound address.
///
/// # Errors
///
/// Fails if `address.user.id` is not a valid encoded identifier.
pub fn recipient_of(address: &Address) -> CodecResult<UserProfile> {
    let id = decode_identifier(&address.user.id)?;
    Ok(UserProfile::new(id, address.user.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let ids = [
            "01234567890A=",
            "a+b/c==",
            "100%",
            "%41 already looks encoded",
            "slashes/and?query=1&x",
            "ünïcødé 用户 🚀",
            "",
        ];
        for raw in ids {
            let encoded = encode_identifier(raw);
            assert!(!encoded.contains('/'), "{encoded}");
            assert_eq!(decode_identifier(&encoded).unwrap(), raw);
        }
    }

    #[test]
    fn test_encode_reserved() {
        assert_eq!(encode_identifier("01234567890A="), "01234567890A%3D");
        assert_eq!(encode_identifier("a+b/c"), "a%2Bb%2Fc");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for bad in ["%", "abc%4", "%zz", "ok%2"] {
            assert!(
                matches!(
                    decode_identifier(bad),
                    Err(CodecError::MalformedIdentifier { .. })
                ),
                "{bad}"
            );
        }
        // Valid escapes that do not form UTF-8.
        assert!(decode_identifier("%FF%FE").is_err());
    }

    #[test]
    fn test_address_for_sender() {
        let config = ViberConfig::named("Shop");
        let sender = UserProfile::new("01234567890A=", "John");
        let address = address_for(&config, &sender);

        assert_eq!(address.channel_id, "kik");
        assert_eq!(address.user.id, "01234567890A%3D");
        assert_eq!(address.user.name, "John");
        assert_eq!(address.conversation.id, address.user.id);
        assert_eq!(address.bot.id, "viberbot");
        assert_eq!(address.bot.name, "Shop");

        let recipient = recipient_of(&address).unwrap();
        assert_eq!(recipient, sender);
    }
}
