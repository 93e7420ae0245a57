//! The platform send primitive.
//!
//! The adapter never talks HTTP itself. It hands each converted message to a
//! [`PlatformTransport`], which in production wraps a Viber REST client and
//! in tests records what it was asked to send.

use async_trait::async_trait;
use vibra_core::{TransportError, TransportResult};

use crate::model::event::UserProfile;
use crate::model::message::PlatformMessage;

// =============================================================================
// PlatformTransport trait
// =============================================================================

/// Sends one Viber message to one user.
///
/// The sequencer calls this once per message and waits for completion
/// before sending the next, so implementations do not need to preserve
/// ordering themselves.
#[async_trait]
pub trait PlatformTransport: Send + Sync {
    /// Sends `message` to `recipient`.
    ///
    /// # Errors
    /// Returns a [`TransportError`] if the message could not be delivered.
    /// The remaining messages of the same envelope are then not sent.
    async fn send_message(
        &self,
        recipient: &UserProfile,
        message: &PlatformMessage,
    ) -> TransportResult<()>;
}

// =============================================================================
// DisabledTransport
// =============================================================================

/// [`PlatformTransport`] for connectors that only receive.
///
/// Every send fails with [`TransportError::NotConnected`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTransport;

#[async_trait]
impl PlatformTransport for DisabledTransport {
    async fn send_message(
        &self,
        _recipient: &UserProfile,
        _message: &PlatformMessage,
    ) -> TransportResult<()> {
        Err(TransportError::NotConnected)
    }
}
