//! Ordered delivery of converted messages.
//!
//! One envelope converts to a short sequence of Viber messages that only
//! make sense in order (a caption before its link, a header before its
//! carousel). The [`Sequencer`] sends them one at a time and stops at the
//! first failure.
//!
//! Batches submitted from different tasks share a single lane: a batch
//! holds it until every envelope in it has completed or failed, and
//! waiting batches acquire it in arrival order.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use vibra_core::{DeliveryError, DeliveryReport, DeliveryResult, Envelope};

use crate::address::recipient_of;
use crate::convert::convert;
use crate::model::event::UserProfile;
use crate::model::message::PlatformMessage;
use crate::transport::PlatformTransport;

/// Serializes outbound delivery onto a [`PlatformTransport`].
pub struct Sequencer {
    transport: Arc<dyn PlatformTransport>,
    lane: Mutex<()>,
}

impl Sequencer {
    pub fn new(transport: Arc<dyn PlatformTransport>) -> Self {
        Self {
            transport,
            lane: Mutex::new(()),
        }
    }

    /// Delivers a batch of envelopes in order.
    ///
    /// Each envelope gets its own entry in the report. A failed envelope
    /// does not stop the ones after it.
    pub async fn deliver_all(&self, envelopes: &[Envelope]) -> DeliveryReport {
        let _lane = self.lane.lock().await;

        let mut report = DeliveryReport::new();
        for (position, envelope) in envelopes.iter().enumerate() {
            let result = self.guarded(envelope).await;
            if let Err(e) = &result {
                warn!(position, error = %e, "Envelope delivery failed");
            }
            report.push(result);
        }
        report
    }

    /// Delivers a single envelope, returning the number of messages sent.
    pub async fn deliver(&self, envelope: &Envelope) -> DeliveryResult<usize> {
        let _lane = self.lane.lock().await;
        self.guarded(envelope).await
    }

    /// Sends an already converted sequence to `recipient`.
    ///
    /// # Errors
    /// Returns [`DeliveryError::Transport`] carrying the position of the
    /// first message that failed; later messages are not attempted.
    pub async fn deliver_sequence(
        &self,
        recipient: &UserProfile,
        messages: &[PlatformMessage],
    ) -> DeliveryResult<usize> {
        let _lane = self.lane.lock().await;
        AssertUnwindSafe(self.send_sequence(recipient, messages))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(DeliveryError::Panicked(panic_message(panic.as_ref()))))
    }

    async fn guarded(&self, envelope: &Envelope) -> DeliveryResult<usize> {
        AssertUnwindSafe(self.deliver_envelope(envelope))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(DeliveryError::Panicked(panic_message(panic.as_ref()))))
    }

    async fn deliver_envelope(&self, envelope: &Envelope) -> DeliveryResult<usize> {
        if envelope.is_typing() {
            debug!("Typing indicator has no Viber equivalent, skipping");
            return Ok(0);
        }

        let address = envelope.address().ok_or(DeliveryError::MissingAddress)?;
        let recipient = recipient_of(address)?;
        let conversion = convert(envelope);
        if !conversion.diagnostics.is_empty() {
            debug!(
                recipient = %recipient.id,
                skipped = conversion.diagnostics.len(),
                "Sending carousel without skipped cards"
            );
        }

        self.send_sequence(&recipient, &conversion.messages).await
    }

    async fn send_sequence(
        &self,
        recipient: &UserProfile,
        messages: &[PlatformMessage],
    ) -> DeliveryResult<usize> {
        for (index, message) in messages.iter().enumerate() {
            debug!(
                recipient = %recipient.id,
                index,
                message_type = message.message_type(),
                "Sending message"
            );
            self.transport
                .send_message(recipient, message)
                .await
                .map_err(|source| DeliveryError::Transport { index, source })?;
        }
        Ok(messages.len())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
