//! The Viber [`Connector`] implementation.
//!
//! [`ViberConnector`] ties the pieces together:
//!
//! ```text
//! webhook body ─► handle_callback ─► Normalizer ─► EventHandler
//!                                                       │
//!      PlatformTransport ◄─ Sequencer ◄─ convert ◄─ send ◄┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};
use vibra_core::{Address, AdapterResult, Connector, DeliveryReport, Envelope, EventHandler};

use crate::config::ViberConfig;
use crate::convert;
use crate::model::event::{Callback, MessageEvent, parse_callback};
use crate::model::message::PlatformMessage;
use crate::normalize::Normalizer;
use crate::sequencer::Sequencer;
use crate::transport::PlatformTransport;

/// Conversation id assigned by [`Connector::start_conversation`].
pub const STARTED_CONVERSATION_ID: &str = "ViberConversationId";

/// Connects a bot framework to Viber.
pub struct ViberConnector {
    config: ViberConfig,
    normalizer: Normalizer,
    sequencer: Sequencer,
    handler: RwLock<Option<EventHandler>>,
}

impl ViberConnector {
    /// Creates a connector that sends through `transport`.
    pub fn new(config: ViberConfig, transport: Arc<dyn PlatformTransport>) -> Self {
        Self {
            normalizer: Normalizer::new(config.clone()),
            sequencer: Sequencer::new(transport),
            handler: RwLock::new(None),
            config,
        }
    }

    /// Returns the adapter configuration.
    pub fn config(&self) -> &ViberConfig {
        &self.config
    }

    /// Handles a raw webhook body.
    ///
    /// Returns the envelope dispatched for `message` callbacks and `None`
    /// for every other event.
    ///
    /// # Errors
    /// Returns [`AdapterError::Parse`](vibra_core::AdapterError::Parse) if
    /// the body is not a valid callback.
    pub fn handle_callback(&self, body: &[u8]) -> AdapterResult<Option<Envelope>> {
        match parse_callback(body)? {
            Callback::Message(event) => Ok(Some(self.process_message(&event))),
            Callback::Other { event, timestamp } => {
                debug!(event = %event, ?timestamp, "Ignoring non-message callback");
                Ok(None)
            }
        }
    }

    /// Normalizes a received message and passes it to the registered handler.
    pub fn process_message(&self, event: &MessageEvent) -> Envelope {
        let envelope = self.normalizer.normalize(event);

        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => handler(vec![envelope.clone()]),
            None => {
                warn!(sender = %event.sender.id, "No event handler registered, dropping message")
            }
        }

        envelope
    }

    /// Builds a text message, with a single reply button if `button_hint` is given.
    pub fn text_message(text: impl Into<String>, button_hint: Option<&str>) -> PlatformMessage {
        convert::text_message(text, button_hint)
    }
}

#[async_trait]
impl Connector for ViberConnector {
    fn on_event(&self, handler: EventHandler) {
        *self.handler.write() = Some(handler);
    }

    async fn send(&self, envelopes: Vec<Envelope>) -> DeliveryReport {
        self.sequencer.deliver_all(&envelopes).await
    }

    fn start_conversation(&self, address: Address) -> Address {
        address.with_conversation(STARTED_CONVERSATION_ID)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use vibra_core::{AdapterError, DeliveryError, TransportError, TransportResult};

    use super::*;
    use crate::model::event::UserProfile;
    use crate::transport::DisabledTransport;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, PlatformMessage)>>,
    }

    #[async_trait]
    impl PlatformTransport for RecordingTransport {
        async fn send_message(
            &self,
            recipient: &UserProfile,
            message: &PlatformMessage,
        ) -> TransportResult<()> {
            self.sent
                .lock()
                .push((recipient.id.clone(), message.clone()));
            Ok(())
        }
    }

    const TEXT_CALLBACK: &[u8] = br#"{
        "event": "message",
        "timestamp": 1457764197627,
        "sender": {"id": "01234567890A=", "name": "John"},
        "message": {"type": "text", "text": "ping"}
    }"#;

    fn collecting(connector: &ViberConnector) -> Arc<Mutex<Vec<Envelope>>> {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        connector.on_event(Arc::new(move |envelopes: Vec<Envelope>| {
            sink.lock().extend(envelopes)
        }));
        received
    }

    #[test]
    fn test_callback_dispatches_to_handler() {
        let connector =
            ViberConnector::new(ViberConfig::named("Shop"), Arc::new(DisabledTransport));
        let received = collecting(&connector);

        let envelope = connector.handle_callback(TEXT_CALLBACK).unwrap().unwrap();

        assert_eq!(connector.config().name, "Shop");
        assert_eq!(envelope.text(), "ping");
        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], envelope);
    }

    #[test]
    fn test_last_handler_wins() {
        let connector = ViberConnector::new(ViberConfig::default(), Arc::new(DisabledTransport));
        let first = collecting(&connector);
        let second = collecting(&connector);

        connector.handle_callback(TEXT_CALLBACK).unwrap();

        assert!(first.lock().is_empty());
        assert_eq!(second.lock().len(), 1);
    }

    #[test]
    fn test_message_without_handler_is_returned() {
        let connector = ViberConnector::new(ViberConfig::default(), Arc::new(DisabledTransport));
        let envelope = connector.handle_callback(TEXT_CALLBACK).unwrap();
        assert!(envelope.is_some());
    }

    #[test]
    fn test_other_callbacks_ignored() {
        let connector = ViberConnector::new(ViberConfig::default(), Arc::new(DisabledTransport));
        let received = collecting(&connector);

        let body = br#"{"event": "subscribed", "timestamp": 1, "user": {"id": "u"}}"#;
        assert!(connector.handle_callback(body).unwrap().is_none());
        assert!(received.lock().is_empty());

        assert!(matches!(
            connector.handle_callback(b"{"),
            Err(AdapterError::Parse { .. })
        ));
    }

    #[test]
    fn test_start_conversation() {
        let connector = ViberConnector::new(ViberConfig::default(), Arc::new(DisabledTransport));
        let envelope = connector.handle_callback(TEXT_CALLBACK).unwrap().unwrap();
        let address = envelope.address().unwrap().clone();

        let started = connector.start_conversation(address.clone());

        assert_eq!(started.conversation.id, "ViberConversationId");
        assert_eq!(started.user, address.user);
        assert_eq!(started.bot, address.bot);
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let transport = Arc::new(RecordingTransport::default());
        let connector = ViberConnector::new(ViberConfig::default(), transport.clone());

        let inbound = connector.handle_callback(TEXT_CALLBACK).unwrap().unwrap();
        let reply = inbound.reply().with_text("pong");
        let report = connector.send(vec![reply, Envelope::typing()]).await;

        assert!(report.is_success());
        assert_eq!(report.messages_sent(), 1);
        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "01234567890A=");
        assert_eq!(sent[0].1.to_string(), "pong");
    }

    #[tokio::test]
    async fn test_send_without_transport() {
        let connector = ViberConnector::new(ViberConfig::default(), Arc::new(DisabledTransport));
        let inbound = connector.handle_callback(TEXT_CALLBACK).unwrap().unwrap();

        let report = connector.send(vec![inbound.reply().with_text("pong")]).await;

        assert!(matches!(
            report.into_result(),
            Err(DeliveryError::Transport {
                index: 0,
                source: TransportError::NotConnected
            })
        ));
    }

    #[test]
    fn test_text_message_hint() {
        let message = ViberConnector::text_message("Ready?", Some("Go"));
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["keyboard"]["Buttons"][0]["ActionBody"], "Go");
    }
}
