//! Connector trait and related types.
//!
//! A [`Connector`] is what a bot framework talks to: it receives normalized
//! envelopes through the registered [`EventHandler`] and hands outbound
//! envelopes to [`Connector::send`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::address::Address;
use crate::foundation::envelope::Envelope;
use crate::foundation::error::{DeliveryError, DeliveryResult};

/// Callback receiving normalized inbound envelopes.
pub type EventHandler = Arc<dyn Fn(Vec<Envelope>) + Send + Sync>;

/// Outcome of sending a batch of envelopes.
///
/// Holds one result per submitted envelope, in submission order. A
/// successful result carries the number of platform messages sent for
/// that envelope.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    results: Vec<DeliveryResult<usize>>,
}

impl DeliveryReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of the next envelope.
    pub fn push(&mut self, result: DeliveryResult<usize>) {
        self.results.push(result);
    }

    /// Per-envelope results in submission order.
    pub fn results(&self) -> &[DeliveryResult<usize>] {
        &self.results
    }

    /// Returns true if every envelope was delivered.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }

    /// Total number of platform messages sent across the batch.
    pub fn messages_sent(&self) -> usize {
        self.results.iter().filter_map(|r| r.as_ref().ok()).sum()
    }

    /// Iterates over the failed envelopes as `(position, error)` pairs.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &DeliveryError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    /// Collapses the report into the first failure, if any.
    pub fn into_result(self) -> DeliveryResult<usize> {
        let mut sent = 0;
        for result in self.results {
            sent += result?;
        }
        Ok(sent)
    }
}

/// The framework-facing connector trait.
///
/// # Ordering
///
/// Implementations deliver envelopes in submission order and never
/// interleave the platform messages of two envelopes.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Registers the handler for inbound envelopes.
    ///
    /// Registering again replaces the previous handler.
    fn on_event(&self, handler: EventHandler);

    /// Delivers outbound envelopes and reports the outcome of each.
    async fn send(&self, envelopes: Vec<Envelope>) -> DeliveryReport;

    /// Assigns a conversation to `address` so the bot can message first.
    fn start_conversation(&self, address: Address) -> Address;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::TransportError;

    #[test]
    fn test_report_success() {
        let mut report = DeliveryReport::new();
        report.push(Ok(2));
        report.push(Ok(0));

        assert!(report.is_success());
        assert_eq!(report.messages_sent(), 2);
        assert_eq!(report.failures().count(), 0);
        assert_eq!(report.into_result().unwrap(), 2);
    }

    #[test]
    fn test_report_failures_keep_positions() {
        let mut report = DeliveryReport::new();
        report.push(Ok(1));
        report.push(Err(DeliveryError::MissingAddress));
        report.push(Err(DeliveryError::Transport {
            index: 1,
            source: TransportError::NotConnected,
        }));

        assert!(!report.is_success());
        assert_eq!(report.messages_sent(), 1);

        let positions: Vec<usize> = report.failures().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![1, 2]);

        assert!(matches!(
            report.into_result(),
            Err(DeliveryError::MissingAddress)
        ));
    }
}
