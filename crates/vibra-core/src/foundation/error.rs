//! Unified error types for the Vibra connector.
//!
//! Platform-specific diagnostics (such as malformed cards) are defined in
//! the adapter crates.

use thiserror::Error;

// =============================================================================
// Codec Errors
// =============================================================================

/// Errors raised while decoding channel-scoped identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The identifier is not validly percent-encoded.
    #[error("malformed identifier '{input}': {reason}")]
    MalformedIdentifier {
        /// The offending input.
        input: String,
        /// Reason for failure.
        reason: String,
    },
}

impl CodecError {
    /// Creates a malformed identifier error.
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors returned by a platform's send primitive.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Message send failed.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// The platform answered with an error status.
    #[error("platform rejected message ({status}): {message}")]
    Rejected {
        /// Platform status code.
        status: i64,
        /// Platform status message.
        message: String,
    },

    /// The transport is not connected.
    #[error("transport not connected")]
    NotConnected,
}

// =============================================================================
// Delivery Errors
// =============================================================================

/// Errors that fail the delivery of one envelope.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The envelope has no address to deliver to.
    #[error("message is missing an address")]
    MissingAddress,

    /// The recipient identifier could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A platform send failed; messages after `index` were not sent.
    #[error("send of message {index} failed: {source}")]
    Transport {
        /// Zero-based position of the failed message in the sequence.
        index: usize,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// Conversion or sending panicked.
    #[error("delivery aborted by panic: {0}")]
    Panicked(String),
}

// =============================================================================
// Adapter Errors
// =============================================================================

/// Errors that can occur while an adapter handles platform input.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Callback parsing failed.
    #[error("failed to parse callback: {reason}")]
    Parse {
        /// Reason for failure.
        reason: String,
    },

    /// Internal adapter error.
    #[error("adapter error: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Creates an internal adapter error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Creates a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse { reason: msg.into() }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for identifier decoding.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for delivering one envelope.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
