//! Foundation layer: addressing, envelopes and error types.

pub mod address;
pub mod envelope;
pub mod error;

pub use address::{Account, Address, Conversation};
pub use envelope::{Attachment, AttachmentLayout, Envelope, EnvelopeKind, SourceEvent};
pub use error::{
    AdapterError, AdapterResult, CodecError, CodecResult, DeliveryError, DeliveryResult,
    TransportError, TransportResult,
};
