//! # Vibra Core
//!
//! The framework-facing half of the Vibra connector.
//!
//! This crate holds the platform-agnostic message model that bot frameworks
//! exchange with a connector, plus the seam a connector implements.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Core types:
//! - **Addressing**: who a message belongs to ([`Address`], [`Account`], [`Conversation`])
//! - **Envelopes**: the canonical message shape ([`Envelope`], [`Attachment`])
//! - **Errors**: codec, transport and delivery failures ([`DeliveryError`])
//!
//! ### Integration Layer
//!
//! External system interfaces:
//! - **Connector**: the framework's view of a messaging platform ([`Connector`])
//! - **Delivery reports**: per-envelope outcomes of an outbound batch ([`DeliveryReport`])
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────┐  Envelope  ┌───────────┐  Envelope  ┌───────────┐
//! │ Platform │──────────▶│ Connector │──────────▶│ Framework │
//! │          │◀──────────│           │◀──────────│  handler  │
//! └──────────┘  messages  └───────────┘  replies   └───────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use vibra_core::{Attachment, AttachmentLayout, Envelope};
//!
//! let reply = Envelope::new()
//!     .with_text("Pick one")
//!     .with_attachment(Attachment::media("image/png", "http://x/y.png"))
//!     .with_layout(AttachmentLayout::Carousel);
//!
//! assert_eq!(reply.text(), "Pick one");
//! assert_eq!(reply.attachments().len(), 1);
//! ```

// Architectural layers
pub mod foundation;
pub mod integration;

// Re-export foundation types
pub use foundation::{
    Account, Address, AdapterError, AdapterResult, Attachment, AttachmentLayout, CodecError,
    CodecResult, Conversation, DeliveryError, DeliveryResult, Envelope, EnvelopeKind, SourceEvent,
    TransportError, TransportResult,
};

// Re-export integration types
pub use integration::{Connector, DeliveryReport, EventHandler};
