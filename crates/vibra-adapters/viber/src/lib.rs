//! # Vibra Adapter for Viber
//!
//! This crate connects a bot framework to the Viber messaging platform.
//!
//! ## Overview
//!
//! Viber and the framework disagree on what a message looks like. This
//! adapter translates in both directions:
//!
//! - Inbound webhook callbacks are normalized into framework [`Envelope`]s
//! - Outbound envelopes (text, cards, carousels, media, keyboards) are
//!   converted into one or more Viber [`PlatformMessage`]s
//! - Converted messages are delivered strictly in order through a
//!   [`PlatformTransport`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vibra_adapter_viber::{ViberConfig, ViberConnector};
//! use vibra_core::Connector;
//!
//! let connector = ViberConnector::new(ViberConfig::named("Shop"), Arc::new(MyTransport));
//! connector.on_event(Arc::new(|envelopes| {
//!     for envelope in envelopes {
//!         println!("{}", envelope.text());
//!     }
//! }));
//!
//! // In the webhook handler
//! connector.handle_callback(&body)?;
//! ```
//!
//! ## Outbound Conversion
//!
//! | First attachment | Viber messages |
//! |------------------|----------------|
//! | keyboard | text with a reply keyboard |
//! | hero card, carousel layout | optional text, then rich media |
//! | `video/mp4` | video |
//! | `url`, `image/gif` | optional text, then url |
//! | `image/png`, `image/jpeg` | picture |
//! | anything else | file |
//! | none | text |
//!
//! A sticker source event overrides all of the above.
//!
//! [`Envelope`]: vibra_core::Envelope

pub mod address;
pub mod config;
pub mod connector;
pub mod convert;
pub mod model;
pub mod normalize;
pub mod sequencer;
pub mod transport;

pub use address::{address_for, decode_identifier, encode_identifier, recipient_of};
pub use config::ViberConfig;
pub use connector::{STARTED_CONVERSATION_ID, ViberConnector};
pub use convert::{
    ContentKind, Conversion, MissingCardField, StructuralAttachmentError, convert,
};
pub use model::event::{Callback, MessageEvent, ReceivedMessage, UserProfile, parse_callback};
pub use model::message::{Keyboard, KeyboardButton, PlatformMessage, RichMedia, Tile};
pub use normalize::Normalizer;
pub use sequencer::Sequencer;
pub use transport::{DisabledTransport, PlatformTransport};
