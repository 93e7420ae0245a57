//! Viber wire data models.

pub mod card;
pub mod event;
pub mod message;
