//! Integration layer: the seam between a bot framework and a connector.

pub mod connector;

pub use connector::{Connector, DeliveryReport, EventHandler};
