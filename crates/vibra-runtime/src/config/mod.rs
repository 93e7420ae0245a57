//! Configuration module for the Vibra runtime.
//!
//! This module provides layered configuration loading and validation for
//! logging and the Viber adapter.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{LogFormat, LogLevel, LogOutput, LoggingConfig, VibraConfig};
pub use validation::validate_config;
