//! Vibra Runtime - configuration and logging for Vibra binaries.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`) over defaults,
//!   `vibra.toml` and `VIBRA_*` environment variables
//! - Configuration validation
//! - Logging initialization (`LoggingBuilder`)
//!
//! ```ignore
//! use vibra_runtime::{ConfigLoader, logging, validate_config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     validate_config(&config)?;
//!     logging::init_from_config(&config.logging);
//!
//!     let connector = ViberConnector::new(config.viber, transport);
//!     // ...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logging;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, LogFormat, LogLevel, LogOutput, LoggingConfig,
    VibraConfig, load_config, validate_config,
};
pub use logging::LoggingBuilder;

// Re-export tracing for use by binaries
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
