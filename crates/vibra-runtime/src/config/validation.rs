//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, VibraConfig};
use vibra_adapter_viber::ViberConfig;

/// Validates the entire configuration.
pub fn validate_config(config: &VibraConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_viber_config(&config.viber)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid log filter module: {module:?}"
        )));
    }

    Ok(())
}

fn validate_viber_config(viber: &ViberConfig) -> ConfigResult<()> {
    if viber.name.trim().is_empty() {
        return Err(ConfigError::missing_field("viber.name"));
    }

    if viber.bot_id.is_empty() {
        return Err(ConfigError::missing_field("viber.bot_id"));
    }

    if viber.channel_id.is_empty() {
        return Err(ConfigError::missing_field("viber.channel_id"));
    }

    if let Some(url) = &viber.avatar_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        return Err(ConfigError::validation(format!(
            "Avatar URL must be http(s): {url}"
        )));
    }

    Ok(())
}
