//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotSettings, LogOutput, LoggingConfig, TgapiConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &TgapiConfig) -> ConfigResult<()> {
    validate_bot_settings(&config.bot)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_bot_settings(bot: &BotSettings) -> ConfigResult<()> {
    validate_token(&bot.token)?;
    validate_base_url(&bot.api_base_url)?;
    validate_base_url(&bot.file_base_url)?;

    if bot.timeout_ms == 0 {
        return Err(ConfigError::validation("Timeout must be greater than 0"));
    }

    Ok(())
}

/// The token is spliced into URL paths, so it must be a single path segment.
fn validate_token(token: &str) -> ConfigResult<()> {
    if token.is_empty() {
        return Err(ConfigError::missing_field("bot.token"));
    }

    if token.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ConfigError::validation(
            "Bot token cannot contain whitespace or '/'",
        ));
    }

    Ok(())
}

fn validate_base_url(url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::missing_field("url"));
    }

    let valid_schemes = ["http://", "https://"];
    if !valid_schemes.iter().any(|s| url.starts_with(s)) {
        return Err(ConfigError::invalid_url(
            url,
            format!("URL must start with one of: {valid_schemes:?}"),
        ));
    }

    if url.ends_with('/') {
        return Err(ConfigError::invalid_url(
            url,
            "URL must not end with '/', the token is appended directly",
        ));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid log filter module name: {module:?}"
        )));
    }

    Ok(())
}
