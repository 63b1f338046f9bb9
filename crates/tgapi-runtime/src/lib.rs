//! tgapi Runtime - configuration and logging for the tgapi bot API client.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `TgapiConfig`)
//! - Configuration validation (`validate_config`)
//! - Logging setup (`LoggingBuilder`, `logging::init_from_config`)
//!
//! ```ignore
//! use tgapi_runtime::{ConfigLoader, logging, validate_config};
//!
//! let config = ConfigLoader::new().load()?;
//! validate_config(&config)?;
//! logging::init_from_config(&config.logging);
//!
//! let ctx = config.bot.to_context();
//! ```

pub mod config;
pub mod logging;

// Re-exports
pub use config::{
    BotSettings, ConfigError, ConfigLoader, ConfigResult, LoggingConfig, TgapiConfig,
    validate_config,
};
pub use logging::LoggingBuilder;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
