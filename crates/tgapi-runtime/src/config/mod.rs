//! Configuration module for the tgapi runtime.
//!
//! Layered loading of bot credentials, endpoints and logging settings from
//! files, environment variables and code.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotSettings, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, TgapiConfig,
};
pub use validation::validate_config;
