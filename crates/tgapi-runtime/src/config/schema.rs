//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tgapi_core::{ApiContext, DEFAULT_API_BASE_URL, DEFAULT_FILE_BASE_URL};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TgapiConfig {
    /// Bot credentials and endpoints.
    #[serde(default)]
    pub bot: BotSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Bot
// =============================================================================

/// Credentials and endpoints for one bot.
#[derive(Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Bot token issued by the platform.
    #[serde(default)]
    pub token: String,

    /// API endpoint prefix; the token and method are appended to it.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// File download prefix; the token and file path are appended to it.
    #[serde(default = "default_file_base_url")]
    pub file_base_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: default_api_base_url(),
            file_base_url: default_file_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl fmt::Debug for BotSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotSettings")
            .field("token", &tgapi_core::REDACTED)
            .field("api_base_url", &self.api_base_url)
            .field("file_base_url", &self.file_base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl BotSettings {
    /// Builds the immutable call context for these settings.
    pub fn to_context(&self) -> ApiContext {
        ApiContext::new(self.token.clone())
            .with_api_base_url(self.api_base_url.clone())
            .with_file_base_url(self.file_base_url.clone())
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_file_base_url() -> String {
    DEFAULT_FILE_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30000
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,

    /// Destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file, required when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Rotation policy for file output.
    #[serde(default)]
    pub rotation: LogRotation,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    /// Per-module level overrides, e.g. `tgapi_transport = "trace"`.
    #[serde(default)]
    pub filters: BTreeMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            rotation: LogRotation::default(),
            thread_ids: false,
            file_location: false,
            filters: BTreeMap::new(),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level name as used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to the corresponding `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// File rotation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_settings_to_context() {
        let settings = BotSettings {
            token: "123:ABC".into(),
            api_base_url: "http://localhost:8081/bot".into(),
            ..Default::default()
        };
        let ctx = settings.to_context();
        assert_eq!(ctx.method_url("getMe"), "http://localhost:8081/bot123:ABC/getMe");
        assert_eq!(
            ctx.file_url("photos/a.jpg"),
            format!("{DEFAULT_FILE_BASE_URL}123:ABC/photos/a.jpg")
        );
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bot_settings_debug_hides_token() {
        let settings = BotSettings {
            token: "123:SECRET".into(),
            ..Default::default()
        };
        assert!(!format!("{settings:?}").contains("SECRET"));
    }
}
