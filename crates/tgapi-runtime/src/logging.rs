//! Logging setup for applications built on tgapi.
//!
//! The library crates only emit `tracing` events; this module installs a
//! `tracing-subscriber` registry to print them.
//!
//! # Configuration-Based Initialization
//!
//! ```rust,ignore
//! use tgapi_runtime::config::load_config;
//! use tgapi_runtime::logging;
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//! ```
//!
//! # Manual Initialization
//!
//! ```rust,ignore
//! use tgapi_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .directive("tgapi_transport=trace")
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogOutput, LogRotation, LoggingConfig};

const DEFAULT_LOG_FILE: &str = "tgapi.log";

/// Initializes logging from a [`LoggingConfig`].
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

/// A builder for configuring logging.
///
/// `RUST_LOG`, when set, replaces the base level; directives added here are
/// applied on top of it.
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    format: LogFormat,
    output: LogOutput,
    with_target: bool,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
    file_path: Option<PathBuf>,
    rotation: LogRotation,
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new() -> Self {
        Self {
            with_target: true,
            ..Default::default()
        }
    }

    /// Create a builder from a [`LoggingConfig`].
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut builder = Self::new();

        builder.level = Some(config.level.to_tracing_level());
        builder.format = config.format;
        builder.output = config.output;

        builder.with_thread_ids = config.thread_ids;
        builder.with_file = config.file_location;
        builder.with_line_number = config.file_location;

        builder.file_path.clone_from(&config.file_path);
        builder.rotation = config.rotation;

        for (module, level) in &config.filters {
            builder
                .directives
                .push(format!("{}={}", module, level.as_str()));
        }

        builder
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Add a filter directive such as `tgapi_core=debug`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output destination.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Include the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Include thread IDs in log output.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// Include file names and line numbers in log output.
    pub fn with_file_location(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self.with_line_number = enabled;
        self
    }

    /// Set the file path for file output.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Set the rotation policy for file output.
    pub fn rotation(mut self, rotation: LogRotation) -> Self {
        self.rotation = rotation;
        self
    }

    fn build_filter(&self) -> EnvFilter {
        let base_level = self.level.unwrap_or(tracing::Level::INFO);
        let base_filter = base_level.to_string().to_lowercase();

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));

        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => warn!(directive = %directive, error = %e, "Ignoring invalid log directive"),
            }
        }

        filter
    }

    fn file_appender(path: &Path, rotation: LogRotation) -> RollingFileAppender {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
        match rotation {
            LogRotation::Never => rolling::never(dir, name),
            LogRotation::Hourly => rolling::hourly(dir, name),
            LogRotation::Daily => rolling::daily(dir, name),
        }
    }

    /// Initialize the logging system, ignoring an already installed subscriber.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Try to initialize the logging system.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();

        macro_rules! configure_layer {
            ($layer:expr) => {
                $layer
                    .with_target(self.with_target)
                    .with_thread_ids(self.with_thread_ids)
                    .with_file(self.with_file)
                    .with_line_number(self.with_line_number)
            };
        }

        macro_rules! init_with_writer {
            ($writer:expr) => {
                match &self.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => {
                        let layer = fmt::layer().json().with_writer($writer);
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Compact => {
                        let layer = configure_layer!(fmt::layer().compact().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Full => {
                        let layer = configure_layer!(fmt::layer().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Pretty => {
                        let layer = configure_layer!(fmt::layer().pretty().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                }
            };
        }

        match (&self.output, &self.file_path) {
            (LogOutput::Stdout, _) => init_with_writer!(std::io::stdout),
            (LogOutput::Stderr, _) => init_with_writer!(std::io::stderr),
            (LogOutput::File, Some(path)) => {
                let appender = Self::file_appender(path, self.rotation);
                init_with_writer!(appender)
            }
            (LogOutput::File, None) => {
                let result = init_with_writer!(std::io::stdout);
                warn!("File output requested but no file path configured, fell back to stdout");
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_from_config_collects_filters() {
        let mut config = LoggingConfig {
            level: LogLevel::Warn,
            thread_ids: true,
            ..Default::default()
        };
        config
            .filters
            .insert("tgapi_transport".to_string(), LogLevel::Trace);

        let builder = LoggingBuilder::from_config(&config);
        assert_eq!(builder.level, Some(tracing::Level::WARN));
        assert!(builder.with_thread_ids);
        assert_eq!(builder.directives, vec!["tgapi_transport=trace".to_string()]);
    }

    #[test]
    fn test_builder_file_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let builder = LoggingBuilder::new()
            .output(LogOutput::File)
            .file_path(&path);
        assert_eq!(builder.file_path.as_deref(), Some(path.as_path()));
        assert_eq!(builder.rotation, LogRotation::Never);
    }
}
