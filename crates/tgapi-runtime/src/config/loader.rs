//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Programmatic base config ([`ConfigLoader::merge`])
//! 3. Profile-specific config file (`tgapi.{profile}.toml` / `tgapi.{profile}.yaml`)
//! 4. Main config file (`tgapi.toml` / `tgapi.yaml`)
//! 5. Environment variables (`TGAPI_*`)
//! 6. Single-key overrides ([`ConfigLoader::set`])
//!
//! # Feature Flags
//!
//! - `toml-config`: enables TOML files (`tgapi.toml`, `config.toml`)
//! - `yaml-config`: enables YAML files (`tgapi.yaml`, `tgapi.yml`, ...)
//!
//! # Environment Variable Mapping
//!
//! Variables use the `TGAPI_` prefix with `__` as the nesting separator:
//!
//! - `TGAPI_BOT__TOKEN=123:ABC` → `bot.token = "123:ABC"`
//! - `TGAPI_BOT__TIMEOUT_MS=5000` → `bot.timeout_ms = 5000`
//! - `TGAPI_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! use tgapi_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .file("./config/tgapi.toml")
//!     .with_env()
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::TgapiConfig;

const ENV_PREFIX: &str = "TGAPI_";
const PROFILE_VAR: &str = "TGAPI_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, accepting the `dev` / `prod` short forms.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `TGAPI_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    figment: Figment,
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load, skipping the search.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges a whole configuration as the base layer.
    ///
    /// Files and environment variables still override it; use
    /// [`set`](Self::set) for values that must win.
    pub fn merge(mut self, config: TgapiConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Overrides a single dotted key, e.g. `bot.timeout_ms`, above every source.
    pub fn set<V: Serialize>(mut self, key: &str, value: V) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads and returns the configuration.
    pub fn load(self) -> ConfigResult<TgapiConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: TgapiConfig = figment.extract().map_err(|e| {
            ConfigError::ParseError(format!("Failed to extract configuration: {e}"))
        })?;

        debug!(
            profile = %profile,
            api_base_url = %config.bot.api_base_url,
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(TgapiConfig::default()));
        let user_figment = std::mem::take(&mut self.figment);
        figment = figment.merge(user_figment);

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        let overrides = std::mem::take(&mut self.overrides);
        Ok(figment.merge(overrides))
    }

    /// Merges a single config file, dispatching on its extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::ParseError(format!(
                "Unsupported or disabled configuration file format: .{ext}"
            ))),
        }
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tgapi"));
        }
        paths
    }

    /// Searches `search_paths × base_names` for one format.
    ///
    /// A profile-specific file is merged before its base file; the search
    /// stops at the first base file found.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                let profile_path =
                    search_path.join(format!("{stem}.{}.{ext}", self.profile.as_str()));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    return (merge_fn(figment, &base_path), true);
                }
            }
        }
        (figment, false)
    }

    #[cfg_attr(
        not(any(feature = "toml-config", feature = "yaml-config")),
        allow(unused_mut)
    )]
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        #[cfg_attr(
            not(any(feature = "toml-config", feature = "yaml-config")),
            allow(unused_mut)
        )]
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["tgapi.toml", "config.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["tgapi.yaml", "tgapi.yml", "config.yaml", "config.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            warn!(paths = ?search_paths, "No configuration file found, using defaults");
        }
        figment
    }
}

/// Loads configuration from the default locations plus environment.
pub fn load_config() -> ConfigResult<TgapiConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from `path` plus environment.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<TgapiConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{BotSettings, LogLevel};

    #[test]
    fn test_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.bot.api_base_url, tgapi_core::DEFAULT_API_BASE_URL);
        assert_eq!(config.bot.timeout_ms, 30000);
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".into()));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new()
            .file("/nonexistent/tgapi.toml")
            .without_env()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_programmatic_merge_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .merge(TgapiConfig {
                bot: BotSettings {
                    token: "1:merged".into(),
                    timeout_ms: 1500,
                    ..Default::default()
                },
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.bot.token, "1:merged");
        assert_eq!(config.bot.timeout_ms, 1500);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_file_with_profile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tgapi.toml"),
            "[bot]\ntoken = \"1:base\"\ntimeout_ms = 5000\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("tgapi.production.toml"),
            "[bot]\napi_base_url = \"http://localhost:8081/bot\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .profile("production")
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config.bot.token, "1:base");
        assert_eq!(config.bot.timeout_ms, 5000);
        assert_eq!(config.bot.api_base_url, "http://localhost:8081/bot");
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_merge_keeps_file_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tgapi.toml"),
            "[bot]\ntoken = \"1:fromfile\"\ntimeout_ms = 5000\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .merge(TgapiConfig {
                logging: crate::config::LoggingConfig {
                    level: LogLevel::Debug,
                    ..Default::default()
                },
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.bot.token, "1:fromfile");
        assert_eq!(config.bot.timeout_ms, 5000);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_set_overrides_file_value_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tgapi.toml"),
            "[bot]\ntoken = \"1:fromfile\"\ntimeout_ms = 5000\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .set("bot.timeout_ms", 1500)
            .set("logging.level", "warn")
            .load()
            .unwrap();

        assert_eq!(config.bot.token, "1:fromfile");
        assert_eq!(config.bot.timeout_ms, 1500);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }
}
