//! Configuration loading and typed config structures for Warpgate.
//!
//! The configuration lives in a YAML file (`warpgate.yaml` by default).
//! Every section and field has a default, so an empty file is a valid
//! configuration. Unknown keys are ignored, which lets hosts keep their
//! own sections in the same file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use warpgate_types::ScopeMode;

/// Environment variable overriding `storage.path`.
pub const STORAGE_PATH_ENV: &str = "WARPGATE_STORAGE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WarpsConfig {
    /// Namespace settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Overwrite confirmation settings.
    #[serde(default)]
    pub confirmation: ConfirmationConfig,

    /// Listing settings.
    #[serde(default)]
    pub listing: ListingConfig,

    /// Snapshot file settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WarpsConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `WARPGATE_STORAGE_PATH` overrides `storage.path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_only(&contents)?;
        config.storage.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_only(yaml)?;
        config.storage.apply_env_overrides();
        Ok(config)
    }

    fn parse_only(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "listing.page_size",
                reason: "must be at least 1",
            });
        }
        if self.registry.default_world.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "registry.default_world",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

/// Namespace configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Whether each world has its own warp namespace.
    #[serde(default = "default_true")]
    pub per_world: bool,

    /// World that the `#main` world token resolves to.
    #[serde(default = "default_world")]
    pub default_world: String,
}

impl RegistryConfig {
    /// The scope mode selected by `per_world`.
    pub const fn scope_mode(&self) -> ScopeMode {
        ScopeMode::from_per_world(self.per_world)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            per_world: true,
            default_world: default_world(),
        }
    }
}

/// Overwrite confirmation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfirmationConfig {
    /// Seconds a pending confirmation stays valid (0 = forever).
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl ConfirmationConfig {
    /// The TTL as a [`Duration`].
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

/// Listing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingConfig {
    /// Rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Snapshot file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON snapshot.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl StorageConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(STORAGE_PATH_ENV) {
            if !path.is_empty() {
                self.path = PathBuf::from(path);
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_world() -> String {
    String::from("world")
}

const fn default_ttl_seconds() -> u64 {
    60
}

const fn default_page_size() -> usize {
    9
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("warps.json")
}

fn default_log_level() -> String {
    String::from("info")
}
