//! Configuration System
//!
//! Handles loading configuration from TOML files and environment variables.
//! Every section and field has a default, so an empty file is a valid config.

use crate::diary::persistence::DEFAULT_STATE_KEY;
use crate::diary::store::StoreOptions;
use crate::export::backup::BackupEncoding;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how the diary state is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_state_key")]
    pub state_key: String,

    /// Coalescing delay for background writes
    #[serde(default)]
    pub write_debounce_ms: u64,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("bladder-diary").to_string_lossy().to_string())
        .unwrap_or_else(|| "./bladder_diary_data".to_string())
}

fn default_state_key() -> String {
    DEFAULT_STATE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            state_key: default_state_key(),
            write_debounce_ms: 0,
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

impl StorageConfig {
    pub fn data_path(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    /// Store options with the system clock and UUID ids
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::new()
            .state_key(self.state_key.clone())
            .write_debounce(Duration::from_millis(self.write_debounce_ms))
    }
}

/// Export and backup destination
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub directory: String,

    /// Write backups as LZ4-compressed containers instead of JSON
    #[serde(default)]
    pub compress_backups: bool,
}

fn default_export_dir() -> String {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
            compress_backups: false,
        }
    }
}

impl ExportConfig {
    pub fn path(&self) -> PathBuf {
        expand_path(&self.directory)
    }

    pub fn backup_encoding(&self) -> BackupEncoding {
        if self.compress_backups {
            BackupEncoding::Compressed
        } else {
            BackupEncoding::Json
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bladder-diary").join("config.toml")),
            Some(PathBuf::from("/etc/bladder-diary/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply `BLADDER_DIARY_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = lookup("BLADDER_DIARY_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(key) = lookup("BLADDER_DIARY_STATE_KEY") {
            self.storage.state_key = key;
        }

        if let Some(dir) = lookup("BLADDER_DIARY_EXPORT_DIR") {
            self.export.directory = dir;
        }

        if let Some(level) = lookup("BLADDER_DIARY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BLADDER_DIARY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Bladder Diary Configuration
#
# Environment variables override these settings:
# - BLADDER_DIARY_DATA_DIR
# - BLADDER_DIARY_STATE_KEY
# - BLADDER_DIARY_EXPORT_DIR
# - BLADDER_DIARY_LOG_LEVEL
# - BLADDER_DIARY_LOG_FORMAT

[storage]
# Directory holding the diary state file
data_dir = "~/.local/share/bladder-diary"

# Storage key (file name without extension) of the state document
state_key = "bladder-diary-storage"

# Delay before writing changes, to batch rapid edits (ms)
write_debounce_ms = 0

[export]
# Where CSV/JSON exports and backups are written
directory = "~/Documents"

# Write backups as compressed .bdz containers instead of JSON
compress_backups = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
