//! Relay configuration: TOML file, environment overrides, validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::{LevelFilter, info};
use padlink_core::CanvasSize;
use padlink_scan::ScanConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Overrides [`RelayConfig::server_url`].
pub const ENV_SERVER_URL: &str = "PADLINK_SERVER_URL";
/// Overrides [`RelayConfig::cache_dir`].
pub const ENV_CACHE_DIR: &str = "PADLINK_CACHE_DIR";
/// Overrides [`RelayConfig::download_dir`].
pub const ENV_DOWNLOAD_DIR: &str = "PADLINK_DOWNLOAD_DIR";

/// Client configuration for one relay server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the relay server.
    pub server_url: String,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Directory holding the drawing snapshot.
    pub cache_dir: PathBuf,
    /// Directory receiving downloaded files.
    pub download_dir: PathBuf,
    /// Canvas size before the first size sync.
    pub initial_canvas: CanvasSize,
    /// Camera settings for scan sessions.
    pub scan: ScanConfig,
    /// Log level name (`error` through `trace`, or `off`).
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("padlink"),
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            initial_canvas: CanvasSize::BROWSER_DEFAULT,
            scan: ScanConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl RelayConfig {
    /// `<config_dir>/padlink/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("padlink").join("config.toml"))
    }

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one the default path is read
    /// when present and defaults are used otherwise. Environment overrides
    /// are applied before validation.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for unreadable files, bad TOML or invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads one TOML file without env overrides or validation.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("loading configuration from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses TOML text; missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `PADLINK_*` overrides read through `lookup`. Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(server_url) = value(ENV_SERVER_URL) {
            self.server_url = server_url;
        }
        if let Some(cache_dir) = value(ENV_CACHE_DIR) {
            self.cache_dir = PathBuf::from(cache_dir);
        }
        if let Some(download_dir) = value(ENV_DOWNLOAD_DIR) {
            self.download_dir = PathBuf::from(download_dir);
        }
    }

    /// Checks every field.
    ///
    /// # Errors
    /// Returns the first invalid field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server_base()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        CanvasSize::new(self.initial_canvas.width, self.initial_canvas.height).map_err(|_| {
            ConfigError::InvalidCanvasSize {
                width: self.initial_canvas.width,
                height: self.initial_canvas.height,
            }
        })?;
        if self.scan.fps == 0 || self.scan.region_size == 0 {
            return Err(ConfigError::InvalidScan(format!(
                "fps={} region_size={}",
                self.scan.fps, self.scan.region_size
            )));
        }
        self.log_level_filter()?;
        Ok(())
    }

    /// Parsed server base URL.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidServerUrl`] unless the URL is absolute
    /// `http` or `https` with a host.
    pub fn server_base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.server_url)
            .map_err(|error| ConfigError::InvalidServerUrl(format!("{}: {error}", self.server_url)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
            return Err(ConfigError::InvalidServerUrl(self.server_url.clone()));
        }
        Ok(url)
    }

    /// Parsed log level.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidLogLevel`] for unknown names.
    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying failure.
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Server URL is not an absolute http(s) URL.
    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),
    /// Timeout must be positive.
    #[error("request timeout must be at least one second")]
    InvalidTimeout,
    /// Initial canvas must have positive sides.
    #[error("invalid initial canvas {width}x{height}")]
    InvalidCanvasSize {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// Scan settings must be positive.
    #[error("invalid scan settings: {0}")]
    InvalidScan(String),
    /// Unknown log level name.
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}
