//! On-disk client settings (`bridge.toml`).

use crate::DEFAULT_BASE_URL;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_DIR_NAME: &str = "canvas-bridge";
const CONFIG_FILE_NAME: &str = "bridge.toml";
const CONFIG_VERSION: u32 = 1;

/// Hard ceiling on a single backoff delay.
const MAX_DELAY_CEILING_MS: u64 = 10 * 60 * 1000;

// ============================================
// FILE SECTIONS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Websocket base address, e.g. `ws://localhost:8080`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Offline queue bound. Absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_monitor_interval_ms")]
    pub interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_monitor_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reconnect: ReconnectConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            reconnect: ReconnectConfig::default(),
            queue: QueueConfig::default(),
            monitor: MonitorConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

// ============================================
// SERDE DEFAULTS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_max_attempts() -> u32 {
    5
}
fn default_initial_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    30_000
}
fn default_monitor_interval_ms() -> u64 {
    1000
}
fn default_timeout_secs() -> u64 {
    30
}

// ============================================
// LOAD / SAVE / VALIDATE
// ============================================

impl ClientConfig {
    /// Per-user config directory, `{config_dir}/canvas-bridge`.
    #[track_caller]
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or_else(|| ConfigError::NoConfigDir {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Path of the settings file inside `config_dir`.
    pub fn file_path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load `{config_dir}/bridge.toml`.
    ///
    /// A missing file yields defaults; a present but unreadable, malformed or
    /// invalid file is an error.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = Self::file_path(config_dir);

        if !config_path.exists() {
            info!(
                "No bridge config at {}, falling back to defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Loaded bridge config from {}", config_path.display());
        Ok(config)
    }

    /// Save to `{config_dir}/bridge.toml` via temp file + rename.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = Self::file_path(config_dir);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let rendered = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, rendered).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Wrote bridge config to {}", config_path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for the first offending value.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(invalid(format!(
                "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                self.version
            )));
        }

        let base_url = Url::parse(&self.server.base_url).map_err(|e| {
            invalid(format!("Invalid base_url {:?}: {e}", self.server.base_url))
        })?;
        if !matches!(base_url.scheme(), "ws" | "wss") {
            return Err(invalid(format!(
                "base_url must use ws:// or wss://, got {}://",
                base_url.scheme()
            )));
        }

        let reconnect = &self.reconnect;
        if reconnect.initial_delay_ms == 0 {
            return Err(invalid("reconnect.initial_delay_ms must be positive".to_string()));
        }
        if reconnect.max_delay_ms < reconnect.initial_delay_ms {
            return Err(invalid(format!(
                "reconnect.max_delay_ms ({}) is below initial_delay_ms ({})",
                reconnect.max_delay_ms, reconnect.initial_delay_ms
            )));
        }
        if reconnect.max_delay_ms > MAX_DELAY_CEILING_MS {
            return Err(invalid(format!(
                "reconnect.max_delay_ms ({}) exceeds {MAX_DELAY_CEILING_MS}",
                reconnect.max_delay_ms
            )));
        }

        if self.queue.capacity == Some(0) {
            return Err(invalid(
                "queue.capacity must be positive; omit it for an unbounded queue".to_string(),
            ));
        }

        if self.monitor.interval_ms == 0 {
            return Err(invalid("monitor.interval_ms must be positive".to_string()));
        }

        if self.http.timeout_secs == 0 {
            return Err(invalid("http.timeout_secs must be positive".to_string()));
        }

        Ok(())
    }
}

#[track_caller]
fn invalid(reason: String) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason,
    }
}
