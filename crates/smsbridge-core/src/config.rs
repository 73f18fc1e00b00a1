//! Bridge configuration
//!
//! Defaults come from [`crate::branding`]. Overrides are read from the
//! environment (with `.env` support) or from a JSON file.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SMSBRIDGE_APP_ID` | `app_id` |
//! | `SMSBRIDGE_CHANNEL` | `channel` |
//! | `SMSBRIDGE_RECEIVER_EXPORTED` | `receiver_export` (`true` = legacy exported) |
//! | `SMSBRIDGE_SCAN_TIMEOUT_MS` | `scan_timeout_ms` |
//! | `SMSBRIDGE_DATABASE` | `database_path` |
//! | `SMSBRIDGE_LOG_DIR` | `log.directory` |
//! | `RUST_LOG` | `log.filter` |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::branding;
use crate::error::ConfigError;

const DEFAULT_SCAN_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_LOG_FILTER: &str = "info,smsbridge_core=debug,smsbridge_gateway=debug,smsbridge_storage=debug";

/// Whether the relay channel accepts deliveries from other applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverExport {
    /// Only same-application deliveries are accepted
    #[default]
    NotExported,
    /// Legacy platforms without the restriction
    Exported,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory for rotated log files; console only when `None`
    pub directory: Option<PathBuf>,
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: String,
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filter: DEFAULT_LOG_FILTER.to_string(),
            file_prefix: branding::LOG_PREFIX.to_string(),
        }
    }
}

/// Top-level bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub app_id: String,
    pub channel: String,
    pub receiver_export: ReceiverExport,
    pub scan_timeout_ms: u64,
    pub database_path: Option<PathBuf>,
    pub log: LogConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            app_id: branding::APP_ID.to_string(),
            channel: branding::CHANNEL.to_string(),
            receiver_export: ReceiverExport::default(),
            scan_timeout_ms: DEFAULT_SCAN_TIMEOUT_MS,
            database_path: None,
            log: LogConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(app_id) = lookup("SMSBRIDGE_APP_ID") {
            config.app_id = app_id;
        }
        if let Some(channel) = lookup("SMSBRIDGE_CHANNEL") {
            config.channel = channel;
        }
        if let Some(value) = lookup("SMSBRIDGE_RECEIVER_EXPORTED") {
            config.receiver_export = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => ReceiverExport::Exported,
                "0" | "false" | "no" => ReceiverExport::NotExported,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "SMSBRIDGE_RECEIVER_EXPORTED",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("SMSBRIDGE_SCAN_TIMEOUT_MS") {
            config.scan_timeout_ms = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SMSBRIDGE_SCAN_TIMEOUT_MS",
                value: value.clone(),
            })?;
        }
        if let Some(path) = lookup("SMSBRIDGE_DATABASE") {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("SMSBRIDGE_LOG_DIR") {
            config.log.directory = Some(PathBuf::from(dir));
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log.filter = filter;
        }

        Ok(config)
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    /// Configured database path, or the platform default.
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| branding::default_data_dir().join(branding::DATABASE_FILE))
    }
}
