//! Application configuration model.
//!
//! Every field has a serde default so a partial (or empty) `config.toml`
//! still yields a complete configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3001
}

impl ServerConfig {
    /// `host:port` string for binding.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON data file (defaults to `<data_dir>/bookmarks.json`).
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

/// Page-title fetching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with title requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

const fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    concat!("bookmark-manager/", env!("CARGO_PKG_VERSION")).to_string()
}

impl FetchConfig {
    /// Timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Data file location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Title fetching.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bookmark-manager")
    }

    /// Get the data file path, using the default if not configured.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.storage
            .data_file
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("bookmarks.json"))
    }
}
