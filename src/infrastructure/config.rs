//! Configuration file management.
//!
//! Handles loading TOML configuration files and writing the default one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Bookmark Manager Configuration
# Auto-generated - edit as needed

[server]
# Interface and port for `bookmark-manager serve` (PORT env var overrides port)
host = "127.0.0.1"
port = 3001

[storage]
# JSON data file (optional, defaults to ~/.bookmark-manager/bookmarks.json)
# data_file = "/custom/path/bookmarks.json"

[fetch]
# Timeout for page title lookups in seconds
timeout_secs = 5
"#;

/// Get the path to the default configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::default_data_dir().join("config.toml")
}

/// Load configuration from `path` (or the default location), then apply
/// environment overrides.
///
/// A missing file yields the defaults.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = path.map_or_else(config_file_path, Path::to_path_buf);

    let mut config = if config_path.exists() {
        load_config_from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut config, std::env::var("PORT").ok().as_deref())?;
    Ok(config)
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).map_err(|e| AppError::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

fn apply_env_overrides(config: &mut AppConfig, port: Option<&str>) -> Result<()> {
    if let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) {
        config.server.port = raw.parse().map_err(|_| AppError::Config {
            message: format!("Invalid PORT value: {raw}"),
        })?;
    }
    Ok(())
}

/// Create the default configuration file if it doesn't exist.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::Config {
            message: format!("Failed to create config directory: {e}"),
        })?;
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|e| AppError::Config {
        message: format!("Failed to create default config: {e}"),
    })?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert!(config.storage.data_file.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_ensure_config_exists_once() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("sub").join("config.toml");

        assert!(ensure_config_exists(&config_path).unwrap());
        assert!(!ensure_config_exists(&config_path).unwrap());
        assert!(load_config_from_file(&config_path).is_ok());
    }

    #[test]
    fn test_port_override() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, Some("4000")).unwrap();
        assert_eq!(config.server.port, 4000);

        apply_env_overrides(&mut config, None).unwrap();
        assert_eq!(config.server.port, 4000);

        assert!(apply_env_overrides(&mut config, Some("http")).is_err());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[server\nport = ").unwrap();

        assert!(matches!(
            load_config_from_file(&config_path),
            Err(AppError::Config { .. })
        ));
    }
}
