//! Configuration management for quill
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Admin server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Admin list-view configuration
    pub admin: AdminConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Admin server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Enable permissive CORS (for a separate admin frontend)
    pub enable_cors: bool,

    /// Enable per-request tracing
    pub enable_request_logging: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub path: PathBuf,
}

/// Admin list-view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Default rows per list page
    pub page_size: u32,

    /// Upper bound a client may request per page
    pub max_page_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: String::from("127.0.0.1"),
                port: 8620,
                enable_cors: true,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                path: PathBuf::from("data/quill.db"),
            },
            admin: AdminConfig {
                page_size: 100,
                max_page_size: 500,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = std::env::var("QUILL_HOST").unwrap_or(defaults.server.host);

        let port = std::env::var("QUILL_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.server.port);

        let enable_cors = std::env::var("QUILL_ENABLE_CORS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.server.enable_cors);

        let enable_request_logging = std::env::var("QUILL_REQUEST_LOGGING")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.server.enable_request_logging);

        let path = std::env::var("QUILL_DATABASE_PATH")
            .or_else(|_| std::env::var("DATABASE_PATH"))
            .map(PathBuf::from)
            .unwrap_or(defaults.database.path);

        let page_size = std::env::var("QUILL_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.admin.page_size);

        let max_page_size = std::env::var("QUILL_MAX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.admin.max_page_size);

        let level = std::env::var("QUILL_LOG_LEVEL").unwrap_or(defaults.logging.level);
        let format = std::env::var("QUILL_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                enable_cors,
                enable_request_logging,
            },
            database: DatabaseConfig { path },
            admin: AdminConfig {
                page_size,
                max_page_size,
            },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("server.host must not be empty");
        }

        if self.admin.page_size == 0 {
            anyhow::bail!("admin.page_size must be greater than 0");
        }

        if self.admin.max_page_size < self.admin.page_size {
            anyhow::bail!("admin.max_page_size must be at least admin.page_size");
        }

        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!("logging.format must be 'text' or 'json', got '{other}'"),
        }

        Ok(())
    }

    /// Resolve the server bind address
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid bind address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.admin.page_size, 100);
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        let addr = config.bind_address().unwrap();
        assert_eq!(addr.port(), 8620);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.admin.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_page_bounds() {
        let mut config = Config::default();
        config.admin.page_size = 200;
        config.admin.max_page_size = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = String::from("xml");
        assert!(config.validate().is_err());
    }
}
