//! Service configuration.
//!
//! Values come from the environment with sensible defaults; CLI flags
//! override the environment (see `cli::commands`).

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;

/// Environment variable holding the bind address.
pub const ENV_BIND: &str = "SWAPRUNN_BIND";

/// Environment variable holding the SQLite database path.
pub const ENV_DATABASE: &str = "SWAPRUNN_DB";

/// Environment variable holding the default page size for list endpoints.
pub const ENV_DEFAULT_PAGE_SIZE: &str = "SWAPRUNN_DEFAULT_PAGE_SIZE";

/// Environment variable holding the maximum page size for list endpoints.
pub const ENV_MAX_PAGE_SIZE: &str = "SWAPRUNN_MAX_PAGE_SIZE";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for the SwapRunn service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Path of the SQLite database file.
    pub database_path: String,
    /// Page size used when a list request does not pass `limit`.
    pub default_page_size: i64,
    /// Upper bound applied to any requested `limit`.
    pub max_page_size: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            database_path: "swaprunn.db".to_string(),
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl AppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the environment on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(bind) = std::env::var(ENV_BIND) {
            config.bind_addr = bind.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BIND.to_string(),
                message: format!("'{}' is not a socket address", bind),
            })?;
        }

        if let Ok(path) = std::env::var(ENV_DATABASE) {
            config.database_path = path;
        }

        if let Ok(raw) = std::env::var(ENV_DEFAULT_PAGE_SIZE) {
            config.default_page_size = parse_positive(ENV_DEFAULT_PAGE_SIZE, &raw)?;
        }

        if let Ok(raw) = std::env::var(ENV_MAX_PAGE_SIZE) {
            config.max_page_size = parse_positive(ENV_MAX_PAGE_SIZE, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "database path must not be empty".to_string(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::ValidationFailed(format!(
                "default page size ({}) exceeds max page size ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<i64, ConfigError> {
    let value: i64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{}' is not an integer", raw),
    })?;
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be positive".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_page_size_ordering_enforced() {
        let config = AppConfig {
            default_page_size: 200,
            max_page_size: 100,
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let config = AppConfig {
            database_path: String::new(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("K", "25").unwrap(), 25);
        assert!(parse_positive("K", "0").is_err());
        assert!(parse_positive("K", "-3").is_err());
        assert!(parse_positive("K", "ten").is_err());
    }
}
