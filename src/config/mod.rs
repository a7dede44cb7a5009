//! # Configuration
//!
//! Strongly typed service configuration. Values come from built-in defaults,
//! an optional TOML file and `PROCESS_MINING__*` environment overrides; see
//! [`ConfigLoader`] for the precedence rules.

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Root configuration for the service
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment (`development`, `test`, `production`)
    pub environment: String,
    pub web: WebConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub assistant: AssistantConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WebConfig {
    /// Address to bind the web server to
    pub bind_address: String,

    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Prefix for `next`/`previous` pagination links, e.g. `https://dashboard.example.com`.
    /// Links are path-relative when unset.
    pub public_base_url: Option<String>,

    /// Whether permissive CORS headers are added
    pub cors_enabled: bool,
}

/// Database pool configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

/// Limits applied to `page_size`
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

/// External AI assistant collaborator
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    pub enabled: bool,

    /// Chat-completions endpoint of the provider
    pub endpoint: String,

    pub model: String,

    /// Bearer token sent to the provider. Never logged.
    pub api_key: Option<String>,

    /// Upper bound on a single provider call
    pub timeout_ms: u64,

    pub system_prompt: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            web: WebConfig::default(),
            database: DatabaseConfig::default(),
            pagination: PaginationConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_ms: 30000,
            public_base_url: None,
            cors_enabled: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/process_mining".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_ms: 20000,
            system_prompt: "You are an assistant for a process mining dashboard. \
                            Answer questions about cases, activities, variants and KPIs."
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.web.bind_address.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "bind_address",
                "web",
            ));
        }
        if self.web.request_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "web.request_timeout_ms",
                self.web.request_timeout_ms,
                "must be greater than zero",
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                self.database.max_connections,
                "must be greater than zero",
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigurationError::invalid_value(
                "database.min_connections",
                self.database.min_connections,
                "must not exceed max_connections",
            ));
        }
        if self.pagination.default_page_size == 0 || self.pagination.max_page_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "pagination",
                format!(
                    "{}/{}",
                    self.pagination.default_page_size, self.pagination.max_page_size
                ),
                "page sizes must be greater than zero",
            ));
        }
        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(ConfigurationError::invalid_value(
                "pagination.default_page_size",
                self.pagination.default_page_size,
                "must not exceed max_page_size",
            ));
        }
        if self.assistant.enabled {
            if self.assistant.endpoint.trim().is_empty() {
                return Err(ConfigurationError::missing_required_field(
                    "endpoint",
                    "assistant (enabled)",
                ));
            }
            if self.assistant.timeout_ms == 0 {
                return Err(ConfigurationError::invalid_value(
                    "assistant.timeout_ms",
                    self.assistant.timeout_ms,
                    "must be greater than zero",
                ));
            }
            // Otherwise the request timeout answers 408 before the provider timeout surfaces
            if self.assistant.timeout_ms >= self.web.request_timeout_ms {
                return Err(ConfigurationError::invalid_value(
                    "assistant.timeout_ms",
                    self.assistant.timeout_ms,
                    "must be below web.request_timeout_ms",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.default_page_size, 100_000);
        assert!(!config.assistant.enabled);
    }

    #[test]
    fn test_enabled_assistant_requires_endpoint() {
        let mut config = AppConfig::default();
        config.assistant.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingRequiredField { .. }
        ));

        config.assistant.endpoint = "http://localhost:9999/v1/chat/completions".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_assistant_timeout_must_be_below_request_timeout() {
        let mut config = AppConfig::default();
        config.assistant.enabled = true;
        config.assistant.endpoint = "http://localhost:9999/v1/chat/completions".to_string();

        config.assistant.timeout_ms = config.web.request_timeout_ms;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));

        config.assistant.timeout_ms = config.web.request_timeout_ms + 5000;
        assert!(config.validate().is_err());

        config.assistant.timeout_ms = config.web.request_timeout_ms - 1;
        assert!(config.validate().is_ok());

        // A disabled assistant never races the request timeout
        config.assistant.enabled = false;
        config.assistant.timeout_ms = config.web.request_timeout_ms * 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_page_size_cannot_exceed_max() {
        let mut config = AppConfig::default();
        config.pagination.max_page_size = 50;
        config.pagination.default_page_size = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_connections_bounded_by_max() {
        let mut config = AppConfig::default();
        config.database.min_connections = 20;
        config.database.max_connections = 5;
        assert!(config.validate().is_err());
    }
}
