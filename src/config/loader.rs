//! Configuration Loader
//!
//! Layered loading, lowest precedence first:
//! 0. `.env` file, if present (via dotenvy)
//! 1. Built-in defaults from [`AppConfig::default`]
//! 2. TOML file from `PROCESS_MINING_CONFIG_PATH`, else `config/process-mining.toml` when it exists
//! 3. `PROCESS_MINING__SECTION__FIELD` environment variables
//! 4. `DATABASE_URL`, when set, for `database.url`
//!
//! The merged result is validated before it is returned.

use std::env;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::AppConfig;
use crate::constants::system::{CONFIG_PATH_ENV, ENV_PREFIX};

const DEFAULT_CONFIG_FILE: &str = "config/process-mining.toml";

/// Zero-state utility struct providing configuration loading functions
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration using the standard source discovery
    pub fn load() -> ConfigResult<AppConfig> {
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded environment from .env file");
        }

        let path = match env::var(CONFIG_PATH_ENV) {
            Ok(explicit) if !explicit.trim().is_empty() => {
                let path = PathBuf::from(explicit);
                if !path.exists() {
                    return Err(ConfigurationError::ConfigFileNotFound { path });
                }
                Some(path)
            }
            _ => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.exists().then_some(fallback)
            }
        };

        Self::load_from(path.as_deref())
    }

    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load_from(path: Option<&Path>) -> ConfigResult<AppConfig> {
        let defaults = Config::try_from(&AppConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigurationError::ConfigFileNotFound {
                    path: path.to_path_buf(),
                });
            }
            debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                config.database.url = url;
            }
        }

        config.validate()?;

        info!(
            environment = %config.environment,
            bind_address = %config.web.bind_address,
            default_page_size = config.pagination.default_page_size,
            assistant_enabled = config.assistant.enabled,
            "Configuration loaded successfully"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file = write_config(
            r#"
            environment = "test"

            [web]
            bind_address = "127.0.0.1:9100"
            public_base_url = "https://dashboard.example.com"

            [pagination]
            default_page_size = 50
            max_page_size = 500
            "#,
        );

        let config = ConfigLoader::load_from(Some(file.path())).expect("config loads");
        assert_eq!(config.environment, "test");
        assert_eq!(config.web.bind_address, "127.0.0.1:9100");
        assert_eq!(
            config.web.public_base_url.as_deref(),
            Some("https://dashboard.example.com")
        );
        assert_eq!(config.pagination.default_page_size, 50);
        // Untouched sections keep their defaults
        assert_eq!(config.web.request_timeout_ms, 30000);
        assert_eq!(config.assistant.timeout_ms, 20000);
    }

    #[test]
    fn test_invalid_file_values_fail_validation() {
        let file = write_config(
            r#"
            [assistant]
            enabled = true
            endpoint = ""
            "#,
        );

        let err = ConfigLoader::load_from(Some(file.path())).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingRequiredField { .. }
        ));
    }

    #[test]
    fn test_bundled_config_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_FILE);
        let config = ConfigLoader::load_from(Some(&path)).expect("bundled config loads");

        assert!(!config.assistant.enabled);
        assert_eq!(config.pagination, AppConfig::default().pagination);
        assert_eq!(config.web.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = ConfigLoader::load_from(Some(Path::new("/nonexistent/process-mining.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::ConfigFileNotFound { .. }));
    }
}
