//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::{info, warn};

use crate::config::DiConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error::{Error, Result};
use crate::logging::parse_log_level;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `DiConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix, `__` between nested keys
    ///    (e.g., `CQRS_REGISTRATION__HANDLER_LIFETIME=transient`)
    pub fn load(&self) -> Result<DiConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(DiConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                info!(path = %config_path.display(), "Configuration file loaded");
            } else {
                warn!(path = %config_path.display(), "Configuration file not found");
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            info!(path = %default_path.display(), "Configuration file loaded");
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let config: DiConfig = figment.extract().map_err(|e| {
            Error::configuration(format!("Failed to extract configuration: {e}"))
        })?;

        validate_config(&config)?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &DiConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config).map_err(|e| {
            Error::configuration_with_source("Failed to serialize config to TOML", e)
        })?;

        std::fs::write(path.as_ref(), toml_string)
            .map_err(|e| Error::configuration_with_source("Failed to write config file", e))?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join("cqrs").join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Validate configuration values
fn validate_config(config: &DiConfig) -> Result<()> {
    config.registration.validate()?;
    parse_log_level(&config.logging.level)?;
    Ok(())
}
