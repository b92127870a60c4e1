//! Configuration types

use std::path::PathBuf;

use cqrs_container::{Lifetime, ProviderOptions, ServiceCollection, ServiceProvider};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_LEVEL;
use crate::error::{Error, Result};

/// Root configuration for the integration layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiConfig {
    /// Lifetimes used by the registration extensions
    pub registration: RegistrationOptions,
    /// Options for providers built from the collection
    pub provider: ProviderOptions,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl DiConfig {
    /// Build the root provider for `services` with the configured options
    pub fn build_provider(&self, services: &ServiceCollection) -> ServiceProvider {
        services.build_provider(self.provider.clone())
    }
}

/// Lifetimes applied by `add_command_handlers` / `add_query_handlers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationOptions {
    /// Lifetime of each discovered handler binding
    pub handler_lifetime: Lifetime,
    /// Lifetime of the handler factory registration
    pub factory_lifetime: Lifetime,
    /// Lifetime of the executor registration
    pub executor_lifetime: Lifetime,
}

impl Default for RegistrationOptions {
    fn default() -> Self {
        Self {
            handler_lifetime: Lifetime::Scoped,
            factory_lifetime: Lifetime::Scoped,
            executor_lifetime: Lifetime::Scoped,
        }
    }
}

impl RegistrationOptions {
    /// Reject lifetimes where a longer-lived service would hold a cached
    /// shorter-lived one
    pub fn validate(&self) -> Result<()> {
        if is_captive(self.factory_lifetime, self.handler_lifetime) {
            return Err(Error::configuration(format!(
                "Handler factory lifetime '{}' cannot resolve '{}' handlers",
                self.factory_lifetime, self.handler_lifetime
            )));
        }
        if is_captive(self.executor_lifetime, self.factory_lifetime) {
            return Err(Error::configuration(format!(
                "Executor lifetime '{}' cannot capture a '{}' handler factory",
                self.executor_lifetime, self.factory_lifetime
            )));
        }
        Ok(())
    }
}

// Transient dependencies are rebuilt on each request and never captured
fn is_captive(owner: Lifetime, dependency: Lifetime) -> bool {
    owner.outlives(dependency) && dependency != Lifetime::Transient
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON formatted events
    pub json_format: bool,
    /// Also write to a daily rolling file at this path
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}
