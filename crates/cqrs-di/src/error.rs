//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by configuration and bootstrap helpers
///
/// Handler registration itself never fails; resolution failures surface as
/// [`cqrs_container::ResolveError`] straight from the provider.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error without a source
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error wrapping `source`
    pub fn configuration_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
