//! Configuration
//!
//! Registration lifetimes, provider options and logging settings, loaded
//! with Figment from defaults, an optional TOML file and `CQRS_` environment
//! variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{DiConfig, LoggingConfig, RegistrationOptions};
