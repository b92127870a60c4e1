//! Integration layer constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "cqrs.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "CQRS";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "CQRS_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File stem used for rolling log files when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "cqrs";
