//! Logging initialization tests

use cqrs_di::LoggingConfig;
use cqrs_di::logging::init_logging;

#[test]
fn test_init_logging_installs_subscriber_once() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        ..LoggingConfig::default()
    };

    init_logging(&config).expect("first initialization succeeds");

    let second = init_logging(&config);
    assert!(second.is_err(), "a global subscriber is already installed");
}

#[test]
fn test_init_logging_rejects_invalid_level() {
    let config = LoggingConfig {
        level: "chatty".to_string(),
        ..LoggingConfig::default()
    };

    assert!(init_logging(&config).is_err());
}
