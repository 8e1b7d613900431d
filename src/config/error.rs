//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Log level filter cannot be empty")]
    EmptyLogLevel,

    #[error("Sweep interval must be positive when session expiry is enabled")]
    InvalidSweepInterval,

    #[error("Sweep interval must not exceed the session TTL")]
    SweepIntervalExceedsTtl,

    #[error("max_in_flight must be between 1 and 10000")]
    InvalidMaxInFlight,
}
