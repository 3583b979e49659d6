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
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid provider timeout")]
    InvalidTimeout,

    #[error("{flow} quota must admit at least one request")]
    ZeroQuota { flow: &'static str },

    #[error("{flow} quota window must be at least one second")]
    ZeroWindow { flow: &'static str },

    #[error("{flow} quota window must not exceed {max_secs} seconds")]
    WindowTooLong { flow: &'static str, max_secs: u64 },

    #[error("{flow} registry must track at least one client")]
    ZeroCapacity { flow: &'static str },

    #[error("{flow} history cap must allow at least one turn")]
    ZeroHistoryCap { flow: &'static str },

    #[error("Invalid base URL for {provider}: {url}")]
    InvalidBaseUrl { provider: &'static str, url: String },
}
