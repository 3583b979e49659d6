//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PERSONA_GATEWAY` prefix and nested values use double underscores as separators.
//!
//! Every field has a default, so an empty environment yields a runnable
//! gateway whose flows answer with a configuration error until a provider key
//! is supplied.
//!
//! # Example
//!
//! ```no_run
//! use persona_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod flows;
mod server;

pub use ai::{AiConfig, ProviderKind};
pub use error::{ConfigError, ValidationError};
pub use flows::{FlowConfig, FlowsConfig, StrategistMode, MAX_WINDOW_SECS};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (keys, models, endpoints, timeout)
    #[serde(default)]
    pub ai: AiConfig,

    /// Per-endpoint provider choice and quotas
    #[serde(default)]
    pub flows: FlowsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PERSONA_GATEWAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PERSONA_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PERSONA_GATEWAY__AI__GROQ_API_KEY=...` -> `ai.groq_api_key = ...`
    /// - `PERSONA_GATEWAY__FLOWS__STRATEGIST__VARIANT=single_shot`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PERSONA_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Provider keys are not required here; a missing key surfaces per request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.flows.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "PERSONA_GATEWAY__AI__GROQ_API_KEY",
        "PERSONA_GATEWAY__AI__TIMEOUT_SECS",
        "PERSONA_GATEWAY__SERVER__PORT",
        "PERSONA_GATEWAY__SERVER__ENVIRONMENT",
        "PERSONA_GATEWAY__FLOWS__ADVOCATE__MAX_REQUESTS",
        "PERSONA_GATEWAY__FLOWS__STRATEGIST__PROVIDER",
        "PERSONA_GATEWAY__FLOWS__STRATEGIST__VARIANT",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.timeout_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_provider_key() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        env::set_var("PERSONA_GATEWAY__AI__GROQ_API_KEY", "gsk_test");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let key = config.ai.groq_api_key.expect("key loaded");
        assert_eq!(key.expose_secret(), "gsk_test");
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        env::set_var("PERSONA_GATEWAY__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        env::set_var("PERSONA_GATEWAY__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_flow_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        env::set_var("PERSONA_GATEWAY__FLOWS__ADVOCATE__MAX_REQUESTS", "5");
        env::set_var("PERSONA_GATEWAY__FLOWS__STRATEGIST__PROVIDER", "gemini");
        env::set_var("PERSONA_GATEWAY__FLOWS__STRATEGIST__VARIANT", "single_shot");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.flows.advocate.max_requests, Some(5));
        assert_eq!(config.flows.strategist.provider, ProviderKind::Gemini);
        assert_eq!(config.flows.strategist.variant, StrategistMode::SingleShot);
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        env::set_var("PERSONA_GATEWAY__AI__TIMEOUT_SECS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
