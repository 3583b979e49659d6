//! Terminal outcome of a flow invocation.

/// Tagged result the Error Normalizer turns into a wire response.
///
/// Every variant carries caller-facing text only; transport details and
/// credentials are stripped before a value is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResult {
    /// Completion text from the provider.
    Ok(String),
    /// Caller exceeded their quota (or the registry is saturated).
    RateLimited(String),
    /// Upstream backend or transport failure.
    ProviderError(String),
    /// Deployment misconfiguration, never caller-caused.
    ConfigError(String),
    /// Input the gateway refuses to forward.
    MalformedInput(String),
}

impl GatewayResult {
    /// The caller-facing text regardless of outcome.
    pub fn message(&self) -> &str {
        match self {
            GatewayResult::Ok(text)
            | GatewayResult::RateLimited(text)
            | GatewayResult::ProviderError(text)
            | GatewayResult::ConfigError(text)
            | GatewayResult::MalformedInput(text) => text,
        }
    }

    /// Stable label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayResult::Ok(_) => "ok",
            GatewayResult::RateLimited(_) => "rate_limited",
            GatewayResult::ProviderError(_) => "provider_error",
            GatewayResult::ConfigError(_) => "config_error",
            GatewayResult::MalformedInput(_) => "malformed_input",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, GatewayResult::Ok(_))
    }
}
