//! Rate limit configuration types.
//!
//! One [`RateLimitConfig`] per flow. The presets carry the quotas each
//! endpoint shipped with; deployments override them through `config::flows`.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::FlowVariant;

/// Seconds in the default quota window.
pub const ONE_DAY_SECS: u64 = 86_400;

/// Default bound on distinct clients tracked per registry.
pub const DEFAULT_MAX_CLIENTS: usize = 10_000;

/// Quota for a single flow's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per client per window.
    pub max_requests: u32,
    /// Window length, measured from the client's first request in it.
    pub window_secs: u64,
    /// Distinct clients the registry will track at once.
    pub max_clients: usize,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            max_clients: DEFAULT_MAX_CLIENTS,
        }
    }

    /// 20 messages per visitor per day.
    pub fn advocate() -> Self {
        Self::new(20, ONE_DAY_SECS)
    }

    /// 10 strategy turns per visitor per day.
    pub fn strategist_conversation() -> Self {
        Self::new(10, ONE_DAY_SECS)
    }

    /// 2 single-shot analyses per visitor per day.
    pub fn strategist_single_shot() -> Self {
        Self::new(2, ONE_DAY_SECS)
    }

    /// Preset for a flow variant.
    pub fn for_variant(variant: FlowVariant) -> Self {
        match variant {
            FlowVariant::Advocate => Self::advocate(),
            FlowVariant::StrategistConversation => Self::strategist_conversation(),
            FlowVariant::StrategistSingleShot => Self::strategist_single_shot(),
        }
    }

    /// Sets the registry capacity.
    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::advocate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_shipped_quotas() {
        assert_eq!(RateLimitConfig::advocate().max_requests, 20);
        assert_eq!(RateLimitConfig::strategist_conversation().max_requests, 10);
        assert_eq!(RateLimitConfig::strategist_single_shot().max_requests, 2);
    }

    #[test]
    fn presets_use_a_one_day_window() {
        for variant in [
            FlowVariant::Advocate,
            FlowVariant::StrategistConversation,
            FlowVariant::StrategistSingleShot,
        ] {
            assert_eq!(RateLimitConfig::for_variant(variant).window_secs, ONE_DAY_SECS);
        }
    }

    #[test]
    fn with_max_clients_overrides_capacity() {
        let config = RateLimitConfig::new(5, 60).with_max_clients(3);
        assert_eq!(config.max_clients, 3);
        assert_eq!(RateLimitConfig::new(5, 60).max_clients, DEFAULT_MAX_CLIENTS);
    }

    #[test]
    fn config_serializes_to_json() {
        let json = serde_json::to_string(&RateLimitConfig::advocate()).unwrap();
        assert!(json.contains("\"max_requests\":20"));
    }
}
