//! Per-flow configuration: provider choice, quota and transcript cap.

use serde::Deserialize;

use super::ai::ProviderKind;
use super::error::ValidationError;

/// Longest accepted quota window (one year).
pub const MAX_WINDOW_SECS: u64 = 365 * 86_400;

/// Shape accepted by the strategist endpoint in this process.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategistMode {
    /// `{messages}` in, `{content}` out.
    #[default]
    Conversation,
    /// `{idea}` in, `{strategy}` out.
    SingleShot,
}

/// Settings for one endpoint.
///
/// Unset quota fields fall back to the flow's shipped defaults when the
/// gateway is wired up.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Requests per client per window
    pub max_requests: Option<u32>,

    /// Window length in seconds
    pub window_secs: Option<u64>,

    /// Distinct clients tracked at once
    pub max_clients: Option<usize>,

    /// Longest caller transcript accepted
    pub max_history_turns: Option<usize>,

    /// Strategist only
    #[serde(default)]
    pub variant: StrategistMode,
}

impl FlowConfig {
    fn validate(&self, flow: &'static str) -> Result<(), ValidationError> {
        if self.max_requests == Some(0) {
            return Err(ValidationError::ZeroQuota { flow });
        }
        match self.window_secs {
            Some(0) => return Err(ValidationError::ZeroWindow { flow }),
            Some(secs) if secs > MAX_WINDOW_SECS => {
                return Err(ValidationError::WindowTooLong {
                    flow,
                    max_secs: MAX_WINDOW_SECS,
                })
            }
            _ => {}
        }
        if self.max_clients == Some(0) {
            return Err(ValidationError::ZeroCapacity { flow });
        }
        if self.max_history_turns == Some(0) {
            return Err(ValidationError::ZeroHistoryCap { flow });
        }
        Ok(())
    }
}

/// Both endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowsConfig {
    #[serde(default)]
    pub advocate: FlowConfig,

    #[serde(default)]
    pub strategist: FlowConfig,
}

impl FlowsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.advocate.validate("advocate")?;
        self.strategist.validate("strategist")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_quota_unset() {
        let config = FlowsConfig::default();
        assert_eq!(config.advocate.provider, ProviderKind::Groq);
        assert_eq!(config.advocate.max_requests, None);
        assert_eq!(config.strategist.variant, StrategistMode::Conversation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        let mut config = FlowsConfig::default();
        config.strategist.max_requests = Some(0);
        assert_eq!(
            config.validate(),
            Err(ValidationError::ZeroQuota { flow: "strategist" })
        );
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let mut config = FlowsConfig::default();
        config.advocate.window_secs = Some(0);
        assert_eq!(
            config.validate(),
            Err(ValidationError::ZeroWindow { flow: "advocate" })
        );
    }

    #[test]
    fn test_window_longer_than_a_year_is_rejected() {
        let mut config = FlowsConfig::default();
        config.advocate.window_secs = Some(10_000_000_000_000_000);
        assert_eq!(
            config.validate(),
            Err(ValidationError::WindowTooLong {
                flow: "advocate",
                max_secs: MAX_WINDOW_SECS,
            })
        );

        config.advocate.window_secs = Some(MAX_WINDOW_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_and_cap_are_rejected() {
        let mut config = FlowsConfig::default();
        config.advocate.max_clients = Some(0);
        assert!(config.validate().is_err());

        let mut config = FlowsConfig::default();
        config.strategist.max_history_turns = Some(0);
        assert_eq!(
            config.validate(),
            Err(ValidationError::ZeroHistoryCap { flow: "strategist" })
        );
    }
}
