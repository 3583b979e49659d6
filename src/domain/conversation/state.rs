//! Per-request lifecycle of a flow invocation.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// Stages a request passes through, in fixed order.
///
/// Every stage may short-circuit straight to `Responded`; no stage may be
/// skipped forward or revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Received,
    ConfigChecked,
    RateChecked,
    PromptBuilt,
    ProviderCalled,
    Responded,
}

impl StateMachine for FlowState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FlowState::*;
        matches!(
            (self, target),
            (Received, ConfigChecked)
                | (ConfigChecked, RateChecked)
                | (RateChecked, PromptBuilt)
                | (PromptBuilt, ProviderCalled)
                | (Received, Responded)
                | (ConfigChecked, Responded)
                | (RateChecked, Responded)
                | (PromptBuilt, Responded)
                | (ProviderCalled, Responded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use FlowState::*;
        match self {
            Received => vec![ConfigChecked, Responded],
            ConfigChecked => vec![RateChecked, Responded],
            RateChecked => vec![PromptBuilt, Responded],
            PromptBuilt => vec![ProviderCalled, Responded],
            ProviderCalled => vec![Responded],
            Responded => vec![],
        }
    }
}
