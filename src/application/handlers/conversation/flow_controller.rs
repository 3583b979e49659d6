//! Flow controller: one request through config check, quota, prompt and
//! provider.
//!
//! The same controller serves every flow; a [`FlowSpec`] supplies the
//! persona, history policy, generation constants and user-facing copy. Step
//! order is fixed:
//!
//! 1. `Received` - input decoded, client identified
//! 2. `ConfigChecked` - provider credential present (no quota spent otherwise)
//! 3. `RateChecked` - quota consumed or request denied
//! 4. `PromptBuilt` - transcript assembled for the active provider
//! 5. `ProviderCalled` - single completion attempt
//! 6. `Responded` - terminal, with a [`GatewayResult`]
//!
//! Every stage may jump straight to `Responded`. No lock is held across the
//! provider call; the limiter's critical section ends before step 4.

use std::sync::Arc;

use crate::domain::conversation::{FlowSpec, FlowState, GatewayResult};
use crate::domain::foundation::{ClientId, StateMachine, Timestamp};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, DenialReason, RateLimitResult, RateLimiter,
    RequestMetadata,
};

use super::prompt_assembler::{FlowInput, PromptAssembler};

/// Characters of caller input echoed into logs.
const PREVIEW_CHARS: usize = 50;

/// Terminal result plus the lifecycle path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub result: GatewayResult,
    /// Visited states in order, always starting at `Received` and ending at
    /// `Responded`.
    pub states: Vec<FlowState>,
}

impl FlowOutcome {
    /// True if the request passed through `state`.
    pub fn visited(&self, state: FlowState) -> bool {
        self.states.contains(&state)
    }
}

/// Records the path through [`FlowState`].
struct Lifecycle {
    current: FlowState,
    visited: Vec<FlowState>,
}

impl Lifecycle {
    fn start() -> Self {
        Self {
            current: FlowState::Received,
            visited: vec![FlowState::Received],
        }
    }

    fn advance(&mut self, next: FlowState) {
        if let Err(err) = self.current.transition_to(next) {
            tracing::error!(error = %err, "flow lifecycle out of order");
        }
        self.current = next;
        self.visited.push(next);
    }

    fn respond(mut self, result: GatewayResult) -> FlowOutcome {
        self.advance(FlowState::Responded);
        FlowOutcome {
            result,
            states: self.visited,
        }
    }
}

/// Orchestrates a single flow.
pub struct FlowController {
    spec: FlowSpec,
    provider: Arc<dyn AIProvider>,
    limiter: Arc<dyn RateLimiter>,
}

impl FlowController {
    /// Creates a controller. The limiter must be dedicated to this flow.
    pub fn new(
        spec: FlowSpec,
        provider: Arc<dyn AIProvider>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            spec,
            provider,
            limiter,
        }
    }

    pub fn spec(&self) -> &FlowSpec {
        &self.spec
    }

    pub fn limiter(&self) -> &Arc<dyn RateLimiter> {
        &self.limiter
    }

    /// Handles a request at the current time.
    pub async fn handle(&self, client: &ClientId, input: FlowInput) -> FlowOutcome {
        self.handle_at(client, input, Timestamp::now()).await
    }

    /// Handles a request as of `now`.
    pub async fn handle_at(
        &self,
        client: &ClientId,
        input: FlowInput,
        now: Timestamp,
    ) -> FlowOutcome {
        let flow = self.spec.kind();
        let lifecycle = Lifecycle::start();

        tracing::info!(
            flow = %flow,
            client = %client,
            msg_count = input.turn_count(),
            input_preview = %preview(input.latest_user_text()),
            "flow request received"
        );

        if let Some(max) = self.spec.max_history_turns {
            if input.turn_count() > max {
                let reason = format!("conversation exceeds {} turns", max);
                return self.respond_malformed(lifecycle, client, &reason);
            }
        }

        self.run(lifecycle, client, input, now).await
    }

    /// Responds to input that could not be decoded at all.
    pub fn reject(&self, client: &ClientId, reason: &str) -> FlowOutcome {
        tracing::info!(
            flow = %self.spec.kind(),
            client = %client,
            "flow request received"
        );
        self.respond_malformed(Lifecycle::start(), client, reason)
    }

    async fn run(
        &self,
        mut lifecycle: Lifecycle,
        client: &ClientId,
        input: FlowInput,
        now: Timestamp,
    ) -> FlowOutcome {
        let flow = self.spec.kind();
        let variant = self.spec.variant;

        // Config first: a misconfigured server must not burn caller quota.
        if let Err(err) = self.provider.ensure_configured() {
            tracing::error!(
                flow = %flow,
                client = %client,
                outcome = "config_error",
                error = %err,
                "provider not configured"
            );
            return lifecycle.respond(GatewayResult::ConfigError(variant.config_error_message()));
        }
        lifecycle.advance(FlowState::ConfigChecked);

        match self.limiter.check(client, now).await {
            Ok(RateLimitResult::Allowed(status)) => {
                tracing::debug!(
                    flow = %flow,
                    client = %client,
                    remaining = status.remaining,
                    "quota consumed"
                );
            }
            Ok(RateLimitResult::Denied(denied)) => {
                tracing::warn!(
                    flow = %flow,
                    client = %client,
                    outcome = "rate_limited",
                    limit = denied.limit,
                    retry_after_secs = denied.retry_after_secs,
                    reason = ?denied.reason,
                    "request blocked by rate limiter"
                );
                let message = match denied.reason {
                    DenialReason::QuotaExhausted => {
                        variant.rate_limited_message(denied.limit, denied.window_secs)
                    }
                    DenialReason::RegistryFull => variant.capacity_message(),
                };
                return lifecycle.respond(GatewayResult::RateLimited(message));
            }
            Err(err) => {
                // Fail open
                tracing::warn!(flow = %flow, client = %client, error = %err, "rate limiter unavailable");
            }
        }
        lifecycle.advance(FlowState::RateChecked);

        let assembler = PromptAssembler::for_provider(&self.provider.provider_info());
        let messages = assembler.build(&self.spec, &input, &now);
        let request = CompletionRequest::new(RequestMetadata::new(flow, client.clone()))
            .with_messages(messages)
            .with_generation(self.spec.generation);
        lifecycle.advance(FlowState::PromptBuilt);

        let completion = self.provider.complete(request).await;
        lifecycle.advance(FlowState::ProviderCalled);

        let result = match completion {
            Ok(response) => {
                let content = if response.content.trim().is_empty() {
                    variant.empty_completion_fallback().to_string()
                } else {
                    response.content
                };
                tracing::info!(
                    flow = %flow,
                    client = %client,
                    outcome = "ok",
                    model = %response.model,
                    total_tokens = response.usage.total_tokens,
                    "flow request succeeded"
                );
                GatewayResult::Ok(content)
            }
            Err(err) => self.provider_failure(client, err),
        };

        lifecycle.respond(result)
    }

    fn provider_failure(&self, client: &ClientId, err: AIError) -> GatewayResult {
        let flow = self.spec.kind();
        let variant = self.spec.variant;

        if err.is_configuration() {
            tracing::error!(
                flow = %flow,
                client = %client,
                outcome = "config_error",
                error = %err,
                "provider reported missing configuration"
            );
            return GatewayResult::ConfigError(variant.config_error_message());
        }

        tracing::error!(
            flow = %flow,
            client = %client,
            outcome = "provider_error",
            error = %err,
            "provider call failed"
        );
        GatewayResult::ProviderError(variant.provider_error_message(&err.caller_message()))
    }

    fn respond_malformed(
        &self,
        lifecycle: Lifecycle,
        client: &ClientId,
        reason: &str,
    ) -> FlowOutcome {
        tracing::warn!(
            flow = %self.spec.kind(),
            client = %client,
            outcome = "malformed_input",
            reason,
            "request rejected"
        );
        lifecycle.respond(GatewayResult::MalformedInput(
            self.spec.variant.malformed_input_message(reason),
        ))
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`.
fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
