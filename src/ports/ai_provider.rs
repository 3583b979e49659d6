//! AI Provider Port - Interface for hosted chat-completion backends.
//!
//! This port abstracts the remote text-completion service a flow talks to,
//! so the flow controller can generate completions without coupling to a
//! specific backend's request shape or failure modes.
//!
//! # Design
//!
//! - Provider-agnostic, role-tagged message format
//! - Configuration is checked separately from completion so a missing
//!   credential never costs a network round trip
//! - Providers declare whether they have a native system role; the prompt
//!   assembler picks the transcript shape from that, not from the flow
//! - One network attempt per call; callers see every failure
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     fn ensure_configured(&self) -> Result<(), AIError> {
//!         Ok(())
//!     }
//!
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::new(request.messages.last().map(|m| m.content.clone()).unwrap_or_default(), "echo"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{FlowKind, GenerationParams, TurnRole};
use crate::domain::foundation::ClientId;

/// Port for LLM backend interactions.
///
/// Implementations connect to an external chat service and translate
/// between its API and our message types.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Verifies credentials and configuration are present.
    ///
    /// Must not touch the network. Fails with [`AIError::NotConfigured`].
    fn ensure_configured(&self) -> Result<(), AIError>;

    /// Generate a single completion (non-streaming, single attempt).
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, model, system role handling).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full transcript, persona first, in the order the provider must see it.
    pub messages: Vec<Message>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request with required metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            max_tokens: None,
            temperature: None,
            metadata,
        }
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    /// Replaces the transcript.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Applies a flow's fixed generation constants.
    pub fn with_generation(mut self, params: GenerationParams) -> Self {
        self.temperature = Some(params.temperature);
        self.max_tokens = params.max_tokens;
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl From<TurnRole> for MessageRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => MessageRole::User,
            TurnRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Flow that issued the request.
    pub flow: FlowKind,
    /// Caller identity the quota was charged to.
    pub client_id: ClientId,
}

impl RequestMetadata {
    /// Creates new request metadata.
    pub fn new(flow: FlowKind, client_id: ClientId) -> Self {
        Self { flow, client_id }
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content.
    pub content: String,
    /// Token usage reported by the provider.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

impl CompletionResponse {
    /// Creates a response that stopped naturally with unknown usage.
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::zero(),
            model: model.into(),
            finish_reason: FinishReason::Stop,
        }
    }

    /// Sets token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Sets the finish reason.
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = reason;
        self
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Creates zero usage.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit max_tokens limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
    /// Anything else the provider reported.
    Other,
}

/// How a backend models persona instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRoleSupport {
    /// Accepts a leading `system` message.
    Native,
    /// No system slot; persona is replayed as an opening user/assistant exchange.
    Simulated,
}

/// Provider information and capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "groq", "gemini").
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// System role handling.
    pub system_role: SystemRoleSupport,
}

impl ProviderInfo {
    /// Creates new provider info with a native system role.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            system_role: SystemRoleSupport::Native,
        }
    }

    /// Sets system role handling.
    pub fn with_system_role(mut self, support: SystemRoleSupport) -> Self {
        self.system_role = support;
        self
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Credential or setting required before any call.
    #[error("provider not configured: missing {credential}")]
    NotConfigured {
        /// Name of the missing setting.
        credential: &'static str,
    },

    /// Rate limited by provider.
    #[error("rate limited by provider: {message}")]
    RateLimited {
        /// Upstream explanation.
        message: String,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key rejected by the provider.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request body.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl AIError {
    /// Creates a not-configured error.
    pub fn not_configured(credential: &'static str) -> Self {
        Self::NotConfigured { credential }
    }

    /// Creates a rate limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this is a deployment problem rather than an upstream one.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AIError::NotConfigured { .. })
    }

    /// Human-readable text safe to forward to a caller.
    ///
    /// Upstream messages are passed through; transport failures collapse to
    /// their display form, which never contains credentials.
    pub fn caller_message(&self) -> String {
        match self {
            AIError::RateLimited { message }
            | AIError::Unavailable { message } => message.clone(),
            AIError::ContentFiltered { reason } => format!("response blocked: {reason}"),
            AIError::AuthenticationFailed(message) | AIError::InvalidRequest(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_metadata() -> RequestMetadata {
        RequestMetadata::new(FlowKind::Advocate, ClientId::new("1.2.3.4"))
    }

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new(test_metadata())
            .with_message(MessageRole::System, "Be helpful")
            .with_message(MessageRole::User, "Hello")
            .with_max_tokens(100)
            .with_temperature(0.7);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1].role, MessageRole::User);
        assert_eq!(request.messages[1].content, "Hello");
        assert_eq!(request.max_tokens, Some(100));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.metadata.client_id.as_str(), "1.2.3.4");
    }

    #[test]
    fn with_generation_copies_flow_constants() {
        let request = CompletionRequest::new(test_metadata()).with_generation(GenerationParams {
            temperature: 0.6,
            max_tokens: None,
        });

        assert_eq!(request.temperature, Some(0.6));
        assert_eq!(request.max_tokens, None);
    }

    #[test]
    fn message_constructors_work() {
        assert_eq!(Message::system("x").role, MessageRole::System);
        assert_eq!(Message::user("x").role, MessageRole::User);
        assert_eq!(Message::assistant("x").role, MessageRole::Assistant);
    }

    #[test]
    fn turn_roles_map_to_message_roles() {
        assert_eq!(MessageRole::from(TurnRole::User), MessageRole::User);
        assert_eq!(MessageRole::from(TurnRole::Assistant), MessageRole::Assistant);
    }

    #[test]
    fn token_usage_calculates_total() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
        assert_eq!(TokenUsage::zero().total_tokens, 0);
    }

    #[test]
    fn token_usage_total_saturates() {
        let usage = TokenUsage::new(u32::MAX, 10);
        assert_eq!(usage.total_tokens, u32::MAX);
    }

    #[test]
    fn provider_info_defaults_to_native_system_role() {
        let info = ProviderInfo::new("groq", "llama-3.3-70b-versatile");
        assert_eq!(info.system_role, SystemRoleSupport::Native);

        let info = info.with_system_role(SystemRoleSupport::Simulated);
        assert_eq!(info.system_role, SystemRoleSupport::Simulated);
    }

    #[test]
    fn only_not_configured_is_a_configuration_error() {
        assert!(AIError::not_configured("ai.groq_api_key").is_configuration());
        assert!(!AIError::network("reset").is_configuration());
        assert!(!AIError::AuthenticationFailed("bad key".into()).is_configuration());
    }

    #[test]
    fn caller_message_forwards_upstream_text() {
        let err = AIError::unavailable("model overloaded");
        assert_eq!(err.caller_message(), "model overloaded");

        let err = AIError::Timeout { timeout_secs: 60 };
        assert_eq!(err.caller_message(), "request timed out after 60s");
    }

    #[test]
    fn message_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn ai_error_displays_correctly() {
        let err = AIError::not_configured("ai.gemini_api_key");
        assert_eq!(
            err.to_string(),
            "provider not configured: missing ai.gemini_api_key"
        );
    }
}
