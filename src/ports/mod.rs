//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the flow controller and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - hosted chat-completion backend
//! - `RateLimiter` - per-client quota registry

mod ai_provider;
mod rate_limiter;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, SystemRoleSupport, TokenUsage,
};
pub use rate_limiter::{
    DenialReason, RateLimitDenied, RateLimitError, RateLimitResult, RateLimitStatus, RateLimiter,
};
