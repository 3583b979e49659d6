//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - hosted LLM providers (Groq, Gemini) and a mock
//! - `rate_limiter` - in-memory sliding-window quota registry
//! - `http` - axum router for the gateway endpoints

pub mod ai;
pub mod http;
pub mod rate_limiter;

pub use ai::{GeminiProvider, GroqProvider, MockAIProvider};
pub use http::{gateway_router, GatewayAppState};
pub use rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
