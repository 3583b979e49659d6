//! Rate limiter adapters.
//!
//! ## Usage
//!
//! ```ignore
//! use persona_gateway::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
//!
//! // One registry per flow
//! let advocate = InMemoryRateLimiter::new(RateLimitConfig::advocate());
//! let strategist = InMemoryRateLimiter::new(RateLimitConfig::strategist_conversation());
//! ```

mod config;
mod in_memory;

pub use config::{RateLimitConfig, DEFAULT_MAX_CLIENTS, ONE_DAY_SECS};
pub use in_memory::InMemoryRateLimiter;
