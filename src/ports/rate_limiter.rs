//! Rate limiting port for protecting the completion backend.
//!
//! This port defines the per-client quota check each flow performs before
//! building a prompt. Each flow owns an independent limiter instance.

use async_trait::async_trait;

use crate::domain::foundation::{ClientId, Timestamp};

/// Port for rate limiting operations.
///
/// Implementations must be thread-safe. Check-and-consume is indivisible per
/// client: concurrent requests from one client can never be admitted past
/// the limit.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if a request from `client` is allowed at `now`, consuming one
    /// unit of quota if so.
    ///
    /// A denied request does not count against future quota.
    async fn check(
        &self,
        client: &ClientId,
        now: Timestamp,
    ) -> Result<RateLimitResult, RateLimitError>;

    /// Current quota for `client` without consuming any.
    ///
    /// Operator hook; the request path only calls [`RateLimiter::check`].
    async fn status(
        &self,
        client: &ClientId,
        now: Timestamp,
    ) -> Result<RateLimitStatus, RateLimitError>;

    /// Clear the window for `client`, restoring full quota.
    ///
    /// Operator hook; the request path only calls [`RateLimiter::check`].
    async fn reset(&self, client: &ClientId) -> Result<(), RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed; includes current status.
    Allowed(RateLimitStatus),
    /// Request is denied; includes denial details.
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    /// Returns true if the request was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    /// Returns true if the request was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset_at: Timestamp,
    /// Window duration in seconds.
    pub window_secs: u64,
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The client used up its quota for the current window.
    QuotaExhausted,
    /// The registry is at capacity and cannot track another client.
    RegistryFull,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDenied {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Seconds until the client should retry.
    pub retry_after_secs: u64,
    /// Window duration in seconds.
    pub window_secs: u64,
    /// What triggered the denial.
    pub reason: DenialReason,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Rate limiter backend is unavailable.
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_result_is_allowed_works() {
        let status = RateLimitStatus {
            limit: 20,
            remaining: 19,
            reset_at: Timestamp::now(),
            window_secs: 86_400,
        };
        let result = RateLimitResult::Allowed(status);
        assert!(result.is_allowed());
        assert!(!result.is_denied());
    }

    #[test]
    fn rate_limit_result_is_denied_works() {
        let denied = RateLimitDenied {
            limit: 20,
            retry_after_secs: 30,
            window_secs: 86_400,
            reason: DenialReason::QuotaExhausted,
        };
        let result = RateLimitResult::Denied(denied);
        assert!(result.is_denied());
        assert!(!result.is_allowed());
    }

    #[test]
    fn error_displays_backend_message() {
        let err = RateLimitError::Unavailable("shard poisoned".into());
        assert_eq!(err.to_string(), "rate limiter unavailable: shard poisoned");
    }
}
