//! In-memory sliding-window rate limiter.
//!
//! Each client gets a window that opens on its first request and lasts
//! `window_secs`. Expired windows are dropped lazily when the client next
//! shows up, or in bulk when the registry reaches capacity.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::foundation::{ClientId, Timestamp};
use crate::ports::{
    DenialReason, RateLimitDenied, RateLimitError, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

/// Process-local quota registry for one flow.
///
/// Backed by a sharded map: requests from different clients lock different
/// shards, and the entry guard makes expire-or-deny-or-increment a single
/// step for one client.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, ClientWindow>,
}

/// Counter for a single client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClientWindow {
    count: u32,
    expiry: Timestamp,
}

impl ClientWindow {
    fn open(now: Timestamp, window_secs: u64) -> Self {
        Self {
            count: 1,
            expiry: now.plus_secs(window_secs),
        }
    }

    fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expiry)
    }
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Number of windows currently stored, expired or not.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Drops every window that has expired at `now`. Returns how many went.
    pub fn purge_expired(&self, now: Timestamp) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_expired(&now));
        before.saturating_sub(self.windows.len())
    }

    /// Live request count for a client, `None` when absent or expired.
    pub fn count_for(&self, client: &ClientId, now: Timestamp) -> Option<u32> {
        self.windows
            .get(client.as_str())
            .filter(|window| !window.is_expired(&now))
            .map(|window| window.count)
    }

    /// Whether a previously unseen client may be admitted at `now`.
    ///
    /// Runs before the entry guard is taken; `len` locks every shard.
    fn has_room_for(&self, client: &ClientId, now: Timestamp) -> bool {
        if self.windows.contains_key(client.as_str()) {
            return true;
        }
        if self.windows.len() < self.config.max_clients {
            return true;
        }
        let purged = self.purge_expired(now);
        tracing::debug!(purged, "rate limit registry at capacity, purged expired windows");
        self.windows.len() < self.config.max_clients
    }

    fn allowed(&self, window: &ClientWindow) -> RateLimitResult {
        RateLimitResult::Allowed(RateLimitStatus {
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(window.count),
            reset_at: window.expiry,
            window_secs: self.config.window_secs,
        })
    }

    fn denied(&self, retry_after_secs: u64, reason: DenialReason) -> RateLimitResult {
        RateLimitResult::Denied(RateLimitDenied {
            limit: self.config.max_requests,
            retry_after_secs: retry_after_secs.max(1),
            window_secs: self.config.window_secs,
            reason,
        })
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(
        &self,
        client: &ClientId,
        now: Timestamp,
    ) -> Result<RateLimitResult, RateLimitError> {
        if self.config.max_requests == 0 {
            return Ok(self.denied(self.config.window_secs, DenialReason::QuotaExhausted));
        }

        if !self.has_room_for(client, now) {
            tracing::warn!(
                client = %client,
                max_clients = self.config.max_clients,
                "rate limit registry full, refusing new client"
            );
            return Ok(self.denied(self.config.window_secs, DenialReason::RegistryFull));
        }

        let result = match self.windows.entry(client.as_str().to_string()) {
            Entry::Vacant(vacant) => {
                let window = ClientWindow::open(now, self.config.window_secs);
                vacant.insert(window);
                self.allowed(&window)
            }
            Entry::Occupied(mut occupied) => {
                let window = occupied.get_mut();
                if window.is_expired(&now) {
                    *window = ClientWindow::open(now, self.config.window_secs);
                    self.allowed(window)
                } else if window.count >= self.config.max_requests {
                    self.denied(window.expiry.secs_since(&now), DenialReason::QuotaExhausted)
                } else {
                    window.count += 1;
                    self.allowed(window)
                }
            }
        };

        Ok(result)
    }

    async fn status(
        &self,
        client: &ClientId,
        now: Timestamp,
    ) -> Result<RateLimitStatus, RateLimitError> {
        let (count, reset_at) = self
            .windows
            .get(client.as_str())
            .filter(|window| !window.is_expired(&now))
            .map(|window| (window.count, window.expiry))
            .unwrap_or((0, now.plus_secs(self.config.window_secs)));

        Ok(RateLimitStatus {
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(count),
            reset_at,
            window_secs: self.config.window_secs,
        })
    }

    async fn reset(&self, client: &ClientId) -> Result<(), RateLimitError> {
        self.windows.remove(client.as_str());
        Ok(())
    }
}
