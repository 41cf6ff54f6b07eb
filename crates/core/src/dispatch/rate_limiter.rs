//! Fixed-window admission control
//!
//! Requests are counted per wall-clock minute (`floor(unix_seconds / 60)`).
//! Each window has its own counter in the shared [`CounterStore`], created
//! on first use with a one-minute TTL, so stale windows are never consulted
//! again and simply expire.

use std::sync::Arc;
use std::time::Duration;

use jiralink_domain::constants::{RATE_LIMIT_KEY_PREFIX, RATE_WINDOW_SECS};
use jiralink_domain::{JiraError, RateLimitConfig, Result};
use tracing::debug;

use crate::ports::{Clock, CounterOutcome, CounterStore};

/// Result of a successful admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Window the request was counted in
    pub bucket: u64,
    /// Requests admitted in that window so far, this one included. Zero when
    /// limiting is disabled.
    pub count: u64,
}

/// Per-minute request ceiling shared by every dispatcher using the same
/// counter store
pub struct RateLimiter {
    counters: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    ceiling: u64,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(
        config: &RateLimitConfig,
        counters: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            counters,
            clock,
            ceiling: config.max_requests_per_minute,
            enabled: config.enabled,
        }
    }

    /// Store key of the counter for `bucket`.
    pub fn window_key(bucket: u64) -> String {
        format!("{RATE_LIMIT_KEY_PREFIX}:{bucket}")
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Count one request attempt against the current window.
    ///
    /// # Errors
    /// - `JiraError::RateLimited` (local origin) when the window is full.
    ///   `retry_after` is the time left until the next window opens.
    /// - `JiraError::Storage` when the counter store fails.
    pub async fn admit(&self) -> Result<Admission> {
        let now = self.clock.unix_seconds();
        let bucket = now / RATE_WINDOW_SECS;

        if !self.enabled {
            return Ok(Admission { bucket, count: 0 });
        }

        let key = Self::window_key(bucket);
        let ttl = Duration::from_secs(RATE_WINDOW_SECS);

        match self.counters.increment_below(&key, self.ceiling, ttl).await? {
            CounterOutcome::Admitted { count } => {
                debug!(bucket, count, ceiling = self.ceiling, "Request admitted");
                Ok(Admission { bucket, count })
            }
            CounterOutcome::Rejected { count } => {
                let retry_after = Duration::from_secs(RATE_WINDOW_SECS - now % RATE_WINDOW_SECS);
                debug!(bucket, count, ceiling = self.ceiling, ?retry_after, "Request rejected");
                Err(JiraError::local_rate_limit(self.ceiling, retry_after))
            }
        }
    }

    /// Requests admitted so far in the current window.
    ///
    /// # Errors
    /// Returns `JiraError::Storage` when the counter store fails.
    pub async fn used_in_current_window(&self) -> Result<u64> {
        let bucket = self.clock.unix_seconds() / RATE_WINDOW_SECS;
        self.counters.current(&Self::window_key(bucket)).await
    }
}
