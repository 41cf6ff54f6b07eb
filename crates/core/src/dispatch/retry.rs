//! Retry decisions for the opt-in retrying send

use std::time::Duration;

use jiralink_domain::constants::MAX_RETRY_BACKOFF_SECS;
use jiralink_domain::{JiraConfig, JiraError};

/// Exponential backoff policy
///
/// `max_attempts` counts the initial try, so `3` means at most two retries.
/// The n-th retry waits `base_delay * 2^(n-1)`, capped at `max_delay`, or the
/// server's `Retry-After` when that is longer. A `Retry-After` beyond
/// `max_delay` ends the retry loop so the rate-limit error reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&JiraConfig::new("", "", ""))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(MAX_RETRY_BACKOFF_SECS),
        }
    }

    pub fn from_config(config: &JiraConfig) -> Self {
        Self::new(config.retry_attempts, config.retry_delay())
    }

    /// Single attempt, never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff before retry number `retry_number` (1-based).
    pub fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        let multiplier = 1u32 << shift;
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }

    /// Delay before retrying after `error` on attempt `attempt` (1-based), or
    /// `None` when the call should give up.
    pub fn delay_after(&self, attempt: u32, error: &JiraError) -> Option<Duration> {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return None;
        }

        let backoff = self.backoff_delay(attempt);
        match error.retry_after() {
            Some(hint) if hint > self.max_delay => None,
            Some(hint) => Some(hint.max(backoff)),
            None => Some(backoff),
        }
    }
}
