//! Key-value store ports backing the cache gate and the rate limiter

use std::time::Duration;

use async_trait::async_trait;
use jiralink_domain::{ApiResponse, Result};

/// Response cache storage
///
/// Entries past their TTL must be reported as absent.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ApiResponse>>;

    async fn put(&self, key: &str, response: ApiResponse, ttl: Duration) -> Result<()>;
}

/// Outcome of an atomic increment-if-below
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOutcome {
    /// The counter was incremented and now holds `count`.
    Admitted { count: u64 },
    /// The counter already held `count >= ceiling` and was left unchanged.
    Rejected { count: u64 },
}

impl CounterOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    pub fn count(&self) -> u64 {
        match self {
            Self::Admitted { count } | Self::Rejected { count } => *count,
        }
    }
}

/// Shared counters with per-key expiry
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment `key` unless it already reached `ceiling`.
    ///
    /// A missing key counts as zero and is created with the given TTL.
    async fn increment_below(&self, key: &str, ceiling: u64, ttl: Duration)
        -> Result<CounterOutcome>;

    /// Current value of `key` (zero when absent).
    async fn current(&self, key: &str) -> Result<u64>;
}
