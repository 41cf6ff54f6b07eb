//! Per-window request counters with moka

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jiralink_core::{CounterOutcome, CounterStore};
use jiralink_domain::Result;
use moka::sync::Cache;
use moka::Expiry;

/// Upper bound on live window keys. Only one or two are ever active.
const MAX_WINDOWS: u64 = 64;

#[derive(Debug)]
struct WindowCounter {
    count: AtomicU64,
    ttl: Duration,
}

struct WindowExpiry;

impl Expiry<String, Arc<WindowCounter>> for WindowExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<WindowCounter>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// [`CounterStore`] keeping one atomic counter per key.
///
/// A counter is created on first use with the TTL passed by that caller and
/// is never extended afterwards, matching how a fixed window closes.
#[derive(Clone)]
pub struct MokaCounterStore {
    counters: Cache<String, Arc<WindowCounter>>,
}

impl Default for MokaCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaCounterStore {
    pub fn new() -> Self {
        let counters = Cache::builder().max_capacity(MAX_WINDOWS).expire_after(WindowExpiry).build();
        Self { counters }
    }
}

#[async_trait]
impl CounterStore for MokaCounterStore {
    async fn increment_below(
        &self,
        key: &str,
        ceiling: u64,
        ttl: Duration,
    ) -> Result<CounterOutcome> {
        // The initializer runs once even under concurrent first use.
        let counter = self
            .counters
            .get_with_by_ref(key, || Arc::new(WindowCounter { count: AtomicU64::new(0), ttl }));

        let mut current = counter.count.load(Ordering::SeqCst);
        loop {
            if current >= ceiling {
                return Ok(CounterOutcome::Rejected { count: current });
            }
            match counter.count.compare_exchange(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(CounterOutcome::Admitted { count: current + 1 }),
                Err(actual) => current = actual,
            }
        }
    }

    async fn current(&self, key: &str) -> Result<u64> {
        Ok(self.counters.get(key).map_or(0, |counter| counter.count.load(Ordering::SeqCst)))
    }
}
