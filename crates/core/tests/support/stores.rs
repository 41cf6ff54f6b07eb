use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use jiralink_core::{CacheStore, Clock, CounterOutcome, CounterStore, MockClock};
use jiralink_domain::{ApiResponse, Result};

/// Response cache that expires entries against a [`MockClock`]
pub struct MemoryCacheStore {
    clock: MockClock,
    entries: Mutex<HashMap<String, (ApiResponse, u64)>>,
}

impl MemoryCacheStore {
    pub fn new(clock: MockClock) -> Self {
        Self { clock, entries: Mutex::new(HashMap::new()) }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<ApiResponse>> {
        let now = self.clock.unix_seconds();
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| now < *expires_at)
            .map(|(response, _)| response.clone()))
    }

    async fn put(&self, key: &str, response: ApiResponse, ttl: Duration) -> Result<()> {
        let expires_at = self.clock.unix_seconds() + ttl.as_secs();
        self.entries.lock().unwrap().insert(key.to_string(), (response, expires_at));
        Ok(())
    }
}

/// Rate counters behind a single mutex
///
/// Window keys are distinct per minute, so TTLs are not tracked.
#[derive(Default)]
pub struct MemoryCounterStore {
    counts: Mutex<HashMap<String, u64>>,
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment_below(
        &self,
        key: &str,
        ceiling: u64,
        _ttl: Duration,
    ) -> Result<CounterOutcome> {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(key.to_string()).or_insert(0);
        if *count >= ceiling {
            return Ok(CounterOutcome::Rejected { count: *count });
        }
        *count += 1;
        Ok(CounterOutcome::Admitted { count: *count })
    }

    async fn current(&self, key: &str) -> Result<u64> {
        Ok(self.counts.lock().unwrap().get(key).copied().unwrap_or(0))
    }
}
