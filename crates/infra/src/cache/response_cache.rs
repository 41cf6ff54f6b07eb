//! Response cache with moka
//!
//! Each entry remembers the TTL it was stored with, and a moka [`Expiry`]
//! policy evicts it once that TTL has passed since the last write. Reads do
//! not extend an entry's life.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jiralink_core::CacheStore;
use jiralink_domain::{ApiResponse, CacheConfig, Result};
use moka::future::Cache;
use moka::Expiry;

#[derive(Debug, Clone)]
struct CachedResponse {
    response: ApiResponse,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, CachedResponse> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedResponse,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedResponse,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// [`CacheStore`] holding decoded responses in memory.
#[derive(Clone)]
pub struct MokaCacheStore {
    entries: Cache<String, CachedResponse>,
}

impl MokaCacheStore {
    /// Create a cache bounded to `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder().max_capacity(max_capacity).expire_after(PerEntryTtl).build();
        Self { entries }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        tracing::info!(
            enabled = config.enabled,
            ttl_seconds = config.ttl_seconds,
            max_capacity = config.max_capacity,
            "Response cache configuration loaded"
        );
        Self::new(config.max_capacity)
    }

    /// Approximate number of live entries (pending maintenance is run first).
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Drop every cached response.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> Result<Option<ApiResponse>> {
        Ok(self.entries.get(key).await.map(|entry| entry.response))
    }

    async fn put(&self, key: &str, response: ApiResponse, ttl: Duration) -> Result<()> {
        self.entries.insert(key.to_string(), CachedResponse { response, ttl }).await;
        Ok(())
    }
}
