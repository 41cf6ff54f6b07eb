//! Response cache in front of the transport
//!
//! Only GET requests participate. A failing backing store never fails the
//! request: lookups degrade to a miss and writes are skipped, both with a
//! warning.

use std::sync::Arc;
use std::time::Duration;

use jiralink_domain::{ApiRequest, ApiResponse, CacheConfig};
use tracing::{debug, warn};

use crate::ports::CacheStore;

pub struct CacheGate {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    enabled: bool,
}

impl CacheGate {
    pub fn new(config: &CacheConfig, store: Arc<dyn CacheStore>) -> Self {
        Self { store, ttl: config.ttl(), enabled: config.enabled }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `request` is looked up in and stored to the cache.
    pub fn applies_to(&self, request: &ApiRequest) -> bool {
        self.enabled && request.should_cache()
    }

    pub async fn lookup(&self, request: &ApiRequest) -> Option<ApiResponse> {
        if !self.applies_to(request) || request.is_refresh() {
            return None;
        }

        match self.store.get(request.cache_key()).await {
            Ok(hit) => {
                debug!(key = request.cache_key(), hit = hit.is_some(), "Cache lookup");
                hit
            }
            Err(e) => {
                warn!(
                    key = request.cache_key(),
                    endpoint = request.endpoint(),
                    error = %e,
                    "Cache lookup failed, treating as miss"
                );
                None
            }
        }
    }

    /// Store a successful response. Returns whether the entry was written.
    pub async fn store(&self, request: &ApiRequest, response: &ApiResponse) -> bool {
        if !self.applies_to(request) || !response.is_successful() {
            return false;
        }

        match self.store.put(request.cache_key(), response.clone(), self.ttl).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    key = request.cache_key(),
                    endpoint = request.endpoint(),
                    error = %e,
                    "Cache write failed, skipping"
                );
                false
            }
        }
    }
}
