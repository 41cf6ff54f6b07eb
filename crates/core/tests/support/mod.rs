//! Shared test helpers for `jiralink-core` integration tests.
//!
//! In-memory stand-ins for every port so the dispatcher and services can be
//! exercised without a network, a cache backend or a subscriber.

#![allow(dead_code)]

pub mod events;
pub mod stores;
pub mod transport;

use std::sync::Arc;

use jiralink_core::{Dispatcher, MockClock};
use jiralink_domain::JiraConfig;

pub use events::RecordingEventSink;
pub use stores::{MemoryCacheStore, MemoryCounterStore};
pub use transport::ScriptedTransport;

/// Start of a rate window, far enough from the epoch to look realistic.
pub const WINDOW_START: u64 = 1_700_000_040;

/// A dispatcher wired to in-memory ports, plus handles on each of them
pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub transport: Arc<ScriptedTransport>,
    pub cache: Arc<MemoryCacheStore>,
    pub counters: Arc<MemoryCounterStore>,
    pub events: Arc<RecordingEventSink>,
    pub clock: MockClock,
}

impl Harness {
    pub fn new(config: &JiraConfig) -> Self {
        Self::with_transport(config, ScriptedTransport::new())
    }

    pub fn with_transport(config: &JiraConfig, transport: ScriptedTransport) -> Self {
        let clock = MockClock::at(WINDOW_START);
        let transport = Arc::new(transport);
        let cache = Arc::new(MemoryCacheStore::new(clock.clone()));
        let counters = Arc::new(MemoryCounterStore::default());
        let events = Arc::new(RecordingEventSink::default());

        let dispatcher = Dispatcher::builder()
            .config(config)
            .transport(transport.clone())
            .cache_store(cache.clone())
            .counter_store(counters.clone())
            .clock(Arc::new(clock.clone()))
            .event_sink(events.clone())
            .build()
            .unwrap();

        Self { dispatcher: Arc::new(dispatcher), transport, cache, counters, events, clock }
    }
}

pub fn test_config() -> JiraConfig {
    JiraConfig::new("https://example.atlassian.net", "bot@example.com", "token")
        .with_project_key("ABC")
}
