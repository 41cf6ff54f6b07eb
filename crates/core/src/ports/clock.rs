//! Wall-clock abstraction used for rate windows

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Trait for time operations to enable deterministic testing
///
/// The rate limiter buckets requests by whole minutes since the UNIX epoch,
/// so only second resolution is needed.
pub trait Clock: Send + Sync + 'static {
    /// Seconds since the UNIX epoch
    fn unix_seconds(&self) -> u64;
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient cloning
impl<T: Clock> Clock for Arc<T> {
    fn unix_seconds(&self) -> u64 {
        (**self).unix_seconds()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same time, so a test can keep a handle and advance the
/// clock seen by the component under test.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a mock clock fixed at `unix_seconds`
    pub fn at(unix_seconds: u64) -> Self {
        Self { now: Arc::new(AtomicU64::new(unix_seconds)) }
    }

    pub fn set(&self, unix_seconds: u64) {
        self.now.store(unix_seconds, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_secs(), Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn unix_seconds(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_clones_share_time() {
        let clock = MockClock::at(120);
        let handle = clock.clone();

        handle.advance(Duration::from_secs(30));
        assert_eq!(clock.unix_seconds(), 150);

        handle.set(10);
        assert_eq!(clock.unix_seconds(), 10);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.unix_seconds() > 1_577_836_800);
    }
}
