//! Request dispatch pipeline
//!
//! ```text
//! admit -> cache lookup -> transport (under timeout) -> classify -> cache store
//! ```

pub mod cache_gate;
pub mod classify;
pub mod dispatcher;
pub mod rate_limiter;
pub mod retry;

pub use cache_gate::CacheGate;
pub use classify::{classify_failure, classify_status, parse_retry_after};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use rate_limiter::{Admission, RateLimiter};
pub use retry::RetryPolicy;
