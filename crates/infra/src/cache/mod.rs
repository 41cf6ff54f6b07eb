//! In-process stores backed by moka
//!
//! - [`MokaCacheStore`]: response cache with a TTL per entry
//! - [`MokaCounterStore`]: per-minute request counters for the rate limiter
//!
//! Both are shared by every clone of the client in the same process. Limits
//! are not coordinated across processes.

pub mod rate_counters;
pub mod response_cache;

pub use rate_counters::MokaCounterStore;
pub use response_cache::MokaCacheStore;
