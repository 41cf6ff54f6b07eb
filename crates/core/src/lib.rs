//! # jiralink Core
//!
//! Request pipeline and services - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (transport, stores, clock, event sink)
//! - The dispatcher: rate limiting, response caching, error classification
//! - Ticket, comment and status services
//!
//! ## Architecture Principles
//! - Only depends on `jiralink-domain`
//! - No HTTP client, cache backend or logging subscriber
//! - All external effects via traits in [`ports`]

pub mod dispatch;
pub mod ports;
pub mod services;

pub use dispatch::{
    Admission, CacheGate, Dispatcher, DispatcherBuilder, RateLimiter, RetryPolicy,
};
pub use ports::{
    CacheStore, Clock, CounterOutcome, CounterStore, DispatchEvent, EventSink, FileUpload,
    HttpTransport, MockClock, NoopEventSink, SystemClock, TransportFailure, TransportResponse,
};
pub use services::{ApiPaths, CommentService, StatusService, TicketService};
