//! # jiralink Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest HTTP transport (basic auth, multipart uploads)
//! - moka-backed response cache and rate counters
//! - Configuration loading from the environment or JSON/TOML files
//! - The tracing event sink and subscriber setup
//! - The [`JiraClient`] facade wiring it all together
//!
//! ## Architecture
//! - Implements traits defined in `jiralink-core`
//! - Contains all "impure" code (network, clocks, environment)

pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use cache::{MokaCacheStore, MokaCounterStore};
pub use client::JiraClient;
pub use errors::InfraError;
pub use http::{ReqwestTransport, ReqwestTransportBuilder};
pub use observability::{init_tracing, TracingEventSink};
