//! # jiralink Domain
//!
//! Business domain types for the Jira REST client layer.
//!
//! This crate contains:
//! - The `JiraError` taxonomy and `Result` alias
//! - Client configuration structures
//! - Request/response values and the cache key derivation
//! - Rich-text (ADF) extraction
//! - Validated inputs and decoded projections
//!
//! ## Architecture
//! - No dependencies on other jiralink crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
