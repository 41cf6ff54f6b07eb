//! Logging for dispatch events
//!
//! [`TracingEventSink`] renders the dispatcher's lifecycle events as
//! `tracing` events on a named channel. [`init_tracing`] installs a global
//! `tracing-subscriber` for binaries that do not bring their own.

pub mod event_sink;
pub mod subscriber;

pub use event_sink::TracingEventSink;
pub use subscriber::{init_tracing, LOG_FORMAT_ENV};
