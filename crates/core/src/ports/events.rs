//! Dispatch lifecycle events and the sink port that receives them
//!
//! The dispatcher describes what happens to each call as a sequence of
//! events sharing one `request_id`:
//!
//! ```text
//! Request -> CacheHit
//! Request -> Response [-> CacheStore]
//! Request -> Error
//! UploadRequest -> UploadResponse | UploadError
//! ```
//!
//! Rendering (tracing, metrics, test recording) is left to [`EventSink`]
//! implementations.

use std::time::Duration;

use jiralink_domain::{ErrorCategory, HttpMethod, LogLevel, QueryParams};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    Request {
        request_id: Uuid,
        method: HttpMethod,
        endpoint: String,
        params: QueryParams,
        body: Map<String, Value>,
    },
    CacheHit {
        request_id: Uuid,
        method: HttpMethod,
        endpoint: String,
    },
    Response {
        request_id: Uuid,
        method: HttpMethod,
        endpoint: String,
        status: u16,
        elapsed: Duration,
    },
    CacheStore {
        request_id: Uuid,
        method: HttpMethod,
        endpoint: String,
        ttl: Duration,
    },
    Error {
        request_id: Uuid,
        method: HttpMethod,
        endpoint: String,
        status: Option<u16>,
        category: ErrorCategory,
        message: String,
    },
    Retry {
        request_id: Uuid,
        method: HttpMethod,
        endpoint: String,
        attempt: u32,
        delay: Duration,
        reason: String,
    },
    UploadRequest {
        request_id: Uuid,
        endpoint: String,
        file_name: String,
        size: u64,
    },
    UploadResponse {
        request_id: Uuid,
        endpoint: String,
        file_name: String,
        status: u16,
    },
    UploadError {
        request_id: Uuid,
        endpoint: String,
        file_name: String,
        message: String,
    },
}

impl DispatchEvent {
    /// Severity the event should be logged at.
    pub const fn level(&self) -> LogLevel {
        match self {
            Self::Error { .. } | Self::UploadError { .. } => LogLevel::Error,
            Self::Retry { .. } => LogLevel::Warn,
            _ => LogLevel::Info,
        }
    }

    /// Stable snake_case event name, used as a structured field.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::CacheHit { .. } => "cache_hit",
            Self::Response { .. } => "response",
            Self::CacheStore { .. } => "cache_store",
            Self::Error { .. } => "error",
            Self::Retry { .. } => "retry",
            Self::UploadRequest { .. } => "upload_request",
            Self::UploadResponse { .. } => "upload_response",
            Self::UploadError { .. } => "upload_error",
        }
    }

    /// Human-readable log message.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Request { .. } => "Jira API Request",
            Self::CacheHit { .. } => "Jira API Cache Hit",
            Self::Response { .. } => "Jira API Response",
            Self::CacheStore { .. } => "Jira API Cache Store",
            Self::Error { .. } => "Jira API Error",
            Self::Retry { .. } => "Jira API Retry",
            Self::UploadRequest { .. } => "Jira API Upload Request",
            Self::UploadResponse { .. } => "Jira API Upload Response",
            Self::UploadError { .. } => "Jira API Upload Error",
        }
    }

    pub fn request_id(&self) -> Uuid {
        match self {
            Self::Request { request_id, .. }
            | Self::CacheHit { request_id, .. }
            | Self::Response { request_id, .. }
            | Self::CacheStore { request_id, .. }
            | Self::Error { request_id, .. }
            | Self::Retry { request_id, .. }
            | Self::UploadRequest { request_id, .. }
            | Self::UploadResponse { request_id, .. }
            | Self::UploadError { request_id, .. } => *request_id,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Request { endpoint, .. }
            | Self::CacheHit { endpoint, .. }
            | Self::Response { endpoint, .. }
            | Self::CacheStore { endpoint, .. }
            | Self::Error { endpoint, .. }
            | Self::Retry { endpoint, .. }
            | Self::UploadRequest { endpoint, .. }
            | Self::UploadResponse { endpoint, .. }
            | Self::UploadError { endpoint, .. } => endpoint,
        }
    }
}

/// Receives dispatch events
///
/// Called inline on the request path, so implementations should not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &DispatchEvent);
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &DispatchEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let id = Uuid::new_v4();
        let error = DispatchEvent::Error {
            request_id: id,
            method: HttpMethod::Get,
            endpoint: "/x".into(),
            status: Some(500),
            category: ErrorCategory::Server,
            message: "boom".into(),
        };
        let hit =
            DispatchEvent::CacheHit { request_id: id, method: HttpMethod::Get, endpoint: "/x".into() };

        assert_eq!(error.level(), LogLevel::Error);
        assert_eq!(hit.level(), LogLevel::Info);
        assert_eq!(error.request_id(), hit.request_id());
        assert_eq!(error.name(), "error");
        assert_eq!(hit.message(), "Jira API Cache Hit");
        assert_eq!(hit.endpoint(), "/x");
    }
}
