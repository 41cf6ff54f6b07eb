//! HTTP transport port

use async_trait::async_trait;
use jiralink_domain::{ApiRequest, HeaderMap};
use thiserror::Error;

/// Raw response of a completed exchange, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into(), headers: HeaderMap::new() }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}

/// Failure before any HTTP status was received
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Other(String),
}

/// File contents to send as a multipart `file` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Executes requests against the remote REST API
///
/// Implementations resolve the endpoint against the configured base URL and
/// apply authentication and default headers. Non-2xx statuses are returned
/// as responses, never as failures.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: &ApiRequest,
    ) -> std::result::Result<TransportResponse, TransportFailure>;

    /// POST a multipart body with a single `file` part.
    async fn upload(
        &self,
        endpoint: &str,
        upload: FileUpload,
    ) -> std::result::Result<TransportResponse, TransportFailure>;
}
