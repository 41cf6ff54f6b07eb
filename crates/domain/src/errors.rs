//! Error types used throughout the client layer
//!
//! Every failure a caller can observe is a [`JiraError`]. Variants that stem
//! from an HTTP exchange carry a [`RequestContext`] (method, endpoint, status,
//! message) so the caller can log or branch on them without re-deriving
//! anything from the response.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_wire_name_conversions;
use crate::types::HttpMethod;

/// Where a rate-limit rejection originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitOrigin {
    /// The local per-minute admission ceiling was reached.
    Local,
    /// The remote service answered with HTTP 429.
    Remote,
}

impl_wire_name_conversions!(RateLimitOrigin {
    Local => "local",
    Remote => "remote",
});

/// Request details attached to HTTP-derived errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub method: HttpMethod,
    pub endpoint: String,
    pub status: Option<u16>,
    pub message: String,
}

impl RequestContext {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self { method, endpoint: endpoint.into(), status: None, message: message.into() }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => {
                write!(f, "{} {} returned {}: {}", self.method, self.endpoint, status, self.message)
            }
            None => write!(f, "{} {}: {}", self.method, self.endpoint, self.message),
        }
    }
}

/// Coarse error categories for branching and log labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    RateLimit,
    Authentication,
    Permission,
    NotFound,
    Server,
    Client,
    Timeout,
    Transport,
    Validation,
    Storage,
    Decode,
}

impl_wire_name_conversions!(ErrorCategory {
    Configuration => "configuration",
    RateLimit => "rate_limit",
    Authentication => "authentication",
    Permission => "permission",
    NotFound => "not_found",
    Server => "server",
    Client => "client",
    Timeout => "timeout",
    Transport => "transport",
    Validation => "validation",
    Storage => "storage",
    Decode => "decode",
});

/// Main error type for jiralink
#[derive(Error, Debug, Clone)]
pub enum JiraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limit exceeded ({origin}): {message}")]
    RateLimited {
        origin: RateLimitOrigin,
        retry_after: Option<Duration>,
        message: String,
        context: Option<RequestContext>,
    },

    #[error("Authentication failed: {0}")]
    Authentication(RequestContext),

    #[error("Permission denied: {0}")]
    PermissionDenied(RequestContext),

    #[error("Not found: {0}")]
    NotFound(RequestContext),

    #[error("Jira server error: {0}")]
    Server(RequestContext),

    #[error("Jira client error: {0}")]
    Client(RequestContext),

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(RequestContext),

    #[error("Request timed out after {timeout:?}: {context}")]
    Timeout { context: RequestContext, timeout: Duration },

    #[error("Transport error: {0}")]
    Transport(RequestContext),

    #[error("Upload of '{file_name}' failed: {context}")]
    Upload { file_name: String, context: RequestContext },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Status transition '{status}' not found for ticket {ticket}")]
    TransitionNotFound { ticket: String, status: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl JiraError {
    /// Shorthand for a local admission rejection.
    pub fn local_rate_limit(ceiling: u64, retry_after: Duration) -> Self {
        Self::RateLimited {
            origin: RateLimitOrigin::Local,
            retry_after: Some(retry_after),
            message: format!("Maximum {ceiling} requests per minute"),
            context: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::PermissionDenied(_) => ErrorCategory::Permission,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Server(_) => ErrorCategory::Server,
            Self::Client(_) | Self::UnexpectedStatus(_) | Self::TransitionNotFound { .. } => {
                ErrorCategory::Client
            }
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Transport(_) | Self::Upload { .. } => ErrorCategory::Transport,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Decode(_) => ErrorCategory::Decode,
        }
    }

    /// Whether an explicit retry loop may try this request again.
    ///
    /// Local rate-limit rejections are excluded: retrying inside the same
    /// window would only be rejected again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Server(_) | Self::Timeout { .. } | Self::Transport(_) => true,
            Self::RateLimited { origin, .. } => *origin == RateLimitOrigin::Remote,
            _ => false,
        }
    }

    /// Delay suggested by the rejecting side, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&RequestContext> {
        match self {
            Self::Authentication(ctx)
            | Self::PermissionDenied(ctx)
            | Self::NotFound(ctx)
            | Self::Server(ctx)
            | Self::Client(ctx)
            | Self::UnexpectedStatus(ctx)
            | Self::Transport(ctx)
            | Self::Timeout { context: ctx, .. }
            | Self::Upload { context: ctx, .. } => Some(ctx),
            Self::RateLimited { context, .. } => context.as_ref(),
            _ => None,
        }
    }

    /// HTTP status that produced this error, when one exists.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { origin: RateLimitOrigin::Local, .. } => Some(429),
            other => other.context().and_then(|ctx| ctx.status),
        }
    }
}

impl From<serde_json::Error> for JiraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for jiralink operations
pub type Result<T> = std::result::Result<T, JiraError>;
