//! Mapping of non-2xx responses and transport failures onto `JiraError`

use std::time::Duration;

use jiralink_domain::{ApiRequest, ApiResponse, JiraError, RateLimitOrigin, RequestContext};
use serde_json::Value;

use crate::ports::TransportFailure;

/// Classify a completed, unsuccessful response.
///
/// | Status | Error |
/// |---|---|
/// | 401 | `Authentication` |
/// | 403 | `PermissionDenied` |
/// | 404 | `NotFound` |
/// | 429 | `RateLimited` (remote, `Retry-After` seconds when present) |
/// | 5xx | `Server` |
/// | other 4xx | `Client` |
/// | anything else | `UnexpectedStatus` |
pub fn classify_status(request: &ApiRequest, response: &ApiResponse) -> JiraError {
    let status = response.status_code();
    let context = |message: String| {
        RequestContext::new(request.method(), request.endpoint(), message).with_status(status)
    };
    let detail = remote_detail(response.data());

    match status {
        401 => JiraError::Authentication(context(with_detail(
            "Invalid Jira credentials. Please check your username and API token.",
            detail,
        ))),
        403 => JiraError::PermissionDenied(context(with_detail(
            "Access denied. You do not have permission to perform this action.",
            detail,
        ))),
        404 => JiraError::NotFound(context(with_detail(
            "Resource not found. The requested Jira resource does not exist.",
            detail,
        ))),
        429 => {
            let message = "Rate limit exceeded. Please wait before making more requests.";
            JiraError::RateLimited {
                origin: RateLimitOrigin::Remote,
                retry_after: response.header("retry-after").and_then(parse_retry_after),
                message: message.to_string(),
                context: Some(context(with_detail(message, detail))),
            }
        }
        500..=599 => JiraError::Server(context(with_detail(
            "Jira server error. Please try again later.",
            detail,
        ))),
        400..=499 => JiraError::Client(context(with_detail("Jira API client error.", detail))),
        _ => JiraError::UnexpectedStatus(context(with_detail("Unexpected response status.", detail))),
    }
}

/// Classify a failure that happened before any status was received.
pub fn classify_failure(
    request: &ApiRequest,
    failure: &TransportFailure,
    timeout: Duration,
) -> JiraError {
    let context = RequestContext::new(request.method(), request.endpoint(), failure.to_string());
    match failure {
        TransportFailure::Timeout => JiraError::Timeout { context, timeout },
        TransportFailure::Connection(_) | TransportFailure::Other(_) => JiraError::Transport(context),
    }
}

/// Parse a `Retry-After` value given in seconds.
///
/// Only the leading run of digits counts, so `"30.5"` reads as 30 seconds.
/// HTTP-date values are not supported and yield `None`.
pub fn parse_retry_after(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let digits = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    raw[..digits].parse::<u64>().ok().map(Duration::from_secs)
}

/// Error text from a REST API error body (`errorMessages` and `errors`).
fn remote_detail(data: &Value) -> Option<String> {
    let mut parts: Vec<String> = data
        .get("errorMessages")
        .and_then(Value::as_array)
        .map(|messages| messages.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default();

    if let Some(Value::Object(errors)) = data.get("errors") {
        for (field, message) in errors {
            if let Some(message) = message.as_str() {
                parts.push(format!("{field}: {message}"));
            }
        }
    }

    (!parts.is_empty()).then(|| parts.join("; "))
}

fn with_detail(message: &str, detail: Option<String>) -> String {
    match detail {
        Some(detail) => format!("{message} ({detail})"),
        None => message.to_string(),
    }
}
