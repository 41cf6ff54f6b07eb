//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client layer.

// Request dispatch
pub const CACHE_KEY_PREFIX: &str = "jiralink_";
pub const RATE_LIMIT_KEY_PREFIX: &str = "jiralink_rate_limit";
pub const RATE_WINDOW_SECS: u64 = 60;
pub const DEFAULT_MAX_REQUESTS_PER_MINUTE: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 1;
pub const MAX_RETRY_BACKOFF_SECS: u64 = 60;

// Response cache
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_CACHE_MAX_CAPACITY: u64 = 10_000;

// Logging
pub const DEFAULT_LOG_CHANNEL: &str = "jiralink";
pub const DEFAULT_USER_AGENT: &str = "jiralink/0.1";
pub const DEFAULT_API_VERSION: &str = "3";

// Field limits enforced before a request is built
pub const MAX_SUMMARY_LENGTH: usize = 255;
pub const MAX_BODY_LENGTH: usize = 32_767;
pub const MAX_STATUS_LENGTH: usize = 100;
pub const MAX_NAME_LENGTH: usize = 255;

// Paging defaults
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 50;
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 100;

/// Status names treated as "resolved" by ticket projections.
pub const RESOLVED_STATUSES: [&str; 3] = ["Done", "Resolved", "Closed"];

/// Attributes accepted by single-field ticket updates.
pub const EDITABLE_ATTRIBUTES: [&str; 10] = [
    "summary",
    "description",
    "priority",
    "assignee",
    "reporter",
    "labels",
    "components",
    "issuetype",
    "project",
    "status",
];

/// Fields requested by searches when the caller names none.
pub const DEFAULT_SEARCH_FIELDS: [&str; 11] = [
    "summary",
    "description",
    "status",
    "assignee",
    "reporter",
    "created",
    "updated",
    "priority",
    "issuetype",
    "labels",
    "components",
];
