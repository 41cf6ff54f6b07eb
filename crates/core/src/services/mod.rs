//! Ticket, comment and status operations on top of the dispatcher
//!
//! Services never see an unsuccessful response: the dispatcher turns every
//! non-2xx status into a `JiraError`, so they only build requests and decode
//! payloads.

pub mod comment;
pub mod status;
pub mod ticket;

pub use comment::CommentService;
pub use status::StatusService;
pub use ticket::TicketService;

use jiralink_domain::constants::DEFAULT_API_VERSION;
use jiralink_domain::{JiraError, Result};

/// REST paths for one API version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
    root: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self::new(DEFAULT_API_VERSION)
    }
}

impl ApiPaths {
    pub fn new(api_version: &str) -> Self {
        Self { root: format!("/rest/api/{}", api_version.trim()) }
    }

    pub fn issues(&self) -> String {
        format!("{}/issue", self.root)
    }

    pub fn issue(&self, key: &str) -> String {
        format!("{}/issue/{key}", self.root)
    }

    pub fn search(&self) -> String {
        format!("{}/search", self.root)
    }

    pub fn changelog(&self, key: &str) -> String {
        format!("{}/changelog", self.issue(key))
    }

    pub fn attachments(&self, key: &str) -> String {
        format!("{}/attachments", self.issue(key))
    }

    pub fn comments(&self, key: &str) -> String {
        format!("{}/comment", self.issue(key))
    }

    pub fn comment(&self, key: &str, comment_id: &str) -> String {
        format!("{}/comment/{comment_id}", self.issue(key))
    }

    pub fn transitions(&self, key: &str) -> String {
        format!("{}/transitions", self.issue(key))
    }
}

/// Reject blank identifiers before they end up in a URL path.
pub(crate) fn require_id<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JiraError::Validation(format!("{what} cannot be empty")));
    }
    if trimmed.contains('/') {
        return Err(JiraError::Validation(format!("{what} cannot contain '/': {trimmed}")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let paths = ApiPaths::default();
        assert_eq!(paths.issue("ABC-1"), "/rest/api/3/issue/ABC-1");
        assert_eq!(paths.comment("ABC-1", "10"), "/rest/api/3/issue/ABC-1/comment/10");
        assert_eq!(paths.transitions("ABC-1"), "/rest/api/3/issue/ABC-1/transitions");
        assert_eq!(ApiPaths::new("2").search(), "/rest/api/2/search");
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("Ticket key", " ABC-1 ").unwrap(), "ABC-1");
        assert!(matches!(require_id("Ticket key", "  "), Err(JiraError::Validation(_))));
        assert!(require_id("Ticket key", "ABC/1").is_err());
    }
}
