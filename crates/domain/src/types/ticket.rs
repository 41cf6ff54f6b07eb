//! Ticket projection decoded from `GET /rest/api/3/issue/{key}` payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::RESOLVED_STATUSES;
use crate::types::rich_text::extract_text;

/// Reference to a user as embedded in ticket, comment and history payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub account_id: Option<String>,
    pub display_name: String,
    pub email_address: Option<String>,
}

impl UserRef {
    pub fn from_value(data: &Value) -> Self {
        Self {
            account_id: opt_str(data, "accountId"),
            display_name: str_or_empty(data, "displayName"),
            email_address: opt_str(data, "emailAddress"),
        }
    }
}

/// Flattened view of a ticket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    pub key: String,
    pub id: String,
    pub summary: String,
    /// Plain text of the description document.
    pub description: String,
    pub status: String,
    pub assignee: Option<UserRef>,
    pub reporter: Option<UserRef>,
    pub issue_type: String,
    pub priority: Option<String>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub created: String,
    pub updated: String,
    pub resolution_date: Option<String>,
    pub due_date: Option<String>,
}

impl TicketDetails {
    /// Decode a ticket payload. Missing fields fall back to empty values.
    pub fn from_value(data: &Value) -> Self {
        let fields = data.get("fields").unwrap_or(&Value::Null);

        Self {
            key: str_or_empty(data, "key"),
            id: str_or_empty(data, "id"),
            summary: str_or_empty(fields, "summary"),
            description: fields.get("description").map(extract_text).unwrap_or_default(),
            status: nested_name(fields, "status").unwrap_or_default(),
            assignee: user(fields, "assignee"),
            reporter: user(fields, "reporter"),
            issue_type: nested_name(fields, "issuetype").unwrap_or_default(),
            priority: nested_name(fields, "priority"),
            labels: fields
                .get("labels")
                .and_then(Value::as_array)
                .map(|labels| labels.iter().filter_map(Value::as_str).map(String::from).collect())
                .unwrap_or_default(),
            components: fields
                .get("components")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(|c| opt_str(c, "name")).collect())
                .unwrap_or_default(),
            created: str_or_empty(fields, "created"),
            updated: str_or_empty(fields, "updated"),
            resolution_date: opt_str(fields, "resolutiondate"),
            due_date: opt_str(fields, "duedate"),
        }
    }

    pub fn is_resolved(&self) -> bool {
        RESOLVED_STATUSES.contains(&self.status.as_str())
    }

    pub fn is_assigned(&self) -> bool {
        self.assignee.is_some()
    }

    pub fn has_labels(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }
}

fn user(fields: &Value, name: &str) -> Option<UserRef> {
    fields.get(name).filter(|v| v.is_object()).map(UserRef::from_value)
}

fn nested_name(fields: &Value, name: &str) -> Option<String> {
    fields.get(name).and_then(|v| opt_str(v, "name"))
}

pub(crate) fn opt_str(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(String::from)
}

pub(crate) fn str_or_empty(data: &Value, key: &str) -> String {
    opt_str(data, key).unwrap_or_default()
}
