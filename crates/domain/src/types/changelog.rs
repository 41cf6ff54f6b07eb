//! Ticket change history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ticket::{opt_str, str_or_empty, UserRef};
use crate::types::timestamp::parse_timestamp;

/// One field change inside a history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeItem {
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ChangeItem {
    /// Prefers the display strings and falls back to the raw ids.
    pub fn from_value(data: &Value) -> Self {
        Self {
            field: str_or_empty(data, "field"),
            from: opt_str(data, "fromString").or_else(|| opt_str(data, "from")),
            to: opt_str(data, "toString").or_else(|| opt_str(data, "to")),
        }
    }
}

/// A set of changes made by one user at one time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub id: String,
    pub author: UserRef,
    pub created: Option<DateTime<Utc>>,
    pub items: Vec<ChangeItem>,
}

impl ChangelogEntry {
    pub fn from_value(data: &Value) -> Self {
        Self {
            id: str_or_empty(data, "id"),
            author: data.get("author").map(UserRef::from_value).unwrap_or_default(),
            created: data.get("created").and_then(Value::as_str).and_then(parse_timestamp),
            items: data
                .get("items")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(ChangeItem::from_value).collect())
                .unwrap_or_default(),
        }
    }

    /// Decode the `values` list of a changelog page.
    pub fn list_from_page(data: &Value) -> Vec<Self> {
        data.get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }
}
