//! Workflow transitions available on a ticket

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ticket::str_or_empty;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
    /// Name of the status the ticket moves to.
    pub to_status: String,
    pub has_screen: bool,
}

impl Transition {
    pub fn from_value(data: &Value) -> Self {
        Self {
            id: str_or_empty(data, "id"),
            name: str_or_empty(data, "name"),
            to_status: data.get("to").map(|to| str_or_empty(to, "name")).unwrap_or_default(),
            has_screen: data.get("hasScreen").and_then(Value::as_bool).unwrap_or(false),
        }
    }

    /// Decode the `transitions` list of a transitions response.
    pub fn list_from_response(data: &Value) -> Vec<Self> {
        data.get("transitions")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }

    /// Whether this transition leads to `status` (ASCII case-insensitive).
    pub fn leads_to(&self, status: &str) -> bool {
        self.to_status.eq_ignore_ascii_case(status)
    }
}
