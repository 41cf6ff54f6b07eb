//! Comment projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::rich_text::extract_text;
use crate::types::ticket::{str_or_empty, UserRef};
use crate::types::timestamp::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: UserRef,
    pub update_author: Option<UserRef>,
    /// Plain text of the body document.
    pub body: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn from_value(data: &Value) -> Self {
        let timestamp = |key: &str| data.get(key).and_then(Value::as_str).and_then(parse_timestamp);

        Self {
            id: str_or_empty(data, "id"),
            author: data.get("author").map(UserRef::from_value).unwrap_or_default(),
            update_author: data
                .get("updateAuthor")
                .filter(|v| v.is_object())
                .map(UserRef::from_value),
            body: data.get("body").map(extract_text).unwrap_or_default(),
            created: timestamp("created"),
            updated: timestamp("updated"),
        }
    }

    /// Decode the `comments` list of a comment page.
    pub fn list_from_page(data: &Value) -> Vec<Self> {
        data.get("comments")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_extracts_body_text() {
        let comment = Comment::from_value(&json!({
            "id": "100",
            "author": {"displayName": "Jane"},
            "body": {"type": "doc", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "Looks good"}]}
            ]},
            "created": "2024-01-15T10:30:00.000+0000"
        }));

        assert_eq!(comment.id, "100");
        assert_eq!(comment.author.display_name, "Jane");
        assert_eq!(comment.body, "Looks good");
        assert!(comment.created.is_some());
        assert!(comment.updated.is_none());
        assert!(comment.update_author.is_none());
    }

    #[test]
    fn test_list_from_page() {
        let page = json!({"comments": [{"id": "1", "body": "a"}, {"id": "2", "body": "b"}]});
        let comments = Comment::list_from_page(&page);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].body, "b");

        assert!(Comment::list_from_page(&json!({})).is_empty());
    }
}
