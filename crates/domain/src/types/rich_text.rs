//! Atlassian Document Format (ADF) helpers
//!
//! Descriptions and comment bodies come back from the REST API v3 as a
//! document tree:
//!
//! ```json
//! {"type": "doc", "version": 1, "content": [
//!     {"type": "paragraph", "content": [
//!         {"type": "text", "text": "Hello "},
//!         {"type": "text", "text": "world"}
//!     ]}
//! ]}
//! ```
//!
//! Only text runs that are direct children of top-level paragraphs are
//! extracted. Headings, lists, tables and deeper nesting are skipped.

use serde_json::{json, Value};

const PARAGRAPH: &str = "paragraph";
const TEXT: &str = "text";

/// Flatten a document (or a plain string) into text.
///
/// ```rust
/// use jiralink_domain::types::rich_text::extract_text;
/// use serde_json::json;
///
/// let doc = json!({"content": [{"type": "paragraph", "content": [
///     {"type": "text", "text": "Hello "}, {"type": "text", "text": "world"}
/// ]}]});
/// assert_eq!(extract_text(&doc), "Hello world");
/// assert_eq!(extract_text(&json!("plain")), "plain");
/// ```
pub fn extract_text(node: &Value) -> String {
    match node {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("content") {
            Some(Value::Array(blocks)) => collect_paragraph_text(blocks),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn collect_paragraph_text(blocks: &[Value]) -> String {
    let mut text = String::new();

    for block in blocks {
        if node_type(block) != Some(PARAGRAPH) {
            continue;
        }
        let Some(Value::Array(runs)) = block.get("content") else {
            continue;
        };
        for run in runs {
            if node_type(run) != Some(TEXT) {
                continue;
            }
            if let Some(Value::String(fragment)) = run.get("text") {
                text.push_str(fragment);
            }
        }
    }

    text
}

fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}

/// Wrap plain text in a single-paragraph document for outgoing payloads.
pub fn paragraph_document(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [
            {
                "type": PARAGRAPH,
                "content": [
                    { "type": TEXT, "text": text }
                ]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_text_runs_without_separators() {
        let doc = json!({"content": [{"type": "paragraph", "content": [
            {"type": "text", "text": "Hello "},
            {"type": "text", "text": "world"}
        ]}]});
        assert_eq!(extract_text(&doc), "Hello world");
    }

    #[test]
    fn paragraphs_are_joined_back_to_back() {
        let doc = json!({"content": [
            {"type": "paragraph", "content": [{"type": "text", "text": "one"}]},
            {"type": "paragraph", "content": [{"type": "text", "text": " two "}]}
        ]});
        assert_eq!(extract_text(&doc), "one two ");
    }

    #[test]
    fn non_paragraph_blocks_are_skipped_entirely() {
        let doc = json!({"content": [
            {"type": "heading", "content": [{"type": "text", "text": "Title"}]},
            {"type": "paragraph", "content": [{"type": "text", "text": "body"}]},
            {"type": "bulletList", "content": [
                {"type": "listItem", "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "nested"}]}
                ]}
            ]}
        ]});
        assert_eq!(extract_text(&doc), "body");
    }

    #[test]
    fn non_text_runs_and_missing_text_are_skipped() {
        let doc = json!({"content": [{"type": "paragraph", "content": [
            {"type": "mention", "attrs": {"text": "@someone"}},
            {"type": "text"},
            {"type": "hardBreak"},
            {"type": "text", "text": "kept"},
            {"text": "untyped"}
        ]}]});
        assert_eq!(extract_text(&doc), "kept");
    }

    #[test]
    fn plain_strings_pass_through_unchanged() {
        let plain = json!("  already plain\n");
        let once = extract_text(&plain);
        assert_eq!(once, "  already plain\n");
        assert_eq!(extract_text(&Value::String(once.clone())), once);
    }

    #[test]
    fn other_shapes_yield_empty_text() {
        assert_eq!(extract_text(&Value::Null), "");
        assert_eq!(extract_text(&json!(42)), "");
        assert_eq!(extract_text(&json!([{"type": "paragraph"}])), "");
        assert_eq!(extract_text(&json!({"type": "doc"})), "");
        assert_eq!(extract_text(&json!({"content": "not a list"})), "");
        assert_eq!(extract_text(&json!({"content": [{"type": "paragraph"}]})), "");
    }

    #[test]
    fn built_document_extracts_back_to_its_text() {
        let doc = paragraph_document("Ship it");
        assert_eq!(doc["type"], "doc");
        assert_eq!(extract_text(&doc), "Ship it");
    }
}
