//! Validated inputs for write operations
//!
//! Each input is checked when it is built, so a value of one of these types
//! is always safe to turn into a request body. Length limits count bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::{
    EDITABLE_ATTRIBUTES, MAX_BODY_LENGTH, MAX_NAME_LENGTH, MAX_STATUS_LENGTH, MAX_SUMMARY_LENGTH,
};
use crate::errors::{JiraError, Result};
use crate::types::rich_text::paragraph_document;

/// Email pattern, compiled once at first use
#[allow(clippy::expect_used)]
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("EMAIL_REGEX pattern is valid and well-formed")
});

fn require_non_blank(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(JiraError::Validation(message.to_string()));
    }
    Ok(())
}

fn require_max_len(value: &str, max: usize, label: &str) -> Result<()> {
    if value.len() > max {
        return Err(JiraError::Validation(format!("{label} cannot exceed {max} characters")));
    }
    Ok(())
}

fn named(name: &str) -> Value {
    json!({ "name": name })
}

// ============================================================================
// Tickets
// ============================================================================

/// Fields for creating or fully updating a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketData {
    summary: String,
    description: String,
    issue_type: String,
    priority: Option<String>,
    assignee: Option<String>,
    reporter: Option<String>,
    labels: Option<Vec<String>>,
    components: Option<Vec<String>>,
}

impl TicketData {
    /// Start a builder with the three required fields.
    pub fn builder(
        summary: impl Into<String>,
        description: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> TicketDataBuilder {
        TicketDataBuilder {
            data: Self {
                summary: summary.into(),
                description: description.into(),
                issue_type: issue_type.into(),
                priority: None,
                assignee: None,
                reporter: None,
                labels: None,
                components: None,
            },
        }
    }

    /// Shorthand for a ticket with only the required fields.
    ///
    /// # Errors
    /// Returns `JiraError::Validation` if a field is invalid.
    pub fn new(
        summary: impl Into<String>,
        description: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(summary, description, issue_type).build()
    }

    fn validate(&self) -> Result<()> {
        require_non_blank(&self.summary, "Summary cannot be empty")?;
        require_non_blank(&self.issue_type, "Issue type cannot be empty")?;
        require_max_len(&self.summary, MAX_SUMMARY_LENGTH, "Summary")?;

        if let Some(assignee) = &self.assignee {
            require_non_blank(assignee, "Assignee cannot be empty if provided")?;
        }
        if let Some(reporter) = &self.reporter {
            require_non_blank(reporter, "Reporter cannot be empty if provided")?;
        }
        if let Some(priority) = &self.priority {
            require_non_blank(priority, "Priority cannot be empty if provided")?;
        }
        Ok(())
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn issue_type(&self) -> &str {
        &self.issue_type
    }

    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    pub fn reporter(&self) -> Option<&str> {
        self.reporter.as_deref()
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn components(&self) -> Option<&[String]> {
        self.components.as_deref()
    }

    /// Request body for `POST /rest/api/3/issue`.
    pub fn to_create_body(&self, project_key: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("project".to_string(), json!({ "key": project_key }));
        fields.insert("summary".to_string(), Value::String(self.summary.clone()));
        fields.insert("description".to_string(), paragraph_document(&self.description));
        fields.insert("issuetype".to_string(), named(&self.issue_type));
        self.insert_optional_fields(&mut fields);

        wrap_fields(fields)
    }

    /// Request body for `PUT /rest/api/3/issue/{key}`. The issue type is not
    /// part of an update.
    pub fn to_update_body(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("summary".to_string(), Value::String(self.summary.clone()));
        fields.insert("description".to_string(), paragraph_document(&self.description));
        self.insert_optional_fields(&mut fields);

        wrap_fields(fields)
    }

    fn insert_optional_fields(&self, fields: &mut Map<String, Value>) {
        if let Some(priority) = &self.priority {
            fields.insert("priority".to_string(), named(priority));
        }
        if let Some(assignee) = &self.assignee {
            fields.insert("assignee".to_string(), named(assignee));
        }
        if let Some(reporter) = &self.reporter {
            fields.insert("reporter".to_string(), named(reporter));
        }
        if let Some(labels) = &self.labels {
            fields.insert("labels".to_string(), json!(labels));
        }
        if let Some(components) = &self.components {
            let components: Vec<Value> = components.iter().map(|c| named(c)).collect();
            fields.insert("components".to_string(), Value::Array(components));
        }
    }
}

fn wrap_fields(fields: Map<String, Value>) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("fields".to_string(), Value::Object(fields));
    body
}

/// Builder for [`TicketData`]
#[derive(Debug, Clone)]
pub struct TicketDataBuilder {
    data: TicketData,
}

impl TicketDataBuilder {
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.data.priority = Some(priority.into());
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.data.assignee = Some(assignee.into());
        self
    }

    pub fn reporter(mut self, reporter: impl Into<String>) -> Self {
        self.data.reporter = Some(reporter.into());
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data.components = Some(components.into_iter().map(Into::into).collect());
        self
    }

    /// # Errors
    /// Returns `JiraError::Validation` if a field is invalid.
    pub fn build(self) -> Result<TicketData> {
        self.data.validate()?;
        Ok(self.data)
    }
}

// ============================================================================
// Single-field edits
// ============================================================================

/// Comment body for add/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    body: String,
}

impl CommentData {
    /// # Errors
    /// Returns `JiraError::Validation` for a blank or oversized body.
    pub fn new(body: impl Into<String>) -> Result<Self> {
        let body = body.into();
        require_non_blank(&body, "Comment body cannot be empty")?;
        require_max_len(&body, MAX_BODY_LENGTH, "Comment body")?;
        Ok(Self { body })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("body".to_string(), paragraph_document(&self.body));
        body
    }
}

/// Target status for a transition, with an optional comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusData {
    status: String,
    comment: Option<String>,
}

impl StatusData {
    /// # Errors
    /// Returns `JiraError::Validation` for a blank or oversized status name.
    pub fn new(status: impl Into<String>) -> Result<Self> {
        let status = status.into();
        require_non_blank(&status, "Status cannot be empty")?;
        require_max_len(&status, MAX_STATUS_LENGTH, "Status")?;
        Ok(Self { status, comment: None })
    }

    /// # Errors
    /// Returns `JiraError::Validation` for an oversized comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Result<Self> {
        let comment = comment.into();
        require_max_len(&comment, MAX_BODY_LENGTH, "Status comment")?;
        self.comment = Some(comment);
        Ok(self)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Request body for `POST /rest/api/3/issue/{key}/transitions`.
    pub fn to_transition_body(&self, transition_id: &str) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("transition".to_string(), json!({ "id": transition_id }));
        if let Some(comment) = &self.comment {
            body.insert(
                "update".to_string(),
                json!({ "comment": [ { "add": { "body": paragraph_document(comment) } } ] }),
            );
        }
        body
    }
}

/// New assignee: a username or an email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeData {
    assignee: String,
}

impl AssigneeData {
    /// # Errors
    /// Returns `JiraError::Validation` for a blank, oversized or malformed
    /// assignee. Anything containing `@` must be a valid email address.
    pub fn new(assignee: impl Into<String>) -> Result<Self> {
        let assignee = assignee.into();
        require_non_blank(&assignee, "Assignee cannot be empty")?;
        require_max_len(&assignee, MAX_NAME_LENGTH, "Assignee")?;
        if assignee.contains('@') && !EMAIL_REGEX.is_match(&assignee) {
            return Err(JiraError::Validation(
                "Assignee must be a valid email address or username".to_string(),
            ));
        }
        Ok(Self { assignee })
    }

    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    pub fn to_update_body(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("assignee".to_string(), named(&self.assignee));
        wrap_fields(fields)
    }
}

/// Replacement ticket description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionData {
    description: String,
}

impl DescriptionData {
    /// # Errors
    /// Returns `JiraError::Validation` for a blank or oversized description.
    pub fn new(description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        require_non_blank(&description, "Description cannot be empty")?;
        require_max_len(&description, MAX_BODY_LENGTH, "Description")?;
        Ok(Self { description })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn to_update_body(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("description".to_string(), paragraph_document(&self.description));
        wrap_fields(fields)
    }
}

/// A single field and its new value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeData {
    attribute: String,
    value: Value,
}

impl AttributeData {
    /// # Errors
    /// Returns `JiraError::Validation` if the attribute is not editable or
    /// the value is null or an empty string.
    pub fn new(attribute: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let attribute = attribute.into();
        let value = value.into();

        require_non_blank(&attribute, "Attribute name cannot be empty")?;
        require_max_len(&attribute, MAX_NAME_LENGTH, "Attribute name")?;

        let normalized = attribute.trim().to_ascii_lowercase();
        if !EDITABLE_ATTRIBUTES.contains(&normalized.as_str()) {
            return Err(JiraError::Validation(format!("Invalid attribute name: {attribute}")));
        }

        match &value {
            Value::Null => {
                return Err(JiraError::Validation("Attribute value cannot be empty".to_string()))
            }
            Value::String(text) if text.is_empty() => {
                return Err(JiraError::Validation("Attribute value cannot be empty".to_string()))
            }
            _ => {}
        }

        Ok(Self { attribute: normalized, value })
    }

    /// Lower-cased field name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Request body setting `fields.{attribute}`.
    ///
    /// Plain string values are shaped the way the REST API expects them:
    /// descriptions become documents, named references become `{"name": ..}`
    /// objects (`{"key": ..}` for projects), and list fields wrap a single
    /// string in a list.
    pub fn to_update_body(&self) -> Map<String, Value> {
        let shaped = match (self.attribute.as_str(), &self.value) {
            ("description", Value::String(text)) => paragraph_document(text),
            ("priority" | "assignee" | "reporter" | "issuetype" | "status", Value::String(name)) => {
                named(name)
            }
            ("project", Value::String(key)) => json!({ "key": key }),
            ("labels", Value::String(label)) => json!([label]),
            ("components", Value::String(component)) => json!([named(component)]),
            ("components", Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(component) => named(component),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            (_, other) => other.clone(),
        };

        let mut fields = Map::new();
        fields.insert(self.attribute.clone(), shaped);
        wrap_fields(fields)
    }
}
