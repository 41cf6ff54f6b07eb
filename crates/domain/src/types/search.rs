//! Search criteria (JQL building) and search result pages

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::DEFAULT_SEARCH_FIELDS;
use crate::types::ticket::TicketDetails;

/// Filters combined into a JQL query scoped to one project.
///
/// ```rust
/// use jiralink_domain::types::SearchCriteria;
///
/// let criteria = SearchCriteria::for_assignee("ABC", "jdoe");
/// assert_eq!(criteria.build_jql(), "project = ABC AND assignee = jdoe ORDER BY updated DESC");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub project_key: String,
    pub query: Option<String>,
    pub assignee: Option<String>,
    pub label: Option<String>,
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub reporter: Option<String>,
    pub component: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl SearchCriteria {
    pub fn for_project(project_key: impl Into<String>) -> Self {
        Self { project_key: project_key.into(), ..Self::default() }
    }

    pub fn for_search(project_key: impl Into<String>, query: impl Into<String>) -> Self {
        Self { query: Some(query.into()), ..Self::for_project(project_key) }
    }

    pub fn for_assignee(project_key: impl Into<String>, assignee: impl Into<String>) -> Self {
        Self { assignee: Some(assignee.into()), ..Self::for_project(project_key) }
    }

    pub fn for_label(project_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), ..Self::for_project(project_key) }
    }

    pub fn for_issue_type(project_key: impl Into<String>, issue_type: impl Into<String>) -> Self {
        Self { issue_type: Some(issue_type.into()), ..Self::for_project(project_key) }
    }

    /// Tickets updated between two dates (inclusive). Both bounds are
    /// passed to JQL verbatim, e.g. `2024-01-31`.
    pub fn for_date_range(
        project_key: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
            ..Self::for_project(project_key)
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_reporter(mut self, reporter: impl Into<String>) -> Self {
        self.reporter = Some(reporter.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Build the JQL query. Conditions are joined with `AND` and results are
    /// always ordered by last update, newest first. A date range is only
    /// applied when both bounds are present.
    pub fn build_jql(&self) -> String {
        let mut conditions = vec![format!("project = {}", self.project_key)];

        if let Some(query) = &self.query {
            conditions.push(format!(
                "(summary ~ \"{query}\" OR description ~ \"{query}\" OR comment ~ \"{query}\")"
            ));
        }
        if let Some(assignee) = &self.assignee {
            conditions.push(format!("assignee = {assignee}"));
        }
        if let Some(label) = &self.label {
            conditions.push(format!("labels = {label}"));
        }
        if let Some(issue_type) = &self.issue_type {
            conditions.push(format!("issuetype = \"{issue_type}\""));
        }
        if let Some(status) = &self.status {
            conditions.push(format!("status = \"{status}\""));
        }
        if let Some(priority) = &self.priority {
            conditions.push(format!("priority = \"{priority}\""));
        }
        if let Some(reporter) = &self.reporter {
            conditions.push(format!("reporter = {reporter}"));
        }
        if let Some(component) = &self.component {
            conditions.push(format!("component = \"{component}\""));
        }
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            conditions.push(format!("updated >= \"{start}\" AND updated <= \"{end}\""));
        }

        format!("{} ORDER BY updated DESC", conditions.join(" AND "))
    }

    /// Fields to request; the standard set when none were given.
    pub fn fields(&self) -> Vec<String> {
        if self.fields.is_empty() {
            DEFAULT_SEARCH_FIELDS.iter().map(ToString::to_string).collect()
        } else {
            self.fields.clone()
        }
    }

    /// Request body for `POST /rest/api/3/search`.
    pub fn to_search_body(&self, max_results: u32, start_at: u32) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("jql".to_string(), Value::String(self.build_jql()));
        body.insert("maxResults".to_string(), json!(max_results));
        body.insert("startAt".to_string(), json!(start_at));
        body.insert("fields".to_string(), json!(self.fields()));
        body
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub start_at: u64,
    pub max_results: u64,
    pub total: u64,
    pub issues: Vec<TicketDetails>,
}

impl SearchResult {
    pub fn from_value(data: &Value) -> Self {
        let issues = data
            .get("issues")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(TicketDetails::from_value).collect())
            .unwrap_or_default();

        Self {
            start_at: data.get("startAt").and_then(Value::as_u64).unwrap_or(0),
            max_results: data.get("maxResults").and_then(Value::as_u64).unwrap_or(0),
            total: data.get("total").and_then(Value::as_u64).unwrap_or(0),
            issues,
        }
    }

    pub fn has_more_results(&self) -> bool {
        self.start_at + (self.issues.len() as u64) < self.total
    }

    /// Offset of the next page, if there is one.
    pub fn next_start_at(&self) -> Option<u64> {
        self.has_more_results().then(|| self.start_at + self.issues.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_only_jql() {
        assert_eq!(
            SearchCriteria::for_project("ABC").build_jql(),
            "project = ABC ORDER BY updated DESC"
        );
    }

    #[test]
    fn test_text_query_searches_three_fields() {
        let jql = SearchCriteria::for_search("ABC", "timeout").build_jql();
        assert_eq!(
            jql,
            "project = ABC AND (summary ~ \"timeout\" OR description ~ \"timeout\" OR comment ~ \
             \"timeout\") ORDER BY updated DESC"
        );
    }

    #[test]
    fn test_combined_filters_keep_order() {
        let criteria = SearchCriteria::for_label("ABC", "ops")
            .with_status("In Progress")
            .with_priority("High")
            .with_reporter("alice")
            .with_component("Api");
        assert_eq!(
            criteria.build_jql(),
            "project = ABC AND labels = ops AND status = \"In Progress\" AND priority = \"High\" \
             AND reporter = alice AND component = \"Api\" ORDER BY updated DESC"
        );
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        let both = SearchCriteria::for_date_range("ABC", "2024-01-01", "2024-01-31");
        assert!(both.build_jql().contains("updated >= \"2024-01-01\" AND updated <= \"2024-01-31\""));

        let mut half = SearchCriteria::for_project("ABC");
        half.start_date = Some("2024-01-01".to_string());
        assert!(!half.build_jql().contains("updated >="));
    }

    #[test]
    fn test_default_fields() {
        let criteria = SearchCriteria::for_issue_type("ABC", "Bug");
        assert_eq!(criteria.fields().len(), 11);
        assert_eq!(criteria.fields()[0], "summary");

        let narrowed = criteria.with_fields(["summary", "status"]);
        assert_eq!(narrowed.fields(), vec!["summary".to_string(), "status".to_string()]);
    }

    #[test]
    fn test_search_body() {
        let body = Value::Object(SearchCriteria::for_project("ABC").to_search_body(25, 50));
        assert_eq!(body["maxResults"], 25);
        assert_eq!(body["startAt"], 50);
        assert_eq!(body["jql"], "project = ABC ORDER BY updated DESC");
    }

    #[test]
    fn test_search_result_paging() {
        let page = SearchResult::from_value(&json!({
            "startAt": 0, "maxResults": 2, "total": 3,
            "issues": [{"key": "ABC-1", "fields": {}}, {"key": "ABC-2", "fields": {}}]
        }));
        assert_eq!(page.issues.len(), 2);
        assert!(page.has_more_results());
        assert_eq!(page.next_start_at(), Some(2));

        let last = SearchResult::from_value(&json!({
            "startAt": 2, "maxResults": 2, "total": 3, "issues": [{"key": "ABC-3"}]
        }));
        assert!(!last.has_more_results());
        assert_eq!(last.next_start_at(), None);
    }

    #[test]
    fn test_search_result_tolerates_missing_fields() {
        let empty = SearchResult::from_value(&json!({}));
        assert_eq!(empty.total, 0);
        assert!(empty.issues.is_empty());
    }
}
