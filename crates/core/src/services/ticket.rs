//! Ticket service - issue CRUD, search, history and attachments

use std::path::Path;
use std::sync::Arc;

use jiralink_domain::{
    ApiRequest, AssigneeData, AttributeData, ChangelogEntry, DescriptionData, JiraError, Result,
    SearchCriteria, SearchResult, TicketData, TicketDetails,
};
use serde_json::Value;
use tracing::info;

use super::{require_id, ApiPaths};
use crate::dispatch::Dispatcher;

const SERVICE: &str = "TicketService";

/// Ticket operations for one project
pub struct TicketService {
    dispatcher: Arc<Dispatcher>,
    paths: ApiPaths,
    project_key: String,
}

impl TicketService {
    pub fn new(dispatcher: Arc<Dispatcher>, project_key: impl Into<String>) -> Self {
        Self { dispatcher, paths: ApiPaths::default(), project_key: project_key.into() }
    }

    pub fn with_paths(mut self, paths: ApiPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Fetch a ticket by key, e.g. `ABC-123`.
    ///
    /// # Errors
    /// `NotFound` for unknown keys, plus any dispatch error.
    pub async fn get_ticket(&self, key: &str) -> Result<TicketDetails> {
        let key = require_id("Ticket key", key)?;
        info!(service = SERVICE, operation = "get_ticket", ticket = key, "Operation started");

        let response = self.dispatcher.send(ApiRequest::get(self.paths.issue(key))).await?;
        let ticket = TicketDetails::from_value(response.data());

        info!(service = SERVICE, operation = "get_ticket", ticket = key, "Operation finished");
        Ok(ticket)
    }

    /// Run a JQL search built from `criteria`.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn search_tickets(
        &self,
        criteria: &SearchCriteria,
        max_results: u32,
        start_at: u32,
    ) -> Result<SearchResult> {
        info!(
            service = SERVICE,
            operation = "search_tickets",
            jql = %criteria.build_jql(),
            max_results,
            start_at,
            "Operation started"
        );

        let request = ApiRequest::post(self.paths.search())
            .with_body(criteria.to_search_body(max_results, start_at));
        let response = self.dispatcher.send(request).await?;
        let result = SearchResult::from_value(response.data());

        info!(
            service = SERVICE,
            operation = "search_tickets",
            total = result.total,
            results = result.issues.len(),
            "Operation finished"
        );
        Ok(result)
    }

    /// List the project's tickets, optionally narrowed by assignee, label and
    /// issue type.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn list_tickets(
        &self,
        assignee: Option<&str>,
        label: Option<&str>,
        issue_type: Option<&str>,
        max_results: u32,
        start_at: u32,
    ) -> Result<SearchResult> {
        let criteria = SearchCriteria {
            assignee: assignee.map(String::from),
            label: label.map(String::from),
            issue_type: issue_type.map(String::from),
            ..SearchCriteria::for_project(&self.project_key)
        };
        self.search_tickets(&criteria, max_results, start_at).await
    }

    /// Create a ticket in the configured project and return it as stored.
    ///
    /// # Errors
    /// - `Config` when no project key is configured.
    /// - `Decode` when the create response carries no issue key.
    /// - Any dispatch error.
    pub async fn create_ticket(&self, data: &TicketData) -> Result<TicketDetails> {
        if self.project_key.trim().is_empty() {
            return Err(JiraError::Config("A project key is required to create tickets".into()));
        }
        info!(
            service = SERVICE,
            operation = "create_ticket",
            summary = data.summary(),
            issue_type = data.issue_type(),
            "Operation started"
        );

        let request =
            ApiRequest::post(self.paths.issues()).with_body(data.to_create_body(&self.project_key));
        let response = self.dispatcher.send(request).await?;
        let key = response
            .data()
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| JiraError::Decode("Create response did not contain an issue key".into()))?
            .to_string();

        let ticket = self.fetch_fresh(&key).await?;
        info!(service = SERVICE, operation = "create_ticket", ticket = %key, "Operation finished");
        Ok(ticket)
    }

    /// Replace the editable fields of a ticket and return the updated ticket.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn update_ticket(&self, key: &str, data: &TicketData) -> Result<TicketDetails> {
        let key = require_id("Ticket key", key)?;
        info!(service = SERVICE, operation = "update_ticket", ticket = key, "Operation started");

        self.dispatcher.put(&self.paths.issue(key), data.to_update_body()).await?;
        let ticket = self.fetch_fresh(key).await?;

        info!(service = SERVICE, operation = "update_ticket", ticket = key, "Operation finished");
        Ok(ticket)
    }

    /// # Errors
    /// Any dispatch error.
    pub async fn delete_ticket(&self, key: &str) -> Result<()> {
        let key = require_id("Ticket key", key)?;
        info!(service = SERVICE, operation = "delete_ticket", ticket = key, "Operation started");

        self.dispatcher.delete(&self.paths.issue(key)).await?;

        info!(service = SERVICE, operation = "delete_ticket", ticket = key, "Operation finished");
        Ok(())
    }

    /// One page of the ticket's changelog.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn ticket_history(
        &self,
        key: &str,
        max_results: u32,
        start_at: u32,
    ) -> Result<Vec<ChangelogEntry>> {
        let key = require_id("Ticket key", key)?;
        info!(service = SERVICE, operation = "ticket_history", ticket = key, "Operation started");

        let request = ApiRequest::get(self.paths.changelog(key))
            .with_param("maxResults", max_results)
            .with_param("startAt", start_at);
        let response = self.dispatcher.send(request).await?;
        let entries = ChangelogEntry::list_from_page(response.data());

        info!(
            service = SERVICE,
            operation = "ticket_history",
            ticket = key,
            entries = entries.len(),
            "Operation finished"
        );
        Ok(entries)
    }

    /// Set a single field.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn change_attribute(&self, key: &str, attribute: &AttributeData) -> Result<()> {
        let key = require_id("Ticket key", key)?;
        info!(
            service = SERVICE,
            operation = "change_attribute",
            ticket = key,
            attribute = attribute.attribute(),
            "Operation started"
        );

        self.dispatcher.put(&self.paths.issue(key), attribute.to_update_body()).await?;

        info!(service = SERVICE, operation = "change_attribute", ticket = key, "Operation finished");
        Ok(())
    }

    /// # Errors
    /// Any dispatch error.
    pub async fn reassign_ticket(&self, key: &str, assignee: &AssigneeData) -> Result<()> {
        let key = require_id("Ticket key", key)?;
        info!(
            service = SERVICE,
            operation = "reassign_ticket",
            ticket = key,
            assignee = assignee.assignee(),
            "Operation started"
        );

        self.dispatcher.put(&self.paths.issue(key), assignee.to_update_body()).await?;

        info!(service = SERVICE, operation = "reassign_ticket", ticket = key, "Operation finished");
        Ok(())
    }

    /// # Errors
    /// Any dispatch error.
    pub async fn edit_description(&self, key: &str, description: &DescriptionData) -> Result<()> {
        let key = require_id("Ticket key", key)?;
        info!(
            service = SERVICE,
            operation = "edit_description",
            ticket = key,
            description_length = description.description().len(),
            "Operation started"
        );

        self.dispatcher.put(&self.paths.issue(key), description.to_update_body()).await?;

        info!(service = SERVICE, operation = "edit_description", ticket = key, "Operation finished");
        Ok(())
    }

    /// Attach a local file to the ticket. Returns the raw attachment list
    /// from the response.
    ///
    /// # Errors
    /// `Upload` when the file cannot be read or the upload fails.
    pub async fn attach_file(&self, key: &str, path: &Path, file_name: &str) -> Result<Value> {
        let key = require_id("Ticket key", key)?;
        let file_name = require_id("File name", file_name)?;
        info!(
            service = SERVICE,
            operation = "attach_file",
            ticket = key,
            file_name,
            "Operation started"
        );

        let response = self.dispatcher.upload(&self.paths.attachments(key), path, file_name).await?;

        info!(service = SERVICE, operation = "attach_file", ticket = key, "Operation finished");
        Ok(response.into_data())
    }

    async fn fetch_fresh(&self, key: &str) -> Result<TicketDetails> {
        let request = ApiRequest::get(self.paths.issue(key)).with_refresh();
        let response = self.dispatcher.send(request).await?;
        Ok(TicketDetails::from_value(response.data()))
    }
}
