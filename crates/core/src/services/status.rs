//! Workflow transitions

use std::sync::Arc;

use jiralink_domain::{ApiRequest, JiraError, Result, StatusData, Transition};
use tracing::{info, warn};

use super::{require_id, ApiPaths};
use crate::dispatch::Dispatcher;

const SERVICE: &str = "StatusService";

pub struct StatusService {
    dispatcher: Arc<Dispatcher>,
    paths: ApiPaths,
}

impl StatusService {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher, paths: ApiPaths::default() }
    }

    pub fn with_paths(mut self, paths: ApiPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Transitions currently available from the ticket's status.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn available_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let key = require_id("Ticket key", key)?;
        info!(
            service = SERVICE,
            operation = "available_transitions",
            ticket = key,
            "Operation started"
        );

        let transitions = self.fetch_transitions(ApiRequest::get(self.paths.transitions(key))).await?;

        info!(
            service = SERVICE,
            operation = "available_transitions",
            ticket = key,
            count = transitions.len(),
            "Operation finished"
        );
        Ok(transitions)
    }

    /// Move the ticket to the status named in `status`, matched
    /// case-insensitively against the transitions' target statuses.
    ///
    /// # Errors
    /// - `TransitionNotFound` when no available transition leads there.
    /// - Any dispatch error.
    pub async fn change_status(&self, key: &str, status: &StatusData) -> Result<()> {
        let key = require_id("Ticket key", key)?;
        info!(
            service = SERVICE,
            operation = "change_status",
            ticket = key,
            status = status.status(),
            has_comment = status.comment().is_some(),
            "Operation started"
        );

        // Transitions depend on the current status, so bypass the cache.
        let path = self.paths.transitions(key);
        let transitions = self.fetch_transitions(ApiRequest::get(&path).with_refresh()).await?;

        let Some(transition) = transitions.iter().find(|t| t.leads_to(status.status())) else {
            warn!(
                service = SERVICE,
                ticket = key,
                status = status.status(),
                available = ?transitions.iter().map(|t| t.to_status.as_str()).collect::<Vec<_>>(),
                "No transition leads to requested status"
            );
            return Err(JiraError::TransitionNotFound {
                ticket: key.to_string(),
                status: status.status().to_string(),
            });
        };

        self.dispatcher.post(&path, status.to_transition_body(&transition.id)).await?;

        info!(
            service = SERVICE,
            operation = "change_status",
            ticket = key,
            transition_id = %transition.id,
            "Operation finished"
        );
        Ok(())
    }

    async fn fetch_transitions(&self, request: ApiRequest) -> Result<Vec<Transition>> {
        let response = self.dispatcher.send(request).await?;
        Ok(Transition::list_from_response(response.data()))
    }
}
