//! Ready-to-use client wiring the production adapters together
//!
//! ```rust,ignore
//! use jiralink_infra::JiraClient;
//!
//! let client = JiraClient::load()?;
//! let ticket = client.tickets().get_ticket("ABC-1").await?;
//! println!("{}: {}", ticket.key, ticket.summary);
//! ```

use std::sync::Arc;

use jiralink_core::{
    ApiPaths, CommentService, Dispatcher, StatusService, SystemClock, TicketService,
};
use jiralink_domain::{JiraConfig, Result};
use tracing::info;

use crate::cache::{MokaCacheStore, MokaCounterStore};
use crate::config;
use crate::http::ReqwestTransport;
use crate::observability::TracingEventSink;

/// Owns one dispatcher and the services sharing it.
///
/// Clones of the inner `Arc<Dispatcher>` share the response cache and the
/// rate window, so create one client per Jira site and pass it around.
pub struct JiraClient {
    config: JiraConfig,
    dispatcher: Arc<Dispatcher>,
    tickets: TicketService,
    comments: CommentService,
    status: StatusService,
}

impl JiraClient {
    /// Build a client with the reqwest transport, moka stores and the tracing
    /// event sink.
    ///
    /// # Errors
    /// Returns `JiraError::Config` if the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: JiraConfig) -> Result<Self> {
        config.validate()?;

        let transport = ReqwestTransport::from_config(&config)?;
        let dispatcher = Dispatcher::builder()
            .config(&config)
            .transport(Arc::new(transport))
            .cache_store(Arc::new(MokaCacheStore::from_config(&config.cache)))
            .counter_store(Arc::new(MokaCounterStore::new()))
            .clock(Arc::new(SystemClock))
            .event_sink(Arc::new(TracingEventSink::new(&config.logging)))
            .build()?;

        info!(
            base_url = %config.base_url,
            project_key = %config.project_key,
            api_version = %config.api_version,
            "Jira client ready"
        );

        Ok(Self::with_dispatcher(config, Arc::new(dispatcher)))
    }

    /// Build a client from [`config::load`] (environment, then config files).
    ///
    /// # Errors
    /// Returns `JiraError::Config` if no valid configuration is found.
    pub fn load() -> Result<Self> {
        Self::new(config::load()?)
    }

    /// Build a client from environment variables only.
    ///
    /// # Errors
    /// Returns `JiraError::Config` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self> {
        Self::new(config::load_from_env()?)
    }

    /// Wrap an existing dispatcher, e.g. one built with custom ports.
    pub fn with_dispatcher(config: JiraConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let paths = ApiPaths::new(&config.api_version);
        let tickets = TicketService::new(Arc::clone(&dispatcher), config.project_key.clone())
            .with_paths(paths.clone());
        let comments = CommentService::new(Arc::clone(&dispatcher)).with_paths(paths.clone());
        let status = StatusService::new(Arc::clone(&dispatcher)).with_paths(paths);

        Self { config, dispatcher, tickets, comments, status }
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }

    pub fn comments(&self) -> &CommentService {
        &self.comments
    }

    pub fn status(&self) -> &StatusService {
        &self.status
    }
}
