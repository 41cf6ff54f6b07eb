//! Comment service

use std::sync::Arc;

use jiralink_domain::{ApiRequest, Comment, CommentData, Result};
use tracing::info;

use super::{require_id, ApiPaths};
use crate::dispatch::Dispatcher;

const SERVICE: &str = "CommentService";

pub struct CommentService {
    dispatcher: Arc<Dispatcher>,
    paths: ApiPaths,
}

impl CommentService {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher, paths: ApiPaths::default() }
    }

    pub fn with_paths(mut self, paths: ApiPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Add a comment and return it as stored.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn add_comment(&self, key: &str, comment: &CommentData) -> Result<Comment> {
        let key = require_id("Ticket key", key)?;
        info!(service = SERVICE, operation = "add_comment", ticket = key, "Operation started");

        let response = self.dispatcher.post(&self.paths.comments(key), comment.to_body()).await?;
        let created = Comment::from_value(response.data());

        info!(
            service = SERVICE,
            operation = "add_comment",
            ticket = key,
            comment_id = %created.id,
            "Operation finished"
        );
        Ok(created)
    }

    /// One page of comments, oldest first as returned by the server.
    ///
    /// # Errors
    /// Any dispatch error.
    pub async fn get_comments(
        &self,
        key: &str,
        max_results: u32,
        start_at: u32,
    ) -> Result<Vec<Comment>> {
        let key = require_id("Ticket key", key)?;
        info!(service = SERVICE, operation = "get_comments", ticket = key, "Operation started");

        let request = ApiRequest::get(self.paths.comments(key))
            .with_param("maxResults", max_results)
            .with_param("startAt", start_at);
        let response = self.dispatcher.send(request).await?;
        let comments = Comment::list_from_page(response.data());

        info!(
            service = SERVICE,
            operation = "get_comments",
            ticket = key,
            count = comments.len(),
            "Operation finished"
        );
        Ok(comments)
    }

    /// # Errors
    /// Any dispatch error.
    pub async fn update_comment(
        &self,
        key: &str,
        comment_id: &str,
        comment: &CommentData,
    ) -> Result<Comment> {
        let key = require_id("Ticket key", key)?;
        let comment_id = require_id("Comment id", comment_id)?;
        info!(
            service = SERVICE,
            operation = "update_comment",
            ticket = key,
            comment_id,
            "Operation started"
        );

        let response =
            self.dispatcher.put(&self.paths.comment(key, comment_id), comment.to_body()).await?;

        info!(
            service = SERVICE,
            operation = "update_comment",
            ticket = key,
            comment_id,
            "Operation finished"
        );
        Ok(Comment::from_value(response.data()))
    }

    /// # Errors
    /// Any dispatch error.
    pub async fn delete_comment(&self, key: &str, comment_id: &str) -> Result<()> {
        let key = require_id("Ticket key", key)?;
        let comment_id = require_id("Comment id", comment_id)?;
        info!(
            service = SERVICE,
            operation = "delete_comment",
            ticket = key,
            comment_id,
            "Operation started"
        );

        self.dispatcher.delete(&self.paths.comment(key, comment_id)).await?;

        info!(
            service = SERVICE,
            operation = "delete_comment",
            ticket = key,
            comment_id,
            "Operation finished"
        );
        Ok(())
    }
}
