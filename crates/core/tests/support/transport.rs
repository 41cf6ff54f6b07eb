use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use jiralink_core::{FileUpload, HttpTransport, TransportFailure, TransportResponse};
use jiralink_domain::ApiRequest;
use serde_json::Value;

type Scripted = Result<TransportResponse, TransportFailure>;

/// Transport that replays queued outcomes in order.
///
/// Once the queue is empty every call gets `200 {}`. Every request and upload
/// is recorded for later assertions.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
    uploads: Mutex<Vec<(String, FileUpload)>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, outcome: Scripted) -> &Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(TransportResponse::new(status, body.to_string())))
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.push(Ok(TransportResponse::new(status, Vec::new())))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn uploads(&self) -> Vec<(String, FileUpload)> {
        self.uploads.lock().unwrap().clone()
    }

    async fn next(&self) -> Scripted {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TransportResponse::new(200, "{}")))
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<TransportResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request.clone());
        self.next().await
    }

    async fn upload(
        &self,
        endpoint: &str,
        upload: FileUpload,
    ) -> Result<TransportResponse, TransportFailure> {
        self.uploads.lock().unwrap().push((endpoint.to_string(), upload));
        self.next().await
    }
}
