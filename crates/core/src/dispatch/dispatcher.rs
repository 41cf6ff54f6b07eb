//! Request dispatcher
//!
//! Runs one request end to end: admission, cache lookup, transport call
//! under a timeout, status classification, cache store and event emission.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jiralink_domain::{
    ApiRequest, ApiResponse, HttpMethod, JiraConfig, JiraError, QueryParams, RequestContext,
    Result,
};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::cache_gate::CacheGate;
use super::classify::{classify_failure, classify_status};
use super::rate_limiter::RateLimiter;
use super::retry::RetryPolicy;
use crate::ports::{
    CacheStore, Clock, CounterStore, DispatchEvent, EventSink, FileUpload, HttpTransport,
    NoopEventSink, SystemClock, TransportFailure,
};

/// Executes requests against the remote REST API
///
/// Shared between services behind an `Arc`; every method takes `&self`.
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    limiter: RateLimiter,
    cache: CacheGate,
    events: Arc<dyn EventSink>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Dispatcher {
    /// Create a builder for fluent configuration
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache_gate(&self) -> &CacheGate {
        &self.cache
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Send a request once.
    ///
    /// # Errors
    /// - `RateLimited` (local) when the minute's ceiling is reached; nothing
    ///   else is attempted.
    /// - The status-derived variants for non-2xx responses.
    /// - `Timeout` / `Transport` when no response was received.
    /// - `Storage` when the rate counter store fails.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.dispatch(&request, Uuid::new_v4()).await
    }

    /// Send a request, retrying retryable failures with exponential backoff.
    ///
    /// Every attempt goes through admission again. Local rate-limit
    /// rejections are returned immediately, as are remote ones whose
    /// `Retry-After` exceeds the policy's maximum delay.
    ///
    /// # Errors
    /// The error of the last attempt.
    pub async fn send_with_retry(&self, request: ApiRequest) -> Result<ApiResponse> {
        let request_id = Uuid::new_v4();
        let mut attempt = 1;

        loop {
            match self.dispatch(&request, request_id).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    let Some(delay) = self.retry.delay_after(attempt, &error) else {
                        return Err(error);
                    };

                    self.events.emit(&DispatchEvent::Retry {
                        request_id,
                        method: request.method(),
                        endpoint: request.endpoint().to_string(),
                        attempt,
                        delay,
                        reason: error.to_string(),
                    });

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// # Errors
    /// See [`Dispatcher::send`].
    pub async fn get(&self, endpoint: &str, params: QueryParams) -> Result<ApiResponse> {
        self.send(ApiRequest::get(endpoint).with_params(params)).await
    }

    /// # Errors
    /// See [`Dispatcher::send`].
    pub async fn post(&self, endpoint: &str, body: Map<String, Value>) -> Result<ApiResponse> {
        self.send(ApiRequest::post(endpoint).with_body(body)).await
    }

    /// # Errors
    /// See [`Dispatcher::send`].
    pub async fn put(&self, endpoint: &str, body: Map<String, Value>) -> Result<ApiResponse> {
        self.send(ApiRequest::put(endpoint).with_body(body)).await
    }

    /// # Errors
    /// See [`Dispatcher::send`].
    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(endpoint)).await
    }

    #[instrument(skip_all, fields(%request_id, method = %request.method(), endpoint = request.endpoint()))]
    async fn dispatch(&self, request: &ApiRequest, request_id: Uuid) -> Result<ApiResponse> {
        self.limiter.admit().await?;

        self.events.emit(&DispatchEvent::Request {
            request_id,
            method: request.method(),
            endpoint: request.endpoint().to_string(),
            params: request.params().clone(),
            body: request.body().clone(),
        });

        if let Some(cached) = self.cache.lookup(request).await {
            self.events.emit(&DispatchEvent::CacheHit {
                request_id,
                method: request.method(),
                endpoint: request.endpoint().to_string(),
            });
            return Ok(cached);
        }

        let started = Instant::now();
        let raw = match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(failure)) => return Err(self.transport_error(request, request_id, &failure)),
            Err(_elapsed) => {
                return Err(self.transport_error(request, request_id, &TransportFailure::Timeout))
            }
        };
        let elapsed = started.elapsed();

        let response = ApiResponse::from_body(raw.status, &raw.body, raw.headers);
        debug!(status = response.status_code(), ?elapsed, "Transport returned");

        if !response.is_successful() {
            let error = classify_status(request, &response);
            if matches!(
                error,
                JiraError::Server(_) | JiraError::Client(_) | JiraError::UnexpectedStatus(_)
            ) {
                self.emit_error(request, request_id, &error);
            }
            return Err(error);
        }

        self.events.emit(&DispatchEvent::Response {
            request_id,
            method: request.method(),
            endpoint: request.endpoint().to_string(),
            status: response.status_code(),
            elapsed,
        });

        if self.cache.store(request, &response).await {
            self.events.emit(&DispatchEvent::CacheStore {
                request_id,
                method: request.method(),
                endpoint: request.endpoint().to_string(),
                ttl: self.cache.ttl(),
            });
        }

        Ok(response)
    }

    fn transport_error(
        &self,
        request: &ApiRequest,
        request_id: Uuid,
        failure: &TransportFailure,
    ) -> JiraError {
        let error = classify_failure(request, failure, self.timeout);
        self.emit_error(request, request_id, &error);
        error
    }

    fn emit_error(&self, request: &ApiRequest, request_id: Uuid, error: &JiraError) {
        self.events.emit(&DispatchEvent::Error {
            request_id,
            method: request.method(),
            endpoint: request.endpoint().to_string(),
            status: error.status_code(),
            category: error.category(),
            message: error.to_string(),
        });
    }

    /// Upload a file as a multipart `file` part.
    ///
    /// Uploads bypass admission control and the cache.
    ///
    /// # Errors
    /// Returns `JiraError::Upload` when the file cannot be read, the request
    /// fails or times out, or the response is not 2xx.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn upload(&self, endpoint: &str, path: &Path, file_name: &str) -> Result<ApiResponse> {
        let request_id = Uuid::new_v4();

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let message = format!("Failed to read {}: {e}", path.display());
                return Err(self.upload_error(request_id, endpoint, file_name, message, None));
            }
        };

        self.events.emit(&DispatchEvent::UploadRequest {
            request_id,
            endpoint: endpoint.to_string(),
            file_name: file_name.to_string(),
            size: bytes.len() as u64,
        });

        let upload = FileUpload { file_name: file_name.to_string(), bytes };
        let raw = match tokio::time::timeout(self.timeout, self.transport.upload(endpoint, upload))
            .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(failure)) => {
                return Err(self.upload_error(
                    request_id,
                    endpoint,
                    file_name,
                    failure.to_string(),
                    None,
                ))
            }
            Err(_elapsed) => {
                let message = format!("upload timed out after {:?}", self.timeout);
                return Err(self.upload_error(request_id, endpoint, file_name, message, None));
            }
        };

        let response = ApiResponse::from_body(raw.status, &raw.body, raw.headers);
        if !response.is_successful() {
            let message = format!("upload returned status {}", response.status_code());
            return Err(self.upload_error(
                request_id,
                endpoint,
                file_name,
                message,
                Some(response.status_code()),
            ));
        }

        self.events.emit(&DispatchEvent::UploadResponse {
            request_id,
            endpoint: endpoint.to_string(),
            file_name: file_name.to_string(),
            status: response.status_code(),
        });

        Ok(response)
    }

    fn upload_error(
        &self,
        request_id: Uuid,
        endpoint: &str,
        file_name: &str,
        message: String,
        status: Option<u16>,
    ) -> JiraError {
        self.events.emit(&DispatchEvent::UploadError {
            request_id,
            endpoint: endpoint.to_string(),
            file_name: file_name.to_string(),
            message: message.clone(),
        });

        let mut context = RequestContext::new(HttpMethod::Post, endpoint, message);
        if let Some(status) = status {
            context = context.with_status(status);
        }
        JiraError::Upload { file_name: file_name.to_string(), context }
    }
}

/// Builder for [`Dispatcher`]
///
/// A transport and both stores are required. Configuration defaults to
/// [`JiraConfig`] defaults, the clock to [`SystemClock`] and events are
/// discarded unless a sink is set.
#[derive(Default)]
pub struct DispatcherBuilder {
    config: Option<JiraConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    counter_store: Option<Arc<dyn CounterStore>>,
    clock: Option<Arc<dyn Clock>>,
    events: Option<Arc<dyn EventSink>>,
}

impl DispatcherBuilder {
    pub fn config(mut self, config: &JiraConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    pub fn counter_store(mut self, store: Arc<dyn CounterStore>) -> Self {
        self.counter_store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// # Errors
    /// Returns `JiraError::Config` when the transport or a store is missing.
    pub fn build(self) -> Result<Dispatcher> {
        let transport = self
            .transport
            .ok_or_else(|| JiraError::Config("Dispatcher requires a transport".to_string()))?;
        let cache_store = self
            .cache_store
            .ok_or_else(|| JiraError::Config("Dispatcher requires a cache store".to_string()))?;
        let counter_store = self
            .counter_store
            .ok_or_else(|| JiraError::Config("Dispatcher requires a counter store".to_string()))?;

        let config = self.config.unwrap_or_else(|| JiraConfig::new("", "", ""));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let events = self.events.unwrap_or_else(|| Arc::new(NoopEventSink));

        Ok(Dispatcher {
            transport,
            limiter: RateLimiter::new(&config.rate_limiting, counter_store, clock),
            cache: CacheGate::new(&config.cache, cache_store),
            events,
            timeout: config.timeout(),
            retry: RetryPolicy::from_config(&config),
        })
    }
}
