use std::time::Duration;

use async_trait::async_trait;
use jiralink_core::{FileUpload, HttpTransport, TransportFailure, TransportResponse};
use jiralink_domain::{ApiRequest, HeaderMap, HttpMethod, JiraConfig, JiraError};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method, Response};
use tracing::debug;
use url::Url;

use crate::errors::{InfraError, IntoTransportFailure};

/// Header Jira requires on attachment uploads to skip its XSRF check.
const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

/// [`HttpTransport`] that talks to a Jira site with basic authentication.
///
/// Every request carries JSON `Accept`/`Content-Type` headers and the
/// configured user agent; uploads replace the content type with their
/// multipart boundary. JSON bodies are only attached when the request has
/// one. Statuses are never turned into errors here.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
    base_url: String,
    username: String,
    api_token: String,
}

impl ReqwestTransport {
    /// Start building a transport for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new(base_url)
    }

    /// Transport configured from the site URL, credentials, timeout and user
    /// agent of `config`.
    pub fn from_config(config: &JiraConfig) -> Result<Self, JiraError> {
        Self::builder(&config.base_url)
            .credentials(&config.username, &config.api_token)
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()
    }

    fn url_for(&self, endpoint: &str) -> Result<Url, TransportFailure> {
        let separator = if endpoint.starts_with('/') { "" } else { "/" };
        Url::parse(&format!("{}{separator}{endpoint}", self.base_url))
            .map_err(|err| TransportFailure::Other(format!("invalid request URL: {err}")))
    }

    async fn into_transport_response(
        response: Response,
    ) -> Result<TransportResponse, TransportFailure> {
        let status = response.status().as_u16();
        // Repeated headers are folded into one comma-separated value.
        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else { continue };
            headers
                .entry(name.as_str().to_ascii_lowercase())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        let body = response.bytes().await.map_err(IntoTransportFailure::into_transport_failure)?;

        Ok(TransportResponse { status, body: body.to_vec(), headers })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<TransportResponse, TransportFailure> {
        let mut url = self.url_for(request.endpoint())?;
        if !request.params().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in request.params() {
                pairs.append_pair(name, &value.to_string());
            }
        }

        debug!(method = %request.method(), %url, "sending HTTP request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), url)
            .basic_auth(&self.username, Some(&self.api_token));
        if request.has_body() {
            builder = builder.json(request.body());
        }

        let response =
            builder.send().await.map_err(IntoTransportFailure::into_transport_failure)?;
        debug!(status = response.status().as_u16(), "received HTTP response");

        Self::into_transport_response(response).await
    }

    async fn upload(
        &self,
        endpoint: &str,
        upload: FileUpload,
    ) -> Result<TransportResponse, TransportFailure> {
        let url = self.url_for(endpoint)?;
        debug!(%url, file_name = %upload.file_name, size = upload.bytes.len(), "uploading file");

        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.api_token))
            .header(ATLASSIAN_TOKEN_HEADER, "no-check")
            .multipart(form)
            .send()
            .await
            .map_err(IntoTransportFailure::into_transport_failure)?;

        Self::into_transport_response(response).await
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    base_url: String,
    username: String,
    api_token: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ReqwestTransportBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: String::new(),
            api_token: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, api_token: impl Into<String>) -> Self {
        self.username = username.into();
        self.api_token = api_token.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<ReqwestTransport, JiraError> {
        // Reject unparseable sites up front rather than on the first call.
        Url::parse(&self.base_url).map_err(InfraError::from)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).default_headers(headers).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(InfraError::from)?;

        Ok(ReqwestTransport {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            username: self.username,
            api_token: self.api_token,
        })
    }
}
