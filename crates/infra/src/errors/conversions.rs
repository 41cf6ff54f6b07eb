//! Conversions from external infrastructure errors into domain errors.

use jiralink_core::TransportFailure;
use jiralink_domain::JiraError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub JiraError);

impl From<InfraError> for JiraError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<JiraError> for InfraError {
    fn from(value: JiraError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportFailure */
/* -------------------------------------------------------------------------- */

/// Classifies a failed exchange for the dispatcher.
///
/// Only failures that happen before a status line is received reach this
/// mapping; HTTP statuses are classified by the dispatcher itself.
pub trait IntoTransportFailure {
    fn into_transport_failure(self) -> TransportFailure;
}

impl IntoTransportFailure for HttpError {
    fn into_transport_failure(self) -> TransportFailure {
        if self.is_timeout() {
            return TransportFailure::Timeout;
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return TransportFailure::Connection(self.to_string());
        }

        TransportFailure::Other(self.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Construction and configuration errors → JiraError::Config */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(JiraError::Config(format!("failed to build HTTP client: {value}")))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(JiraError::Config(format!("invalid URL: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(JiraError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(JiraError::Config(format!("Invalid JSON format: {value}")))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(JiraError::Config(format!("Failed to read config file: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn timeout_maps_to_timeout_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client =
            Client::builder().no_proxy().timeout(Duration::from_millis(100)).build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap_err();

        assert_eq!(error.into_transport_failure(), TransportFailure::Timeout);
    }

    #[tokio::test]
    async fn refused_connection_maps_to_connection_failure() {
        // Bind then drop to get a port with nothing listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://127.0.0.1:{port}/")).send().await.unwrap_err();

        match error.into_transport_failure() {
            TransportFailure::Connection(_) => {}
            other => panic!("expected connection failure, got {:?}", other),
        }
    }

    #[test]
    fn toml_error_maps_to_config() {
        let err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let mapped: JiraError = InfraError::from(err).into();
        match mapped {
            JiraError::Config(msg) => assert!(msg.contains("TOML")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
