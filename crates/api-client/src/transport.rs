//! Transport seam between the client and the network
//!
//! [`OutfitClient`](crate::OutfitClient) describes each call as an
//! [`ApiRequest`] and hands it to a [`Transport`]. Production code uses
//! [`HttpTransport`]; tests plug in a scripted implementation.

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// A structured description of one outbound call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Endpoint path relative to the base URL (e.g. `products/42/`)
    pub path: String,
    /// Query parameters in send order
    pub query: Vec<(String, String)>,
    /// JSON body for writes
    pub body: Option<Value>,
}

impl ApiRequest {
    /// GET request without parameters
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// POST request with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append query parameters
    #[must_use]
    pub fn with_query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Look up the first value of a query parameter
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes requests and returns the parsed JSON body of 2xx responses.
///
/// Non-2xx responses, network failures and timeouts must come back as
/// [`ApiError`] with the message already normalized.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Build a transport from configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&config.user_agent) {
            default_headers.insert(USER_AGENT, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()?;

        Ok(Self { inner, config })
    }

    /// Configured timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    fn map_send_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::from(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.config.url_for(&request.path);
        let request_id = Uuid::new_v4().to_string();

        let mut builder = self
            .inner
            .request(request.method.clone(), &url)
            .header(X_REQUEST_ID, &request_id);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        debug!(request_id = %request_id, method = %request.method, url = %url, "Sending request");

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&text).map_err(ApiError::from)
        } else {
            warn!(
                request_id = %request_id,
                status = status.as_u16(),
                url = %url,
                "Request returned error status"
            );
            Err(ApiError::from_status(status.as_u16(), &text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::get("products/")
            .with_query([("category", "top"), ("page", "2")]);
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.query_param("category"), Some("top"));
        assert_eq!(req.query_param("page"), Some("2"));
        assert_eq!(req.query_param("style"), None);

        let req = ApiRequest::post("recommendations/bulk/", serde_json::json!({"limit": 3}));
        assert_eq!(req.method, Method::POST);
        assert!(req.body.is_some());
    }

    #[test]
    fn test_http_transport_rejects_invalid_config() {
        let config = ClientConfig::default().with_base_url("not-a-url");
        assert!(HttpTransport::new(config).is_err());
    }

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new(ClientConfig::default());
        assert!(transport.is_ok());
    }
}
