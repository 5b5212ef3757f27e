//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{ProductsApi, RecommendationsApi, SystemApi};
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, HttpTransport, Transport};
use outfit_telemetry::{metrics, Timer};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument, warn};

/// Query parameter carrying the cache-busting stamp
pub const CACHE_BUST_PARAM: &str = "_t";

/// Outfit storefront API client
///
/// The single choke point for outbound calls. Cloning is cheap; clones share
/// the transport and the cache-busting counter.
#[derive(Clone)]
pub struct OutfitClient {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    cache_buster: Arc<CacheBuster>,
}

impl std::fmt::Debug for OutfitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutfitClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl OutfitClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new HTTP client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            cache_buster: Arc::new(CacheBuster::default()),
        }
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access health and stats endpoints
    #[must_use]
    pub fn system(&self) -> SystemApi {
        SystemApi::new(self.clone())
    }

    /// Access product catalog endpoints
    #[must_use]
    pub fn products(&self) -> ProductsApi {
        ProductsApi::new(self.clone())
    }

    /// Access outfit recommendation endpoints
    #[must_use]
    pub fn recommendations(&self) -> RecommendationsApi {
        RecommendationsApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level request methods
    // -------------------------------------------------------------------------

    /// Perform a GET request and decode the body
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> ApiResult<T> {
        let request = ApiRequest::get(path).with_query(query);
        let value = self.execute(request).await?;
        decode(value)
    }

    /// Perform a POST request with a JSON body and decode the response
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        let value = self.execute(ApiRequest::post(path, body)).await?;
        decode(value)
    }

    /// Execute a request through the transport.
    ///
    /// GET requests get a fresh `_t` stamp so intermediate caches never serve
    /// a stale body.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, mut request: ApiRequest) -> ApiResult<Value> {
        if request.method == Method::GET {
            request.query.retain(|(k, _)| k != CACHE_BUST_PARAM);
            request
                .query
                .push((CACHE_BUST_PARAM.to_string(), self.cache_buster.next().to_string()));
        }

        let timer = Timer::start("api.latency_ms");
        metrics().increment("api.requests");
        let result = self.transport.execute(request).await;
        let elapsed = timer.stop();

        match &result {
            Ok(_) => debug!(elapsed_ms = elapsed.as_millis(), "Request succeeded"),
            Err(e) => {
                metrics().increment("api.errors");
                warn!(kind = %e.kind(), error = %e, elapsed_ms = elapsed.as_millis(), "Request failed");
            }
        }
        result
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(ApiError::from)
}

/// Produces strictly increasing millisecond stamps.
///
/// Two calls in the same millisecond still yield distinct values.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicU64,
}

impl CacheBuster {
    /// Next stamp, never equal to or below a previous one
    pub fn next(&self) -> u64 {
        let now = now_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
