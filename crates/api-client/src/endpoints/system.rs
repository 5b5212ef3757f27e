//! Health check and system statistics endpoints

use crate::client::OutfitClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Health and stats API interface
#[derive(Clone)]
pub struct SystemApi {
    client: OutfitClient,
}

impl SystemApi {
    /// Create a new system API interface
    pub(crate) fn new(client: OutfitClient) -> Self {
        Self { client }
    }

    /// GET /health/
    ///
    /// An unhealthy backend answers 503, which surfaces as an error.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.client.get("health/", Vec::new()).await
    }

    /// Health check with round-trip timing
    pub async fn health_timed(&self) -> ApiResult<(HealthStatus, Duration)> {
        let start = Instant::now();
        let health = self.health().await?;
        Ok((health, start.elapsed()))
    }

    /// GET /stats/
    pub async fn stats(&self) -> ApiResult<SystemStats> {
        self.client.get("stats/", Vec::new()).await
    }
}

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Server timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Per-dependency status (database, cache)
    #[serde(default)]
    pub services: BTreeMap<String, String>,
}

impl HealthStatus {
    /// True when the backend reports itself healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// System statistics response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    /// Whether the server reported success
    #[serde(default)]
    pub success: bool,
    /// Catalog counts
    pub products: ProductStats,
    /// Cache backend info
    #[serde(default)]
    pub cache: Option<CacheInfo>,
    /// API version string
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Catalog counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    /// Total products
    pub total: u64,
    /// Products per category
    #[serde(default)]
    pub by_category: BTreeMap<String, u64>,
}

/// Backend cache info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInfo {
    /// Cache backend name
    pub backend: String,
    /// Cache status
    pub status: String,
}
