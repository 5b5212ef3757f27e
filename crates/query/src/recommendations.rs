//! Outfit recommendation query
//!
//! Holds the result for one base product at a time. Every call supersedes the
//! previous one: a late response for an older (product, preferences) pair is
//! dropped instead of overwriting newer state.

use crate::status::{run_detached, Generation, QueryStatus};
use outfit_api_client::{
    ApiError, ApiResult, Outfit, OutfitClient, Preferences, Product, ProductId,
    RecommendationResponse,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Message stored when no base product was given
pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";

/// Facts about the run that produced the current outfits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationMetadata {
    /// Product the outfits were built around
    pub base_product: Option<Product>,
    /// Candidate outfits scored by the server
    pub total_generated: u64,
    /// Outfits returned after the limit
    pub returned: u64,
    /// Server processing time
    pub processing_time_ms: f64,
    /// Whether the server answered from its cache
    pub cached: bool,
    /// Preferences the request was made with
    pub preferences: Preferences,
    /// Preferences the server reports having applied
    pub echoed_preferences: BTreeMap<String, Value>,
}

impl RecommendationMetadata {
    fn from_response(response: &RecommendationResponse, preferences: &Preferences) -> Self {
        let server = response.metadata.clone().unwrap_or_default();
        let returned = server
            .returned
            .unwrap_or(response.recommendations.len() as u64);
        Self {
            base_product: response.base_product.clone(),
            total_generated: server.total_generated.unwrap_or(returned),
            returned,
            processing_time_ms: response
                .response_time_ms
                .or(server.processing_time_ms)
                .unwrap_or_default(),
            cached: response.cached,
            preferences: preferences.clone(),
            echoed_preferences: server.preferences,
        }
    }
}

/// Snapshot rendered by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationsState {
    /// Outfits of the latest applied response
    pub recommendations: Option<Vec<Outfit>>,
    /// Summary of the latest applied response
    pub metadata: Option<RecommendationMetadata>,
    /// Lifecycle of the latest call
    pub status: QueryStatus,
    /// Message of the latest failure
    pub error: Option<String>,
    /// Base product and preferences of the latest call
    pub key: Option<(ProductId, Preferences)>,
    #[serde(skip)]
    generation: Generation,
}

impl RecommendationsState {
    /// True while a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Number of outfits currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.recommendations.as_ref().map_or(0, Vec::len)
    }

    /// True when no outfits are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fail(&mut self, message: String) {
        self.recommendations = None;
        self.metadata = None;
        self.error = Some(message);
        self.status = QueryStatus::Error;
    }
}

/// Recommendation request lifecycle for a single focused base product
pub struct RecommendationQuery {
    client: OutfitClient,
    state: Arc<watch::Sender<RecommendationsState>>,
}

impl RecommendationQuery {
    /// Create an idle query
    #[must_use]
    pub fn new(client: OutfitClient) -> Self {
        let (state, _) = watch::channel(RecommendationsState::default());
        Self {
            client,
            state: Arc::new(state),
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> RecommendationsState {
        self.state.borrow().clone()
    }

    /// Receive a new snapshot after every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RecommendationsState> {
        self.state.subscribe()
    }

    /// Request outfits for a base product.
    ///
    /// A missing product id fails immediately without a request.
    pub async fn fetch_recommendations(&self, product_id: Option<ProductId>, preferences: Preferences) {
        let Some(product_id) = product_id else {
            self.state.send_modify(|state| {
                state.generation.advance();
                state.key = None;
                state.fail(PRODUCT_ID_REQUIRED.to_string());
            });
            return;
        };

        let mut generation = Generation::default();
        self.state.send_modify(|state| {
            generation = state.generation.advance();
            let same_product = matches!(&state.key, Some((current, _)) if *current == product_id);
            if !same_product {
                state.recommendations = None;
                state.metadata = None;
            }
            state.status = QueryStatus::Loading;
            state.error = None;
            state.key = Some((product_id, preferences.clone()));
        });

        debug!(
            product_id,
            generation = generation.value(),
            "Fetching recommendations"
        );
        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        run_detached(async move {
            let result = client
                .recommendations()
                .for_product(product_id, &preferences)
                .await
                .and_then(RecommendationResponse::into_result);
            finish(&state, generation, &preferences, result);
        })
        .await;
    }

    /// Focus a base product, or clear everything when it is deselected
    pub async fn select_base_product(&self, product_id: Option<ProductId>, preferences: Preferences) {
        match product_id {
            Some(id) => self.fetch_recommendations(Some(id), preferences).await,
            None => self.clear_recommendations(),
        }
    }

    /// Reset outfits, metadata and error; any in-flight result is dropped
    pub fn clear_recommendations(&self) {
        self.state.send_modify(|state| {
            let generation = state.generation;
            *state = RecommendationsState {
                generation,
                ..RecommendationsState::default()
            };
            state.generation.advance();
        });
    }
}

fn finish(
    state: &watch::Sender<RecommendationsState>,
    generation: Generation,
    preferences: &Preferences,
    result: ApiResult<RecommendationResponse>,
) {
    state.send_if_modified(|state| {
        if state.generation != generation {
            debug!(
                stale = generation.value(),
                current = state.generation.value(),
                "Discarding superseded recommendation response"
            );
            return false;
        }

        match result {
            Ok(response) => {
                state.metadata = Some(RecommendationMetadata::from_response(&response, preferences));
                state.recommendations = Some(response.recommendations);
                state.error = None;
                state.status = QueryStatus::Ready;
            }
            Err(e) => {
                log_failure(&e);
                state.fail(e.to_string());
            }
        }
        true
    });
}

fn log_failure(error: &ApiError) {
    warn!(kind = %error.kind(), error = %error, "Recommendation fetch failed");
}
