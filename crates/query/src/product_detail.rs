//! Single product query

use crate::status::{run_detached, Generation, QueryStatus};
use outfit_api_client::{OutfitClient, Product, ProductId};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Snapshot rendered by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductDetailState {
    /// Selected product
    pub product_id: Option<ProductId>,
    /// Loaded product
    pub product: Option<Product>,
    /// Lifecycle of the latest request
    pub status: QueryStatus,
    /// Message of the latest failure
    pub error: Option<String>,
    #[serde(skip)]
    generation: Generation,
}

/// Loads one product by id
pub struct ProductDetailQuery {
    client: OutfitClient,
    state: Arc<watch::Sender<ProductDetailState>>,
}

impl ProductDetailQuery {
    /// Create an idle query
    #[must_use]
    pub fn new(client: OutfitClient) -> Self {
        let (state, _) = watch::channel(ProductDetailState::default());
        Self {
            client,
            state: Arc::new(state),
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> ProductDetailState {
        self.state.borrow().clone()
    }

    /// Receive a new snapshot after every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductDetailState> {
        self.state.subscribe()
    }

    /// Load a product; `None` clears without a request
    pub async fn load(&self, product_id: Option<ProductId>) {
        let mut generation = Generation::default();
        self.state.send_modify(|state| {
            generation = state.generation.advance();
            state.product_id = product_id;
            state.error = None;
            if product_id.is_some() {
                state.status = QueryStatus::Loading;
            } else {
                state.product = None;
                state.status = QueryStatus::Idle;
            }
        });

        let Some(id) = product_id else {
            return;
        };

        debug!(product_id = id, "Fetching product");
        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        run_detached(async move {
            let result = client.products().get(id).await;
            state.send_if_modified(|state| {
                if state.generation != generation {
                    return false;
                }
                match result {
                    Ok(product) => {
                        state.product = Some(product);
                        state.status = QueryStatus::Ready;
                    }
                    Err(e) => {
                        warn!(product_id = id, error = %e, "Product fetch failed");
                        state.product = None;
                        state.error = Some(e.to_string());
                        state.status = QueryStatus::Error;
                    }
                }
                true
            });
        })
        .await;
    }
}
