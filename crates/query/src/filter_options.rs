//! Available filter facets, loaded once on mount

use crate::status::{run_detached, Generation, QueryStatus};
use outfit_api_client::{FilterOptions, OutfitClient};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

/// Snapshot rendered by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptionsState {
    /// Loaded facet values
    pub options: Option<FilterOptions>,
    /// Lifecycle of the request
    pub status: QueryStatus,
    /// Message of the failure
    pub error: Option<String>,
    #[serde(skip)]
    generation: Generation,
}

/// Facet lists for building filter controls
pub struct FilterOptionsQuery {
    client: OutfitClient,
    state: Arc<watch::Sender<FilterOptionsState>>,
}

impl FilterOptionsQuery {
    /// Create the query and load the facets
    pub async fn mount(client: OutfitClient) -> Self {
        let (state, _) = watch::channel(FilterOptionsState::default());
        let query = Self {
            client,
            state: Arc::new(state),
        };
        query.reload().await;
        query
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> FilterOptionsState {
        self.state.borrow().clone()
    }

    /// Fetch the facets again
    pub async fn reload(&self) {
        let mut generation = Generation::default();
        self.state.send_modify(|state| {
            generation = state.generation.advance();
            state.status = QueryStatus::Loading;
            state.error = None;
        });

        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        run_detached(async move {
            let result = client.products().filters().await;
            state.send_if_modified(|state| {
                if state.generation != generation {
                    return false;
                }
                match result {
                    Ok(options) => {
                        state.options = Some(options);
                        state.status = QueryStatus::Ready;
                    }
                    Err(e) => {
                        warn!(error = %e, "Filter options fetch failed");
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
