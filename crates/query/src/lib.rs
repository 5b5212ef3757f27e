//! State holders between the storefront presentation layer and the API client
//!
//! Each query owns its inputs (filters, preferences, product id), issues
//! requests through an injected [`OutfitClient`](outfit_api_client::OutfitClient),
//! and publishes snapshots of `{data, status, error}`. Failures are stored as
//! display messages; no method returns an error.
//!
//! Every fetch is tagged with a generation taken when it starts. A response
//! whose tag is no longer current is discarded, so the last call wins
//! regardless of the order responses arrive in.
//!
//! # Example
//!
//! ```rust,no_run
//! use outfit_api_client::{OutfitClient, ProductFilters};
//! use outfit_query::{FilterUpdate, ProductQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OutfitClient::new()?;
//!     let query = ProductQuery::mount(client, ProductFilters::new().with_category("top")).await;
//!
//!     query.update_filters(FilterUpdate::new().style("formal")).await;
//!     let state = query.snapshot();
//!     println!("{} products ({})", state.products.len(), state.status);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod filter_options;
pub mod product_detail;
pub mod products;
pub mod recommendations;
pub mod status;

pub use filter_options::{FilterOptionsQuery, FilterOptionsState};
pub use product_detail::{ProductDetailQuery, ProductDetailState};
pub use products::{FilterUpdate, Pagination, ProductQuery, ProductsState};
pub use recommendations::{
    RecommendationMetadata, RecommendationQuery, RecommendationsState, PRODUCT_ID_REQUIRED,
};
pub use status::QueryStatus;
