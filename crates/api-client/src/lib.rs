//! HTTP client for the outfit recommendation storefront backend
//!
//! This crate is the single choke point for outbound calls made by the
//! storefront data layer.
//!
//! # Features
//!
//! - **Environment-based configuration**: base URL and timeout from the environment
//! - **Cache busting**: every GET carries a strictly increasing `_t` stamp
//! - **Normalized errors**: one displayable message per failure
//! - **Pluggable transport**: swap [`HttpTransport`] for a mock in tests
//! - **Request correlation**: every request carries an `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use outfit_api_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OutfitClient::new()?;
//!
//!     let health = client.system().health().await?;
//!     println!("Backend status: {}", health.status);
//!
//!     let tops = client
//!         .products()
//!         .list(&ProductFilters::new().with_category("top"))
//!         .await?;
//!     println!("Got {} tops", tops.products.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod transport;

pub use client::OutfitClient;
pub use config::ClientConfig;
pub use endpoints::products::{
    CategoryProducts, FilterOptions, Product, ProductFilters, ProductId, ProductList,
};
pub use endpoints::recommendations::{
    Budget, BulkRecommendationResponse, BulkResult, Gender, Occasion, Outfit, Preferences,
    RecommendationResponse, ResponseMetadata, ScoreExplanation, Season,
};
pub use endpoints::system::{HealthStatus, SystemStats};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use transport::{ApiRequest, HttpTransport, Transport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::OutfitClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::products::{Product, ProductFilters, ProductId};
    pub use crate::endpoints::recommendations::{Budget, Gender, Occasion, Preferences, Season};
    pub use crate::endpoints::{ProductsApi, RecommendationsApi, SystemApi};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::transport::{ApiRequest, Transport};
}
