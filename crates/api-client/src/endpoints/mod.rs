//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a set of backend endpoints.
//!
//! | Module | Endpoints |
//! |--------|-----------|
//! | `system` | `/health/`, `/stats/` |
//! | `products` | `/products/`, `/products/{id}/`, `/products/category/{c}/`, `/products/filters/` |
//! | `recommendations` | `/recommendations/{id}/`, `/recommendations/bulk/` |

pub mod products;
pub mod recommendations;
pub mod system;

pub use products::ProductsApi;
pub use recommendations::RecommendationsApi;
pub use system::SystemApi;
