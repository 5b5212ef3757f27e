//! Product catalog endpoints
//!
//! - `GET /products/` with filters and page
//! - `GET /products/{id}/`
//! - `GET /products/category/{category}/`
//! - `GET /products/filters/`

use crate::client::OutfitClient;
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Stable product identifier
pub type ProductId = u64;

/// Products API interface
#[derive(Clone)]
pub struct ProductsApi {
    client: OutfitClient,
}

impl ProductsApi {
    /// Create a new products API interface
    pub(crate) fn new(client: OutfitClient) -> Self {
        Self { client }
    }

    /// List products matching a filter set
    ///
    /// GET /products/?category=..&style=..&page=..
    pub async fn list(&self, filters: &ProductFilters) -> ApiResult<ProductList> {
        self.client.get("products/", filters.to_query()).await
    }

    /// Get a single product by ID
    ///
    /// GET /products/{id}/
    pub async fn get(&self, id: ProductId) -> ApiResult<Product> {
        self.client.get(&format!("products/{id}/"), Vec::new()).await
    }

    /// List every product in one category
    ///
    /// GET /products/category/{category}/
    pub async fn by_category(&self, category: &str) -> ApiResult<CategoryProducts> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ApiError::validation("Category is required"));
        }
        self.client
            .get(&format!("products/category/{category}/"), Vec::new())
            .await
    }

    /// Available filter facets
    ///
    /// GET /products/filters/
    pub async fn filters(&self) -> ApiResult<FilterOptions> {
        let response: FilterOptionsResponse = self.client.get("products/filters/", Vec::new()).await?;
        if response.success {
            Ok(response.filters)
        } else {
            Err(ApiError::application(
                response
                    .error
                    .unwrap_or_else(|| "Failed to load filters".to_string()),
            ))
        }
    }
}

// ============================================================================
// Filter Set
// ============================================================================

/// Active product-search constraints.
///
/// `None` means unconstrained. Empty strings are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Category (top, bottom, footwear, accessory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Style (formal, smart_casual, casual, sporty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Color name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Price bucket (budget, mid, premium, luxury)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    /// Free-text search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ProductFilters {
    /// Unconstrained filter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    /// Filter by style
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = non_empty(style.into());
        self
    }

    /// Filter by color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = non_empty(color.into());
        self
    }

    /// Filter by price range
    #[must_use]
    pub fn with_price_range(mut self, price_range: impl Into<String>) -> Self {
        self.price_range = non_empty(price_range.into());
        self
    }

    /// Free-text search
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_empty(search.into());
        self
    }

    /// Select a page (values below 1 are treated as 1)
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    /// Page the request targets
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// True when no key is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when any constraint other than `page` is set
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        self.category.is_some()
            || self.style.is_some()
            || self.color.is_some()
            || self.price_range.is_some()
            || self.search.is_some()
    }

    /// Query parameters in wire order; unset keys are omitted
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let text = [
            ("category", &self.category),
            ("style", &self.style),
            ("color", &self.color),
            ("price_range", &self.price_range),
            ("search", &self.search),
        ];
        for (key, value) in text {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                query.push((key.to_string(), value.to_string()));
            }
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.max(1).to_string()));
        }
        query
    }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog id
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Top-level category
    #[serde(default)]
    pub category: String,
    /// Sub-category
    #[serde(default)]
    pub sub_category: String,
    /// Style label
    #[serde(default)]
    pub style: String,
    /// Color label
    #[serde(default)]
    pub color: String,
    /// Non-negative price; the backend sends either a number or a decimal string
    #[serde(default, deserialize_with = "de_price")]
    pub price: f64,
    /// Price bucket
    #[serde(default)]
    pub price_range: String,
    /// Occasion labels
    #[serde(default, deserialize_with = "de_labels")]
    pub occasions: BTreeSet<String>,
    /// Season labels
    #[serde(default, deserialize_with = "de_labels")]
    pub seasons: BTreeSet<String>,
    /// Free-form tags
    #[serde(default, deserialize_with = "de_labels")]
    pub tags: BTreeSet<String>,
    /// Image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Target gender
    #[serde(default)]
    pub gender: Option<String>,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,
    /// Long description
    #[serde(default)]
    pub description: Option<String>,
}

/// Product listing, normalized from either a bare array or a paginated page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProductList")]
pub struct ProductList {
    /// Products on this page
    pub products: Vec<Product>,
    /// Total count across pages, when the server reports it
    pub count: Option<u64>,
    /// Link to the next page
    pub next: Option<String>,
    /// Link to the previous page
    pub previous: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductList {
    Bare(Vec<Product>),
    Page {
        #[serde(default, alias = "products")]
        results: Vec<Product>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
}

impl From<RawProductList> for ProductList {
    fn from(raw: RawProductList) -> Self {
        match raw {
            RawProductList::Bare(products) => Self {
                products,
                ..Self::default()
            },
            RawProductList::Page {
                results,
                count,
                next,
                previous,
            } => Self {
                products: results,
                count,
                next,
                previous,
            },
        }
    }
}

/// Products in a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProducts {
    /// Whether the server reported success
    #[serde(default = "default_true")]
    pub success: bool,
    /// Requested category
    pub category: String,
    /// Number of products in the category
    #[serde(default)]
    pub count: u64,
    /// Products in the category
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Available filter facets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Available categories
    #[serde(default)]
    pub categories: Vec<String>,
    /// Available styles
    #[serde(default)]
    pub styles: Vec<String>,
    /// Available colors
    #[serde(default)]
    pub colors: Vec<String>,
    /// Available price buckets
    #[serde(default)]
    pub price_ranges: Vec<String>,
    /// Available genders
    #[serde(default)]
    pub genders: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FilterOptionsResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    filters: FilterOptions,
    #[serde(default)]
    error: Option<String>,
}

fn default_true() -> bool {
    true
}

fn de_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    let price = match Price::deserialize(deserializer)? {
        Price::Number(n) => n,
        Price::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {s:?}")))?,
    };
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(serde::de::Error::custom(format!("price must be non-negative, got {price}")))
    }
}

/// Accepts `["office"]`, `[{"occasion": "office"}]` or `null`
fn de_labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Plain(String),
        Keyed(std::collections::BTreeMap<String, String>),
    }

    let labels = Option::<Vec<Label>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(labels
        .into_iter()
        .filter_map(|label| match label {
            Label::Plain(s) => Some(s),
            Label::Keyed(map) => map.into_values().next(),
        })
        .filter(|s| !s.is_empty())
        .collect())
}
