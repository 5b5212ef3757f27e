//! Outfit recommendation endpoints
//!
//! - `GET /recommendations/{productId}/` with preference query parameters
//! - `POST /recommendations/bulk/`

use crate::client::OutfitClient;
use crate::endpoints::products::{Product, ProductId};
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Most product ids the bulk endpoint accepts in one request
pub const MAX_BULK_PRODUCTS: usize = 10;

/// Default number of outfits requested
pub const DEFAULT_LIMIT: u32 = 5;

/// Recommendations API interface
#[derive(Clone)]
pub struct RecommendationsApi {
    client: OutfitClient,
}

impl RecommendationsApi {
    /// Create a new recommendations API interface
    pub(crate) fn new(client: OutfitClient) -> Self {
        Self { client }
    }

    /// Outfits built around one base product
    ///
    /// GET /recommendations/{id}/?gender=..&occasion=..&limit=..
    ///
    /// A well-formed `success: false` body is returned as-is; callers decide
    /// how to surface it.
    pub async fn for_product(
        &self,
        product_id: ProductId,
        preferences: &Preferences,
    ) -> ApiResult<RecommendationResponse> {
        self.client
            .get(&format!("recommendations/{product_id}/"), preferences.to_query())
            .await
    }

    /// Outfits for several base products in one round trip
    ///
    /// POST /recommendations/bulk/
    pub async fn bulk(
        &self,
        product_ids: &[ProductId],
        preferences: &Preferences,
        limit: u32,
    ) -> ApiResult<BulkRecommendationResponse> {
        if product_ids.is_empty() {
            return Err(ApiError::validation("product_ids is required"));
        }
        if product_ids.len() > MAX_BULK_PRODUCTS {
            return Err(ApiError::validation(format!(
                "Maximum {MAX_BULK_PRODUCTS} products allowed per request"
            )));
        }

        let body = BulkRecommendationRequest {
            product_ids,
            preferences,
            limit: limit.max(1),
        };
        self.client.post("recommendations/bulk/", &body).await
    }
}

// ============================================================================
// Preference Set
// ============================================================================

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(ApiError::validation(format!(
                        "invalid {}: {other:?} (expected one of: {})",
                        stringify!($name).to_lowercase(),
                        [$($wire),+].join(", ")
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    /// Shopper gender
    Gender {
        /// Menswear
        Male => "male",
        /// Womenswear
        Female => "female",
    }
}

wire_enum! {
    /// Target occasion
    Occasion {
        /// Office
        Office => "office",
        /// Casual
        Casual => "casual",
        /// Party
        Party => "party",
        /// Wedding
        Wedding => "wedding",
        /// Date
        Date => "date",
        /// Interview
        Interview => "interview",
        /// Beach
        Beach => "beach",
        /// Vacation
        Vacation => "vacation",
        /// Weekend
        Weekend => "weekend",
        /// Outdoor
        Outdoor => "outdoor",
    }
}

wire_enum! {
    /// Target season
    Season {
        /// Summer
        Summer => "summer",
        /// Winter
        Winter => "winter",
        /// Spring
        Spring => "spring",
        /// Fall
        Fall => "fall",
    }
}

wire_enum! {
    /// Budget bucket, mirroring product price ranges
    Budget {
        /// Up to $50
        Budget => "budget",
        /// $50 - $150
        Mid => "mid",
        /// $150 - $300
        Premium => "premium",
        /// $300 and up
        Luxury => "luxury",
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::Male
    }
}

/// User-chosen styling constraints for a recommendation request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preferences {
    /// Gender the outfits are styled for
    pub gender: Gender,
    /// Target occasion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<Occasion>,
    /// Target season
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    /// Budget tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    /// Number of outfits to return, at least 1
    pub limit: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            gender: Gender::default(),
            occasion: None,
            season: None,
            budget: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Preferences {
    /// Default preferences for a gender
    #[must_use]
    pub fn new(gender: Gender) -> Self {
        Self {
            gender,
            ..Self::default()
        }
    }

    /// Target an occasion
    #[must_use]
    pub fn with_occasion(mut self, occasion: Occasion) -> Self {
        self.occasion = Some(occasion);
        self
    }

    /// Target a season
    #[must_use]
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    /// Target a budget
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Number of outfits (values below 1 become 1)
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Query parameters in wire order
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("gender".to_string(), self.gender.to_string())];
        if let Some(occasion) = self.occasion {
            query.push(("occasion".to_string(), occasion.to_string()));
        }
        if let Some(season) = self.season {
            query.push(("season".to_string(), season.to_string()));
        }
        if let Some(budget) = self.budget {
            query.push(("budget".to_string(), budget.to_string()));
        }
        query.push(("limit".to_string(), self.limit.max(1).to_string()));
        query
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct BulkRecommendationRequest<'a> {
    product_ids: &'a [ProductId],
    preferences: &'a Preferences,
    limit: u32,
}

/// One scored outfit suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    /// Server-assigned outfit id
    #[serde(default)]
    pub id: Option<String>,
    /// Top slot
    #[serde(default)]
    pub top: Option<Product>,
    /// Bottom slot
    #[serde(default)]
    pub bottom: Option<Product>,
    /// Footwear slot
    #[serde(default)]
    pub footwear: Option<Product>,
    /// Accessories, possibly empty
    #[serde(default)]
    pub accessories: Vec<Product>,
    /// Total price as reported by the server
    #[serde(default)]
    pub total_price: Option<f64>,
    /// Overall score in [0, 1]
    pub score: f64,
    /// Sub-metric name to score in [0, 1]
    #[serde(default)]
    pub score_breakdown: BTreeMap<String, f64>,
    /// Human-readable score explanation
    #[serde(default)]
    pub explanation: ScoreExplanation,
}

impl Outfit {
    /// Every product in the outfit, slot order then accessories
    pub fn items(&self) -> impl Iterator<Item = &Product> {
        self.top
            .iter()
            .chain(self.bottom.iter())
            .chain(self.footwear.iter())
            .chain(self.accessories.iter())
    }

    /// Reported total, or the sum of item prices
    #[must_use]
    pub fn price(&self) -> f64 {
        self.total_price
            .unwrap_or_else(|| self.items().map(|p| p.price).sum())
    }
}

/// Human-readable justification for a score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreExplanation {
    /// Rating label, e.g. `Excellent`
    #[serde(default)]
    pub rating: Option<String>,
    /// One line per notable factor
    #[serde(default)]
    pub details: Vec<String>,
}

/// Server-side bookkeeping for a recommendation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Candidate outfits scored
    #[serde(default)]
    pub total_generated: Option<u64>,
    /// Outfits returned
    #[serde(default)]
    pub returned: Option<u64>,
    /// Server processing time
    #[serde(default)]
    pub processing_time_ms: Option<f64>,
    /// Preferences the server applied
    #[serde(default)]
    pub preferences: BTreeMap<String, Value>,
}

/// Recommendation envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    /// Whether the server produced recommendations
    pub success: bool,
    /// Product the outfits were built around
    #[serde(default)]
    pub base_product: Option<Product>,
    /// Ranked outfits
    #[serde(default)]
    pub recommendations: Vec<Outfit>,
    /// Generation summary
    #[serde(default)]
    pub metadata: Option<ResponseMetadata>,
    /// Whether the response came from the server cache
    #[serde(default)]
    pub cached: bool,
    /// Total response time
    #[serde(default)]
    pub response_time_ms: Option<f64>,
    /// Failure message when `success` is false
    #[serde(default)]
    pub error: Option<String>,
}

impl RecommendationResponse {
    /// Turn a `success: false` envelope into an application error
    pub fn into_result(self) -> ApiResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::application(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "Failed to get recommendations".to_string()),
            ))
        }
    }
}

/// Bulk recommendation envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkRecommendationResponse {
    /// Whether the batch as a whole succeeded
    pub success: bool,
    /// One entry per requested product
    #[serde(default)]
    pub results: Vec<BulkResult>,
    /// Failure message for the whole batch
    #[serde(default)]
    pub error: Option<String>,
}

/// Per-product entry in a bulk response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResult {
    /// Requested base product
    pub product_id: ProductId,
    /// Recommendations for that product
    #[serde(flatten)]
    pub response: RecommendationResponse,
}
