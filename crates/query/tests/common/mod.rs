//! Scripted transport shared by the query integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use outfit_api_client::{ApiError, ApiRequest, ApiResult, ClientConfig, OutfitClient, Transport};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock answers to one request
pub struct Reply {
    pub delay: Duration,
    pub result: ApiResult<Value>,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(body),
        }
    }

    pub fn err(error: ApiError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

type Responder = dyn Fn(&ApiRequest) -> Reply + Send + Sync;

/// Records every request and answers from a closure, optionally after a delay
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responder: Box<Responder>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest) -> Reply + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let reply = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

pub fn client(transport: Arc<MockTransport>) -> OutfitClient {
    OutfitClient::with_transport(ClientConfig::default(), transport)
}

/// Query parameters other than the cache-busting stamp
pub fn params(request: &ApiRequest) -> Vec<(String, String)> {
    request
        .query
        .iter()
        .filter(|(k, _)| k != "_t")
        .cloned()
        .collect()
}

pub fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn product(id: u64, name: &str, category: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": category,
        "sub_category": "shirt",
        "style": "formal",
        "color": "white",
        "price": "49.99",
        "price_range": "mid",
        "image_url": null
    })
}

/// A bare product array, as the catalog returns without pagination
pub fn product_array(count: u64, prefix: &str) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| product(i, &format!("{prefix} {i}"), "top"))
            .collect(),
    )
}

pub fn outfit(top: u64, bottom: u64, footwear: u64, score: f64) -> Value {
    json!({
        "id": format!("{top}-{bottom}-{footwear}"),
        "top": product(top, "Shirt", "top"),
        "bottom": product(bottom, "Trousers", "bottom"),
        "footwear": product(footwear, "Loafers", "footwear"),
        "accessories": [],
        "total_price": 149.97,
        "score": score,
        "score_breakdown": {
            "color_harmony": 0.9,
            "style_match": 0.85,
            "occasion_fit": 0.8,
            "season_match": 0.7,
            "budget_alignment": 0.75
        },
        "explanation": {"rating": "Good", "details": ["Good color matching"]}
    })
}

pub fn recommendation_body(base_id: u64, outfits: usize) -> Value {
    let recommendations: Vec<Value> = (0..outfits)
        .map(|i| outfit(base_id, 100 + i as u64, 200 + i as u64, 0.9 - i as f64 * 0.05))
        .collect();
    json!({
        "success": true,
        "base_product": product(base_id, "Base", "top"),
        "recommendations": recommendations,
        "metadata": {
            "total_generated": 24,
            "returned": outfits,
            "processing_time_ms": 18.2,
            "preferences": {"occasion": "office"}
        },
        "cached": false,
        "response_time_ms": 18.2
    })
}
