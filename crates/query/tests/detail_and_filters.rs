mod common;

use common::{client, product, MockTransport, Reply};
use outfit_api_client::ApiError;
use outfit_query::{FilterOptionsQuery, ProductDetailQuery, QueryStatus};
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn product_detail_loads_and_clears() {
    let transport = MockTransport::new(|request| match request.path.as_str() {
        "products/11/" => Reply::ok(product(11, "Linen Shirt", "top")),
        _ => Reply::err(ApiError::from_status(404, r#"{"detail": "Not found."}"#)),
    });
    let query = ProductDetailQuery::new(client(transport.clone()));

    query.load(Some(11)).await;
    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Ready);
    assert_eq!(state.product.as_ref().unwrap().name, "Linen Shirt");

    query.load(None).await;
    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Idle);
    assert!(state.product.is_none());
    assert_eq!(transport.request_count(), 1);

    query.load(Some(12)).await;
    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Error);
    assert_eq!(
        state.error.as_deref(),
        Some("Request failed with status code 404")
    );
    assert!(state.product.is_none());
}

#[tokio::test(start_paused = true)]
async fn product_detail_keeps_latest_id() {
    let transport = MockTransport::new(|request| match request.path.as_str() {
        "products/1/" => Reply::ok(product(1, "Slow", "top")).after(300),
        _ => Reply::ok(product(2, "Fast", "top")).after(5),
    });
    let query = ProductDetailQuery::new(client(transport));

    tokio::join!(query.load(Some(1)), query.load(Some(2)));

    let state = query.snapshot();
    assert_eq!(state.product_id, Some(2));
    assert_eq!(state.product.unwrap().name, "Fast");
}

#[tokio::test(start_paused = true)]
async fn filter_options_load_on_mount() {
    let transport = MockTransport::new(|_| {
        Reply::ok(json!({
            "success": true,
            "filters": {
                "categories": ["top", "bottom"],
                "styles": ["formal", "casual"],
                "colors": ["navy"],
                "price_ranges": ["budget", "mid"],
                "genders": ["male", "female"]
            }
        }))
    });
    let query = FilterOptionsQuery::mount(client(transport.clone())).await;

    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Ready);
    let options = state.options.unwrap();
    assert_eq!(options.styles, vec!["formal", "casual"]);
    assert_eq!(transport.last_request().path, "products/filters/");
}

#[tokio::test(start_paused = true)]
async fn filter_options_failure_is_stored() {
    let transport = MockTransport::new(|_| Reply::err(ApiError::Transport("Network Error".into())));
    let query = FilterOptionsQuery::mount(client(transport)).await;

    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Error);
    assert_eq!(state.error.as_deref(), Some("Network Error"));
    assert!(state.options.is_none());
}
