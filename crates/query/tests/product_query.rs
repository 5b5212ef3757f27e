mod common;

use common::{client, pairs, params, product_array, MockTransport, Reply};
use outfit_api_client::{ApiError, ProductFilters};
use outfit_query::{FilterUpdate, ProductQuery, QueryStatus};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn mount_fetches_immediately() {
    let transport = MockTransport::new(|_| Reply::ok(product_array(12, "Shirt")));
    let query = ProductQuery::mount(
        client(transport.clone()),
        ProductFilters::new().with_category("top").with_page(1),
    )
    .await;

    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Ready);
    assert_eq!(state.products.len(), 12);
    assert_eq!(state.error, None);
    assert_eq!(state.pagination.total_count, 12);
    assert_eq!(state.pagination.current_page, 1);

    let request = transport.last_request();
    assert_eq!(request.path, "products/");
    assert_eq!(params(&request), pairs(&[("category", "top"), ("page", "1")]));
    assert!(request.query_param("_t").is_some());
}

#[tokio::test(start_paused = true)]
async fn filter_change_resets_page_to_one() {
    let transport = MockTransport::new(|_| Reply::ok(product_array(3, "Item")));
    let query = ProductQuery::mount(client(transport.clone()), ProductFilters::new()).await;

    query.go_to_page(4).await;
    assert_eq!(transport.last_request().query_param("page"), Some("4"));

    query.update_filters(FilterUpdate::new().color("navy")).await;
    let request = transport.last_request();
    assert_eq!(params(&request), pairs(&[("color", "navy"), ("page", "1")]));
    assert_eq!(query.snapshot().pagination.current_page, 1);
}

#[tokio::test(start_paused = true)]
async fn superseded_response_is_discarded() {
    // {category: top, page: 1} answers slowly; the style change answers fast.
    let transport = MockTransport::new(|request| {
        if request.query_param("style") == Some("formal") {
            Reply::ok(product_array(3, "Formal")).after(10)
        } else {
            Reply::ok(product_array(12, "Any")).after(500)
        }
    });
    let query = ProductQuery::new(
        client(transport.clone()),
        ProductFilters::new().with_category("top").with_page(1),
    );

    tokio::join!(
        query.refetch(),
        query.update_filters(FilterUpdate::new().style("formal")),
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        params(&requests[1]),
        pairs(&[("category", "top"), ("style", "formal"), ("page", "1")])
    );

    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Ready);
    assert_eq!(state.products.len(), 3);
    assert!(state.products.iter().all(|p| p.name.starts_with("Formal")));
    assert_eq!(state.filters.style.as_deref(), Some("formal"));
}

#[tokio::test(start_paused = true)]
async fn last_update_wins_even_when_earlier_resolves_first() {
    // A resolves first, but B was issued later: only B may land.
    let transport = MockTransport::new(|request| match request.query_param("category") {
        Some("bottom") => Reply::ok(product_array(2, "Bottom")).after(300),
        _ => Reply::ok(product_array(5, "Top")).after(20),
    });
    let query = ProductQuery::new(client(transport.clone()), ProductFilters::new());

    tokio::join!(
        query.update_filters(FilterUpdate::new().category("top")),
        query.update_filters(FilterUpdate::new().category("bottom")),
    );

    let state = query.snapshot();
    assert_eq!(state.products.len(), 2);
    assert!(state.products.iter().all(|p| p.name.starts_with("Bottom")));
    assert_eq!(state.filters.category.as_deref(), Some("bottom"));
}

#[tokio::test(start_paused = true)]
async fn stale_failure_does_not_clobber_newer_success() {
    let transport = MockTransport::new(|request| match request.query_param("category") {
        Some("top") => Reply::err(ApiError::Transport("connection reset".into())).after(200),
        _ => Reply::ok(product_array(4, "Shoe")).after(5),
    });
    let query = ProductQuery::new(client(transport), ProductFilters::new());

    tokio::join!(
        query.update_filters(FilterUpdate::new().category("top")),
        query.update_filters(FilterUpdate::new().category("footwear")),
    );

    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Ready);
    assert_eq!(state.error, None);
    assert_eq!(state.products.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn failure_clears_products_and_refetch_recovers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let transport = MockTransport::new(move |_| match counter.fetch_add(1, Ordering::SeqCst) {
        1 => Reply::err(ApiError::from_status(
            500,
            r#"{"error": "Database unavailable"}"#,
        )),
        _ => Reply::ok(product_array(6, "Item")),
    });
    let query = ProductQuery::mount(client(transport.clone()), ProductFilters::new()).await;
    assert_eq!(query.snapshot().products.len(), 6);

    query.update_filters(FilterUpdate::new().search("linen")).await;
    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Error);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
    assert!(state.products.is_empty());

    query.refetch().await;
    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Ready);
    assert_eq!(state.error, None);
    assert_eq!(state.products.len(), 6);
    assert_eq!(transport.last_request().query_param("search"), Some("linen"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn clear_filters_sends_no_filter_params() {
    let transport = MockTransport::new(|_| Reply::ok(product_array(1, "Item")));
    let query = ProductQuery::mount(
        client(transport.clone()),
        ProductFilters::new()
            .with_category("accessory")
            .with_price_range("luxury")
            .with_page(2),
    )
    .await;

    query.clear_filters().await;

    let request = transport.last_request();
    assert!(params(&request).is_empty());
    assert!(query.snapshot().filters.is_empty());
    assert_eq!(query.snapshot().pagination.current_page, 1);
}

#[tokio::test(start_paused = true)]
async fn go_to_page_keeps_other_filters() {
    let transport = MockTransport::new(|_| {
        Reply::ok(json!({
            "count": 45,
            "next": "http://localhost:8000/api/products/?page=4",
            "previous": "http://localhost:8000/api/products/?page=2",
            "results": [{"id": 1, "name": "Loafer", "category": "footwear", "price": 80}]
        }))
    });
    let query = ProductQuery::mount(
        client(transport.clone()),
        ProductFilters::new().with_category("footwear").with_style("formal"),
    )
    .await;

    query.go_to_page(3).await;

    assert_eq!(
        params(&transport.last_request()),
        pairs(&[("category", "footwear"), ("style", "formal"), ("page", "3")])
    );
    let pagination = query.snapshot().pagination;
    assert_eq!(pagination.total_count, 45);
    assert_eq!(pagination.current_page, 3);
    assert!(pagination.has_next());
    assert!(pagination.has_previous());
}

#[tokio::test(start_paused = true)]
async fn unchanged_filters_do_not_refetch() {
    let transport = MockTransport::new(|_| Reply::ok(product_array(2, "Item")));
    let query = ProductQuery::mount(
        client(transport.clone()),
        ProductFilters::new().with_category("top").with_page(1),
    )
    .await;
    assert_eq!(transport.request_count(), 1);

    query.update_filters(FilterUpdate::new().category("top")).await;
    assert_eq!(transport.request_count(), 1);

    query.refetch().await;
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_loading_then_ready() {
    let transport = MockTransport::new(|_| Reply::ok(product_array(2, "Item")).after(50));
    let query = ProductQuery::new(client(transport), ProductFilters::new());
    let mut updates = query.subscribe();

    let observer = async {
        updates.changed().await.unwrap();
        let first = updates.borrow_and_update().status;
        updates.changed().await.unwrap();
        let second = updates.borrow_and_update().status;
        (first, second)
    };

    let ((first, second), ()) = tokio::join!(observer, query.refetch());
    assert_eq!(first, QueryStatus::Loading);
    assert_eq!(second, QueryStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn clear_filters_always_refetches() {
    let transport = MockTransport::new(|_| Reply::ok(product_array(2, "Item")));
    let query = ProductQuery::mount(client(transport.clone()), ProductFilters::new()).await;

    query.clear_filters().await;
    query.clear_filters().await;

    assert_eq!(transport.request_count(), 3);
    assert!(params(&transport.last_request()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn abandoned_update_still_settles() {
    let transport = MockTransport::new(|_| Reply::ok(product_array(3, "Formal")).after(100));
    let query = ProductQuery::new(client(transport.clone()), ProductFilters::new());

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        query.update_filters(FilterUpdate::new().style("formal")),
    )
    .await;
    assert!(outcome.is_err());
    assert_eq!(query.snapshot().status, QueryStatus::Loading);

    tokio::time::sleep(Duration::from_millis(200)).await;

    let state = query.snapshot();
    assert_eq!(state.status, QueryStatus::Ready);
    assert_eq!(state.products.len(), 3);
    assert_eq!(state.filters.style.as_deref(), Some("formal"));
    assert_eq!(transport.request_count(), 1);
}
