//! Product listing query
//!
//! Owns the Filter Set, refetches whenever it changes by value, and exposes
//! the product list, pagination and status. Only the response for the most
//! recent filter snapshot is ever applied.

use crate::status::{run_detached, Generation, QueryStatus};
use outfit_api_client::{ApiResult, OutfitClient, Product, ProductFilters, ProductList};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Partial change to a Filter Set.
///
/// Keys left untouched keep their current value. Setting a key to an empty
/// string clears it. Unless [`FilterUpdate::page`] is called, applying the
/// update moves back to page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    category: Option<Option<String>>,
    style: Option<Option<String>>,
    color: Option<Option<String>>,
    price_range: Option<Option<String>>,
    search: Option<Option<String>>,
    page: Option<u32>,
}

impl FilterUpdate {
    /// Empty update (still resets the page)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the category
    #[must_use]
    pub fn category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(text(value));
        self
    }

    /// Set or clear the style
    #[must_use]
    pub fn style(mut self, value: impl Into<String>) -> Self {
        self.style = Some(text(value));
        self
    }

    /// Set or clear the color
    #[must_use]
    pub fn color(mut self, value: impl Into<String>) -> Self {
        self.color = Some(text(value));
        self
    }

    /// Set or clear the price range
    #[must_use]
    pub fn price_range(mut self, value: impl Into<String>) -> Self {
        self.price_range = Some(text(value));
        self
    }

    /// Set or clear the search text
    #[must_use]
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(text(value));
        self
    }

    /// Explicit page; without it the page resets to 1
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    /// Merge onto a filter set
    #[must_use]
    pub fn apply(&self, current: &ProductFilters) -> ProductFilters {
        let mut next = current.clone();
        merge(&mut next.category, &self.category);
        merge(&mut next.style, &self.style);
        merge(&mut next.color, &self.color);
        merge(&mut next.price_range, &self.price_range);
        merge(&mut next.search, &self.search);
        next.page = Some(self.page.unwrap_or(1));
        next
    }
}

fn text(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn merge(slot: &mut Option<String>, patch: &Option<Option<String>>) {
    if let Some(value) = patch {
        slot.clone_from(value);
    }
}

/// Pagination derived from the latest successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Total matching products across all pages
    pub total_count: u64,
    /// Link to the next page, if any
    pub next_cursor: Option<String>,
    /// Link to the previous page, if any
    pub previous_cursor: Option<String>,
    /// 1-based page of the current list
    pub current_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total_count: 0,
            next_cursor: None,
            previous_cursor: None,
            current_page: 1,
        }
    }
}

impl Pagination {
    /// Derive pagination from a listing.
    ///
    /// Without an explicit count the list length is used, which is only
    /// accurate for single-page responses.
    #[must_use]
    pub fn from_list(list: &ProductList, filters: &ProductFilters) -> Self {
        Self {
            total_count: list.count.unwrap_or(list.products.len() as u64),
            next_cursor: list.next.clone(),
            previous_cursor: list.previous.clone(),
            current_page: filters.current_page(),
        }
    }

    /// True when the server advertised a following page
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// True when the server advertised a preceding page
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.previous_cursor.is_some()
    }
}

/// Snapshot rendered by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductsState {
    /// Products of the latest applied response
    pub products: Vec<Product>,
    /// Lifecycle of the latest request
    pub status: QueryStatus,
    /// Message of the latest failure
    pub error: Option<String>,
    /// Current filter set
    pub filters: ProductFilters,
    /// Pagination of the latest applied response
    pub pagination: Pagination,
    #[serde(skip)]
    generation: Generation,
}

impl ProductsState {
    /// True while a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    fn begin(&mut self) -> Ticket {
        self.status = QueryStatus::Loading;
        self.error = None;
        Ticket {
            generation: self.generation.advance(),
            filters: self.filters.clone(),
        }
    }
}

/// A fetch tagged with the filter snapshot it was derived from
#[derive(Debug)]
struct Ticket {
    generation: Generation,
    filters: ProductFilters,
}

/// Paginated, filterable product listing
pub struct ProductQuery {
    client: OutfitClient,
    state: Arc<watch::Sender<ProductsState>>,
}

impl ProductQuery {
    /// Create the query without fetching
    #[must_use]
    pub fn new(client: OutfitClient, initial: ProductFilters) -> Self {
        let (state, _) = watch::channel(ProductsState {
            filters: initial,
            ..ProductsState::default()
        });
        Self {
            client,
            state: Arc::new(state),
        }
    }

    /// Create the query and run the initial fetch
    pub async fn mount(client: OutfitClient, initial: ProductFilters) -> Self {
        let query = Self::new(client, initial);
        query.refetch().await;
        query
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> ProductsState {
        self.state.borrow().clone()
    }

    /// Receive a new snapshot after every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductsState> {
        self.state.subscribe()
    }

    /// Current filter set
    #[must_use]
    pub fn filters(&self) -> ProductFilters {
        self.state.borrow().filters.clone()
    }

    /// Merge a partial update into the filters and refetch if they changed.
    ///
    /// The page resets to 1 unless the update names one.
    pub async fn update_filters(&self, update: FilterUpdate) {
        self.change_filters(|filters| update.apply(filters), false).await;
    }

    /// Drop every filter and refetch, even when none were set
    pub async fn clear_filters(&self) {
        self.change_filters(|_| ProductFilters::default(), true).await;
    }

    /// Move to a page, keeping the other filters, and refetch
    pub async fn go_to_page(&self, page: u32) {
        self.change_filters(
            |filters| {
                let mut next = filters.clone();
                next.page = Some(page.max(1));
                next
            },
            true,
        )
        .await;
    }

    /// Re-issue the fetch for the current filters unconditionally
    pub async fn refetch(&self) {
        let mut ticket = None;
        self.state.send_modify(|state| ticket = Some(state.begin()));
        if let Some(ticket) = ticket {
            self.run(ticket).await;
        }
    }

    /// Apply a filter change; unless `force` is set, an unchanged set is a no-op
    async fn change_filters<F>(&self, change: F, force: bool)
    where
        F: FnOnce(&ProductFilters) -> ProductFilters,
    {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            let next = change(&state.filters);
            if next == state.filters && !force {
                return false;
            }
            state.filters = next;
            ticket = Some(state.begin());
            true
        });

        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => debug!("Filters unchanged, skipping fetch"),
        }
    }

    async fn run(&self, ticket: Ticket) {
        debug!(
            generation = ticket.generation.value(),
            filters = ?ticket.filters,
            "Fetching products"
        );
        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        run_detached(async move {
            let result = client.products().list(&ticket.filters).await;
            finish(&state, &ticket, result);
        })
        .await;
    }
}

fn finish(state: &watch::Sender<ProductsState>, ticket: &Ticket, result: ApiResult<ProductList>) {
    state.send_if_modified(|state| {
        if state.generation != ticket.generation {
            debug!(
                stale = ticket.generation.value(),
                current = state.generation.value(),
                "Discarding superseded product response"
            );
            return false;
        }

        match result {
            Ok(list) => {
                state.pagination = Pagination::from_list(&list, &ticket.filters);
                state.products = list.products;
                state.error = None;
                state.status = QueryStatus::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Product fetch failed");
                state.products.clear();
                state.error = Some(e.to_string());
                state.status = QueryStatus::Error;
            }
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_resets_page() {
        let current = ProductFilters::new().with_category("top").with_page(3);
        let next = FilterUpdate::new().style("formal").apply(&current);
        assert_eq!(next.category.as_deref(), Some("top"));
        assert_eq!(next.style.as_deref(), Some("formal"));
        assert_eq!(next.page, Some(1));
    }

    #[test]
    fn test_update_keeps_explicit_page() {
        let current = ProductFilters::new().with_category("top");
        let next = FilterUpdate::new().color("navy").page(4).apply(&current);
        assert_eq!(next.page, Some(4));
        assert_eq!(next.color.as_deref(), Some("navy"));
    }

    #[test]
    fn test_empty_value_clears_key() {
        let current = ProductFilters::new().with_category("top").with_search("linen");
        let next = FilterUpdate::new().search("").apply(&current);
        assert_eq!(next.search, None);
        assert_eq!(next.category.as_deref(), Some("top"));
    }

    #[test]
    fn test_pagination_fallback_to_list_length() {
        let list: ProductList =
            serde_json::from_str(r#"[{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]"#).unwrap();
        let pagination = Pagination::from_list(&list, &ProductFilters::new());
        assert_eq!(pagination.total_count, 2);
        assert_eq!(pagination.current_page, 1);
        assert!(!pagination.has_next());
    }

    #[test]
    fn test_pagination_uses_explicit_count() {
        let list: ProductList = serde_json::from_str(
            r#"{"count": 57, "next": "n", "previous": "p", "results": [{"id": 1, "name": "a"}]}"#,
        )
        .unwrap();
        let pagination = Pagination::from_list(&list, &ProductFilters::new().with_page(2));
        assert_eq!(pagination.total_count, 57);
        assert_eq!(pagination.current_page, 2);
        assert!(pagination.has_next());
        assert!(pagination.has_previous());
    }
}
