//! Product catalog commands

use crate::commands::print_json;
use crate::output::{format_count, format_price, product_line, spinner, Status};
use crate::OutputFormat;
use anyhow::Result;
use outfit_api_client::{OutfitClient, ProductFilters, ProductId};
use outfit_query::{
    FilterOptionsQuery, ProductDetailQuery, ProductQuery, ProductsState, QueryStatus,
};
use owo_colors::OwoColorize;

/// Build a filter set from command-line values; blank values are ignored
pub fn filters_from_args(
    category: Option<String>,
    style: Option<String>,
    color: Option<String>,
    price_range: Option<String>,
    search: Option<String>,
    page: Option<u32>,
) -> ProductFilters {
    let mut filters = ProductFilters::new();
    if let Some(category) = category {
        filters = filters.with_category(category);
    }
    if let Some(style) = style {
        filters = filters.with_style(style);
    }
    if let Some(color) = color {
        filters = filters.with_color(color);
    }
    if let Some(price_range) = price_range {
        filters = filters.with_price_range(price_range);
    }
    if let Some(search) = search {
        filters = filters.with_search(search);
    }
    if let Some(page) = page {
        filters = filters.with_page(page);
    }
    filters
}

/// List products matching filters
pub async fn products(client: OutfitClient, filters: ProductFilters, format: OutputFormat) -> Result<()> {
    let pb = (format == OutputFormat::Text).then(|| spinner("Loading products..."));
    let query = ProductQuery::mount(client, filters).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let state = query.snapshot();
    if format == OutputFormat::Json {
        print_json(&state)?;
    } else {
        render_products(&state);
    }
    settled(state.status, state.error)
}

fn render_products(state: &ProductsState) {
    if state.status == QueryStatus::Error {
        return;
    }

    let constraints: Vec<String> = state
        .filters
        .to_query()
        .into_iter()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if constraints.is_empty() {
        Status::header("Products");
    } else {
        Status::header(&format!("Products ({})", constraints.join(", ")));
    }

    if state.products.is_empty() {
        Status::info("No products match these filters");
        return;
    }

    for product in &state.products {
        println!("  {}", product_line(product));
    }

    let pagination = &state.pagination;
    println!();
    println!(
        "  {} {} {}",
        format!("Page {}", pagination.current_page).bold(),
        "·".dimmed(),
        format_count(
            usize::try_from(pagination.total_count).unwrap_or(usize::MAX),
            "product",
            "products"
        )
        .dimmed()
    );
    if pagination.has_previous() {
        println!("  {} --page {}", "prev:".dimmed(), pagination.current_page.saturating_sub(1).max(1));
    }
    if pagination.has_next() {
        println!("  {} --page {}", "next:".dimmed(), pagination.current_page + 1);
    }
    println!();
}

/// Show one product
pub async fn product(client: OutfitClient, id: ProductId, format: OutputFormat) -> Result<()> {
    let query = ProductDetailQuery::new(client);
    query.load(Some(id)).await;
    let state = query.snapshot();

    if format == OutputFormat::Json {
        print_json(&state)?;
        return settled(state.status, state.error);
    }

    if let Some(product) = &state.product {
        Status::header(&product.name);
        let rows = [
            ("ID", product.id.to_string()),
            ("Category", join_nonempty(&product.category, &product.sub_category)),
            ("Style", product.style.clone()),
            ("Color", product.color.clone()),
            ("Price", format!("{} ({})", format_price(product.price), product.price_range)),
            ("Occasions", joined(&product.occasions)),
            ("Seasons", joined(&product.seasons)),
        ];
        for (label, value) in rows {
            if !value.is_empty() {
                println!("  {:<10} {}", format!("{label}:").dimmed(), value);
            }
        }
        if let Some(description) = &product.description {
            println!();
            println!("  {description}");
        }
        println!();
    }
    settled(state.status, state.error)
}

/// List products in a category
pub async fn category(client: &OutfitClient, name: &str, format: OutputFormat) -> Result<()> {
    let listing = client.products().by_category(name).await?;

    if format == OutputFormat::Json {
        return print_json(&listing);
    }

    Status::header(&format!(
        "{} ({})",
        listing.category,
        format_count(listing.products.len(), "product", "products")
    ));
    for product in &listing.products {
        println!("  {}", product_line(product));
    }
    println!();
    Ok(())
}

/// List available filter values
pub async fn filters(client: OutfitClient, format: OutputFormat) -> Result<()> {
    let query = FilterOptionsQuery::mount(client).await;
    let state = query.snapshot();

    if format == OutputFormat::Json {
        print_json(&state)?;
        return settled(state.status, state.error);
    }

    if let Some(options) = &state.options {
        Status::header("Filter Options");
        let rows = [
            ("category", &options.categories),
            ("style", &options.styles),
            ("color", &options.colors),
            ("price_range", &options.price_ranges),
            ("gender", &options.genders),
        ];
        for (label, values) in rows {
            println!("  {:<12} {}", format!("{label}:").dimmed(), values.join(", "));
        }
        println!();
    }
    settled(state.status, state.error)
}

/// Turn a settled query snapshot into the command result
pub(crate) fn settled(status: QueryStatus, error: Option<String>) -> Result<()> {
    match (status, error) {
        (QueryStatus::Error, Some(message)) => Err(anyhow::anyhow!(message)),
        (QueryStatus::Error, None) => anyhow::bail!("request failed"),
        _ => Ok(()),
    }
}

fn join_nonempty(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (false, false) => format!("{first} / {second}"),
        (false, true) => first.to_string(),
        (true, _) => second.to_string(),
    }
}

fn joined<'a>(labels: impl IntoIterator<Item = &'a String>) -> String {
    labels
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
