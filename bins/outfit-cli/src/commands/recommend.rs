//! Outfit recommendation commands

use crate::commands::catalog::settled;
use crate::commands::print_json;
use crate::output::{
    format_count, format_price, metric_label, product_line, score_bar, score_rating, spinner, Status,
};
use crate::OutputFormat;
use anyhow::Result;
use outfit_api_client::{Outfit, OutfitClient, Preferences, ProductId};
use outfit_query::{RecommendationQuery, RecommendationsState};
use owo_colors::OwoColorize;

/// Recommend outfits around one base product
pub async fn single(
    client: OutfitClient,
    product_id: ProductId,
    preferences: Preferences,
    breakdown: bool,
    format: OutputFormat,
) -> Result<()> {
    let query = RecommendationQuery::new(client);

    let pb = (format == OutputFormat::Text).then(|| spinner("Styling outfits..."));
    query.select_base_product(Some(product_id), preferences).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let state = query.snapshot();
    if format == OutputFormat::Json {
        print_json(&state)?;
    } else {
        render_recommendations(&state, breakdown);
    }
    settled(state.status, state.error)
}

fn render_recommendations(state: &RecommendationsState, breakdown: bool) {
    let Some(metadata) = &state.metadata else {
        return;
    };

    match &metadata.base_product {
        Some(base) => Status::header(&format!("Outfits for {}", base.name)),
        None => Status::header("Outfits"),
    }

    let mut summary = format!(
        "{} of {} generated",
        format_count(usize::try_from(metadata.returned).unwrap_or(usize::MAX), "outfit", "outfits"),
        metadata.total_generated
    );
    summary.push_str(&format!(" in {:.0}ms", metadata.processing_time_ms));
    if metadata.cached {
        summary.push_str(" (cached)");
    }
    println!("  {}", summary.dimmed());

    let outfits = state.recommendations.as_deref().unwrap_or_default();
    if outfits.is_empty() {
        println!();
        Status::warning("No compatible outfits found; try loosening the preferences");
        return;
    }

    for (rank, outfit) in outfits.iter().enumerate() {
        render_outfit(rank + 1, outfit, breakdown);
    }
    println!();
}

fn render_outfit(rank: usize, outfit: &Outfit, breakdown: bool) {
    let rating = outfit
        .explanation
        .rating
        .clone()
        .unwrap_or_else(|| score_rating(outfit.score).to_string());
    Status::subheader(&format!(
        "#{rank}  {:.0}% {rating}  {}",
        outfit.score * 100.0,
        format_price(outfit.price())
    ));

    let slots = [
        ("top", outfit.top.as_ref()),
        ("bottom", outfit.bottom.as_ref()),
        ("footwear", outfit.footwear.as_ref()),
    ];
    for (slot, product) in slots {
        if let Some(product) = product {
            println!("  {:<10} {}", slot.dimmed(), product_line(product));
        }
    }
    for accessory in &outfit.accessories {
        println!("  {:<10} {}", "accessory".dimmed(), product_line(accessory));
    }

    if breakdown {
        for (metric, value) in &outfit.score_breakdown {
            println!(
                "    {:<14} {} {:.0}%",
                metric_label(metric),
                score_bar(*value).cyan(),
                value * 100.0
            );
        }
    }
    for detail in &outfit.explanation.details {
        println!("    {} {}", "•".dimmed(), detail);
    }
}

/// Recommend outfits for several base products in one request
pub async fn bulk(
    client: &OutfitClient,
    product_ids: &[ProductId],
    preferences: Preferences,
    format: OutputFormat,
) -> Result<()> {
    let limit = preferences.limit;
    let response = client
        .recommendations()
        .bulk(product_ids, &preferences, limit)
        .await?;

    if format == OutputFormat::Json {
        print_json(&response)?;
    }
    if !response.success {
        anyhow::bail!(
            "{}",
            response
                .error
                .unwrap_or_else(|| "Failed to get recommendations".to_string())
        );
    }
    if format == OutputFormat::Json {
        return Ok(());
    }

    Status::header(&format!(
        "Bulk recommendations ({})",
        format_count(response.results.len(), "product", "products")
    ));
    for result in &response.results {
        let entry = &result.response;
        if !entry.success {
            println!(
                "  {} {} {}",
                "✗".red(),
                format!("#{}", result.product_id).dimmed(),
                entry.error.as_deref().unwrap_or("no recommendations")
            );
            continue;
        }
        let best = entry
            .recommendations
            .iter()
            .map(|outfit| outfit.score)
            .fold(None, |best: Option<f64>, score| Some(best.map_or(score, |b| b.max(score))));
        let name = entry
            .base_product
            .as_ref()
            .map_or_else(|| format!("#{}", result.product_id), product_line);
        match best {
            Some(score) => println!(
                "  {} {}  {}, best {:.0}% {}",
                "✓".green(),
                name,
                format_count(entry.recommendations.len(), "outfit", "outfits"),
                score * 100.0,
                score_rating(score)
            ),
            None => println!("  {} {}  no compatible outfits", "⚠".yellow(), name),
        }
    }
    println!();
    Ok(())
}
