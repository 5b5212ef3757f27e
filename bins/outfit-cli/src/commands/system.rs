//! Health and statistics commands

use crate::commands::print_json;
use crate::output::{format_duration, Status};
use crate::OutputFormat;
use anyhow::Result;
use outfit_api_client::OutfitClient;
use owo_colors::OwoColorize;
use serde_json::json;

/// Check backend health
pub async fn health(client: &OutfitClient, detailed: bool, format: OutputFormat) -> Result<()> {
    let result = client.system().health_timed().await;

    if format == OutputFormat::Json {
        let output = match &result {
            Ok((health, elapsed)) => json!({
                "healthy": health.is_healthy(),
                "status": health.status,
                "services": health.services,
                "response_time_ms": elapsed.as_millis(),
                "base_url": client.base_url(),
            }),
            Err(e) => json!({
                "healthy": false,
                "error": e.to_string(),
                "base_url": client.base_url(),
            }),
        };
        print_json(&output)?;
        return result.map(|_| ()).map_err(Into::into);
    }

    Status::header("Outfit API Health");
    println!("  {} {}", "Endpoint:".dimmed(), client.base_url());

    let (health, elapsed) = result?;
    let time_str = if detailed {
        format!(" ({})", format_duration(elapsed))
    } else {
        String::new()
    };
    if health.is_healthy() {
        Status::success(&format!("Healthy{time_str}"));
    } else {
        println!("  {} {}{}", "✗".red(), health.status.red(), time_str.dimmed());
    }

    if detailed {
        for (service, status) in &health.services {
            let marker = if status.eq_ignore_ascii_case("healthy") {
                "✓".green().to_string()
            } else {
                "✗".red().to_string()
            };
            println!("    {marker} {service:<12} {status}");
        }
        if let Some(timestamp) = &health.timestamp {
            println!("    {} {}", "checked at".dimmed(), timestamp.dimmed());
        }
    }
    println!();

    if health.is_healthy() {
        Ok(())
    } else {
        anyhow::bail!("backend reports {}", health.status)
    }
}

/// Show catalog statistics
pub async fn stats(client: &OutfitClient, format: OutputFormat) -> Result<()> {
    let stats = client.system().stats().await?;

    if format == OutputFormat::Json {
        return print_json(&stats);
    }

    Status::header("Catalog Statistics");
    println!("  {} {}", "Products:".dimmed(), stats.products.total.bold());
    for (category, count) in &stats.products.by_category {
        println!("    {category:<12} {count}");
    }
    if let Some(cache) = &stats.cache {
        println!("  {} {} ({})", "Cache:".dimmed(), cache.backend, cache.status);
    }
    if let Some(version) = &stats.api_version {
        println!("  {} {}", "API version:".dimmed(), version);
    }
    println!();
    Ok(())
}
