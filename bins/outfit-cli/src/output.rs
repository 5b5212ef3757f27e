//! Terminal output utilities
//!
//! Status lines, spinners and the small formatters shared by the commands.

use indicatif::{ProgressBar, ProgressStyle};
use outfit_api_client::Product;
use outfit_telemetry::MetricsRegistry;
use owo_colors::OwoColorize;
use std::time::Duration;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a subheader
    pub fn subheader(message: &str) {
        println!();
        println!("{}", message.bold().dimmed());
    }
}

/// Spinner shown while a query is loading
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Format a duration for display
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{mins}m {remaining_secs:.0}s")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format a price in dollars
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Rating bucket for an outfit score in [0, 1]
pub fn score_rating(score: f64) -> &'static str {
    if score >= 0.85 {
        "Excellent"
    } else if score >= 0.70 {
        "Good"
    } else if score >= 0.55 {
        "Fair"
    } else {
        "Poor"
    }
}

/// Display label for a score sub-metric key
pub fn metric_label(key: &str) -> String {
    match key {
        "color_harmony" => "Color harmony".to_string(),
        "style_match" => "Style match".to_string(),
        "occasion_fit" => "Occasion fit".to_string(),
        "season_match" => "Season match".to_string(),
        "budget_alignment" => "Budget".to_string(),
        other => {
            let spaced = other.replace('_', " ");
            let mut chars = spaced.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Ten-cell bar for a value in [0, 1]
pub fn score_bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// One-line product summary
pub fn product_line(product: &Product) -> String {
    let mut details = Vec::new();
    if !product.color.is_empty() {
        details.push(product.color.clone());
    }
    if !product.style.is_empty() {
        details.push(product.style.clone());
    }
    details.push(format_price(product.price));
    format!(
        "{} {} ({})",
        format!("#{}", product.id).dimmed(),
        product.name,
        details.join(", ")
    )
}

/// One-line request count and latency summary
pub fn request_summary(registry: &MetricsRegistry) -> String {
    let requests = registry.counter("api.requests");
    let errors = registry.counter("api.errors");
    let latency = registry.histogram_stats("api.latency_ms");
    let mut summary = format!(
        "{}, {}",
        format_count(usize::try_from(requests).unwrap_or(usize::MAX), "request", "requests"),
        format_count(usize::try_from(errors).unwrap_or(usize::MAX), "error", "errors")
    );
    if latency.count > 0 {
        summary.push_str(&format!(
            ", latency p50 {:.0}ms p95 {:.0}ms",
            latency.p50, latency.p95
        ));
    }
    summary
}
