//! Outfit storefront CLI
//!
//! Browse the product catalog and request outfit recommendations from the
//! terminal. Product and recommendation commands go through the query layer,
//! so what is printed is exactly the snapshot a storefront view would render.

use clap::{Parser, Subcommand, ValueEnum};
use outfit_api_client::{Budget, ClientConfig, Gender, Occasion, OutfitClient, Preferences, ProductId, Season};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use std::time::Duration;

mod commands;
mod output;

use commands::{catalog, recommend, system};

/// Outfit storefront CLI
#[derive(Debug, Parser)]
#[command(name = "outfit-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// API base URL
    #[arg(long, global = true, env = "OUTFIT_API_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "OUTFIT_API_TIMEOUT_SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check backend health
    Health {
        /// Include response time and per-service status
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show catalog statistics
    Stats,

    /// List products matching filters
    Products {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        style: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        price_range: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// 1-based page
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Show one product
    Product {
        id: ProductId,
    },

    /// List products in a category
    Category {
        name: String,
    },

    /// List available filter values
    Filters,

    /// Recommend outfits around a base product
    Recommend {
        product_id: ProductId,

        #[command(flatten)]
        preferences: PreferenceArgs,

        /// Show the per-metric score breakdown
        #[arg(short, long)]
        breakdown: bool,
    },

    /// Recommend outfits for several base products at once
    Bulk {
        #[arg(required = true, num_args = 1..)]
        product_ids: Vec<ProductId>,

        #[command(flatten)]
        preferences: PreferenceArgs,
    },
}

#[derive(Debug, clap::Args)]
struct PreferenceArgs {
    #[arg(short, long, default_value = "male")]
    gender: Gender,

    #[arg(short, long)]
    occasion: Option<Occasion>,

    #[arg(long)]
    season: Option<Season>,

    #[arg(long)]
    budget: Option<Budget>,

    /// Number of outfits
    #[arg(short, long, default_value = "5")]
    limit: u32,
}

impl PreferenceArgs {
    fn into_preferences(self) -> Preferences {
        let mut preferences = Preferences::new(self.gender).with_limit(self.limit);
        preferences.occasion = self.occasion;
        preferences.season = self.season;
        preferences.budget = self.budget;
        preferences
    }
}

fn build_client(cli: &Cli) -> anyhow::Result<OutfitClient> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(base_url = %config.base_url, "using API");
    Ok(OutfitClient::with_config(config)?)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = build_client(&cli)?;
    let format = cli.format;

    match cli.command {
        Commands::Health { detailed } => system::health(&client, detailed, format).await,
        Commands::Stats => system::stats(&client, format).await,
        Commands::Products {
            category,
            style,
            color,
            price_range,
            search,
            page,
        } => {
            let filters = catalog::filters_from_args(category, style, color, price_range, search, page);
            catalog::products(client, filters, format).await
        }
        Commands::Product { id } => catalog::product(client, id, format).await,
        Commands::Category { name } => catalog::category(&client, &name, format).await,
        Commands::Filters => catalog::filters(client, format).await,
        Commands::Recommend {
            product_id,
            preferences,
            breakdown,
        } => {
            recommend::single(client, product_id, preferences.into_preferences(), breakdown, format)
                .await
        }
        Commands::Bulk {
            product_ids,
            preferences,
        } => recommend::bulk(&client, &product_ids, preferences.into_preferences(), format).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        outfit_telemetry::TelemetryConfig::verbose()
    } else {
        outfit_telemetry::TelemetryConfig::default()
    };
    if let Err(e) = outfit_telemetry::init_with_config(&telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let verbose = cli.verbose;
    let format = cli.format;
    let result = run(cli).await;

    if verbose {
        let registry = outfit_telemetry::metrics();
        match format {
            OutputFormat::Json => eprintln!(
                "{}",
                serde_json::to_string_pretty(&registry.export_json()).unwrap_or_default()
            ),
            OutputFormat::Text => eprintln!(
                "{} {}",
                "ℹ".blue(),
                output::request_summary(registry).dimmed()
            ),
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_products_filters() {
        let cli = Cli::try_parse_from([
            "outfit-cli",
            "products",
            "--category",
            "top",
            "--style",
            "formal",
            "--page",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Products {
                category,
                style,
                page,
                color,
                ..
            } => {
                assert_eq!(category.as_deref(), Some("top"));
                assert_eq!(style.as_deref(), Some("formal"));
                assert_eq!(color, None);
                assert_eq!(page, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_recommend_preferences() {
        let cli = Cli::try_parse_from([
            "outfit-cli",
            "--format",
            "json",
            "recommend",
            "42",
            "--gender",
            "female",
            "--occasion",
            "wedding",
            "--season",
            "summer",
            "--limit",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Recommend {
                product_id,
                preferences,
                breakdown,
            } => {
                assert_eq!(product_id, 42);
                assert!(!breakdown);
                let prefs = preferences.into_preferences();
                assert_eq!(prefs.gender, Gender::Female);
                assert_eq!(prefs.occasion, Some(Occasion::Wedding));
                assert_eq!(prefs.season, Some(Season::Summer));
                assert_eq!(prefs.budget, None);
                assert_eq!(prefs.limit, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_recommend_defaults() {
        let cli = Cli::try_parse_from(["outfit-cli", "recommend", "7"]).unwrap();
        match cli.command {
            Commands::Recommend { preferences, .. } => {
                assert_eq!(preferences.into_preferences(), Preferences::default());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let cli = Cli::try_parse_from(["outfit-cli", "recommend", "7", "--limit", "0"]).unwrap();
        match cli.command {
            Commands::Recommend { preferences, .. } => {
                assert_eq!(preferences.into_preferences().limit, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_occasion() {
        let result =
            Cli::try_parse_from(["outfit-cli", "recommend", "7", "--occasion", "funeral"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_recommend_requires_product_id() {
        assert!(Cli::try_parse_from(["outfit-cli", "recommend"]).is_err());
    }

    #[test]
    fn test_bulk_requires_ids() {
        assert!(Cli::try_parse_from(["outfit-cli", "bulk"]).is_err());

        let cli = Cli::try_parse_from(["outfit-cli", "bulk", "1", "2", "3"]).unwrap();
        match cli.command {
            Commands::Bulk { product_ids, .. } => assert_eq!(product_ids, vec![1, 2, 3]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_base_url_flag() {
        let cli = Cli::try_parse_from([
            "outfit-cli",
            "health",
            "--base-url",
            "http://staging.example.com/api",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://staging.example.com/api"));
    }
}
