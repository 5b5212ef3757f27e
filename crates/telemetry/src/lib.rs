//! Logging and lightweight metrics for the outfit storefront data layer
//!
//! - Structured logging with `tracing`
//! - In-process request counters and latency histograms
//! - Session id for correlating log lines

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global metrics registry
static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with the default configuration
pub fn init() -> anyhow::Result<()> {
    init_with_config(&TelemetryConfig::default())
}

/// Initialize logging with custom configuration
///
/// `RUST_LOG` takes precedence over `config.log_level`.
pub fn init_with_config(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let layer = fmt::layer()
        .with_target(config.show_target)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        tracing::subscriber::set_global_default(subscriber.with(layer.json()))
    } else {
        tracing::subscriber::set_global_default(subscriber.with(layer.compact()))
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {e}"))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Include the event target
    pub show_target: bool,
    /// Include the source file
    pub show_file: bool,
    /// Include the line number
    pub show_line_number: bool,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            show_target: false,
            show_file: false,
            show_line_number: false,
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Debug-level logging for the storefront crates
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            log_level: "outfit_api_client=debug,outfit_query=debug,outfit_cli=debug".to_string(),
            show_target: true,
            ..Self::default()
        }
    }
}

/// Most recent samples kept per histogram
pub const MAX_HISTOGRAM_SAMPLES: usize = 1024;

/// Counters and histograms keyed by name
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, u64>>,
    histograms: RwLock<HashMap<String, VecDeque<f64>>>,
    start_time: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter
    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Increment a counter by a specific amount
    pub fn increment_by(&self, name: &str, value: u64) {
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        *counters.entry(name.to_string()).or_insert(0) += value;
    }

    /// Current value of a counter
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Record a histogram value; the oldest sample is dropped once the
    /// histogram holds [`MAX_HISTOGRAM_SAMPLES`]
    pub fn histogram(&self, name: &str, value: f64) {
        let mut histograms = self.histograms.write().unwrap_or_else(PoisonError::into_inner);
        let samples = histograms.entry(name.to_string()).or_default();
        if samples.len() >= MAX_HISTOGRAM_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    /// Summary of a histogram
    pub fn histogram_stats(&self, name: &str) -> HistogramStats {
        self.histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|v| HistogramStats::from_values(v.iter().copied()))
            .unwrap_or_default()
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let histograms: HashMap<String, HistogramStats> = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), HistogramStats::from_values(v.iter().copied())))
            .collect();

        serde_json::json!({
            "session_id": session_id(),
            "uptime_secs": self.uptime_secs(),
            "counters": counters,
            "histograms": histograms,
        })
    }
}

/// Histogram statistics
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct HistogramStats {
    /// Number of samples
    pub count: usize,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

impl HistogramStats {
    #[allow(clippy::cast_precision_loss)]
    fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sum / count as f64,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Get the global metrics registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// Measures an operation and records it in milliseconds.
///
/// Dropping an unstopped timer records too.
pub struct Timer {
    name: String,
    start: Instant,
    recorded: bool,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let duration = self.start.elapsed();
        if !self.recorded {
            self.recorded = true;
            metrics().histogram(&self.name, duration.as_secs_f64() * 1000.0);
            tracing::trace!(metric = %self.name, duration_ms = duration.as_millis(), "Timer completed");
        }
        duration
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.record();
    }
}
