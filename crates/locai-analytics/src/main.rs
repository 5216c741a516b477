//! CLI entry point for the small-business analytics toolkit.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use locai_analytics::{
    AnomalyConfig, AnomalyMethod, AnomalyReport, BusinessData, DataPoint, ForecastConfig,
    ForecastMethod, ItemAttributes, ItemId, RecommendationConfig, RecommendationMethod,
    SegmentationConfig, TextConfig, TextMethod, Toolkit, UserId, UserInteractions,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible forecast method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliForecastMethod {
    /// Trailing-window average rolled forward
    MovingAverage,
    /// Holt-Winters level/trend/season smoothing
    ExponentialSmoothing,
}

impl From<CliForecastMethod> for ForecastMethod {
    fn from(cli: CliForecastMethod) -> Self {
        match cli {
            CliForecastMethod::MovingAverage => ForecastMethod::MovingAverage,
            CliForecastMethod::ExponentialSmoothing => ForecastMethod::ExponentialSmoothing,
        }
    }
}

/// CLI-compatible anomaly method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAnomalyMethod {
    /// Distance from the mean in standard deviations
    Zscore,
    /// Tukey fences around the quartiles
    Iqr,
}

impl From<CliAnomalyMethod> for AnomalyMethod {
    fn from(cli: CliAnomalyMethod) -> Self {
        match cli {
            CliAnomalyMethod::Zscore => AnomalyMethod::Zscore,
            CliAnomalyMethod::Iqr => AnomalyMethod::Iqr,
        }
    }
}

/// CLI-compatible recommendation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliRecommendationMethod {
    /// User-user similarity over shared ratings
    Collaborative,
    /// Item attributes matched against user profiles
    ContentBased,
}

impl From<CliRecommendationMethod> for RecommendationMethod {
    fn from(cli: CliRecommendationMethod) -> Self {
        match cli {
            CliRecommendationMethod::Collaborative => RecommendationMethod::Collaborative,
            CliRecommendationMethod::ContentBased => RecommendationMethod::ContentBased,
        }
    }
}

/// CLI-compatible text analysis method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTextMethod {
    Sentiment,
    Keywords,
    Entities,
}

impl From<CliTextMethod> for TextMethod {
    fn from(cli: CliTextMethod) -> Self {
        match cli {
            CliTextMethod::Sentiment => TextMethod::Sentiment,
            CliTextMethod::Keywords => TextMethod::Keywords,
            CliTextMethod::Entities => TextMethod::Entities,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Small-business analytics: forecasts, anomalies, segments, recommendations",
    long_about = "Runs one analytics operation over a JSON input file and prints the \
                  result as JSON.\n\n\
                  EXAMPLES:\n  \
                  locai-analytics forecast -i sales.json --periods 7\n  \
                  locai-analytics anomalies -i sales.json --method iqr --threshold 1.5\n  \
                  locai-analytics segment -i customers.json --clusters 3 --seed 42\n  \
                  locai-analytics insights -i business.json --as-of 2025-03-31T00:00:00Z"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forecast future values of a numeric series
    ///
    /// Input: an array of numbers or `{"value": n}` / `{"y": n}` objects.
    Forecast {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "7")]
        periods: usize,

        #[arg(short, long, value_enum, default_value = "exponential-smoothing")]
        method: CliForecastMethod,

        #[arg(long, default_value = "7")]
        seasonal_periods: usize,

        /// Trailing window for the moving average
        #[arg(long)]
        window_size: Option<usize>,
    },

    /// Flag outliers in a numeric series
    Anomalies {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "zscore")]
        method: CliAnomalyMethod,

        /// Z-score cut-off, or IQR multiplier
        #[arg(short, long, default_value = "2.0")]
        threshold: f64,
    },

    /// Cluster customer records
    ///
    /// Input: an array of objects with numeric feature fields.
    Segment {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "3")]
        clusters: usize,

        /// Feature fields to cluster on (comma separated)
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "frequency,recency,monetary"
        )]
        features: Vec<String>,

        /// Seed for reproducible centroid initialisation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Recommend unseen items to each user
    ///
    /// Input: `{"users": {id: {"interactions": [...]}}, "items": {id: {...}}}`.
    Recommend {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "collaborative")]
        method: CliRecommendationMethod,

        /// Maximum recommendations per user
        #[arg(long, default_value = "5")]
        max: usize,

        #[arg(long, default_value = "0.5")]
        similarity_threshold: f64,
    },

    /// Analyze a piece of text
    ///
    /// Input: a JSON string.
    Text {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "sentiment")]
        method: CliTextMethod,

        /// Maximum keywords returned
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Generate insights from stored business records
    ///
    /// Input: `{"salesData": [...], "customerInteractions": [...], "footTraffic": [...]}`.
    Insights {
        #[arg(short, long)]
        input: PathBuf,

        /// Reference time for customer recency (RFC 3339). Defaults to now.
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Deserialize)]
struct RecommendationInput {
    users: BTreeMap<UserId, UserInteractions>,
    items: BTreeMap<ItemId, ItemAttributes>,
}

#[derive(Debug, Serialize)]
struct AnomalyOutput<T> {
    summary: AnomalyReport,
    records: T,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the JSON result.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Read and decode a JSON input file.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(anyhow!("Input file not found: {}", path.display()));
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!("Read {} bytes from {}", raw.len(), path.display());
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let toolkit = Toolkit::new();

    match args.command {
        Command::Forecast {
            input,
            periods,
            method,
            seasonal_periods,
            window_size,
        } => {
            let history: Vec<DataPoint> = read_json(&input)?;
            let mut builder = ForecastConfig::builder()
                .method(method.into())
                .seasonal_periods(seasonal_periods);
            if let Some(size) = window_size {
                builder = builder.window_size(size);
            }
            let config = builder.build()?;

            info!("Forecasting {} periods from {}", periods, input.display());
            let forecast = toolkit.forecast_time_series(&history, periods, &config)?;
            print_json(&forecast)
        }

        Command::Anomalies {
            input,
            method,
            threshold,
        } => {
            let values: Vec<DataPoint> = read_json(&input)?;
            let config = AnomalyConfig::new(method.into(), threshold);
            let records = toolkit.detect_anomalies(&values, &config)?;
            print_json(&AnomalyOutput {
                summary: AnomalyReport::summarize(&records),
                records,
            })
        }

        Command::Segment {
            input,
            clusters,
            features,
            seed,
        } => {
            let records: Vec<serde_json::Value> = read_json(&input)?;
            let mut builder = SegmentationConfig::builder()
                .clusters(clusters)
                .features(features);
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            let config = builder.build()?;
            let result = toolkit.classify_customers(&records, &config)?;
            print_json(&result)
        }

        Command::Recommend {
            input,
            method,
            max,
            similarity_threshold,
        } => {
            let data: RecommendationInput = read_json(&input)?;
            let config = RecommendationConfig {
                method: method.into(),
                similarity_threshold,
                max_recommendations: max,
            };
            let recommendations =
                toolkit.generate_recommendations(&data.users, &data.items, &config)?;
            print_json(&recommendations)
        }

        Command::Text {
            input,
            method,
            limit,
        } => {
            let text: String = read_json(&input)?;
            let config = TextConfig {
                limit,
                ..TextConfig::new(method.into())
            };
            let analysis = toolkit.analyze_text(&text, &config)?;
            print_json(&analysis)
        }

        Command::Insights { input, as_of, seed } => {
            let data: BusinessData = read_json(&input)?;
            let as_of = as_of.unwrap_or_else(Utc::now);
            let insights = toolkit.generate_insights(&data, as_of, seed)?;
            print_json(&insights)
        }
    }
}
