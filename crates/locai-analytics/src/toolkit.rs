//! The public facade over every analytics component.
//!
//! `Toolkit` validates options, resolves heterogeneous inputs once at the
//! boundary, delegates to the component, and wraps any failure with the name
//! of the operation while keeping the original cause (and its error code).
//! It never substitutes placeholder output on failure.

use crate::anomaly::AnomalyDetector;
use crate::config::{
    AnomalyConfig, ForecastConfig, RecommendationConfig, SegmentationConfig, TextConfig,
};
use crate::error::{AnalyticsError, Result};
use crate::features::FeatureSource;
use crate::forecast::Forecaster;
use crate::insights::{BusinessData, Insight, InsightGenerator};
use crate::recommend::{Recommendations, Recommender};
use crate::segmentation::{SegmentationResult, Segmenter};
use crate::text::{Lexicon, TextAnalyzer};
use crate::types::{
    AnomalyRecord, AnomalyStatistic, DataPoint, ItemAttributes, ItemId, TextAnalysis, UserId,
    UserInteractions,
};
use crate::utils::{ensure_finite, resolve_values};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

/// Entry point for forecasting, anomaly detection, segmentation,
/// recommendations and text analysis.
///
/// Holds no per-call state; one instance can serve concurrent callers.
///
/// # Example
///
/// ```rust
/// use locai_analytics::{AnomalyConfig, AnomalyMethod, DataPoint, Toolkit};
///
/// let toolkit = Toolkit::new();
/// let values: Vec<DataPoint> = [10.0, 10.0, 10.0, 10.0, 100.0].map(DataPoint::from).to_vec();
/// let records = toolkit
///     .detect_anomalies(&values, &AnomalyConfig::new(AnomalyMethod::Zscore, 2.0))
///     .unwrap();
/// assert!(records[4].is_anomaly);
/// ```
#[derive(Debug, Clone)]
pub struct Toolkit {
    lexicon: Arc<Lexicon>,
}

static_assertions::assert_impl_all!(Toolkit: Send, Sync);

impl Default for Toolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolkit {
    /// Toolkit using the built-in English vocabularies.
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::english(),
        }
    }

    /// Toolkit using custom sentiment and stop-word vocabularies.
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Run `operation`, logging its outcome and tagging failures.
    fn run<T>(&self, operation: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        info!("Starting {}...", operation);
        match f() {
            Ok(value) => {
                info!("Completed {}", operation);
                Ok(value)
            }
            Err(e) => {
                error!("{} error: {}", operation, e);
                Err(e.with_context(format!("{operation} failed")))
            }
        }
    }

    /// Project `periods` values past the end of `history`.
    pub fn forecast_time_series(
        &self,
        history: &[DataPoint],
        periods: usize,
        config: &ForecastConfig,
    ) -> Result<Vec<f64>> {
        self.run("forecasting", || {
            config.validate()?;
            if history.is_empty() {
                return Err(AnalyticsError::invalid_input("history is empty"));
            }
            let values = resolve_values(history)?;
            let forecast = Forecaster::new(config.clone()).forecast(&values, periods)?;
            ensure_finite(&forecast, "forecast")?;
            Ok(forecast)
        })
    }

    /// Flag outliers among `values`, preserving input order.
    pub fn detect_anomalies(
        &self,
        values: &[DataPoint],
        config: &AnomalyConfig,
    ) -> Result<Vec<AnomalyRecord>> {
        self.run("anomaly detection", || {
            config.validate()?;
            let values = resolve_values(values)?;
            let records = AnomalyDetector::new(config.clone()).detect(&values)?;

            let statistics: Vec<f64> = records
                .iter()
                .flat_map(|r| match r.statistic {
                    AnomalyStatistic::ZScore { z_score } => vec![z_score],
                    AnomalyStatistic::Bounds {
                        lower_bound,
                        upper_bound,
                    } => vec![lower_bound, upper_bound],
                })
                .collect();
            ensure_finite(&statistics, "anomaly statistic")?;
            Ok(records)
        })
    }

    /// Segment customer records into `config.clusters` groups.
    pub fn classify_customers<R: FeatureSource>(
        &self,
        records: &[R],
        config: &SegmentationConfig,
    ) -> Result<SegmentationResult> {
        self.run("customer segmentation", || {
            config.validate()?;
            Segmenter::new(config.clone()).segment(records)
        })
    }

    /// Ranked item recommendations for every user.
    pub fn generate_recommendations(
        &self,
        users: &BTreeMap<UserId, UserInteractions>,
        items: &BTreeMap<ItemId, ItemAttributes>,
        config: &RecommendationConfig,
    ) -> Result<Recommendations> {
        self.run("recommendation", || {
            config.validate()?;
            let recommendations = Recommender::new(config.clone()).recommend(users, items)?;
            let scores: Vec<f64> = recommendations
                .values()
                .flatten()
                .map(|r| r.score)
                .collect();
            ensure_finite(&scores, "recommendation score")?;
            Ok(recommendations)
        })
    }

    /// Sentiment, keywords or entities of `text`, per `config.method`.
    pub fn analyze_text(&self, text: &str, config: &TextConfig) -> Result<TextAnalysis> {
        self.run("text analysis", || {
            config.validate()?;
            Ok(TextAnalyzer::with_lexicon(config.clone(), Arc::clone(&self.lexicon)).analyze(text))
        })
    }

    /// Insights over stored business records, with customer recency
    /// measured up to `as_of`. `seed` fixes the customer segmentation.
    pub fn generate_insights(
        &self,
        data: &BusinessData,
        as_of: DateTime<Utc>,
        seed: Option<u64>,
    ) -> Result<Vec<Insight>> {
        self.run("insight generation", || {
            let generator = InsightGenerator::new(Arc::clone(&self.lexicon));
            match seed {
                Some(seed) => generator.with_seed(seed).generate(data, as_of),
                None => generator.generate(data, as_of),
            }
        })
    }
}
