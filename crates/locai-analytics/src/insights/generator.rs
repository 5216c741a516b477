//! Business insights assembled from the analytics components.

use super::extract::{customer_profiles, peak_hours, sales_series};
use super::records::BusinessData;
use crate::anomaly::AnomalyDetector;
use crate::config::{
    AnomalyConfig, AnomalyMethod, ForecastConfig, SegmentationConfig, TextConfig, TextMethod,
};
use crate::error::{Result, ResultExt};
use crate::forecast::Forecaster;
use crate::segmentation::Segmenter;
use crate::text::{Lexicon, TextAnalyzer};
use crate::types::{SentimentLabel, TextAnalysis};
use crate::utils::EPSILON;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Periods forecast ahead and compared against the most recent observations.
const FORECAST_PERIODS: usize = 7;
/// Sales points needed before a forecast insight is attempted.
const MIN_FORECAST_HISTORY: usize = 14;
const SEGMENT_LABELS: [&str; 3] = ["high-value loyal", "casual regular", "infrequent"];
const PEAK_HOURS_REPORTED: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    SalesAnomalies,
    SalesForecast,
    CustomerSegmentation,
    CustomerSentiment,
    PeakTraffic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    /// Fixed per kind, in [0, 1].
    pub confidence: f64,
}

impl Insight {
    fn new(kind: InsightKind, title: &str, description: String, confidence: f64) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description,
            confidence,
        }
    }
}

/// Builds insights from a business's stored records.
///
/// Every insight is derived from the data; an empty result means there was
/// nothing to report. Component failures propagate instead of being replaced
/// by placeholder insights.
#[derive(Debug, Clone)]
pub struct InsightGenerator {
    lexicon: Arc<Lexicon>,
    seed: Option<u64>,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(Lexicon::english())
    }
}

impl InsightGenerator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            seed: None,
        }
    }

    /// Seed customer segmentation for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate insights, measuring customer recency up to `as_of`.
    pub fn generate(&self, data: &BusinessData, as_of: DateTime<Utc>) -> Result<Vec<Insight>> {
        let mut insights = Vec::new();

        let sales = sales_series(&data.sales_data);
        if !sales.is_empty() {
            insights.extend(self.sales_anomalies(&sales)?);
            if sales.len() >= MIN_FORECAST_HISTORY {
                insights.extend(self.sales_forecast(&sales)?);
            }
        }

        if !data.customer_interactions.is_empty() {
            insights.push(self.customer_segments(data, as_of)?);
            insights.extend(self.customer_sentiment(data));
        }

        let peaks = peak_hours(&data.foot_traffic, PEAK_HOURS_REPORTED);
        if !peaks.is_empty() {
            insights.push(Insight::new(
                InsightKind::PeakTraffic,
                "Peak Traffic Hours",
                format!(
                    "Your store experiences the highest foot traffic during {}.",
                    peaks.join(" and ")
                ),
                0.88,
            ));
        }

        debug!("Generated {} insights", insights.len());
        Ok(insights)
    }

    fn sales_anomalies(&self, sales: &[f64]) -> Result<Option<Insight>> {
        let records = AnomalyDetector::new(AnomalyConfig::new(AnomalyMethod::Zscore, 2.0))
            .detect(sales)
            .context("sales anomaly insight")?;

        let count = records.iter().filter(|r| r.is_anomaly).count();
        Ok((count > 0).then(|| {
            Insight::new(
                InsightKind::SalesAnomalies,
                "Sales Anomalies Detected",
                format!(
                    "We detected {count} unusual sales values in your data. \
                     These could represent opportunities or problems to investigate."
                ),
                0.85,
            )
        }))
    }

    fn sales_forecast(&self, sales: &[f64]) -> Result<Option<Insight>> {
        let forecast = Forecaster::new(ForecastConfig::default())
            .forecast(sales, FORECAST_PERIODS)
            .context("sales forecast insight")?;

        let recent: f64 = sales[sales.len().saturating_sub(FORECAST_PERIODS)..]
            .iter()
            .sum();
        if recent.abs() <= EPSILON {
            debug!("Recent sales total is zero; skipping forecast insight");
            return Ok(None);
        }

        let projected: f64 = forecast.iter().sum();
        let change = (projected - recent) / recent * 100.0;
        let outlook = if projected > recent {
            format!("a {:.1}% increase", change.abs())
        } else if projected < recent {
            format!("a {:.1}% decrease", change.abs())
        } else {
            "no change".to_string()
        };

        Ok(Some(Insight::new(
            InsightKind::SalesForecast,
            "Sales Forecast",
            format!(
                "Based on your historical data, we predict {outlook} in sales over the next \
                 {FORECAST_PERIODS} days."
            ),
            0.75,
        )))
    }

    fn customer_segments(&self, data: &BusinessData, as_of: DateTime<Utc>) -> Result<Insight> {
        let profiles = customer_profiles(&data.customer_interactions, as_of);
        let config = SegmentationConfig {
            clusters: SEGMENT_LABELS.len(),
            seed: self.seed,
            ..SegmentationConfig::default()
        };
        let segments = Segmenter::new(config)
            .segment(&profiles)
            .context("customer segmentation insight")?;

        let (cluster, size) = segments.dominant_cluster().unwrap_or_default();
        let share = (size as f64 / profiles.len() as f64 * 100.0).round();
        let label = SEGMENT_LABELS.get(cluster).copied().unwrap_or("unlabelled");

        Ok(Insight::new(
            InsightKind::CustomerSegmentation,
            "Customer Segmentation",
            format!("Most of your customers ({share}%) fall into the \"{label}\" category."),
            0.82,
        ))
    }

    fn customer_sentiment(&self, data: &BusinessData) -> Option<Insight> {
        let feedback: Vec<&str> = data
            .customer_interactions
            .iter()
            .filter_map(|i| i.feedback.as_deref())
            .filter(|f| !f.trim().is_empty())
            .collect();
        if feedback.is_empty() {
            return None;
        }

        let sentiment = TextAnalyzer::with_lexicon(
            TextConfig::new(TextMethod::Sentiment),
            Arc::clone(&self.lexicon),
        );
        let positive: Vec<&str> = feedback
            .iter()
            .copied()
            .filter(|text| {
                matches!(
                    sentiment.analyze(text),
                    TextAnalysis::Sentiment(ref r) if r.label == SentimentLabel::Positive
                )
            })
            .collect();
        let share = (positive.len() as f64 / feedback.len() as f64 * 100.0).round();

        let mut description = format!("{share}% of your customer feedback is positive.");
        if !positive.is_empty() {
            let keywords = TextAnalyzer::with_lexicon(
                TextConfig {
                    limit: 2,
                    ..TextConfig::new(TextMethod::Keywords)
                },
                Arc::clone(&self.lexicon),
            )
            .analyze(&positive.join(" "));
            if let TextAnalysis::Keywords(result) = keywords
                && !result.keywords.is_empty()
            {
                let words: Vec<&str> = result.keywords.iter().map(|k| k.word.as_str()).collect();
                description.push_str(&format!(
                    " Positive feedback most often mentions {}.",
                    words.join(" and ")
                ));
            }
        }

        Some(Insight::new(
            InsightKind::CustomerSentiment,
            "Customer Sentiment",
            description,
            0.78,
        ))
    }
}
