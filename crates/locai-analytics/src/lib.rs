//! Small-Business Analytics Library
//!
//! Simple, auditable analytics over the operational records of a small
//! business: sales, customer interactions, foot traffic and free-text
//! feedback.
//!
//! # Overview
//!
//! - **Feature Normalization**: min-max scaling of named record features
//! - **Forecasting**: moving average and Holt-Winters exponential smoothing
//! - **Anomaly Detection**: z-score and IQR outlier flags
//! - **Segmentation**: k-means clustering with injectable randomness
//! - **Recommendations**: collaborative and content-based filtering
//! - **Text Analysis**: lexicon sentiment, keywords and date/number entities
//! - **Insights**: human-readable summaries built from the above
//!
//! Every operation is a synchronous, pure computation over borrowed inputs.
//! Nothing is cached between calls, so a single [`Toolkit`] can be shared
//! across threads.
//!
//! # Quick Start
//!
//! ```rust
//! use locai_analytics::{DataPoint, ForecastConfig, Toolkit};
//!
//! let history: Vec<DataPoint> = [100.0, 110.0, 90.0, 120.0]
//!     .iter()
//!     .cycle()
//!     .take(14)
//!     .map(|&v| DataPoint::from(v))
//!     .collect();
//!
//! let forecast = Toolkit::new()
//!     .forecast_time_series(&history, 7, &ForecastConfig::default())
//!     .unwrap();
//! assert_eq!(forecast.len(), 7);
//! ```
//!
//! # Configuration
//!
//! Each component takes its own options struct from [`config`]. All of them
//! deserialize from partial JSON, filling the gaps with defaults:
//!
//! ```rust
//! use locai_analytics::config::{SegmentationConfig, CentroidInit};
//!
//! let config = SegmentationConfig::builder()
//!     .clusters(4)
//!     .init(CentroidInit::KMeansPlusPlus)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_iterations, 100);
//! ```
//!
//! # Errors
//!
//! All fallible operations return [`error::Result`]. The facade wraps
//! component failures with the failing operation's name; the machine code
//! from [`AnalyticsError::error_code`] always reflects the root cause.

pub mod anomaly;
pub mod config;
pub mod error;
pub mod features;
pub mod forecast;
pub mod insights;
pub mod recommend;
pub mod segmentation;
pub mod text;
pub mod toolkit;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use anomaly::{AnomalyDetector, AnomalyReport};
pub use config::{
    AnomalyConfig, AnomalyMethod, CentroidInit, ConfigValidationError, ForecastConfig,
    ForecastConfigBuilder, ForecastMethod, RecommendationConfig, RecommendationMethod,
    SegmentationConfig, SegmentationConfigBuilder, TextConfig, TextMethod,
};
pub use error::{AnalyticsError, Result as AnalyticsResult, ResultExt};
pub use features::{FeatureNormalizer, FeatureSource, extract_features};
pub use forecast::{Forecaster, HoltWinters};
pub use insights::{BusinessData, Insight, InsightGenerator, InsightKind};
pub use recommend::{Recommendations, Recommender};
pub use segmentation::{KMeans, KMeansFit, SegmentationResult, Segmenter};
pub use text::{Lexicon, TextAnalyzer};
pub use toolkit::Toolkit;
pub use types::{
    AnomalyRecord, AnomalyStatistic, AttributeValue, ClusterAssignment, DataPoint, FeatureVector,
    Interaction, ItemAttributes, ItemId, RecommendationScore, SentimentLabel, TextAnalysis,
    UserId, UserInteractions,
};
