//! Configuration types for the analytics components.
//!
//! Each component takes its own options struct. All of them deserialize from
//! partial JSON (missing fields fall back to their defaults) so the calling
//! layer can forward user-supplied options unchanged. The two larger structs,
//! [`ForecastConfig`] and [`SegmentationConfig`], also offer a builder.

use serde::{Deserialize, Serialize};

// =============================================================================
// Method Enums
// =============================================================================

/// Forecasting model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastMethod {
    /// Average of a trailing window, rolled forward over its own output
    MovingAverage,
    /// Holt-Winters with multiplicative seasonality
    #[default]
    ExponentialSmoothing,
}

/// Outlier test used by the anomaly detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyMethod {
    /// Distance from the mean in population standard deviations
    #[default]
    Zscore,
    /// Tukey fences around positional quartiles
    Iqr,
}

/// Centroid seeding strategy for k-means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CentroidInit {
    /// Independent uniform draw in [0,1] per feature
    #[default]
    Uniform,
    /// k-means++ seeding from the input vectors
    #[serde(rename = "kmeans++")]
    KMeansPlusPlus,
}

/// Recommendation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationMethod {
    /// User-user collaborative filtering
    #[default]
    Collaborative,
    /// Profile-to-item cosine similarity over item attributes
    ContentBased,
}

/// Text analysis mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextMethod {
    #[default]
    Sentiment,
    Keywords,
    Entities,
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid smoothing factor '{field}': {value} (must be strictly between 0.0 and 1.0)")]
    InvalidSmoothingFactor { field: String, value: f64 },

    #[error("Invalid seasonal periods: {0} (must be between 1 and usize::MAX / 2)")]
    InvalidSeasonalPeriods(usize),

    #[error("Invalid window size: {0} (must be at least 1)")]
    InvalidWindowSize(usize),

    #[error("Invalid anomaly threshold: {0} (must be a positive finite number)")]
    InvalidThreshold(f64),

    #[error("Invalid max iterations: {0} (must be at least 1)")]
    InvalidMaxIterations(usize),

    #[error("Invalid convergence tolerance: {0} (must be a non-negative finite number)")]
    InvalidTolerance(f64),

    #[error("Feature list must not be empty")]
    EmptyFeatureList,

    #[error("Invalid similarity threshold: {0} (must be between -1.0 and 1.0)")]
    InvalidSimilarityThreshold(f64),

    #[error("Invalid max recommendations: {0} (must be at least 1)")]
    InvalidMaxRecommendations(usize),

    #[error("Invalid keyword limit: {0} (must be at least 1)")]
    InvalidLimit(usize),

    #[error("Unsupported language '{0}' (only 'en' vocabularies are available)")]
    UnsupportedLanguage(String),
}

fn check_smoothing(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidSmoothingFactor {
            field: field.to_string(),
            value,
        })
    }
}

// =============================================================================
// Forecasting
// =============================================================================

/// Options for [`crate::forecast::Forecaster`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Forecasting model. Default: exponential smoothing.
    pub method: ForecastMethod,
    /// Level smoothing factor. Default: 0.2
    pub alpha: f64,
    /// Trend smoothing factor. Default: 0.1
    pub beta: f64,
    /// Seasonal smoothing factor. Default: 0.1
    pub gamma: f64,
    /// Season length; history must hold at least two seasons. Default: 7
    pub seasonal_periods: usize,
    /// Trailing window for the moving average.
    /// Default: `min(7, ceil(history.len() / 3))`
    pub window_size: Option<usize>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            method: ForecastMethod::default(),
            alpha: 0.2,
            beta: 0.1,
            gamma: 0.1,
            seasonal_periods: 7,
            window_size: None,
        }
    }
}

impl ForecastConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ForecastConfigBuilder {
        ForecastConfigBuilder::default()
    }

    /// Minimum history length accepted by the forecaster.
    pub fn min_history(&self) -> usize {
        self.seasonal_periods.saturating_mul(2)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_smoothing("alpha", self.alpha)?;
        check_smoothing("beta", self.beta)?;
        check_smoothing("gamma", self.gamma)?;

        if self.seasonal_periods == 0 || self.seasonal_periods > usize::MAX / 2 {
            return Err(ConfigValidationError::InvalidSeasonalPeriods(
                self.seasonal_periods,
            ));
        }

        if let Some(0) = self.window_size {
            return Err(ConfigValidationError::InvalidWindowSize(0));
        }

        Ok(())
    }
}

/// Builder for [`ForecastConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ForecastConfigBuilder {
    method: Option<ForecastMethod>,
    alpha: Option<f64>,
    beta: Option<f64>,
    gamma: Option<f64>,
    seasonal_periods: Option<usize>,
    window_size: Option<usize>,
}

impl ForecastConfigBuilder {
    /// Set the forecasting model.
    pub fn method(mut self, method: ForecastMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the level smoothing factor.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the trend smoothing factor.
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Set the seasonal smoothing factor.
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Set the season length.
    pub fn seasonal_periods(mut self, periods: usize) -> Self {
        self.seasonal_periods = Some(periods);
        self
    }

    /// Set the moving-average window.
    pub fn window_size(mut self, size: usize) -> Self {
        self.window_size = Some(size);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ForecastConfig` or an error if validation fails.
    pub fn build(self) -> Result<ForecastConfig, ConfigValidationError> {
        let defaults = ForecastConfig::default();
        let config = ForecastConfig {
            method: self.method.unwrap_or_default(),
            alpha: self.alpha.unwrap_or(defaults.alpha),
            beta: self.beta.unwrap_or(defaults.beta),
            gamma: self.gamma.unwrap_or(defaults.gamma),
            seasonal_periods: self.seasonal_periods.unwrap_or(defaults.seasonal_periods),
            window_size: self.window_size,
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Anomaly Detection
// =============================================================================

/// Options for [`crate::anomaly::AnomalyDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Outlier test. Default: z-score.
    pub method: AnomalyMethod,
    /// Z-score cut-off, or fence multiplier for IQR. Default: 2.0
    pub threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            method: AnomalyMethod::default(),
            threshold: 2.0,
        }
    }
}

impl AnomalyConfig {
    pub fn new(method: AnomalyMethod, threshold: f64) -> Self {
        Self { method, threshold }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

// =============================================================================
// Segmentation
// =============================================================================

/// Options for customer segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Number of clusters. Default: 3
    pub clusters: usize,
    /// Features extracted from each record. Default: frequency, recency, monetary
    pub features: Vec<String>,
    /// Iteration budget. Default: 100
    pub max_iterations: usize,
    /// Centroid seeding. Default: uniform.
    pub init: CentroidInit,
    /// Stop once no centroid moves further than this.
    /// Default: None (always run the full iteration budget)
    pub tolerance: Option<f64>,
    /// Seed for reproducible centroid initialization.
    /// Default: None (seeded from OS entropy)
    pub seed: Option<u64>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            clusters: 3,
            features: vec![
                "frequency".to_string(),
                "recency".to_string(),
                "monetary".to_string(),
            ],
            max_iterations: 100,
            init: CentroidInit::default(),
            tolerance: None,
            seed: None,
        }
    }
}

impl SegmentationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SegmentationConfigBuilder {
        SegmentationConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    ///
    /// The cluster count is checked by the clustering step itself, which
    /// reports a zero count as invalid input.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.features.is_empty() {
            return Err(ConfigValidationError::EmptyFeatureList);
        }

        if self.max_iterations == 0 {
            return Err(ConfigValidationError::InvalidMaxIterations(0));
        }

        if let Some(tol) = self.tolerance
            && (!tol.is_finite() || tol < 0.0)
        {
            return Err(ConfigValidationError::InvalidTolerance(tol));
        }

        Ok(())
    }
}

/// Builder for [`SegmentationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SegmentationConfigBuilder {
    clusters: Option<usize>,
    features: Option<Vec<String>>,
    max_iterations: Option<usize>,
    init: Option<CentroidInit>,
    tolerance: Option<f64>,
    seed: Option<u64>,
}

impl SegmentationConfigBuilder {
    /// Set the number of clusters.
    pub fn clusters(mut self, k: usize) -> Self {
        self.clusters = Some(k);
        self
    }

    /// Set the feature names to extract from each record.
    pub fn features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Set the iteration budget.
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Set the centroid seeding strategy.
    pub fn init(mut self, init: CentroidInit) -> Self {
        self.init = Some(init);
        self
    }

    /// Enable early exit once centroids move less than `tolerance`.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Seed the random source for reproducible clustering.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<SegmentationConfig, ConfigValidationError> {
        let defaults = SegmentationConfig::default();
        let config = SegmentationConfig {
            clusters: self.clusters.unwrap_or(defaults.clusters),
            features: self.features.unwrap_or(defaults.features),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            init: self.init.unwrap_or_default(),
            tolerance: self.tolerance,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Recommendations
// =============================================================================

/// Options for [`crate::recommend::Recommender`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Strategy. Default: collaborative.
    pub method: RecommendationMethod,
    /// Minimum user-user similarity for a neighbour to contribute. Default: 0.5
    pub similarity_threshold: f64,
    /// Results kept per user. Default: 5
    pub max_recommendations: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            method: RecommendationMethod::default(),
            similarity_threshold: 0.5,
            max_recommendations: 5,
        }
    }
}

impl RecommendationConfig {
    pub fn new(method: RecommendationMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigValidationError::InvalidSimilarityThreshold(
                self.similarity_threshold,
            ));
        }

        if self.max_recommendations == 0 {
            return Err(ConfigValidationError::InvalidMaxRecommendations(0));
        }

        Ok(())
    }
}

// =============================================================================
// Text Analysis
// =============================================================================

/// Options for [`crate::text::TextAnalyzer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Analysis mode. Default: sentiment.
    pub method: TextMethod,
    /// Maximum keywords returned. Default: 10
    pub limit: usize,
    /// Vocabulary language. Default: "en"
    pub language: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            method: TextMethod::default(),
            limit: 10,
            language: "en".to_string(),
        }
    }
}

impl TextConfig {
    pub fn new(method: TextMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.limit == 0 {
            return Err(ConfigValidationError::InvalidLimit(0));
        }

        if !self.language.eq_ignore_ascii_case("en") {
            return Err(ConfigValidationError::UnsupportedLanguage(
                self.language.clone(),
            ));
        }

        Ok(())
    }
}
