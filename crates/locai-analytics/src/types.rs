//! Value types shared by the analytics components.
//!
//! Every type here is a plain value: components consume borrowed inputs and
//! return freshly built results, never mutating what they were given.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type UserId = String;
pub type ItemId = String;

/// Mapping from feature name to numeric value, ordered by name.
pub type FeatureVector = BTreeMap<String, f64>;

// ============================================================================
// Numeric Input
// ============================================================================

/// A numeric observation as supplied by the calling layer.
///
/// Upstream records carry a value either as a bare number, a numeric string,
/// or an object with a `value` (or chart-style `y`) field. The variant is
/// resolved once, at the component boundary, through [`DataPoint::value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPoint {
    Number(f64),
    Text(String),
    Record {
        #[serde(default)]
        value: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
}

impl DataPoint {
    /// Resolve the point to a finite number.
    pub fn value(&self) -> Result<f64> {
        let resolved = match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Record { value, y } => value.or(*y),
        };

        match resolved {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(AnalyticsError::invalid_input(format!(
                "non-finite value {v} in numeric input"
            ))),
            None => Err(AnalyticsError::invalid_input(format!(
                "data point {self:?} has no numeric value"
            ))),
        }
    }
}

impl From<f64> for DataPoint {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

// ============================================================================
// Segmentation / Anomaly Results
// ============================================================================

/// A normalized feature vector with its cluster id in `[0, k)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub features: FeatureVector,
    pub cluster: usize,
}

/// The statistic that justified an anomaly decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnomalyStatistic {
    ZScore { z_score: f64 },
    Bounds { lower_bound: f64, upper_bound: f64 },
}

/// One input value with its anomaly flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub value: f64,
    pub is_anomaly: bool,
    #[serde(flatten)]
    pub statistic: AnomalyStatistic,
}

// ============================================================================
// Recommendation Input / Output
// ============================================================================

/// A single user-item interaction. A missing or zero rating counts as an
/// implicit 1 when weighting, but never as a vote for a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(alias = "itemId")]
    pub item_id: ItemId,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Interaction {
    pub fn new(item_id: impl Into<ItemId>, rating: f64) -> Self {
        Self {
            item_id: item_id.into(),
            rating: Some(rating),
        }
    }

    /// Rating used for similarity and weighting.
    pub fn effective_rating(&self) -> f64 {
        match self.rating {
            Some(rating) if rating != 0.0 && !rating.is_nan() => rating,
            _ => 1.0,
        }
    }

    /// An explicitly given positive rating, if any.
    pub fn explicit_rating(&self) -> Option<f64> {
        self.rating.filter(|&rating| rating > 0.0)
    }
}

/// Interaction history for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInteractions {
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl UserInteractions {
    pub fn new(interactions: Vec<Interaction>) -> Self {
        Self { interactions }
    }

    pub fn has_interacted(&self, item_id: &str) -> bool {
        self.interactions.iter().any(|i| i.item_id == item_id)
    }
}

/// A single item attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

/// Free-form item attributes (price, rating, categories, tags, name, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemAttributes(pub BTreeMap<String, AttributeValue>);

impl ItemAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// Numeric attributes in key order.
    pub fn numeric(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().filter_map(|(k, v)| match v {
            AttributeValue::Number(n) => Some((k.as_str(), *n)),
            _ => None,
        })
    }

    /// Labels stored under `key`, whether given as a single string or a list.
    pub fn labels(&self, key: &str) -> Vec<&str> {
        match self.0.get(key) {
            Some(AttributeValue::Text(s)) => vec![s.as_str()],
            Some(AttributeValue::List(values)) => values.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// A scored candidate item for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationScore {
    pub item_id: ItemId,
    pub score: f64,
    pub attributes: ItemAttributes,
}

// ============================================================================
// Text Analysis Results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub text: String,
    pub label: SentimentLabel,
    /// Balance of positive over negative words, in [-1, 1].
    pub score: f64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordResult {
    pub text: String,
    pub keywords: Vec<Keyword>,
    pub total_words: usize,
    pub unique_words: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub dates: Vec<String>,
    pub numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityResult {
    pub text: String,
    pub entities: Entities,
    pub entity_count: usize,
}

/// Output of [`crate::text::TextAnalyzer::analyze`], one variant per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TextAnalysis {
    Sentiment(SentimentResult),
    Keywords(KeywordResult),
    Entities(EntityResult),
}
