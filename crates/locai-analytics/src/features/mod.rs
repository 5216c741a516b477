//! Feature extraction and min-max normalization.
//!
//! Records coming from the calling layer have heterogeneous shapes (JSON
//! documents, maps, typed customer profiles). The [`FeatureSource`] trait is
//! the single seam through which a named numeric feature is read, so the
//! normalizer never inspects record shapes itself.

use crate::error::{AnalyticsError, Result};
use crate::types::FeatureVector;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Anything a named numeric feature can be read from.
pub trait FeatureSource {
    /// Value of `name`, or `None` if the record does not carry it.
    fn feature(&self, name: &str) -> Option<f64>;
}

impl FeatureSource for HashMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl FeatureSource for BTreeMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Reads numeric fields of a JSON object; anything else counts as missing.
impl FeatureSource for serde_json::Value {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(serde_json::Value::as_f64)
    }
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    fn feature(&self, name: &str) -> Option<f64> {
        (**self).feature(name)
    }
}

/// Extract the named features from every record, defaulting missing ones to 0.
pub fn extract_features<R, S>(records: &[R], feature_names: &[S]) -> Vec<FeatureVector>
where
    R: FeatureSource,
    S: AsRef<str>,
{
    records
        .iter()
        .map(|record| {
            feature_names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    (name.to_string(), record.feature(name).unwrap_or(0.0))
                })
                .collect()
        })
        .collect()
}

/// Min-max scaler over a population of feature vectors.
pub struct FeatureNormalizer;

impl FeatureNormalizer {
    /// Extract and scale the named features of `records` into [0, 1].
    pub fn normalize<R, S>(records: &[R], feature_names: &[S]) -> Result<Vec<FeatureVector>>
    where
        R: FeatureSource,
        S: AsRef<str>,
    {
        if records.is_empty() {
            return Err(AnalyticsError::invalid_input(
                "cannot normalize an empty record set",
            ));
        }

        Self::min_max_scale(extract_features(records, feature_names))
    }

    /// Scale already-extracted vectors into [0, 1] per feature.
    ///
    /// A feature with zero range across the population maps to 0 for every
    /// vector. A feature missing from some vectors is treated as 0 there.
    pub fn min_max_scale(vectors: Vec<FeatureVector>) -> Result<Vec<FeatureVector>> {
        if vectors.is_empty() {
            return Err(AnalyticsError::invalid_input(
                "cannot normalize an empty record set",
            ));
        }

        let mut ranges: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for name in vectors.iter().flat_map(|v| v.keys()) {
            if ranges.contains_key(name) {
                continue;
            }
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for vector in &vectors {
                let value = vector.get(name).copied().unwrap_or(0.0);
                if !value.is_finite() {
                    return Err(AnalyticsError::invalid_input(format!(
                        "feature '{name}' has non-finite value {value}"
                    )));
                }
                min = min.min(value);
                max = max.max(value);
            }
            ranges.insert(name.clone(), (min, max));
        }

        debug!(
            "Normalizing {} vectors over {} features",
            vectors.len(),
            ranges.len()
        );

        let normalized = vectors
            .iter()
            .map(|vector| {
                ranges
                    .iter()
                    .map(|(name, &(min, max))| {
                        let value = vector.get(name).copied().unwrap_or(0.0);
                        let range = max - min;
                        let scaled = if range == 0.0 {
                            0.0
                        } else {
                            (value - min) / range
                        };
                        (name.clone(), scaled)
                    })
                    .collect()
            })
            .collect();

        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customers() -> Vec<serde_json::Value> {
        vec![
            json!({"frequency": 2.0, "recency": 30.0, "monetary": 50.0}),
            json!({"frequency": 8.0, "recency": 3.0, "monetary": 250.0}),
            json!({"frequency": 5.0, "recency": 10.0}),
        ]
    }

    #[test]
    fn test_extract_defaults_missing_to_zero() {
        let vectors = extract_features(&customers(), &["monetary", "loyalty"]);
        assert_eq!(vectors[2]["monetary"], 0.0);
        assert_eq!(vectors[0]["loyalty"], 0.0);
        assert_eq!(vectors[1]["monetary"], 250.0);
    }

    #[test]
    fn test_normalize_maps_extremes_to_unit_interval() {
        let names = ["frequency", "recency", "monetary"];
        let vectors = FeatureNormalizer::normalize(&customers(), &names).unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0]["frequency"], 0.0);
        assert_eq!(vectors[1]["frequency"], 1.0);
        assert_eq!(vectors[1]["recency"], 0.0);
        assert_eq!(vectors[0]["recency"], 1.0);
        assert_eq!(vectors[2]["frequency"], 0.5);

        for vector in &vectors {
            for value in vector.values() {
                assert!((0.0..=1.0).contains(value));
            }
        }
    }

    #[test]
    fn test_normalize_zero_range_is_zero_not_nan() {
        let records = vec![
            BTreeMap::from([("visits".to_string(), 4.0)]),
            BTreeMap::from([("visits".to_string(), 4.0)]),
        ];
        let vectors = FeatureNormalizer::normalize(&records, &["visits"]).unwrap();
        assert!(vectors.iter().all(|v| v["visits"] == 0.0));
    }

    #[test]
    fn test_normalize_empty_input_fails() {
        let records: Vec<HashMap<String, f64>> = vec![];
        let err = FeatureNormalizer::normalize(&records, &["a"]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_min_max_rejects_non_finite() {
        let vectors = vec![
            BTreeMap::from([("a".to_string(), 1.0)]),
            BTreeMap::from([("a".to_string(), f64::NAN)]),
        ];
        assert!(FeatureNormalizer::min_max_scale(vectors).is_err());
    }
}
