//! Outlier detection over numeric sequences.
//!
//! Two tests are supported: z-score (distance from the population mean in
//! standard deviations) and IQR (Tukey fences around positional quartiles).
//! Results keep the input order; sorting used by the IQR test is internal.

use crate::config::{AnomalyConfig, AnomalyMethod};
use crate::error::{AnalyticsError, Result};
use crate::types::{AnomalyRecord, AnomalyStatistic};
use crate::utils::{EPSILON, mean, population_std_dev, positional_quantile, sorted_copy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Flags outliers according to an [`AnomalyConfig`].
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    /// Flag every value of `values`, preserving input order.
    pub fn detect(&self, values: &[f64]) -> Result<Vec<AnomalyRecord>> {
        if values.is_empty() {
            return Err(AnalyticsError::invalid_input(
                "no values provided for anomaly detection",
            ));
        }

        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(AnalyticsError::invalid_input(format!(
                "non-finite value at index {idx}"
            )));
        }

        let records = match self.config.method {
            AnomalyMethod::Zscore => Self::by_zscore(values, self.config.threshold),
            AnomalyMethod::Iqr => Self::by_iqr(values, self.config.threshold),
        };

        debug!(
            "Anomaly detection ({:?}) flagged {} of {} values",
            self.config.method,
            records.iter().filter(|r| r.is_anomaly).count(),
            values.len()
        );

        Ok(records)
    }

    /// `|v - mean| / std` at or above `threshold`; zero spread flags nothing.
    ///
    /// The cut-off is inclusive: with population spread, a lone spike among
    /// `n` values can reach at most `sqrt(n - 1)`, so `[10, 10, 10, 10, 100]`
    /// lands exactly on a threshold of 2.
    fn by_zscore(values: &[f64], threshold: f64) -> Vec<AnomalyRecord> {
        let mean = mean(values);
        let std_dev = population_std_dev(values);

        if std_dev <= EPSILON {
            warn!("Zero variance in anomaly input; no values will be flagged");
        }

        values
            .iter()
            .map(|&value| {
                let z_score = if std_dev <= EPSILON {
                    0.0
                } else {
                    (value - mean).abs() / std_dev
                };
                AnomalyRecord {
                    value,
                    is_anomaly: std_dev > EPSILON && z_score >= threshold,
                    statistic: AnomalyStatistic::ZScore { z_score },
                }
            })
            .collect()
    }

    /// Outside `[q1 - k*iqr, q3 + k*iqr]` with positional quartiles.
    fn by_iqr(values: &[f64], multiplier: f64) -> Vec<AnomalyRecord> {
        let sorted = sorted_copy(values);
        // Non-empty input is checked by the caller.
        let q1 = positional_quantile(&sorted, 0.25).unwrap_or_default();
        let q3 = positional_quantile(&sorted, 0.75).unwrap_or_default();
        let iqr = q3 - q1;

        let lower_bound = q1 - multiplier * iqr;
        let upper_bound = q3 + multiplier * iqr;

        debug!(
            "IQR bounds: q1={}, q3={}, lower={}, upper={}",
            q1, q3, lower_bound, upper_bound
        );

        values
            .iter()
            .map(|&value| AnomalyRecord {
                value,
                is_anomaly: value < lower_bound || value > upper_bound,
                statistic: AnomalyStatistic::Bounds {
                    lower_bound,
                    upper_bound,
                },
            })
            .collect()
    }
}

/// Aggregate view over a set of anomaly records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub total: usize,
    pub anomaly_count: usize,
    /// Positions of flagged values in the original input.
    pub anomaly_indices: Vec<usize>,
    /// Share of flagged values (0.0 - 1.0).
    pub anomaly_rate: f64,
}

impl AnomalyReport {
    pub fn summarize(records: &[AnomalyRecord]) -> Self {
        let anomaly_indices: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_anomaly)
            .map(|(idx, _)| idx)
            .collect();
        let anomaly_count = anomaly_indices.len();
        let anomaly_rate = if records.is_empty() {
            0.0
        } else {
            anomaly_count as f64 / records.len() as f64
        };

        Self {
            total: records.len(),
            anomaly_count,
            anomaly_indices,
            anomaly_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(method: AnomalyMethod, threshold: f64) -> AnomalyDetector {
        AnomalyDetector::new(AnomalyConfig::new(method, threshold))
    }

    // ==================== z-score tests ====================

    #[test]
    fn test_zscore_flags_single_spike() {
        let records = detector(AnomalyMethod::Zscore, 2.0)
            .detect(&[10.0, 10.0, 10.0, 10.0, 100.0])
            .unwrap();

        let flagged: Vec<f64> = records
            .iter()
            .filter(|r| r.is_anomaly)
            .map(|r| r.value)
            .collect();
        assert_eq!(flagged, vec![100.0]);

        // mean = 28, population std = sqrt(6480 / 5) = 36 -> z(100) = 72 / 36
        match records[4].statistic {
            AnomalyStatistic::ZScore { z_score } => assert_eq!(z_score, 2.0),
            other => panic!("unexpected statistic: {other:?}"),
        }
    }

    #[test]
    fn test_zscore_zero_variance_flags_nothing() {
        let records = detector(AnomalyMethod::Zscore, 2.0)
            .detect(&[5.0, 5.0, 5.0, 5.0])
            .unwrap();

        assert!(records.iter().all(|r| !r.is_anomaly));
        assert!(records.iter().all(|r| matches!(
            r.statistic,
            AnomalyStatistic::ZScore { z_score } if z_score == 0.0
        )));
    }

    // ==================== IQR tests ====================

    #[test]
    fn test_iqr_flags_outlier_and_reports_bounds() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let records = detector(AnomalyMethod::Iqr, 1.5).detect(&values).unwrap();

        // q1 = sorted[2] = 3, q3 = sorted[7] = 8, iqr = 5 -> bounds [-4.5, 15.5]
        assert!(records[9].is_anomaly);
        assert_eq!(records.iter().filter(|r| r.is_anomaly).count(), 1);
        assert_eq!(
            records[0].statistic,
            AnomalyStatistic::Bounds {
                lower_bound: -4.5,
                upper_bound: 15.5
            }
        );
    }

    #[test]
    fn test_iqr_preserves_input_order() {
        let values = [9.0, 1.0, 5.0, 3.0];
        let records = detector(AnomalyMethod::Iqr, 2.0).detect(&values).unwrap();
        let out: Vec<f64> = records.iter().map(|r| r.value).collect();
        assert_eq!(out, values.to_vec());
    }

    #[test]
    fn test_iqr_constant_values_not_flagged() {
        let records = detector(AnomalyMethod::Iqr, 1.5)
            .detect(&[5.0, 5.0, 5.0, 5.0, 5.0])
            .unwrap();
        assert!(records.iter().all(|r| !r.is_anomaly));
    }

    // ==================== shared behaviour ====================

    #[test]
    fn test_methods_agree_on_bimodal_spike() {
        let values = [10.0, 11.0, 10.0, 12.0, 10.0, 11.0, 10.0, 250.0];
        for method in [AnomalyMethod::Zscore, AnomalyMethod::Iqr] {
            let records = detector(method, 2.0).detect(&values).unwrap();
            assert!(records[7].is_anomaly, "{method:?} should flag the spike");
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = AnomalyDetector::default().detect(&[]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_report_summary() {
        let records = detector(AnomalyMethod::Zscore, 1.5)
            .detect(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 20.0])
            .unwrap();
        let report = AnomalyReport::summarize(&records);
        assert_eq!(report.total, 8);
        assert_eq!(report.anomaly_count, 1);
        assert_eq!(report.anomaly_indices, vec![7]);
        assert_eq!(report.anomaly_rate, 0.125);
    }
}
