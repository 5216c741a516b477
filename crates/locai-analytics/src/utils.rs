//! Shared numeric helpers for the analytics components.
//!
//! Every division in this module is guarded so that degenerate inputs
//! (empty slices, zero spread, zero magnitude) yield a defined neutral value
//! instead of NaN.

use crate::error::{AnalyticsError, Result};
use crate::types::DataPoint;
use std::collections::{BTreeMap, BTreeSet};

/// Denominators at or below this magnitude are treated as zero.
pub const EPSILON: f64 = 1e-12;

// =============================================================================
// Input Resolution
// =============================================================================

/// Resolve tagged data points to plain numbers, failing on the first bad one.
pub fn resolve_values(points: &[DataPoint]) -> Result<Vec<f64>> {
    points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            point
                .value()
                .map_err(|e| e.with_context(format!("data point at index {idx}")))
        })
        .collect()
}

/// Fail with a computation error if any produced value is NaN or infinite.
pub fn ensure_finite(values: &[f64], what: &str) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(AnalyticsError::computation(format!(
            "{what} produced a non-finite value at position {idx}"
        ))),
        None => Ok(()),
    }
}

// =============================================================================
// Descriptive Statistics
// =============================================================================

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Value at index `floor(n * q)` of an already sorted slice.
///
/// Positional, not interpolated. Returns `None` for an empty slice.
pub fn positional_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    Some(sorted[idx])
}

/// Sort a copy of `values` ascending.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

// =============================================================================
// Vector Similarity
// =============================================================================

/// Euclidean distance between two dense vectors of equal length.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity of two dense vectors; 0.0 when either has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    guarded_cosine(dot, norm_a, norm_b)
}

/// Cosine similarity of two sparse vectors over the union of their keys.
/// Absent keys count as 0.
pub fn sparse_cosine_similarity(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for key in keys {
        let x = a.get(key).copied().unwrap_or(0.0);
        let y = b.get(key).copied().unwrap_or(0.0);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    guarded_cosine(dot, norm_a, norm_b)
}

fn guarded_cosine(dot: f64, norm_a_sq: f64, norm_b_sq: f64) -> f64 {
    let denominator = norm_a_sq.sqrt() * norm_b_sq.sqrt();
    if denominator <= EPSILON {
        0.0
    } else {
        (dot / denominator).clamp(-1.0, 1.0)
    }
}
