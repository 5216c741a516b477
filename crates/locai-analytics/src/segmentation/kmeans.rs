//! Fixed-budget k-means over feature vectors.

use crate::config::CentroidInit;
use crate::error::{AnalyticsError, Result};
use crate::types::{ClusterAssignment, FeatureVector};
use crate::utils::{EPSILON, euclidean_distance};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Output of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// One assignment per input vector, in input order.
    pub assignments: Vec<ClusterAssignment>,
    /// Final centroids, indexed by cluster id.
    pub centroids: Vec<FeatureVector>,
    /// Iterations actually run.
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
    init: CentroidInit,
    tolerance: Option<f64>,
}

impl KMeans {
    /// k-means with uniform initialisation and a fixed 100-iteration budget.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 100,
            init: CentroidInit::Uniform,
            tolerance: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_init(mut self, init: CentroidInit) -> Self {
        self.init = init;
        self
    }

    /// Stop early once no centroid moves further than `tolerance`.
    pub fn with_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fit using a `StdRng` seeded from `seed`, or from OS entropy when `None`.
    pub fn fit_seeded(&self, vectors: &[FeatureVector], seed: Option<u64>) -> Result<KMeansFit> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.fit_with_rng(vectors, &mut rng)
    }

    /// Fit drawing initial centroids from `rng`.
    pub fn fit_with_rng<R: Rng>(&self, vectors: &[FeatureVector], rng: &mut R) -> Result<KMeansFit> {
        if vectors.is_empty() {
            return Err(AnalyticsError::invalid_input(
                "cannot cluster an empty set of vectors",
            ));
        }
        if self.k == 0 {
            return Err(AnalyticsError::invalid_input(
                "cluster count must be positive",
            ));
        }

        let features: Vec<String> = vectors
            .iter()
            .flat_map(|v| v.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let points: Vec<Vec<f64>> = vectors
            .iter()
            .map(|v| {
                features
                    .iter()
                    .map(|f| v.get(f).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        let mut centroids = match self.init {
            CentroidInit::Uniform => uniform_init(self.k, features.len(), rng),
            CentroidInit::KMeansPlusPlus => plus_plus_init(&points, self.k, rng),
        };

        let mut labels = vec![0usize; points.len()];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            for (label, point) in labels.iter_mut().zip(&points) {
                *label = nearest_centroid(point, &centroids);
            }

            let mut movement: f64 = 0.0;
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f64>> = points
                    .iter()
                    .zip(&labels)
                    .filter(|(_, label)| **label == cluster)
                    .map(|(point, _)| point)
                    .collect();

                if members.is_empty() {
                    // Empty cluster keeps its last centroid.
                    debug!("Cluster {} is empty at iteration {}", cluster, iterations);
                    continue;
                }

                let updated: Vec<f64> = (0..features.len())
                    .map(|dim| members.iter().map(|p| p[dim]).sum::<f64>() / members.len() as f64)
                    .collect();
                movement = movement.max(euclidean_distance(centroid, &updated));
                *centroid = updated;
            }

            if let Some(tolerance) = self.tolerance
                && movement <= tolerance
            {
                debug!(
                    "k-means converged after {} iterations (movement {:.3e})",
                    iterations, movement
                );
                break;
            }
        }

        debug!(
            "k-means finished: k={}, points={}, iterations={}",
            self.k,
            points.len(),
            iterations
        );

        let empty = (0..self.k).filter(|c| !labels.contains(c)).count();
        if empty > 0 {
            warn!("{} of {} clusters ended with no members", empty, self.k);
        }

        let to_vector = |values: &[f64]| -> FeatureVector {
            features.iter().cloned().zip(values.iter().copied()).collect()
        };

        let assignments = vectors
            .iter()
            .zip(&labels)
            .map(|(vector, &cluster)| ClusterAssignment {
                features: vector.clone(),
                cluster,
            })
            .collect();

        Ok(KMeansFit {
            assignments,
            centroids: centroids.iter().map(|c| to_vector(c)).collect(),
            iterations,
        })
    }
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let distance = euclidean_distance(point, centroid);
        if distance < best_distance {
            best = idx;
            best_distance = distance;
        }
    }
    best
}

fn uniform_init<R: Rng>(k: usize, dims: usize, rng: &mut R) -> Vec<Vec<f64>> {
    (0..k)
        .map(|_| (0..dims).map(|_| rng.gen_range(0.0..1.0)).collect())
        .collect()
}

/// k-means++: each further centroid is drawn with probability proportional
/// to its squared distance from the nearest centroid chosen so far.
fn plus_plus_init<R: Rng>(points: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| euclidean_distance(p, c).powi(2))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let chosen = if total <= EPSILON {
            rng.gen_range(0..points.len())
        } else {
            let mut target = rng.gen_range(0.0..total);
            let mut chosen = points.len() - 1;
            for (idx, weight) in weights.iter().enumerate() {
                if target < *weight {
                    chosen = idx;
                    break;
                }
                target -= weight;
            }
            chosen
        };
        centroids.push(points[chosen].clone());
    }

    centroids
}
