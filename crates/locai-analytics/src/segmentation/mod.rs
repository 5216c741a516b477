//! Customer segmentation.
//!
//! Records are reduced to the configured features, min-max normalized, and
//! clustered with [`KMeans`]. Centroid initialisation is the only random
//! step; pass a seed (or an explicit RNG) for reproducible segments.

mod kmeans;

pub use kmeans::{KMeans, KMeansFit};

use crate::config::SegmentationConfig;
use crate::error::Result;
use crate::features::{FeatureNormalizer, FeatureSource};
use crate::types::{ClusterAssignment, FeatureVector};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Clusters of a record population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// One assignment per input record, in input order.
    pub assignments: Vec<ClusterAssignment>,
    /// Final centroids in normalized feature space.
    pub centroids: Vec<FeatureVector>,
    /// Members per cluster, indexed by cluster id (length k).
    pub cluster_sizes: Vec<usize>,
    pub iterations: usize,
}

impl SegmentationResult {
    fn from_fit(fit: KMeansFit, k: usize) -> Self {
        let mut cluster_sizes = vec![0; k];
        for assignment in &fit.assignments {
            cluster_sizes[assignment.cluster] += 1;
        }
        Self {
            assignments: fit.assignments,
            centroids: fit.centroids,
            cluster_sizes,
            iterations: fit.iterations,
        }
    }

    /// Largest cluster as `(cluster id, size)`; ties go to the lowest id.
    pub fn dominant_cluster(&self) -> Option<(usize, usize)> {
        self.cluster_sizes
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (idx, size)| match best {
                Some((_, best_size)) if best_size >= size => best,
                _ => Some((idx, size)),
            })
    }
}

/// Normalizes records and clusters them.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    fn kmeans(&self) -> KMeans {
        KMeans::new(self.config.clusters)
            .with_max_iterations(self.config.max_iterations)
            .with_init(self.config.init)
            .with_tolerance(self.config.tolerance)
    }

    /// Segment `records`, seeding the RNG from the configured seed.
    pub fn segment<R: FeatureSource>(&self, records: &[R]) -> Result<SegmentationResult> {
        let vectors = FeatureNormalizer::normalize(records, &self.config.features)?;
        debug!(
            "Segmenting {} records into {} clusters",
            vectors.len(),
            self.config.clusters
        );
        let fit = self.kmeans().fit_seeded(&vectors, self.config.seed)?;
        Ok(SegmentationResult::from_fit(fit, self.config.clusters))
    }

    /// Segment `records` drawing initial centroids from `rng`.
    pub fn segment_with_rng<R, G>(&self, records: &[R], rng: &mut G) -> Result<SegmentationResult>
    where
        R: FeatureSource,
        G: Rng,
    {
        let vectors = FeatureNormalizer::normalize(records, &self.config.features)?;
        let fit = self.kmeans().fit_with_rng(&vectors, rng)?;
        Ok(SegmentationResult::from_fit(fit, self.config.clusters))
    }
}
