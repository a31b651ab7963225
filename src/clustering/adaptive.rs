//! Cluster-count selection

use tracing::{debug, warn};

use crate::clustering::{count_clusters, cut_tree, silhouette_score, ward_linkage, ClusterResult, MergeRecord};
use crate::config::ClusteringConfig;
use crate::constants::clustering::{MAX_CLUSTERS, MIN_CLUSTERS};
use crate::similarity::DistanceMatrix;

/// Ward clustering with an optional silhouette search over the cluster count.
///
/// Holds only the search bounds; every call to [`AdaptiveClusterer::cluster`]
/// is independent.
#[derive(Debug, Clone)]
pub struct AdaptiveClusterer {
    min_clusters: usize,
    max_clusters: usize,
}

impl Default for AdaptiveClusterer {
    fn default() -> Self {
        Self::new(MIN_CLUSTERS, MAX_CLUSTERS)
    }
}

impl AdaptiveClusterer {
    pub fn new(min_clusters: usize, max_clusters: usize) -> Self {
        Self {
            min_clusters,
            max_clusters,
        }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(config.min_clusters, config.max_clusters)
    }

    pub fn set_range(&mut self, min_clusters: usize, max_clusters: usize) {
        self.min_clusters = min_clusters;
        self.max_clusters = max_clusters;
    }

    pub fn range(&self) -> (usize, usize) {
        (self.min_clusters, self.max_clusters)
    }

    /// Cluster the items of `matrix` into `k` groups, or into the searched
    /// best count when `k` is `None`.
    ///
    /// Fewer than two items, or an explicit `k` outside `[1, N]`, give a
    /// single cluster with quality 0. An empty matrix has no labels and
    /// reports `n_clusters == 0`.
    pub fn cluster(&self, matrix: &DistanceMatrix, k: Option<usize>) -> ClusterResult {
        let n = matrix.len();
        if n < 2 {
            return ClusterResult::trivial(n);
        }

        let merges = ward_linkage(matrix);

        let (labels, score) = match k {
            Some(k) if k < 1 || k > n => {
                warn!(k, n, "requested cluster count out of range, using a single cluster");
                return ClusterResult {
                    dendrogram: Some(merges),
                    ..ClusterResult::trivial(n)
                };
            }
            Some(k) => {
                let labels = cut_tree(n, &merges, k);
                let score = silhouette_score(matrix, &labels);
                (labels, score)
            }
            None => self.search(matrix, &merges),
        };

        debug!(n, n_clusters = count_clusters(&labels), score, "clustering finished");

        ClusterResult {
            n_clusters: count_clusters(&labels),
            labels,
            silhouette_score: score,
            dendrogram: Some(merges),
        }
    }

    /// Try every k in the clamped search range, keep the first best score
    fn search(&self, matrix: &DistanceMatrix, merges: &[MergeRecord]) -> (Vec<usize>, f64) {
        let n = matrix.len();
        let low = self.min_clusters.max(2);
        let high = self.max_clusters.min(n - 1);

        if low > high {
            let k = low.min(n);
            debug!(k, n, "empty cluster search range");
            return (cut_tree(n, merges, k), 0.0);
        }

        let mut best: Option<(Vec<usize>, f64)> = None;
        for k in low..=high {
            let labels = cut_tree(n, merges, k);
            let score = silhouette_score(matrix, &labels);
            debug!(k, score, "scored cluster count");

            if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
                best = Some((labels, score));
            }
        }

        best.unwrap_or_else(|| (vec![0; n], 0.0))
    }
}
