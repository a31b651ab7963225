//! Agglomerative clustering of image signatures
//!
//! Clustering works purely on a [`DistanceMatrix`](crate::similarity::DistanceMatrix):
//! Ward linkage builds the dendrogram bottom-up, the dendrogram is cut to a
//! requested (or searched) cluster count, and the cut is scored with the
//! silhouette coefficient.

pub mod adaptive;
pub mod linkage;
pub mod silhouette;

pub use adaptive::AdaptiveClusterer;
pub use linkage::{cut_tree, ward_linkage};
pub use silhouette::silhouette_score;

use serde::{Deserialize, Serialize};

/// One merge of the dendrogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergeRecord {
    /// Surviving cluster id (the smaller index)
    pub left: usize,
    /// Retired cluster id
    pub right: usize,
    /// Ward distance at which the merge happened
    pub distance: f64,
    /// Number of items in the merged cluster
    pub size: usize,
}

/// Outcome of a clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// Label per item, contiguous from 0
    pub labels: Vec<usize>,
    /// Number of distinct labels
    pub n_clusters: usize,
    /// Silhouette coefficient of the labeling, in [-1, 1]
    pub silhouette_score: f64,
    /// Merge history, absent when clustering was never run
    pub dendrogram: Option<Vec<MergeRecord>>,
}

impl ClusterResult {
    /// Every item in one cluster with quality 0
    pub fn trivial(n: usize) -> Self {
        Self {
            labels: vec![0; n],
            n_clusters: usize::from(n > 0),
            silhouette_score: 0.0,
            dendrogram: None,
        }
    }

    /// Item indices per label, in label order
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.n_clusters];
        for (index, &label) in self.labels.iter().enumerate() {
            if label >= groups.len() {
                groups.resize(label + 1, Vec::new());
            }
            groups[label].push(index);
        }
        groups
    }
}

/// Number of distinct labels
pub(crate) fn count_clusters(labels: &[usize]) -> usize {
    let mut seen: Vec<usize> = labels.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
