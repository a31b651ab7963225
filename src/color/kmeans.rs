//! Seeded k-means over 3-component color points
//!
//! Used to find dominant colors in the Lab pixel array. Initialization
//! samples `k` distinct pixels with a ChaCha8 generator seeded by the
//! caller, so the same raster and seed always produce the same palette.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::extraction::{KMEANS_ABSOLUTE_TOLERANCE, KMEANS_RELATIVE_TOLERANCE};

/// Outcome of a k-means run
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Final centroids; `centroids.len()` is the effective k
    pub centroids: Vec<[f64; 3]>,
    /// Centroid index of every input point
    pub labels: Vec<usize>,
    /// Assignment passes performed
    pub iterations: usize,
}

impl KMeansResult {
    /// Number of points assigned to each centroid
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}

/// Partition `points` into at most `k` clusters.
///
/// `k` is reduced to the number of points when there are fewer points than
/// requested clusters. Iteration stops once no centroid moves beyond the
/// tolerance or after `max_iters` passes. A centroid that loses all of its
/// members keeps its previous position.
pub fn kmeans(points: &[[f64; 3]], k: usize, max_iters: usize, seed: u64) -> KMeansResult {
    let n = points.len();
    let k = k.min(n);

    if k == 0 {
        return KMeansResult {
            centroids: Vec::new(),
            labels: Vec::new(),
            iterations: 0,
        };
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // 1. Sample initial centers without replacement
    let mut centroids: Vec<[f64; 3]> = points.choose_multiple(&mut rng, k).copied().collect();

    let mut labels = vec![0usize; n];
    let mut iterations = 0;

    for _ in 0..max_iters {
        iterations += 1;

        // 2. Assign each point to its nearest centroid
        for (label, point) in labels.iter_mut().zip(points) {
            *label = nearest_centroid(&centroids, point);
        }

        // 3. Recompute centroids
        let updated = recompute_centroids(points, &labels, &centroids);

        if centroids_converged(&centroids, &updated) {
            break;
        }
        centroids = updated;
    }

    KMeansResult {
        centroids,
        labels,
        iterations,
    }
}

/// Index of the closest centroid by squared Euclidean distance; first wins ties
fn nearest_centroid(centroids: &[[f64; 3]], point: &[f64; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (idx, center) in centroids.iter().enumerate() {
        let dist = squared_distance(center, point);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }

    best
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (0..3).map(|c| (a[c] - b[c]).powi(2)).sum()
}

fn recompute_centroids(points: &[[f64; 3]], labels: &[usize], previous: &[[f64; 3]]) -> Vec<[f64; 3]> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        for c in 0..3 {
            sums[label][c] += point[c];
        }
        counts[label] += 1;
    }

    sums.iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count == 0 {
                *prev
            } else {
                let n = count as f64;
                [sum[0] / n, sum[1] / n, sum[2] / n]
            }
        })
        .collect()
}

fn centroids_converged(old: &[[f64; 3]], new: &[[f64; 3]]) -> bool {
    old.iter().zip(new).all(|(a, b)| {
        (0..3).all(|c| {
            (a[c] - b[c]).abs() <= KMEANS_ABSOLUTE_TOLERANCE + KMEANS_RELATIVE_TOLERANCE * b[c].abs()
        })
    })
}
