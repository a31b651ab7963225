//! Ward linkage and dendrogram cutting

use crate::clustering::MergeRecord;
use crate::similarity::DistanceMatrix;

/// Build the full Ward dendrogram over `matrix`.
///
/// Every item starts as its own cluster whose id is its index. Each of the
/// `N - 1` steps merges the closest active pair (first pair in ascending
/// `(i, j)` order on ties), keeps id `i` and retires id `j`. Distances from
/// the merged cluster follow the Lance-Williams form of Ward's rule.
pub fn ward_linkage(matrix: &DistanceMatrix) -> Vec<MergeRecord> {
    let n = matrix.len();
    if n < 2 {
        return Vec::new();
    }

    let mut dist = matrix.to_rows();
    let mut sizes = vec![1usize; n];
    let mut active = vec![true; n];
    let mut merges = Vec::with_capacity(n - 1);

    for _ in 0..n - 1 {
        let Some((i, j, d_ij)) = closest_pair(&dist, &active) else {
            break;
        };

        let (n_i, n_j) = (sizes[i] as f64, sizes[j] as f64);
        for k in 0..n {
            if !active[k] || k == i || k == j {
                continue;
            }
            let n_k = sizes[k] as f64;
            let d_ik = dist[i][k];
            let d_jk = dist[j][k];
            let numerator = (n_i + n_k) * d_ik * d_ik + (n_j + n_k) * d_jk * d_jk - n_k * d_ij * d_ij;
            let updated = (numerator / (n_i + n_j + n_k)).max(0.0).sqrt();
            dist[i][k] = updated;
            dist[k][i] = updated;
        }

        sizes[i] += sizes[j];
        active[j] = false;

        merges.push(MergeRecord {
            left: i,
            right: j,
            distance: d_ij,
            size: sizes[i],
        });
    }

    merges
}

fn closest_pair(dist: &[Vec<f64>], active: &[bool]) -> Option<(usize, usize, f64)> {
    let n = dist.len();
    let mut best: Option<(usize, usize, f64)> = None;
    let mut best_distance = f64::INFINITY;

    for i in 0..n {
        if !active[i] {
            continue;
        }
        for j in (i + 1)..n {
            if active[j] && dist[i][j] < best_distance {
                best_distance = dist[i][j];
                best = Some((i, j, dist[i][j]));
            }
        }
    }

    best
}

/// Labels obtained by applying the first `n - k` merges.
///
/// Each merge unions the two touched labels into the smaller label value;
/// the surviving labels are then renumbered `0..k` in order of first
/// appearance.
pub fn cut_tree(n: usize, merges: &[MergeRecord], k: usize) -> Vec<usize> {
    let mut labels: Vec<usize> = (0..n).collect();
    let steps = n.saturating_sub(k).min(merges.len());

    for merge in &merges[..steps] {
        let a = labels[merge.left];
        let b = labels[merge.right];
        let (keep, replace) = if a <= b { (a, b) } else { (b, a) };
        for label in labels.iter_mut() {
            if *label == replace {
                *label = keep;
            }
        }
    }

    renumber(&labels)
}

fn renumber(labels: &[usize]) -> Vec<usize> {
    let mut mapping: Vec<(usize, usize)> = Vec::new();
    labels
        .iter()
        .map(|&label| match mapping.iter().find(|(old, _)| *old == label) {
            Some(&(_, new)) => new,
            None => {
                let new = mapping.len();
                mapping.push((label, new));
                new
            }
        })
        .collect()
}
