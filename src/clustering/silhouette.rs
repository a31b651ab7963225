use crate::clustering::count_clusters;
use crate::similarity::DistanceMatrix;

/// Mean silhouette coefficient of `labels` under `matrix`.
///
/// For item i, `a` is the mean distance to the other members of its cluster
/// (0 when alone) and `b` the smallest mean distance to any other cluster.
/// The item scores `(b - a) / max(a, b)`, or 0 when both are 0. A labeling
/// with one cluster, or with every item alone, scores 0.
pub fn silhouette_score(matrix: &DistanceMatrix, labels: &[usize]) -> f64 {
    let n = labels.len();
    let k = count_clusters(labels);
    if k <= 1 || k == n {
        return 0.0;
    }

    let label_count = labels.iter().max().map_or(0, |&max| max + 1);
    let mut sizes = vec![0usize; label_count];
    for &label in labels {
        sizes[label] += 1;
    }

    let mut total = 0.0;
    let mut sums = vec![0.0; label_count];
    for i in 0..n {
        sums.iter_mut().for_each(|s| *s = 0.0);
        for (j, &label) in labels.iter().enumerate() {
            if j != i {
                sums[label] += matrix.get(i, j);
            }
        }

        let own = labels[i];
        let a = if sizes[own] > 1 {
            sums[own] / (sizes[own] - 1) as f64
        } else {
            0.0
        };

        let b = (0..label_count)
            .filter(|&label| label != own && sizes[label] > 0)
            .map(|label| sums[label] / sizes[label] as f64)
            .fold(f64::INFINITY, f64::min);

        let denominator = a.max(b);
        if denominator > 0.0 && denominator.is_finite() {
            total += (b - a) / denominator;
        }
    }

    total / n as f64
}
