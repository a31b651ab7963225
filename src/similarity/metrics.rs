//! Histogram distance primitives
//!
//! Each function takes two equal-length probability distributions.
//! [`histogram_distance`] maps every metric onto a distance in [0, 1]
//! where 0 means identical.

use crate::constants::similarity::{BHATTACHARYYA_EPSILON, CHI_SQUARE_EPSILON, CORRELATION_EPSILON};
use crate::similarity::DistanceMetric;

/// Histogram intersection: Σ min(h1, h2), a similarity in [0, 1]
pub fn intersection(h1: &[f64], h2: &[f64]) -> f64 {
    h1.iter().zip(h2).map(|(a, b)| a.min(*b)).sum()
}

/// Chi-square distance: Σ (h1 - h2)² / (h1 + h2 + ε), in [0, ∞)
pub fn chi_square(h1: &[f64], h2: &[f64]) -> f64 {
    h1.iter()
        .zip(h2)
        .map(|(a, b)| (a - b).powi(2) / (a + b + CHI_SQUARE_EPSILON))
        .sum()
}

/// Bhattacharyya distance: -ln Σ √(h1·h2), in [0, ∞)
///
/// The coefficient is clamped to [ε, 1] so disjoint histograms give a large
/// finite distance instead of infinity.
pub fn bhattacharyya(h1: &[f64], h2: &[f64]) -> f64 {
    let coefficient: f64 = h1.iter().zip(h2).map(|(a, b)| (a * b).sqrt()).sum();
    -coefficient.clamp(BHATTACHARYYA_EPSILON, 1.0).ln()
}

/// Pearson correlation of the centered histograms, in [-1, 1]
///
/// Returns 0 when either histogram has (near) zero variance.
pub fn correlation(h1: &[f64], h2: &[f64]) -> f64 {
    let n = h1.len().min(h2.len());
    if n == 0 {
        return 0.0;
    }

    let mean1 = h1[..n].iter().sum::<f64>() / n as f64;
    let mean2 = h2[..n].iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut var1 = 0.0;
    let mut var2 = 0.0;
    for (a, b) in h1[..n].iter().zip(&h2[..n]) {
        let c1 = a - mean1;
        let c2 = b - mean2;
        numerator += c1 * c2;
        var1 += c1 * c1;
        var2 += c2 * c2;
    }

    let denominator = (var1 * var2).sqrt();
    if denominator < CORRELATION_EPSILON {
        return 0.0;
    }

    (numerator / denominator).clamp(-1.0, 1.0)
}

/// Distance in [0, 1] between two histograms under `metric`
pub fn histogram_distance(h1: &[f64], h2: &[f64], metric: DistanceMetric) -> f64 {
    let distance = match metric {
        DistanceMetric::Intersection => 1.0 - intersection(h1, h2),
        DistanceMetric::ChiSquare => 1.0 - (-chi_square(h1, h2)).exp(),
        DistanceMetric::Bhattacharyya => 1.0 - (-bhattacharyya(h1, h2)).exp(),
        DistanceMetric::Correlation => (1.0 - correlation(h1, h2)) / 2.0,
    };
    distance.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 4] = [0.1, 0.4, 0.3, 0.2];
    const B: [f64; 4] = [0.25, 0.25, 0.25, 0.25];
    const DISJOINT_1: [f64; 4] = [0.5, 0.5, 0.0, 0.0];
    const DISJOINT_2: [f64; 4] = [0.0, 0.0, 0.5, 0.5];

    #[test]
    fn test_intersection() {
        assert!((intersection(&A, &A) - 1.0).abs() < 1e-12);
        assert!((intersection(&A, &B) - 0.8).abs() < 1e-12);
        assert_eq!(intersection(&DISJOINT_1, &DISJOINT_2), 0.0);
    }

    #[test]
    fn test_chi_square() {
        assert_eq!(chi_square(&A, &A), 0.0);
        // Disjoint mass: each non-zero bin contributes its own value
        assert!((chi_square(&DISJOINT_1, &DISJOINT_2) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_bhattacharyya_guards_disjoint() {
        assert!(bhattacharyya(&A, &A).abs() < 1e-12);
        let d = bhattacharyya(&DISJOINT_1, &DISJOINT_2);
        assert!(d.is_finite());
        assert!((d - (-(1e-10f64).ln())).abs() < 1e-9);
    }

    #[test]
    fn test_correlation() {
        assert!((correlation(&A, &A) - 1.0).abs() < 1e-12);
        assert!((correlation(&DISJOINT_1, &DISJOINT_2) + 1.0).abs() < 1e-12);
        // Flat histogram has zero variance
        assert_eq!(correlation(&A, &B), 0.0);
    }

    #[test]
    fn test_distances_in_unit_range_and_zero_on_self() {
        for metric in DistanceMetric::ALL {
            assert!(histogram_distance(&A, &A, metric).abs() < 1e-9, "{metric}");
            for (x, y) in [(&A, &B), (&DISJOINT_1, &DISJOINT_2), (&B, &DISJOINT_1)] {
                let d = histogram_distance(x, y, metric);
                assert!((0.0..=1.0).contains(&d), "{metric}: {d}");
                assert_eq!(d, histogram_distance(y, x, metric), "{metric} not symmetric");
            }
        }
    }

    #[test]
    fn test_disjoint_mapping_values() {
        assert_eq!(histogram_distance(&DISJOINT_1, &DISJOINT_2, DistanceMetric::Intersection), 1.0);
        assert_eq!(histogram_distance(&DISJOINT_1, &DISJOINT_2, DistanceMetric::Correlation), 1.0);
        let chi = histogram_distance(&DISJOINT_1, &DISJOINT_2, DistanceMetric::ChiSquare);
        assert!((chi - (1.0 - (-2.0f64).exp())).abs() < 1e-6);
    }
}
