use rayon::prelude::*;

use crate::config::SimilarityConfig;
use crate::features::ImageSignature;
use crate::similarity::metrics::histogram_distance;
use crate::similarity::{DistanceMatrix, DistanceMetric, FeatureWeights};

/// Weighted composite distance between image signatures
#[derive(Debug, Clone, Default)]
pub struct SimilarityCalculator {
    weights: FeatureWeights,
    metric: DistanceMetric,
}

impl SimilarityCalculator {
    pub fn new(weights: FeatureWeights, metric: DistanceMetric) -> Self {
        Self { weights, metric }
    }

    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(config.weights, config.metric)
    }

    pub fn weights(&self) -> FeatureWeights {
        self.weights
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn set_weights(&mut self, weights: FeatureWeights) {
        self.weights = weights;
    }

    pub fn set_metric(&mut self, metric: DistanceMetric) {
        self.metric = metric;
    }

    /// Distance in [0, 1] under the configured metric
    pub fn distance(&self, a: &ImageSignature, b: &ImageSignature) -> f64 {
        self.distance_with(a, b, self.metric)
    }

    /// Distance in [0, 1] under an explicit metric.
    ///
    /// The metric is applied to the hue, lightness and saturation histograms
    /// independently and the results combined with the normalized weights.
    pub fn distance_with(&self, a: &ImageSignature, b: &ImageSignature, metric: DistanceMetric) -> f64 {
        let w = self.weights.normalize();

        let hue = histogram_distance(&a.hue_histogram, &b.hue_histogram, metric);
        let lightness = histogram_distance(&a.lightness_histogram, &b.lightness_histogram, metric);
        let saturation = histogram_distance(&a.saturation_histogram, &b.saturation_histogram, metric);

        (w.hue * hue + w.lightness * lightness + w.saturation * saturation).clamp(0.0, 1.0)
    }

    /// 1 - distance
    pub fn similarity(&self, a: &ImageSignature, b: &ImageSignature) -> f64 {
        1.0 - self.distance(a, b)
    }

    /// All-pairs distance matrix over `signatures`.
    ///
    /// Rows of the upper triangle are computed in parallel; each pair is
    /// evaluated once and mirrored.
    pub fn build_matrix(&self, signatures: &[ImageSignature]) -> DistanceMatrix {
        let n = signatures.len();

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| self.distance(&signatures[i], &signatures[j]))
                    .collect()
            })
            .collect();

        DistanceMatrix::from_fn(n, |i, j| upper[i][j - i - 1])
    }
}
