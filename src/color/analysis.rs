//! Histogram construction and tonal analysis
//!
//! Turns discretized channel values into probability histograms and
//! derives lightness statistics and tonal classes from them:
//! - Per-channel normalized histograms (mass divided by pixel count)
//! - Mean / standard deviation / skewness of a raw 8-bit channel
//! - High-, mid- and low-key classification against two thresholds
//! - Histogram-only statistics (contrast, dynamic range) for callers that
//!   kept the lightness histogram but not the pixels

use crate::constants::extraction::{HIGH_KEY_THRESHOLD, LOW_KEY_THRESHOLD};
use crate::features::{LightnessStats, TonalClass};

/// Build a histogram of 8-bit `values` over `bins` unit-width bins,
/// normalized by the number of values.
///
/// Values at or above `bins` are not counted. An empty input yields an
/// all-zero histogram.
pub fn normalized_histogram(values: &[u8], bins: usize) -> Vec<f64> {
    let mut hist = vec![0.0f64; bins];
    if values.is_empty() {
        return hist;
    }

    for &v in values {
        if let Some(slot) = hist.get_mut(v as usize) {
            *slot += 1.0;
        }
    }

    let total = values.len() as f64;
    for slot in &mut hist {
        *slot /= total;
    }
    hist
}

/// Population mean, standard deviation and skewness of an 8-bit channel
pub fn channel_stats(values: &[u8]) -> LightnessStats {
    if values.is_empty() {
        return LightnessStats::default();
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    let skewness = if std > 0.0 {
        values.iter().map(|&v| ((v as f64 - mean) / std).powi(3)).sum::<f64>() / n
    } else {
        0.0
    };

    LightnessStats { mean, std, skewness }
}

/// Mean of an 8-bit channel, 0 for an empty channel
pub fn channel_mean(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

/// Classify a mean lightness (0-255) against the high/low key thresholds
pub fn classify_tonal(lightness_mean: f64, high_key: f64, low_key: f64) -> TonalClass {
    if lightness_mean > high_key {
        TonalClass::HighKey
    } else if lightness_mean < low_key {
        TonalClass::LowKey
    } else {
        TonalClass::MidKey
    }
}

/// Tonal analysis computed from a normalized lightness histogram
pub struct HistogramAnalyzer {
    high_key_threshold: f64,
    low_key_threshold: f64,
}

impl Default for HistogramAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramAnalyzer {
    /// Create an analyzer with the default 170 / 85 thresholds
    pub fn new() -> Self {
        Self {
            high_key_threshold: HIGH_KEY_THRESHOLD,
            low_key_threshold: LOW_KEY_THRESHOLD,
        }
    }

    /// Create an analyzer with custom thresholds
    pub fn with_thresholds(high_key_threshold: f64, low_key_threshold: f64) -> Self {
        Self {
            high_key_threshold,
            low_key_threshold,
        }
    }

    /// Classify tone from the histogram-weighted mean lightness
    pub fn classify_tonal_range(&self, lightness_hist: &[f64]) -> TonalClass {
        let mean = self.compute_lightness_stats(lightness_hist).mean;
        classify_tonal(mean, self.high_key_threshold, self.low_key_threshold)
    }

    /// Weighted mean, standard deviation and skewness using bin centers
    pub fn compute_lightness_stats(&self, lightness_hist: &[f64]) -> LightnessStats {
        let centers = bin_centers(lightness_hist.len());

        let mean: f64 = lightness_hist.iter().zip(&centers).map(|(p, c)| p * c).sum();
        let variance: f64 = lightness_hist
            .iter()
            .zip(&centers)
            .map(|(p, c)| p * (c - mean).powi(2))
            .sum();
        let std = variance.sqrt();

        let skewness = if std > 0.0 {
            lightness_hist
                .iter()
                .zip(&centers)
                .map(|(p, c)| p * ((c - mean) / std).powi(3))
                .sum()
        } else {
            0.0
        };

        LightnessStats { mean, std, skewness }
    }

    /// Contrast as the standard deviation of the lightness distribution
    pub fn compute_contrast(&self, lightness_hist: &[f64]) -> f64 {
        self.compute_lightness_stats(lightness_hist).std
    }

    /// Distance between the lightness values at two CDF percentiles (0-100)
    pub fn compute_dynamic_range(&self, lightness_hist: &[f64], percentile_low: f64, percentile_high: f64) -> f64 {
        let bins = lightness_hist.len();
        if bins == 0 {
            return 0.0;
        }

        let mut cdf = Vec::with_capacity(bins);
        let mut running = 0.0;
        for p in lightness_hist {
            running += p;
            cdf.push(running);
        }

        let width = 256.0 / bins as f64;
        let value_at = |percentile: f64| {
            let target = percentile / 100.0;
            let idx = cdf.partition_point(|&c| c < target).min(bins - 1);
            idx as f64 * width
        };

        value_at(percentile_high) - value_at(percentile_low)
    }
}

fn bin_centers(bins: usize) -> Vec<f64> {
    let width = 256.0 / bins.max(1) as f64;
    (0..bins).map(|i| i as f64 * width + width / 2.0).collect()
}
