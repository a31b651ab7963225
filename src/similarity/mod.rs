//! Signature similarity scoring
//!
//! Distances between signatures are weighted sums of per-histogram
//! distances, each mapped into [0, 1] by the selected [`DistanceMetric`].

pub mod calculator;
pub mod metrics;

pub use calculator::SimilarityCalculator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClassifierError, Result};

/// Histogram distance metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// 1 - Σ min(h1, h2)
    Intersection,
    /// 1 - exp(-χ²)
    ChiSquare,
    /// 1 - exp(-Bhattacharyya)
    #[default]
    Bhattacharyya,
    /// (1 - Pearson r) / 2
    Correlation,
}

impl DistanceMetric {
    pub const ALL: [DistanceMetric; 4] = [
        DistanceMetric::Intersection,
        DistanceMetric::ChiSquare,
        DistanceMetric::Bhattacharyya,
        DistanceMetric::Correlation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Intersection => "intersection",
            DistanceMetric::ChiSquare => "chi_square",
            DistanceMetric::Bhattacharyya => "bhattacharyya",
            DistanceMetric::Correlation => "correlation",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "intersection" => Ok(DistanceMetric::Intersection),
            "chi_square" | "chisquare" => Ok(DistanceMetric::ChiSquare),
            "bhattacharyya" => Ok(DistanceMetric::Bhattacharyya),
            "correlation" => Ok(DistanceMetric::Correlation),
            _ => Err(ClassifierError::invalid("metric", s)),
        }
    }
}

/// Relative importance of the hue, lightness and saturation histograms.
///
/// Components need not sum to 1; [`FeatureWeights::normalize`] is applied
/// before every distance computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub hue: f64,
    pub lightness: f64,
    pub saturation: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            hue: 0.4,
            lightness: 0.4,
            saturation: 0.2,
        }
    }
}

impl FeatureWeights {
    pub fn new(hue: f64, lightness: f64, saturation: f64) -> Self {
        Self {
            hue,
            lightness,
            saturation,
        }
    }

    /// One third each
    pub fn equal() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }

    /// Scale the weights to sum to 1, or fall back to [`FeatureWeights::equal`]
    /// when they sum to zero.
    pub fn normalize(&self) -> Self {
        let sum = self.hue + self.lightness + self.saturation;
        if sum > 0.0 && sum.is_finite() {
            Self::new(self.hue / sum, self.lightness / sum, self.saturation / sum)
        } else {
            Self::equal()
        }
    }
}

/// Square, symmetric, zero-diagonal matrix of pairwise distances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// All-zero matrix over `size` items
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Build from the upper triangle of `distance(i, j)` for `i < j`, mirrored
    pub fn from_fn(size: usize, mut distance: impl FnMut(usize, usize) -> f64) -> Self {
        let mut matrix = Self::zeros(size);
        for i in 0..size {
            for j in (i + 1)..size {
                matrix.set_symmetric(i, j, distance(i, j));
            }
        }
        matrix
    }

    /// Build from explicit rows
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::InvalidParameter` if the rows do not form a
    /// square matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != size) {
            return Err(ClassifierError::invalid(
                "distance_matrix",
                format!("row of length {} in {}x{} matrix", bad.len(), size, size),
            ));
        }
        Ok(Self {
            size,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of items (rows)
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }

    pub(crate) fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
    }
}
