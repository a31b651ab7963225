//! Configuration structures for the classification pipeline.
//!
//! This module defines all tunable parameters, organized into logical
//! groups for feature extraction, similarity scoring, clustering and naming.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use tone_sort::ClassifierConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = ClassifierConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = ClassifierConfig::default();
//! # Ok::<(), tone_sort::ClassifierError>(())
//! ```
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{clustering, extraction, naming};
use crate::error::{ClassifierError, Result};
use crate::similarity::{DistanceMetric, FeatureWeights};

/// Complete pipeline configuration.
///
/// Read once at the start of each run; never mutated while a run is in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Feature extraction configuration
    pub extraction: ExtractionConfig,

    /// Distance computation configuration
    pub similarity: SimilarityConfig,

    /// Cluster-count search configuration
    pub clustering: ClusteringConfig,

    /// Category naming configuration
    pub naming: NamingConfig,
}

/// Feature extraction parameters.
///
/// Controls the analysis raster size, tonal thresholds and the
/// dominant-color k-means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Width of the resampled analysis raster
    pub analysis_width: u32,

    /// Height of the resampled analysis raster
    pub analysis_height: u32,

    /// Number of dominant colors to extract
    pub dominant_colors: usize,

    /// Mean lightness above which an image is high-key (0-255)
    pub high_key_threshold: f64,

    /// Mean lightness below which an image is low-key (0-255)
    pub low_key_threshold: f64,

    /// K-means iteration cap
    pub kmeans_max_iterations: usize,

    /// K-means sampling seed
    pub kmeans_seed: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            analysis_width: extraction::ANALYSIS_WIDTH,
            analysis_height: extraction::ANALYSIS_HEIGHT,
            dominant_colors: extraction::DOMINANT_COLORS,
            high_key_threshold: extraction::HIGH_KEY_THRESHOLD,
            low_key_threshold: extraction::LOW_KEY_THRESHOLD,
            kmeans_max_iterations: extraction::KMEANS_MAX_ITERATIONS,
            kmeans_seed: extraction::KMEANS_SEED,
        }
    }
}

/// Similarity parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Per-histogram weights (normalized before use)
    pub weights: FeatureWeights,

    /// Histogram distance metric
    pub metric: DistanceMetric,
}

/// Cluster-count bounds for the automatic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Smallest cluster count considered (raised to 2 during the search)
    pub min_clusters: usize,

    /// Largest cluster count considered (lowered to N-1 during the search)
    pub max_clusters: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_clusters: clustering::MIN_CLUSTERS,
            max_clusters: clustering::MAX_CLUSTERS,
        }
    }
}

/// Naming thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Mean saturation at or above which a cluster is vivid
    pub vivid_threshold: f64,

    /// Mean saturation at or above which a cluster is moderate
    pub moderate_threshold: f64,

    /// Mean saturation at or above which a cluster is muted
    pub muted_threshold: f64,

    /// Winning hue mass below which a cluster is neutral
    pub low_chroma_threshold: f64,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            vivid_threshold: naming::VIVID_SATURATION_THRESHOLD,
            moderate_threshold: naming::MODERATE_SATURATION_THRESHOLD,
            muted_threshold: naming::MUTED_SATURATION_THRESHOLD,
            low_chroma_threshold: naming::LOW_CHROMA_THRESHOLD,
        }
    }
}

impl ClassifierConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::config(format!("cannot read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ClassifierError::config(format!("cannot parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassifierError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            ClassifierError::config(format!("cannot write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let ex = &self.extraction;
        if ex.analysis_width == 0 || ex.analysis_height == 0 {
            return Err(ClassifierError::invalid(
                "analysis_size",
                format!("{}x{}", ex.analysis_width, ex.analysis_height),
            ));
        }
        if ex.dominant_colors == 0 {
            return Err(ClassifierError::invalid("dominant_colors", 0));
        }
        if ex.kmeans_max_iterations == 0 {
            return Err(ClassifierError::invalid("kmeans_max_iterations", 0));
        }
        if ex.low_key_threshold > ex.high_key_threshold {
            return Err(ClassifierError::invalid(
                "low_key_threshold",
                format!("{} > high_key_threshold {}", ex.low_key_threshold, ex.high_key_threshold),
            ));
        }

        let w = &self.similarity.weights;
        for (name, value) in [("hue", w.hue), ("lightness", w.lightness), ("saturation", w.saturation)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ClassifierError::invalid(format!("weights.{name}"), value));
            }
        }

        let cl = &self.clustering;
        if cl.min_clusters == 0 {
            return Err(ClassifierError::invalid("min_clusters", 0));
        }
        if cl.min_clusters > cl.max_clusters {
            return Err(ClassifierError::invalid(
                "min_clusters",
                format!("{} > max_clusters {}", cl.min_clusters, cl.max_clusters),
            ));
        }

        let nm = &self.naming;
        if !(nm.muted_threshold <= nm.moderate_threshold && nm.moderate_threshold <= nm.vivid_threshold) {
            return Err(ClassifierError::invalid(
                "saturation_thresholds",
                format!("{}/{}/{}", nm.muted_threshold, nm.moderate_threshold, nm.vivid_threshold),
            ));
        }

        Ok(())
    }
}
