//! # Tone Sort
//!
//! A Rust crate for grouping photographs by their color character.
//!
//! This library sorts a folder of images into named categories by:
//! - Summarizing each image as hue, lightness and saturation histograms
//!   plus a dominant-color palette and a tonal class
//! - Comparing signatures with weighted histogram distances
//! - Clustering with Ward linkage, choosing the cluster count by silhouette
//! - Naming each cluster after its tone, hue family and saturation
//! - Optionally moving the files into one folder per cluster, with undo
//!
//! ## Example
//!
//! ```rust,no_run
//! use tone_sort::classify_directory;
//! use std::path::Path;
//!
//! let result = classify_directory(Path::new("photos"), None)?;
//! for cluster in &result.clusters {
//!     println!("{}: {} images", cluster.name, cluster.member_count);
//! }
//! # Ok::<(), tone_sort::ClassifierError>(())
//! ```

use std::path::Path;

pub mod clustering;
pub mod color;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod features;
pub mod image_loader;
pub mod naming;
pub mod placement;
pub mod scanner;
pub mod similarity;

pub use clustering::{AdaptiveClusterer, ClusterResult, MergeRecord};
pub use color::HistogramAnalyzer;
pub use config::ClassifierConfig;
pub use engine::{ClassificationEngine, ClassificationResult};
pub use error::{ClassifierError, Result};
pub use features::{DominantColor, FeatureExtractor, ImageSignature, LightnessStats, TonalClass};
pub use naming::{CategoryNamer, ClusterInfo, HueCategory, SaturationLevel};
pub use placement::{CategoryManager, MoveRecord, RollbackManager, RollbackResult};
pub use scanner::{ImageScanner, ScanResult};
pub use similarity::{DistanceMatrix, DistanceMetric, FeatureWeights, SimilarityCalculator};

/// Classify the images under a directory without moving them
///
/// Uses the default configuration. `k` forces the cluster count; `None`
/// searches for the best one.
///
/// # Errors
///
/// Returns `ClassifierError` if:
/// - The directory does not exist, is a file, or cannot be read
pub fn classify_directory(source: &Path, k: Option<usize>) -> Result<ClassificationResult> {
    ClassificationEngine::new().preview(source, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classification_result_serialization() {
        let result = ClassificationResult {
            clusters: vec![ClusterInfo {
                id: 0,
                name: "high-key-warm-vivid".to_string(),
                members: vec!["a.jpg".to_string(), "b.jpg".to_string()],
                tonal_class: TonalClass::HighKey,
                hue_category: HueCategory::Warm,
                saturation_level: SaturationLevel::Vivid,
                member_count: 2,
            }],
            n_clusters: 1,
            silhouette_score: 0.0,
            total_images: 2,
            failed_images: vec![PathBuf::from("broken.jpg")],
            processing_time: 0.25,
            move_records: Vec::new(),
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"high-key\""));
        let deserialized: ClassificationResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
    }

    #[test]
    fn test_classify_missing_directory() {
        let err = classify_directory(Path::new("no/such/dir"), None).unwrap_err();
        assert!(matches!(err, ClassifierError::PathNotFound { .. }));
    }
}
