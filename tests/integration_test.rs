//! Integration tests for the complete classification pipeline
//!
//! These tests exercise the public API end to end:
//! - Signature extraction from synthetic rasters and image files
//! - Distance symmetry and weight normalization
//! - Clustering scenarios with forced and searched cluster counts
//! - Unique cluster naming
//! - Directory classification, file placement and rollback

use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tone_sort::config::ExtractionConfig;
use tone_sort::{
    AdaptiveClusterer, CategoryNamer, ClassificationEngine, ClassifierConfig, DistanceMatrix,
    DistanceMetric, FeatureExtractor, FeatureWeights, ImageSignature, RollbackManager,
    SimilarityCalculator,
};

fn solid(color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(40, 30, Rgb(color))
}

fn extractor() -> FeatureExtractor {
    FeatureExtractor::with_config(ExtractionConfig {
        analysis_width: 50,
        analysis_height: 50,
        ..ExtractionConfig::default()
    })
}

fn signatures(colors: &[[u8; 3]]) -> Vec<ImageSignature> {
    let extractor = extractor();
    colors
        .iter()
        .enumerate()
        .map(|(i, &color)| extractor.extract_rgb(format!("image-{i}"), &solid(color)).unwrap())
        .collect()
}

fn noise(seed: u64) -> RgbImage {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut image = RgbImage::new(30, 30);
    for pixel in image.pixels_mut() {
        *pixel = Rgb([rng.gen(), rng.gen(), rng.gen()]);
    }
    image
}

fn write_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    solid(color).save(&path).unwrap();
    path
}

// ============================================================================
// Signature properties
// ============================================================================

#[test]
fn test_histograms_sum_to_one() {
    let extractor = extractor();
    for seed in 0..5 {
        let signature = extractor.extract_rgb("noise", &noise(seed)).unwrap();
        for hist in [
            &signature.hue_histogram,
            &signature.lightness_histogram,
            &signature.saturation_histogram,
        ] {
            let total: f64 = hist.iter().sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
        let percentages: f64 = signature.dominant_colors.iter().map(|c| c.percentage).sum();
        assert!((percentages - 100.0).abs() < 0.01);
    }
}

#[test]
fn test_single_pixel_image() {
    let signature = FeatureExtractor::new()
        .extract_rgb("dot", &RgbImage::from_pixel(1, 1, Rgb([0, 128, 255])))
        .unwrap();
    let total: f64 = signature.hue_histogram.iter().sum();
    assert!((total - 1.0).abs() < 1e-6);
}

// ============================================================================
// Distances
// ============================================================================

#[test]
fn test_distance_symmetry_for_all_metrics() {
    let extractor = extractor();
    let a = extractor.extract_rgb("a", &noise(1)).unwrap();
    let b = extractor.extract_rgb("b", &noise(2)).unwrap();

    for metric in DistanceMetric::ALL {
        let calculator = SimilarityCalculator::new(FeatureWeights::default(), metric);
        let ab = calculator.distance(&a, &b);
        assert_eq!(ab, calculator.distance(&b, &a));
        assert!((0.0..=1.0).contains(&ab));
        assert!(calculator.distance(&a, &a).abs() < 1e-9);
    }
}

#[test]
fn test_weight_normalization() {
    for (h, l, s) in [(0.0, 0.0, 0.0), (5.0, 0.0, 0.0), (0.3, 0.3, 0.3), (7.0, 2.0, 1.0)] {
        let w = FeatureWeights::new(h, l, s).normalize();
        assert!((w.hue + w.lightness + w.saturation - 1.0).abs() < 1e-6);
    }
    assert_eq!(FeatureWeights::new(0.0, 0.0, 0.0).normalize(), FeatureWeights::equal());
}

// ============================================================================
// Clustering scenarios
// ============================================================================

#[test]
fn test_near_identical_pair_forced_into_one_cluster() {
    let sigs = signatures(&[[255, 0, 0], [254, 1, 1]]);
    let matrix = SimilarityCalculator::default().build_matrix(&sigs);

    let result = AdaptiveClusterer::default().cluster(&matrix, Some(1));
    assert_eq!(result.n_clusters, 1);
    assert_eq!(result.silhouette_score, 0.0);
    assert_eq!(result.labels, vec![0, 0]);
}

#[test]
fn test_red_blue_red_split() {
    let sigs = signatures(&[[255, 0, 0], [0, 0, 255], [255, 0, 0]]);
    let matrix = SimilarityCalculator::default().build_matrix(&sigs);

    let result = AdaptiveClusterer::default().cluster(&matrix, Some(2));
    assert_eq!(result.n_clusters, 2);
    assert_eq!(result.labels[0], result.labels[2]);
    assert_ne!(result.labels[0], result.labels[1]);
}

#[test]
fn test_random_signatures_partition() {
    let extractor = extractor();
    let sigs: Vec<ImageSignature> = (0..10)
        .map(|seed| extractor.extract_rgb(format!("noise-{seed}"), &noise(seed)).unwrap())
        .collect();
    let matrix = SimilarityCalculator::default().build_matrix(&sigs);
    let clusterer = AdaptiveClusterer::default();

    for (k, result) in [
        (Some(3), clusterer.cluster(&matrix, Some(3))),
        (None, clusterer.cluster(&matrix, None)),
    ] {
        assert_eq!(result.labels.len(), 10);
        let distinct: HashSet<usize> = result.labels.iter().copied().collect();
        assert_eq!(distinct.len(), result.n_clusters);
        assert_eq!(distinct, (0..result.n_clusters).collect());
        if let Some(k) = k {
            assert_eq!(result.n_clusters, k);
        }
        assert!((-1.0..=1.0).contains(&result.silhouette_score));
    }
}

#[test]
fn test_single_signature_is_trivial() {
    let result = AdaptiveClusterer::default().cluster(&DistanceMatrix::zeros(1), None);
    assert_eq!(result.n_clusters, 1);
    assert_eq!(result.silhouette_score, 0.0);
    assert!(result.dendrogram.is_none());
}

#[test]
fn test_clustering_is_deterministic() {
    let extractor = extractor();
    let sigs: Vec<ImageSignature> = (0..8)
        .map(|seed| extractor.extract_rgb("n", &noise(seed + 100)).unwrap())
        .collect();
    let calculator = SimilarityCalculator::new(FeatureWeights::default(), DistanceMetric::ChiSquare);

    let first = AdaptiveClusterer::default().cluster(&calculator.build_matrix(&sigs), None);
    let second = AdaptiveClusterer::default().cluster(&calculator.build_matrix(&sigs), None);
    assert_eq!(first, second);
}

// ============================================================================
// Naming
// ============================================================================

#[test]
fn test_name_all_distinct() {
    let sigs = signatures(&[[255, 0, 0], [250, 5, 5], [0, 0, 255], [255, 255, 255]]);
    let groups = vec![
        vec![&sigs[0]],
        vec![&sigs[1]],
        vec![&sigs[2]],
        vec![&sigs[3]],
        vec![&sigs[0], &sigs[1]],
    ];

    let names = CategoryNamer::new().name_all(&groups);
    let distinct: HashSet<&String> = names.iter().collect();
    assert_eq!(distinct.len(), names.len());
    assert!(names[0].starts_with("mid-key-warm-vivid_"));
}

// ============================================================================
// Directory classification
// ============================================================================

#[test]
fn test_classify_directory_with_rollback_log() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let originals = vec![
        write_png(source.path(), "red-a.png", [255, 0, 0]),
        write_png(source.path(), "blue.png", [0, 0, 255]),
        write_png(source.path(), "red-b.png", [255, 0, 0]),
    ];
    std::fs::write(source.path().join("corrupt.jpg"), b"not an image").unwrap();

    let mut config = ClassifierConfig::default();
    config.extraction.analysis_width = 32;
    config.extraction.analysis_height = 32;
    let mut engine = ClassificationEngine::with_config(config);

    let result = engine
        .classify(source.path(), Some(target.path()), Some(2))
        .unwrap();

    assert_eq!(result.total_images, 3);
    assert_eq!(result.n_clusters, 2);
    assert_eq!(result.failed_images, vec![source.path().join("corrupt.jpg")]);
    assert_eq!(result.move_records.len(), 3);
    for path in &originals {
        assert!(!path.exists());
    }

    let log = target.path().join("undo.json");
    engine.rollback_manager().save(&log).unwrap();
    let undo = RollbackManager::load(&log).unwrap().rollback();

    assert_eq!(undo.success_count, 3);
    for path in &originals {
        assert!(path.exists());
    }
}

#[test]
fn test_preview_leaves_files_in_place() {
    let source = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..4u8)
        .map(|i| write_png(source.path(), &format!("{i}.png"), [i * 60, 255 - i * 60, 100]))
        .collect();

    let result = tone_sort::classify_directory(source.path(), None).unwrap();

    assert_eq!(result.total_images, 4);
    assert!(result.move_records.is_empty());
    let members: usize = result.clusters.iter().map(|c| c.member_count).sum();
    assert_eq!(members, 4);
    for path in &paths {
        assert!(path.exists());
    }
}
