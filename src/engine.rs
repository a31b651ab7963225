//! End-to-end classification of an image directory
//!
//! [`ClassificationEngine`] runs the stages in order:
//! scan, extract (parallel), distance matrix, cluster, name, and optionally
//! move the files into one folder per cluster. Extraction is the only stage
//! that observes the cancel flag; once clustering starts the run completes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::clustering::{AdaptiveClusterer, ClusterResult};
use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, Result};
use crate::features::{FeatureExtractor, ImageSignature};
use crate::naming::{CategoryNamer, ClusterInfo};
use crate::placement::{CategoryManager, MoveRecord, RollbackManager, RollbackResult};
use crate::scanner::ImageScanner;
use crate::similarity::{DistanceMetric, FeatureWeights, SimilarityCalculator};

/// Progress sink: `(current, total, message)`
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Signatures extracted from a batch, in input order
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub signatures: Vec<ImageSignature>,
    /// Source file of each signature, index for index
    pub paths: Vec<PathBuf>,
    /// Images that could not be decoded
    pub failed: Vec<PathBuf>,
}

/// Outcome of a classification run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub clusters: Vec<ClusterInfo>,
    pub n_clusters: usize,
    pub silhouette_score: f64,
    /// Images that made it into a cluster
    pub total_images: usize,
    /// Images skipped by the scanner or the extractor
    pub failed_images: Vec<PathBuf>,
    /// Wall-clock seconds
    pub processing_time: f64,
    /// Moves performed, empty for a preview
    pub move_records: Vec<MoveRecord>,
}

/// Orchestrates a full classification run
pub struct ClassificationEngine {
    config: ClassifierConfig,
    scanner: ImageScanner,
    extractor: FeatureExtractor,
    calculator: SimilarityCalculator,
    clusterer: AdaptiveClusterer,
    namer: CategoryNamer,
    rollback: RollbackManager,
    progress: Option<ProgressCallback>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationEngine {
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            scanner: ImageScanner::new(),
            extractor: FeatureExtractor::with_config(config.extraction.clone()),
            calculator: SimilarityCalculator::from_config(&config.similarity),
            clusterer: AdaptiveClusterer::from_config(&config.clustering),
            namer: CategoryNamer::with_config(config.naming.clone()),
            rollback: RollbackManager::new(),
            progress: None,
            cancel: None,
            config,
        }
    }

    /// Report progress through `callback`
    pub fn with_progress(mut self, callback: impl Fn(usize, usize, &str) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Abort extraction once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn set_feature_weights(&mut self, weights: FeatureWeights) {
        self.config.similarity.weights = weights;
        self.calculator.set_weights(weights);
    }

    pub fn set_distance_metric(&mut self, metric: DistanceMetric) {
        self.config.similarity.metric = metric;
        self.calculator.set_metric(metric);
    }

    pub fn set_cluster_range(&mut self, min_clusters: usize, max_clusters: usize) {
        self.config.clustering.min_clusters = min_clusters;
        self.config.clustering.max_clusters = max_clusters;
        self.clusterer.set_range(min_clusters, max_clusters);
    }

    /// Undo log of every move made by this engine
    pub fn rollback_manager(&self) -> &RollbackManager {
        &self.rollback
    }

    /// Revert every move made by this engine
    pub fn rollback(&mut self) -> RollbackResult {
        self.rollback.rollback()
    }

    /// Extract signatures for `paths` in parallel.
    ///
    /// Unreadable images are logged and listed in
    /// [`ExtractionOutcome::failed`]; the rest keep the order of `paths`.
    ///
    /// # Errors
    ///
    /// `ClassifierError::Cancelled` if the cancel flag was raised.
    pub fn extract_all(&self, paths: &[PathBuf]) -> Result<ExtractionOutcome> {
        let total = paths.len();
        let done = AtomicUsize::new(0);

        let results: Vec<Option<Result<ImageSignature>>> = paths
            .par_iter()
            .map(|path| {
                if self.is_cancelled() {
                    return None;
                }
                let result = self.extractor.extract(path);
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                self.report(current, total, &format!("extracting {}", display_name(path)));
                Some(result)
            })
            .collect();

        if self.is_cancelled() {
            info!(completed = done.load(Ordering::Relaxed), total, "extraction cancelled");
            return Err(ClassifierError::Cancelled);
        }

        let mut outcome = ExtractionOutcome::default();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Some(Ok(signature)) => {
                    outcome.signatures.push(signature);
                    outcome.paths.push(path.clone());
                }
                Some(Err(e)) if e.is_recoverable() => {
                    warn!(path = %path.display(), error = %e, "skipping image");
                    outcome.failed.push(path.clone());
                }
                Some(Err(e)) => return Err(e),
                None => return Err(ClassifierError::Cancelled),
            }
        }

        Ok(outcome)
    }

    /// Cluster and name already extracted signatures
    pub fn cluster_signatures(
        &self,
        signatures: &[ImageSignature],
        k: Option<usize>,
    ) -> (ClusterResult, Vec<ClusterInfo>) {
        let result = if signatures.len() < 2 {
            ClusterResult::trivial(signatures.len())
        } else {
            self.report(0, 100, "computing distances");
            let matrix = self.calculator.build_matrix(signatures);
            self.report(0, 100, "clustering");
            self.clusterer.cluster(&matrix, k)
        };

        self.report(0, 100, "naming clusters");
        let clusters = self.namer.describe_clusters(signatures, &result);
        (result, clusters)
    }

    /// Classify every image under `source`, moving them below `target` when
    /// one is given.
    ///
    /// # Errors
    ///
    /// Scanner errors for `source`, or `Cancelled`. Individual images that
    /// fail to decode or move are skipped.
    pub fn classify(
        &mut self,
        source: &Path,
        target: Option<&Path>,
        k: Option<usize>,
    ) -> Result<ClassificationResult> {
        let start = Instant::now();

        self.report(0, 100, "scanning images");
        let scan = self.scanner.scan(source)?;
        info!(
            found = scan.total_count,
            skipped = scan.skipped_count,
            source = %source.display(),
            "scan finished"
        );

        if scan.image_paths.is_empty() {
            return Ok(ClassificationResult {
                failed_images: scan.error_files,
                processing_time: start.elapsed().as_secs_f64(),
                ..ClassificationResult::default()
            });
        }

        let extraction = self.extract_all(&scan.image_paths)?;
        let (result, clusters) = self.cluster_signatures(&extraction.signatures, k);
        info!(
            images = extraction.signatures.len(),
            n_clusters = result.n_clusters,
            score = result.silhouette_score,
            "clustering finished"
        );

        let move_records = match target {
            Some(target) => self.place(&clusters, &result.labels, &extraction.paths, target),
            None => Vec::new(),
        };

        let mut failed_images = scan.error_files;
        failed_images.extend(extraction.failed);

        Ok(ClassificationResult {
            n_clusters: result.n_clusters,
            silhouette_score: result.silhouette_score,
            total_images: extraction.signatures.len(),
            failed_images,
            processing_time: start.elapsed().as_secs_f64(),
            move_records,
            clusters,
        })
    }

    /// Classify without moving anything
    pub fn preview(&mut self, source: &Path, k: Option<usize>) -> Result<ClassificationResult> {
        self.classify(source, None, k)
    }

    /// Move each image into the folder of its cluster; `labels[i]` is the
    /// cluster id of `paths[i]`
    fn place(
        &mut self,
        clusters: &[ClusterInfo],
        labels: &[usize],
        paths: &[PathBuf],
        target: &Path,
    ) -> Vec<MoveRecord> {
        let mut manager = CategoryManager::new(target);
        let total = paths.len();
        let mut current = 0;
        let mut records = Vec::with_capacity(total);

        for cluster in clusters {
            let members = labels
                .iter()
                .zip(paths)
                .filter(|(label, _)| **label == cluster.id)
                .map(|(_, path)| path.as_path());

            for path in members {
                current += 1;
                self.report(current, total, &format!("moving {}", display_name(path)));

                match manager.move_image(path, &cluster.name) {
                    Ok(record) => {
                        self.rollback.record_move(record.clone());
                        records.push(record);
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "cannot move image"),
                }
            }
        }

        for folder in manager.created_folders() {
            self.rollback.record_folder_creation(folder);
        }
        debug!(moved = records.len(), total, "placement finished");

        records
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn report(&self, current: usize, total: usize, message: &str) {
        if let Some(callback) = &self.progress {
            callback(current, total, message);
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
