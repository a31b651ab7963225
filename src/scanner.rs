//! Image discovery
//!
//! Two phases:
//! - sequential directory walk collecting candidates by extension
//! - parallel header validation of every candidate
//!
//! Results come back in walk order (file names sorted per directory), so a
//! scan of an unchanged tree is reproducible.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ClassifierError, Result};
use crate::image_loader::probe_image;

/// Extensions picked up by the scanner (lowercase, without the dot)
pub const SCAN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Outcome of a directory scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Images whose header decoded successfully
    pub image_paths: Vec<PathBuf>,
    /// Number of valid images
    pub total_count: usize,
    /// Number of candidates rejected as corrupt
    pub skipped_count: usize,
    /// The rejected candidates
    pub error_files: Vec<PathBuf>,
}

/// Recursive image scanner
#[derive(Debug, Clone)]
pub struct ImageScanner {
    max_depth: Option<usize>,
}

impl Default for ImageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageScanner {
    pub fn new() -> Self {
        Self { max_depth: None }
    }

    /// Limit recursion; depth 1 scans only the direct children
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Scan `root` recursively for images.
    ///
    /// # Errors
    ///
    /// - `PathNotFound` if `root` does not exist
    /// - `NotADirectory` if `root` is a file
    /// - `AccessDenied` if `root` cannot be listed
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        if !root.exists() {
            return Err(ClassifierError::PathNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(ClassifierError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        if let Err(e) = std::fs::read_dir(root) {
            if e.kind() == ErrorKind::PermissionDenied {
                return Err(ClassifierError::AccessDenied {
                    path: root.to_path_buf(),
                });
            }
            return Err(ClassifierError::file_operation(
                format!("cannot list {}", root.display()),
                e,
            ));
        }

        let candidates = self.collect_candidates(root);
        debug!(count = candidates.len(), root = %root.display(), "collected image candidates");

        let checked: Vec<(PathBuf, bool)> = candidates
            .into_par_iter()
            .map(|path| {
                let valid = is_valid_image(&path);
                (path, valid)
            })
            .collect();

        let mut result = ScanResult::default();
        for (path, valid) in checked {
            if valid {
                result.image_paths.push(path);
            } else {
                warn!(path = %path.display(), "skipping corrupt image");
                result.error_files.push(path);
            }
        }
        result.total_count = result.image_paths.len();
        result.skipped_count = result.error_files.len();

        Ok(result)
    }

    fn collect_candidates(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name();

        walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("cannot access entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| has_scan_extension(path))
            .collect()
    }
}

/// True if the extension is one the scanner accepts (case-insensitive)
pub fn has_scan_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCAN_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// True if `path` has a scanned extension and a decodable, non-empty header
pub fn is_valid_image(path: &Path) -> bool {
    if !has_scan_extension(path) {
        return false;
    }
    match probe_image(path) {
        Ok((width, height)) => width > 0 && height > 0,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "header validation failed");
            false
        }
    }
}
