//! Color analysis and conversion module
//!
//! This module handles color space conversions, dominant-color k-means
//! and the histogram statistics that make up an image signature.

pub mod analysis;
pub mod conversion;
pub mod kmeans;

pub use analysis::HistogramAnalyzer;
pub use conversion::ColorConverter;
pub use kmeans::{kmeans, KMeansResult};
