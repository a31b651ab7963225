//! Image signature extraction
//!
//! Pipeline per image:
//! 1. Resample to the analysis size (Lanczos3)
//! 2. Convert every pixel to 8-bit HSV and 8-bit Lab
//! 3. Build hue, lightness and saturation histograms
//! 4. Compute lightness moments and the tonal class
//! 5. Run seeded k-means on the Lab pixels for dominant colors

use image::imageops::{self, FilterType};
use image::RgbImage;
use std::path::Path;

use crate::color::analysis::{channel_mean, channel_stats, classify_tonal, normalized_histogram};
use crate::color::{kmeans, ColorConverter};
use crate::config::ExtractionConfig;
use crate::constants::histogram::{HUE_BINS, LIGHTNESS_BINS, SATURATION_BINS};
use crate::error::{ClassifierError, Result};
use crate::features::{DominantColor, ImageSignature};
use crate::image_loader::load_image;

/// Converts decoded images into [`ImageSignature`]s.
///
/// Holds no mutable state; one extractor can serve many threads.
pub struct FeatureExtractor {
    config: ExtractionConfig,
    converter: ColorConverter,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    /// Create an extractor with default parameters
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create an extractor with custom parameters
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            config,
            converter: ColorConverter::new(),
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Load an image file and extract its signature
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::ImageLoadError` if the file cannot be decoded,
    /// or `ClassifierError::EmptyImage` if it has no pixels.
    pub fn extract(&self, path: &Path) -> Result<ImageSignature> {
        let rgb = load_image(path)?;
        self.extract_rgb(path.display().to_string(), &rgb)
    }

    /// Extract a signature from an already decoded raster
    pub fn extract_rgb(&self, id: impl Into<String>, image: &RgbImage) -> Result<ImageSignature> {
        let id = id.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(ClassifierError::EmptyImage { id });
        }

        let (width, height) = (self.config.analysis_width, self.config.analysis_height);
        if image.dimensions() == (width, height) {
            Ok(self.analyze(id, image))
        } else {
            let resized = imageops::resize(image, width, height, FilterType::Lanczos3);
            Ok(self.analyze(id, &resized))
        }
    }

    fn analyze(&self, id: String, raster: &RgbImage) -> ImageSignature {
        let pixel_count = (raster.width() * raster.height()) as usize;
        let mut hue = Vec::with_capacity(pixel_count);
        let mut saturation = Vec::with_capacity(pixel_count);
        let mut lightness = Vec::with_capacity(pixel_count);
        let mut lab_points = Vec::with_capacity(pixel_count);

        for pixel in raster.pixels() {
            let [r, g, b] = pixel.0;
            let [h, s, _v] = self.converter.rgb_to_hsv(r, g, b);
            let lab = self.converter.rgb_to_lab(r, g, b);

            hue.push(h);
            saturation.push(s);
            lightness.push(lab[0]);
            lab_points.push([lab[0] as f64, lab[1] as f64, lab[2] as f64]);
        }

        let lightness_stats = channel_stats(&lightness);
        let tonal_class = classify_tonal(
            lightness_stats.mean,
            self.config.high_key_threshold,
            self.config.low_key_threshold,
        );

        ImageSignature {
            id,
            hue_histogram: normalized_histogram(&hue, HUE_BINS),
            lightness_histogram: normalized_histogram(&lightness, LIGHTNESS_BINS),
            saturation_histogram: normalized_histogram(&saturation, SATURATION_BINS),
            dominant_colors: self.dominant_colors(&lab_points),
            tonal_class,
            lightness_stats,
            saturation_mean: channel_mean(&saturation),
        }
    }

    /// Palette of the raster, sorted by descending share.
    ///
    /// Shares are rounded to two decimals; the largest entry absorbs the
    /// rounding remainder so the palette sums to exactly 100.
    fn dominant_colors(&self, lab_points: &[[f64; 3]]) -> Vec<DominantColor> {
        if lab_points.is_empty() || self.config.dominant_colors == 0 {
            return Vec::new();
        }

        let result = kmeans(
            lab_points,
            self.config.dominant_colors,
            self.config.kmeans_max_iterations,
            self.config.kmeans_seed,
        );
        let total = lab_points.len() as f64;

        let mut colors: Vec<DominantColor> = result
            .centroids
            .iter()
            .zip(result.counts())
            .map(|(centroid, count)| {
                let lab = self.converter.scaled_to_lab(*centroid);
                DominantColor {
                    lab,
                    percentage: round2(count as f64 / total * 100.0),
                    hex: self.converter.lab_to_hex(lab),
                }
            })
            .collect();

        colors.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        let sum: f64 = colors.iter().map(|c| c.percentage).sum();
        if let Some(largest) = colors.first_mut() {
            largest.percentage = round2(largest.percentage + (100.0 - sum));
        }

        colors
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
