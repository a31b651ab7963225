//! Colorimetric constants and default thresholds for tonal classification
//!
//! This module contains compile-time constants for the color transforms,
//! histogram layout, clustering search and category naming.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65 represents average daylight and is the
/// reference white for sRGB images.
pub mod d65 {
    /// D65 white point in CIE XYZ color space
    /// Source: CIE 15:2004 Colorimetry, 3rd edition
    pub const WHITE_POINT_XYZ: [f32; 3] = [0.95047, 1.00000, 1.08883];

    /// Linear sRGB to XYZ matrix under D65 (rows produce X, Y, Z)
    pub const SRGB_TO_XYZ: [[f32; 3]; 3] = [
        [0.4124564, 0.3575761, 0.1804375],
        [0.2126729, 0.7151522, 0.0721750],
        [0.0193339, 0.1191920, 0.9503041],
    ];
}

/// Re-export D65 white point at top level for convenience
pub const D65_WHITE_POINT_XYZ: [f32; 3] = d65::WHITE_POINT_XYZ;

/// sRGB transfer function and CIE Lab nonlinearity
pub mod transfer {
    /// Encoded values at or below this threshold use the linear segment
    pub const SRGB_LINEAR_THRESHOLD: f32 = 0.04045;

    /// Slope of the linear sRGB segment
    pub const SRGB_LINEAR_SLOPE: f32 = 12.92;

    /// Exponent of the sRGB power-law segment
    pub const SRGB_GAMMA: f32 = 2.4;

    /// CIE f(t) breakpoint: delta = 6/29
    pub const LAB_DELTA: f32 = 6.0 / 29.0;
}

/// Histogram layout (fixed for every signature)
pub mod histogram {
    /// Hue bins, one per discretized HSV hue value (0-179)
    pub const HUE_BINS: usize = 180;

    /// Lightness bins over the 8-bit Lab L channel
    pub const LIGHTNESS_BINS: usize = 256;

    /// Saturation bins over the 8-bit HSV S channel
    pub const SATURATION_BINS: usize = 256;
}

/// Feature extraction defaults
pub mod extraction {
    /// Analysis raster width after resampling
    pub const ANALYSIS_WIDTH: u32 = 200;

    /// Analysis raster height after resampling
    pub const ANALYSIS_HEIGHT: u32 = 200;

    /// Number of dominant colors extracted per image
    pub const DOMINANT_COLORS: usize = 5;

    /// Mean lightness above which an image is high-key (0-255 scale)
    pub const HIGH_KEY_THRESHOLD: f64 = 170.0;

    /// Mean lightness below which an image is low-key (0-255 scale)
    pub const LOW_KEY_THRESHOLD: f64 = 85.0;

    /// K-means iteration cap
    pub const KMEANS_MAX_ITERATIONS: usize = 100;

    /// K-means sampling seed
    pub const KMEANS_SEED: u64 = 42;

    /// Relative centroid movement tolerance for k-means convergence
    pub const KMEANS_RELATIVE_TOLERANCE: f64 = 1e-5;

    /// Absolute centroid movement tolerance for k-means convergence
    pub const KMEANS_ABSOLUTE_TOLERANCE: f64 = 1e-8;
}

/// Histogram distance guards
pub mod similarity {
    /// Added to chi-square denominators
    pub const CHI_SQUARE_EPSILON: f64 = 1e-10;

    /// Lower clamp of the Bhattacharyya coefficient before the log
    pub const BHATTACHARYYA_EPSILON: f64 = 1e-10;

    /// Correlation is 0 when the variance product falls below this
    pub const CORRELATION_EPSILON: f64 = 1e-10;
}

/// Cluster-count search bounds
pub mod clustering {
    pub const MIN_CLUSTERS: usize = 2;
    pub const MAX_CLUSTERS: usize = 10;
}

/// Category naming thresholds and hue buckets
pub mod naming {
    /// Mean saturation (0-255) at or above which a cluster is vivid
    pub const VIVID_SATURATION_THRESHOLD: f64 = 150.0;

    /// Mean saturation at or above which a cluster is moderate
    pub const MODERATE_SATURATION_THRESHOLD: f64 = 80.0;

    /// Mean saturation at or above which a cluster is muted
    pub const MUTED_SATURATION_THRESHOLD: f64 = 30.0;

    /// Below this winning hue mass a cluster counts as achromatic
    pub const LOW_CHROMA_THRESHOLD: f64 = 0.1;

    /// Red, orange, yellow (inclusive HSV hue bin ranges)
    pub const WARM_HUE_RANGES: &[(usize, usize)] = &[(0, 35), (170, 179)];

    /// Cyan, blue, purple
    pub const COOL_HUE_RANGES: &[(usize, usize)] = &[(78, 160)];

    /// Green, magenta
    pub const NEUTRAL_HUE_RANGES: &[(usize, usize)] = &[(36, 77), (161, 169)];

    /// Name given to a cluster without members
    pub const UNCLASSIFIED_NAME: &str = "unclassified";
}
