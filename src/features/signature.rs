//! Per-image statistical signature

use palette::Lab;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse brightness class of an image
///
/// Declaration order is the tie-break order when a cluster votes on its
/// dominant class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TonalClass {
    HighKey,
    MidKey,
    LowKey,
}

impl TonalClass {
    /// All classes in tie-break order
    pub const ALL: [TonalClass; 3] = [TonalClass::HighKey, TonalClass::MidKey, TonalClass::LowKey];

    /// Label used in cluster names
    pub fn label(&self) -> &'static str {
        match self {
            TonalClass::HighKey => "high-key",
            TonalClass::MidKey => "mid-key",
            TonalClass::LowKey => "low-key",
        }
    }
}

impl fmt::Display for TonalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Moments of the 8-bit Lab lightness channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LightnessStats {
    pub mean: f64,
    pub std: f64,
    /// Third standardized moment; 0 when `std` is 0
    pub skewness: f64,
}

/// One k-means palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    /// Centroid in natural Lab ranges (L 0-100, a/b about ±128)
    pub lab: Lab,
    /// Share of analysed pixels, 0-100
    pub percentage: f64,
    /// Gamut-clamped sRGB hex, e.g. "#C0392B"
    pub hex: String,
}

/// Statistical signature of one image.
///
/// Each histogram is a probability distribution summing to 1 (±1e-6) when
/// the analysed raster has at least one pixel. Dominant colors are sorted by
/// descending percentage and their percentages sum to 100 (±0.01).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSignature {
    /// Identifier of the source image (usually its path)
    pub id: String,
    /// HSV hue, 180 bins
    pub hue_histogram: Vec<f64>,
    /// Lab lightness, 256 bins
    pub lightness_histogram: Vec<f64>,
    /// HSV saturation, 256 bins
    pub saturation_histogram: Vec<f64>,
    pub dominant_colors: Vec<DominantColor>,
    pub tonal_class: TonalClass,
    pub lightness_stats: LightnessStats,
    /// Mean HSV saturation (0-255)
    pub saturation_mean: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tonal_class_serialization() {
        let json = serde_json::to_string(&TonalClass::HighKey).unwrap();
        assert_eq!(json, "\"high-key\"");

        let parsed: TonalClass = serde_json::from_str("\"low-key\"").unwrap();
        assert_eq!(parsed, TonalClass::LowKey);
    }

    #[test]
    fn test_tonal_labels_match_display() {
        for class in TonalClass::ALL {
            assert_eq!(class.to_string(), class.label());
        }
    }

    #[test]
    fn test_signature_serialization() {
        let signature = ImageSignature {
            id: "a.jpg".to_string(),
            hue_histogram: vec![1.0, 0.0],
            lightness_histogram: vec![0.5, 0.5],
            saturation_histogram: vec![0.0, 1.0],
            dominant_colors: vec![DominantColor {
                lab: Lab::new(50.0, 20.0, -30.0),
                percentage: 100.0,
                hex: "#3366CC".to_string(),
            }],
            tonal_class: TonalClass::MidKey,
            lightness_stats: LightnessStats {
                mean: 120.0,
                std: 4.0,
                skewness: 0.1,
            },
            saturation_mean: 42.0,
        };

        let json = serde_json::to_string(&signature).unwrap();
        let deserialized: ImageSignature = serde_json::from_str(&json).unwrap();

        assert_eq!(signature, deserialized);
    }
}
