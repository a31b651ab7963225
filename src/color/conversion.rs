//! Color space conversion utilities
//!
//! Provides the per-pixel transforms used by feature extraction:
//! - RGB to 8-bit HSV (hue 0-179, saturation/value 0-255)
//! - RGB to 8-bit Lab via sRGB linearization and the D65 XYZ transform
//!   (L rescaled to 0-255, a/b offset by 128)
//! - Lab to gamut-clamped sRGB and hex for displaying dominant colors
//!
//! The forward transforms are written out by hand in `f32` so that the
//! discretized channel values are reproducible across platforms.

use palette::{IntoColor, Lab, Srgb};

use crate::constants::{d65, transfer, D65_WHITE_POINT_XYZ};

/// Color converter bound to the D65 reference white
pub struct ColorConverter {
    white_point: [f32; 3],
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a new color converter with D65 as reference white
    pub fn new() -> Self {
        Self {
            white_point: D65_WHITE_POINT_XYZ,
        }
    }

    /// Convert RGB (0-255) to discretized HSV
    ///
    /// # Returns
    ///
    /// `[h, s, v]` with h in 0-179 (degrees halved), s and v in 0-255.
    /// Achromatic pixels get hue 0.
    pub fn rgb_to_hsv(&self, r: u8, g: u8, b: u8) -> [u8; 3] {
        let r = r as f32 / 255.0;
        let g = g as f32 / 255.0;
        let b = b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        let s = if max != 0.0 { diff / max } else { 0.0 };

        // When channels tie for the maximum, blue wins over green over red.
        let h = if diff == 0.0 {
            0.0
        } else if max == b {
            (60.0 * ((r - g) / diff) + 240.0) % 360.0
        } else if max == g {
            (60.0 * ((b - r) / diff) + 120.0) % 360.0
        } else {
            (60.0 * ((g - b) / diff) + 360.0) % 360.0
        };

        [(h / 2.0) as u8, (s * 255.0) as u8, (max * 255.0) as u8]
    }

    /// Convert RGB (0-255) to 8-bit scaled Lab
    ///
    /// # Returns
    ///
    /// `[L, a, b]` where L is lightness rescaled from 0-100 to 0-255 and a/b
    /// are offset by 128, all clamped to 0-255.
    pub fn rgb_to_lab(&self, r: u8, g: u8, b: u8) -> [u8; 3] {
        let linear = [linearize(r), linearize(g), linearize(b)];

        let m = &d65::SRGB_TO_XYZ;
        let xyz = [
            m[0][0] * linear[0] + m[0][1] * linear[1] + m[0][2] * linear[2],
            m[1][0] * linear[0] + m[1][1] * linear[1] + m[1][2] * linear[2],
            m[2][0] * linear[0] + m[2][1] * linear[1] + m[2][2] * linear[2],
        ];

        let fx = lab_f(xyz[0] / self.white_point[0]);
        let fy = lab_f(xyz[1] / self.white_point[1]);
        let fz = lab_f(xyz[2] / self.white_point[2]);

        let l = 116.0 * fy - 16.0;
        let a = 500.0 * (fx - fy);
        let b = 200.0 * (fy - fz);

        [
            (l * 255.0 / 100.0).clamp(0.0, 255.0) as u8,
            (a + 128.0).clamp(0.0, 255.0) as u8,
            (b + 128.0).clamp(0.0, 255.0) as u8,
        ]
    }

    /// Convert an 8-bit scaled Lab triple back to natural Lab ranges
    pub fn scaled_to_lab(&self, scaled: [f64; 3]) -> Lab {
        Lab::new(
            (scaled[0] * 100.0 / 255.0) as f32,
            (scaled[1] - 128.0) as f32,
            (scaled[2] - 128.0) as f32,
        )
    }

    /// Convert Lab to sRGB, clamped to the valid gamut
    pub fn lab_to_srgb(&self, lab: Lab) -> Srgb {
        let srgb: Srgb = lab.into_color();
        Srgb::new(
            srgb.red.clamp(0.0, 1.0),
            srgb.green.clamp(0.0, 1.0),
            srgb.blue.clamp(0.0, 1.0),
        )
    }

    /// Convert sRGB to hexadecimal color string (e.g. "#FF0000")
    pub fn srgb_to_hex(&self, srgb: Srgb) -> String {
        let r = (srgb.red * 255.0).round() as u8;
        let g = (srgb.green * 255.0).round() as u8;
        let b = (srgb.blue * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Hex string of a Lab color after gamut clamping
    pub fn lab_to_hex(&self, lab: Lab) -> String {
        self.srgb_to_hex(self.lab_to_srgb(lab))
    }
}

/// Inverse sRGB companding of one 8-bit channel
fn linearize(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c > transfer::SRGB_LINEAR_THRESHOLD {
        ((c + 0.055) / 1.055).powf(transfer::SRGB_GAMMA)
    } else {
        c / transfer::SRGB_LINEAR_SLOPE
    }
}

/// CIE Lab nonlinearity
fn lab_f(t: f32) -> f32 {
    let delta = transfer::LAB_DELTA;
    if t > delta * delta * delta {
        t.cbrt()
    } else {
        t / (3.0 * delta * delta) + 4.0 / 29.0
    }
}
