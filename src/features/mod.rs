//! Image signatures and their extraction
//!
//! A signature is the only thing later stages see of an image: three
//! probability histograms, a dominant-color palette, lightness moments and
//! a tonal class.

pub mod extractor;
pub mod signature;

pub use extractor::FeatureExtractor;
pub use signature::{DominantColor, ImageSignature, LightnessStats, TonalClass};
