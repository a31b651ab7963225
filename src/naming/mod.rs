//! Descriptive names for clusters
//!
//! A cluster name combines three coarse votes over its members: the
//! prevailing tonal class, the hue family holding most of the averaged hue
//! mass, and the saturation level of the mean saturation, e.g.
//! `low-key-cool-muted`.

pub mod namer;

pub use namer::CategoryNamer;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::TonalClass;

/// Hue family of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HueCategory {
    /// Reds, oranges and yellows
    Warm,
    /// Cyans, blues and purples
    Cool,
    /// Greens, magentas, or too little chroma to tell
    Neutral,
}

impl HueCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HueCategory::Warm => "warm",
            HueCategory::Cool => "cool",
            HueCategory::Neutral => "neutral",
        }
    }
}

impl fmt::Display for HueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Saturation level of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaturationLevel {
    Vivid,
    Moderate,
    Muted,
    Neutral,
}

impl SaturationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SaturationLevel::Vivid => "vivid",
            SaturationLevel::Moderate => "moderate",
            SaturationLevel::Muted => "muted",
            SaturationLevel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SaturationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Base name of a cluster and the votes it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDetails {
    pub name: String,
    pub tonal_class: TonalClass,
    pub hue_category: HueCategory,
    pub saturation_level: SaturationLevel,
}

/// Named cluster with its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Cluster label
    pub id: usize,
    /// Unique name within its run
    pub name: String,
    /// Image identifiers of the members
    pub members: Vec<String>,
    pub tonal_class: TonalClass,
    pub hue_category: HueCategory,
    pub saturation_level: SaturationLevel,
    pub member_count: usize,
}
