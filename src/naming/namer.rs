use rayon::prelude::*;
use std::collections::HashMap;

use crate::clustering::ClusterResult;
use crate::config::NamingConfig;
use crate::constants::histogram::HUE_BINS;
use crate::constants::naming::{COOL_HUE_RANGES, NEUTRAL_HUE_RANGES, UNCLASSIFIED_NAME, WARM_HUE_RANGES};
use crate::features::{ImageSignature, TonalClass};
use crate::naming::{ClusterInfo, HueCategory, NameDetails, SaturationLevel};

/// Derives descriptive names from the signatures of a cluster
#[derive(Debug, Clone, Default)]
pub struct CategoryNamer {
    config: NamingConfig,
}

impl CategoryNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NamingConfig) -> Self {
        Self { config }
    }

    /// Name one cluster from its member signatures.
    ///
    /// An empty cluster is `unclassified` (mid-key, neutral, moderate).
    pub fn name(&self, members: &[&ImageSignature]) -> NameDetails {
        if members.is_empty() {
            return NameDetails {
                name: UNCLASSIFIED_NAME.to_string(),
                tonal_class: TonalClass::MidKey,
                hue_category: HueCategory::Neutral,
                saturation_level: SaturationLevel::Moderate,
            };
        }

        let tonal_class = dominant_tonal_class(members);
        let hue_category = self.hue_category(members);
        let saturation_level = self.saturation_level(members);

        NameDetails {
            name: format!("{}-{}-{}", tonal_class.label(), hue_category.label(), saturation_level.label()),
            tonal_class,
            hue_category,
            saturation_level,
        }
    }

    /// Names for many clusters, pairwise distinct.
    ///
    /// Every base name shared by more than one cluster gets a `_N` suffix,
    /// numbered from 1 in order of appearance.
    pub fn name_all(&self, groups: &[Vec<&ImageSignature>]) -> Vec<String> {
        let bases: Vec<String> = groups.iter().map(|members| self.name(members).name).collect();
        disambiguate(bases)
    }

    /// Build a [`ClusterInfo`] per label of `result`.
    ///
    /// `signatures[i]` must be the signature clustered as item `i`.
    pub fn describe_clusters(&self, signatures: &[ImageSignature], result: &ClusterResult) -> Vec<ClusterInfo> {
        let groups: Vec<Vec<&ImageSignature>> = result
            .groups()
            .into_iter()
            .map(|indices| indices.into_iter().map(|i| &signatures[i]).collect())
            .collect();

        let details: Vec<NameDetails> = groups.par_iter().map(|members| self.name(members)).collect();
        let names = disambiguate(details.iter().map(|d| d.name.clone()).collect());

        groups
            .iter()
            .zip(details)
            .zip(names)
            .enumerate()
            .map(|(id, ((members, details), name))| ClusterInfo {
                id,
                name,
                members: members.iter().map(|s| s.id.clone()).collect(),
                tonal_class: details.tonal_class,
                hue_category: details.hue_category,
                saturation_level: details.saturation_level,
                member_count: members.len(),
            })
            .collect()
    }

    /// Hue family holding the most mass of the members' averaged hue histogram
    fn hue_category(&self, members: &[&ImageSignature]) -> HueCategory {
        let mut combined = vec![0.0; HUE_BINS];
        for signature in members {
            for (bin, value) in combined.iter_mut().zip(&signature.hue_histogram) {
                *bin += value;
            }
        }
        let count = members.len() as f64;
        combined.iter_mut().for_each(|bin| *bin /= count);

        let warm = range_mass(&combined, WARM_HUE_RANGES);
        let cool = range_mass(&combined, COOL_HUE_RANGES);
        let neutral = range_mass(&combined, NEUTRAL_HUE_RANGES);

        let max = warm.max(cool).max(neutral);
        if max < self.config.low_chroma_threshold {
            HueCategory::Neutral
        } else if warm == max {
            HueCategory::Warm
        } else if cool == max {
            HueCategory::Cool
        } else {
            HueCategory::Neutral
        }
    }

    fn saturation_level(&self, members: &[&ImageSignature]) -> SaturationLevel {
        let mean = members.iter().map(|s| s.saturation_mean).sum::<f64>() / members.len() as f64;

        if mean >= self.config.vivid_threshold {
            SaturationLevel::Vivid
        } else if mean >= self.config.moderate_threshold {
            SaturationLevel::Moderate
        } else if mean >= self.config.muted_threshold {
            SaturationLevel::Muted
        } else {
            SaturationLevel::Neutral
        }
    }
}

/// Most frequent tonal class, earlier classes winning ties
fn dominant_tonal_class(members: &[&ImageSignature]) -> TonalClass {
    let mut best = TonalClass::MidKey;
    let mut best_count = 0;
    for class in TonalClass::ALL {
        let count = members.iter().filter(|s| s.tonal_class == class).count();
        if count > best_count {
            best = class;
            best_count = count;
        }
    }
    best
}

fn range_mass(histogram: &[f64], ranges: &[(usize, usize)]) -> f64 {
    ranges
        .iter()
        .map(|&(start, end)| {
            let end = (end + 1).min(histogram.len());
            histogram.get(start..end).map_or(0.0, |bins| bins.iter().sum::<f64>())
        })
        .sum()
}

fn disambiguate(bases: Vec<String>) -> Vec<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for base in &bases {
        *totals.entry(base.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    bases
        .iter()
        .map(|base| {
            if totals[base.as_str()] > 1 {
                let n = seen.entry(base.as_str()).or_default();
                *n += 1;
                format!("{base}_{n}")
            } else {
                base.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::LightnessStats;
    use std::collections::HashSet;

    fn signature(id: &str, hue_bin: usize, saturation: f64, tonal_class: TonalClass) -> ImageSignature {
        let mut hue = vec![0.0; HUE_BINS];
        hue[hue_bin] = 1.0;
        let mut sat = vec![0.0; 256];
        sat[saturation as usize] = 1.0;

        ImageSignature {
            id: id.to_string(),
            hue_histogram: hue,
            lightness_histogram: vec![1.0 / 256.0; 256],
            saturation_histogram: sat,
            dominant_colors: Vec::new(),
            tonal_class,
            lightness_stats: LightnessStats::default(),
            saturation_mean: saturation,
        }
    }

    #[test]
    fn test_name_components() {
        let namer = CategoryNamer::new();
        let red = signature("red", 0, 255.0, TonalClass::MidKey);
        let blue = signature("blue", 120, 100.0, TonalClass::LowKey);
        let green = signature("green", 60, 40.0, TonalClass::HighKey);

        assert_eq!(namer.name(&[&red]).name, "mid-key-warm-vivid");
        assert_eq!(namer.name(&[&blue]).name, "low-key-cool-moderate");
        assert_eq!(namer.name(&[&green]).name, "high-key-neutral-muted");

        let details = namer.name(&[&blue]);
        assert_eq!(details.tonal_class, TonalClass::LowKey);
        assert_eq!(details.hue_category, HueCategory::Cool);
        assert_eq!(details.saturation_level, SaturationLevel::Moderate);
    }

    #[test]
    fn test_empty_cluster_is_unclassified() {
        let details = CategoryNamer::new().name(&[]);
        assert_eq!(details.name, "unclassified");
        assert_eq!(details.tonal_class, TonalClass::MidKey);
        assert_eq!(details.hue_category, HueCategory::Neutral);
        assert_eq!(details.saturation_level, SaturationLevel::Moderate);
    }

    #[test]
    fn test_saturation_thresholds() {
        let namer = CategoryNamer::new();
        let level = |s: f64| namer.name(&[&signature("x", 0, s, TonalClass::MidKey)]).saturation_level;

        assert_eq!(level(150.0), SaturationLevel::Vivid);
        assert_eq!(level(149.0), SaturationLevel::Moderate);
        assert_eq!(level(80.0), SaturationLevel::Moderate);
        assert_eq!(level(30.0), SaturationLevel::Muted);
        assert_eq!(level(29.0), SaturationLevel::Neutral);
    }

    #[test]
    fn test_tonal_vote_and_ties() {
        let namer = CategoryNamer::new();
        let low = signature("a", 0, 200.0, TonalClass::LowKey);
        let high = signature("b", 0, 200.0, TonalClass::HighKey);
        let mid = signature("c", 0, 200.0, TonalClass::MidKey);

        assert_eq!(namer.name(&[&low, &low, &high]).tonal_class, TonalClass::LowKey);
        // One of each: declaration order wins
        assert_eq!(namer.name(&[&low, &mid, &high]).tonal_class, TonalClass::HighKey);
        assert_eq!(namer.name(&[&low, &mid]).tonal_class, TonalClass::MidKey);
    }

    #[test]
    fn test_hue_vote_averages_members() {
        let namer = CategoryNamer::new();
        let warm = signature("a", 10, 200.0, TonalClass::MidKey);
        let cool = signature("b", 100, 200.0, TonalClass::MidKey);

        assert_eq!(namer.name(&[&warm, &cool, &cool]).hue_category, HueCategory::Cool);
        // Equal mass: warm checked first
        assert_eq!(namer.name(&[&warm, &cool]).hue_category, HueCategory::Warm);
    }

    #[test]
    fn test_low_chroma_is_neutral() {
        let mut spread = signature("spread", 0, 200.0, TonalClass::MidKey);
        spread.hue_histogram = vec![0.0; HUE_BINS];
        spread.hue_histogram[5] = 0.05;
        spread.hue_histogram[100] = 0.05;

        let details = CategoryNamer::new().name(&[&spread]);
        assert_eq!(details.hue_category, HueCategory::Neutral);
    }

    #[test]
    fn test_name_all_is_distinct() {
        let namer = CategoryNamer::new();
        let red = signature("red", 0, 255.0, TonalClass::MidKey);
        let blue = signature("blue", 120, 255.0, TonalClass::MidKey);

        let names = namer.name_all(&[vec![&red], vec![&blue], vec![&red], vec![], vec![&red], vec![]]);
        assert_eq!(
            names,
            vec![
                "mid-key-warm-vivid_1",
                "mid-key-cool-vivid",
                "mid-key-warm-vivid_2",
                "unclassified_1",
                "mid-key-warm-vivid_3",
                "unclassified_2",
            ]
        );

        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_describe_clusters() {
        let signatures = vec![
            signature("r1", 0, 255.0, TonalClass::MidKey),
            signature("b1", 120, 255.0, TonalClass::LowKey),
            signature("r2", 2, 250.0, TonalClass::MidKey),
        ];
        let result = ClusterResult {
            labels: vec![0, 1, 0],
            n_clusters: 2,
            silhouette_score: 1.0,
            dendrogram: None,
        };

        let clusters = CategoryNamer::new().describe_clusters(&signatures, &result);
        assert_eq!(clusters.len(), 2);

        assert_eq!(clusters[0].id, 0);
        assert_eq!(clusters[0].name, "mid-key-warm-vivid");
        assert_eq!(clusters[0].members, vec!["r1", "r2"]);
        assert_eq!(clusters[0].member_count, 2);

        assert_eq!(clusters[1].name, "low-key-cool-vivid");
        assert_eq!(clusters[1].members, vec!["b1"]);
    }
}
