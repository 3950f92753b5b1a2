//! Box-plot summaries of the GPTZero "completely generated" probability.
//!
//! Two groupings are produced from the GPTZero table:
//! - original texts by location and publication year
//! - all texts by location and version

use crate::aggregate::GptZeroRow;
use crate::config::Version;
use crate::registry::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Location order of every summary
pub const LOCATION_ORDER: [Location; 2] = [Location::Asian, Location::Usa];

/// Years compared when none are configured
pub const DEFAULT_YEARS: [i32; 2] = [2020, 2024];

/// Five-number summary plus count and mean of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub location: String,
    pub group: String,
    pub n: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl SummaryRow {
    /// `None` for an empty sample
    fn from_sample(location: &str, group: String, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;

        Some(Self {
            location: location.to_string(),
            group,
            n,
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[n - 1],
            mean,
        })
    }
}

/// Linear-interpolated quantile of a sorted, non-empty sample
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Original texts grouped by location, then by the given years
pub fn by_location_year(rows: &[GptZeroRow], years: &[i32]) -> Vec<SummaryRow> {
    let mut out = Vec::new();
    for location in LOCATION_ORDER {
        for year in years {
            let sample = rows
                .iter()
                .filter(|r| r.version == Version::Original)
                .filter(|r| r.location == location.as_str() && r.year == Some(*year))
                .map(|r| r.completely_generated_prob)
                .collect();
            out.extend(SummaryRow::from_sample(location.as_str(), year.to_string(), sample));
        }
    }
    out
}

/// All texts grouped by location, then by version (original first)
pub fn by_location_version(rows: &[GptZeroRow]) -> Vec<SummaryRow> {
    let versions: BTreeSet<Version> = rows.iter().map(|r| r.version).collect();

    let mut out = Vec::new();
    for location in LOCATION_ORDER {
        for version in &versions {
            let sample = rows
                .iter()
                .filter(|r| r.location == location.as_str() && r.version == *version)
                .map(|r| r.completely_generated_prob)
                .collect();
            out.extend(SummaryRow::from_sample(location.as_str(), version.to_string(), sample));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariantKey;
    use crate::detection::GptZeroVerdict;
    use crate::registry::ArticleMeta;

    fn row(id: u32, location: &str, year: i32, version: Version, prob: f64) -> GptZeroRow {
        let meta = ArticleMeta {
            title: "T".to_string(),
            year: Some(year),
            location: location.to_string(),
            authors: Vec::new(),
        };
        let verdict = GptZeroVerdict {
            completely_generated_prob: prob,
            ..Default::default()
        };
        GptZeroRow::new(VariantKey::new(id, version), &meta, verdict, 100)
    }

    #[test]
    fn test_quantile_interpolates() {
        let sample = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sample, 0.0), 1.0);
        assert_eq!(quantile(&sample, 0.25), 1.75);
        assert_eq!(quantile(&sample, 0.5), 2.5);
        assert_eq!(quantile(&sample, 0.75), 3.25);
        assert_eq!(quantile(&sample, 1.0), 4.0);
        assert_eq!(quantile(&[0.4], 0.75), 0.4);
    }

    #[test]
    fn test_by_location_year_filters_originals() {
        let rows = vec![
            row(1, "USA", 2020, Version::Original, 0.5),
            row(1, "USA", 2020, Version::Repetition(1), 1.0),
            row(2, "USA", 2024, Version::Original, 0.25),
            row(3, "Asian", 2020, Version::Original, 0.0),
            row(4, "Asian", 2020, Version::Original, 1.0),
            row(5, "Asian", 2022, Version::Original, 0.75),
        ];

        let summary = by_location_year(&rows, &DEFAULT_YEARS);
        let groups: Vec<(&str, &str, usize)> = summary
            .iter()
            .map(|s| (s.location.as_str(), s.group.as_str(), s.n))
            .collect();
        assert_eq!(
            groups,
            vec![("Asian", "2020", 2), ("USA", "2020", 1), ("USA", "2024", 1)]
        );
        assert_eq!(summary[0].median, 0.5);
        assert_eq!(summary[0].mean, 0.5);
        assert_eq!(summary[1].max, 0.5);
    }

    #[test]
    fn test_by_location_version_orders_versions() {
        let rows = vec![
            row(1, "USA", 2020, Version::Repetition(2), 0.9),
            row(1, "USA", 2020, Version::Original, 0.1),
            row(1, "USA", 2020, Version::Repetition(1), 0.8),
            row(2, "Asian", 2020, Version::Repetition(1), 0.7),
        ];

        let summary = by_location_version(&rows);
        let groups: Vec<(&str, &str)> = summary
            .iter()
            .map(|s| (s.location.as_str(), s.group.as_str()))
            .collect();
        assert_eq!(
            groups,
            vec![
                ("Asian", "rep1"),
                ("USA", "original"),
                ("USA", "rep1"),
                ("USA", "rep2")
            ]
        );
    }
}
