//! Result tables on disk.
//!
//! Tabular results are CSV written through serde; the readability results are
//! also written as one nested JSON document keyed by article id.

use crate::aggregate::ReadabilityRow;
use crate::error::Result;
use crate::registry::Registry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::{info, warn};

pub const READABILITY_JSON: &str = "readability_results.json";
pub const READABILITY_CSV: &str = "readability_results.csv";
pub const DETECTION_CSV: &str = "ai_detection_results.csv";
pub const GPTZERO_CSV: &str = "gptzero_results.csv";
pub const ORIGINALITY_CSV: &str = "originality_ai_results.csv";
pub const COMPARISON_CSV: &str = "readability_comparison_in_sheet.csv";
pub const SUMMARY_BY_YEAR_CSV: &str = "summary_by_location_year.csv";
pub const SUMMARY_BY_VERSION_CSV: &str = "summary_by_location_version.csv";

/// Serde adapter writing `None` as "N/A" and reading "N/A" or an empty cell back as `None`.
pub mod na {
    use crate::registry::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() || raw == NOT_AVAILABLE {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// Save rows as CSV with a header line, creating the parent directory.
///
/// An empty table removes any file left at `path` by an earlier run.
pub fn save_csv<T: Serialize>(path: &Path, data: &[T]) -> Result<()> {
    if data.is_empty() {
        if path.exists() {
            std::fs::remove_file(path)?;
            warn!(path = %path.display(), "No data to save, removed previous results");
        } else {
            info!(path = %path.display(), "No data to save");
        }
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_path(path)?;

    for item in data {
        wtr.serialize(item)?;
    }

    wtr.flush()?;
    info!(path = %path.display(), rows = data.len(), "Saved");
    Ok(())
}

/// Load rows from a CSV file with a header line
pub fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Nest readability rows by article, then by version.
///
/// Article order follows the registry; articles without any row are left out.
pub fn readability_json(registry: &Registry, rows: &[ReadabilityRow]) -> Result<Value> {
    let mut articles = Map::new();

    for (article_id, meta) in registry.iter() {
        let mut versions = Map::new();
        for row in rows.iter().filter(|r| r.article_id == article_id) {
            versions.insert(row.version.to_string(), serde_json::to_value(row.metrics())?);
        }
        if versions.is_empty() {
            continue;
        }

        articles.insert(
            article_id.to_string(),
            json!({
                "title": meta.title,
                "year": meta.year,
                "location": meta.location,
                "authors": meta.authors_display(),
                "versions": Value::Object(versions),
            }),
        );
    }

    Ok(Value::Object(articles))
}

pub fn save_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    info!(path = %path.display(), "Saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::OriginalityRow;
    use crate::config::{VariantKey, Version};
    use crate::metrics::MetricsRecord;
    use crate::registry::ArticleMeta;
    use tempfile::TempDir;

    fn meta(title: &str) -> ArticleMeta {
        ArticleMeta {
            title: title.to_string(),
            year: Some(2024),
            location: "Asian".to_string(),
            authors: vec!["A. Author".to_string()],
        }
    }

    fn row(id: u32, version: Version, flesch: f64) -> ReadabilityRow {
        let metrics = MetricsRecord {
            flesch_reading_ease: flesch,
            avg_sentence_length: 17.25,
            letter_count: 1200 + id as usize,
            ..Default::default()
        };
        ReadabilityRow::new(VariantKey::new(id, version), &meta("Letter"), metrics)
    }

    #[test]
    fn test_readability_csv_reload_keeps_triples() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("results").join(READABILITY_CSV);
        let rows = vec![
            row(2, Version::Original, 41.37),
            row(2, Version::Repetition(1), 28.9),
            row(5, Version::Original, -3.05),
        ];
        save_csv(&path, &rows)?;

        let loaded: Vec<ReadabilityRow> = load_csv(&path)?;
        let triples = |rs: &[ReadabilityRow]| {
            rs.iter()
                .map(|r| (r.article_id, r.version, r.flesch_reading_ease, r.letter_count))
                .collect::<Vec<_>>()
        };
        assert_eq!(triples(&loaded), triples(&rows));
        assert_eq!(loaded, rows);
        Ok(())
    }

    #[test]
    fn test_missing_values_written_as_na() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(ORIGINALITY_CSV);
        let rows = vec![OriginalityRow {
            article_id: 1,
            title: "T".to_string(),
            authors: "N/A".to_string(),
            year: None,
            location: "USA".to_string(),
            version: Version::Original,
            ai_classification: None,
            original_classification: None,
            ai_confidence: Some(0.5),
            original_confidence: None,
            letter_length: 10,
            error: Some("HTTP 402".to_string()),
        }];
        save_csv(&path, &rows)?;

        let content = std::fs::read_to_string(&path)?;
        assert!(content.contains("1,T,N/A,N/A,USA,original,N/A,N/A,0.5,N/A,10,HTTP 402"));

        let loaded: Vec<OriginalityRow> = load_csv(&path)?;
        assert_eq!(loaded, rows);
        Ok(())
    }

    #[test]
    fn test_empty_save_clears_previous_table() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(READABILITY_CSV);

        save_csv(&path, &[row(1, Version::Original, 70.0)])?;
        assert_eq!(load_csv::<ReadabilityRow>(&path)?.len(), 1);

        save_csv::<ReadabilityRow>(&path, &[])?;
        assert!(!path.exists());
        assert!(load_csv::<ReadabilityRow>(&path).is_err());

        save_csv::<ReadabilityRow>(&path, &[])?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_readability_json_nesting() -> Result<()> {
        let mut registry = Registry::new();
        registry.insert(9, meta("Nine"));
        registry.insert(4, meta("Four"));
        registry.insert(6, meta("Six"));

        let rows = vec![
            row(4, Version::Original, 50.0),
            row(9, Version::Original, 60.0),
            row(9, Version::Repetition(1), 55.0),
        ];
        let value = readability_json(&registry, &rows)?;
        let obj = value.as_object().expect("object");

        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["9", "4"]);
        assert_eq!(value["9"]["title"], "Nine");
        assert_eq!(value["9"]["year"], 2024);
        assert_eq!(value["9"]["authors"], "A. Author");
        assert_eq!(value["9"]["versions"]["rep1"]["flesch_reading_ease"], 55.0);
        assert_eq!(value["4"]["versions"]["original"]["letter_count"], 1204);
        Ok(())
    }
}
