//! Article metadata registry (`data/metadata.json`).
//!
//! The registry is the authority on which articles exist and in which order
//! they are processed. Ordering is the key order of the JSON file.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::info;

/// Placeholder used wherever a metadata field is missing
pub const NOT_AVAILABLE: &str = "N/A";

/// Location labels derived from the sheet's group code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Usa,
    Asian,
}

impl Location {
    /// `"USA"` maps to `USA`, every other group code to `Asian`.
    pub fn from_group_code(code: &str) -> Self {
        if code.trim() == "USA" {
            Location::Usa
        } else {
            Location::Asian
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Usa => "USA",
            Location::Asian => "Asian",
        }
    }
}

/// Metadata of one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMeta {
    #[serde(rename = "Title", default = "not_available")]
    pub title: String,
    #[serde(rename = "Year", default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(rename = "Location", default = "not_available")]
    pub location: String,
    #[serde(rename = "Authors", default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
}

impl ArticleMeta {
    /// Authors joined with "; ", dropping e-mail tokens; "N/A" when none.
    pub fn authors_display(&self) -> String {
        if self.authors.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        self.authors
            .iter()
            .map(|author| {
                author
                    .split_whitespace()
                    .filter(|part| !part.contains('@'))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Years come from spreadsheets: accept integers, floats like 2020.0 and numeric strings.
fn lenient_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        serde_json::Value::String(s) => crate::prep::parse_year(&s),
        _ => None,
    })
}

/// Ordered article registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: Vec<(u32, ArticleMeta)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an article; ids are expected to be unique.
    pub fn insert(&mut self, article_id: u32, meta: ArticleMeta) {
        if let Some(slot) = self.entries.iter_mut().find(|(id, _)| *id == article_id) {
            slot.1 = meta;
        } else {
            self.entries.push((article_id, meta));
        }
    }

    pub fn get(&self, article_id: u32) -> Option<&ArticleMeta> {
        self.entries
            .iter()
            .find(|(id, _)| *id == article_id)
            .map(|(_, meta)| meta)
    }

    /// Article ids in registry order
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &ArticleMeta)> {
        self.entries.iter().map(|(id, meta)| (*id, meta))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse registry JSON, keeping key order.
    pub fn from_json(content: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
        let mut registry = Registry::new();
        for (key, value) in map {
            let article_id: u32 = key.trim().parse().map_err(|_| {
                PipelineError::Config(format!("Metadata key '{}' is not an article id", key))
            })?;
            let meta: ArticleMeta = serde_json::from_value(value)?;
            registry.insert(article_id, meta);
        }
        Ok(registry)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut map = serde_json::Map::new();
        for (id, meta) in &self.entries {
            map.insert(id.to_string(), serde_json::to_value(meta)?);
        }
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(map))?)
    }

    /// Load the registry from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::Config(format!(
                "Metadata file not found at {}. Please run without --skip-data-prep first.",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&content)?;
        info!(path = %path.display(), articles = registry.len(), "Metadata loaded");
        Ok(registry)
    }

    /// Save the registry to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), articles = self.len(), "Metadata saved");
        Ok(())
    }
}
