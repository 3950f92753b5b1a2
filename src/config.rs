//! Filesystem layout, version labels and API credentials.
//!
//! Paths follow the study's directory convention under a single root:
//!
//! ```text
//! data/metadata.json
//! data/article_001.txt
//! outputs/polished_articles/rep1/output_001.txt
//! outputs/gptzero_responses/original/ai_detection_001.json
//! outputs/originalityai_responses/rep1/ai_detection_001.json
//! results/
//! ```

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable holding the GPTZero key
pub const GPTZERO_KEY_VAR: &str = "GPTZERO_API_KEY";

/// Environment variable holding the Originality.ai key
pub const ORIGINALITY_KEY_VAR: &str = "ORIGINALITY_API_KEY";

/// Environment variable holding the polishing (chat-completion) key
pub const POLISH_KEY_VAR: &str = "API_KEY_1";

/// Optional override of the chat-completion base URL
pub const POLISH_BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Version sequence used when none is configured
pub const DEFAULT_VERSIONS: &str = "original,rep1,rep2,rep3";

/// One textual rendition of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    /// The cleaned source text
    Original,
    /// Output of polishing repetition N (1-based)
    Repetition(u32),
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Original => f.write_str("original"),
            Version::Repetition(n) => write!(f, "rep{}", n),
        }
    }
}

impl FromStr for Version {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "original" {
            return Ok(Version::Original);
        }
        s.strip_prefix("rep")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(Version::Repetition)
            .ok_or_else(|| PipelineError::Config(format!("Invalid version label: '{}'", s)))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a comma-separated version sequence (e.g. "original,rep1,rep2").
pub fn parse_versions(list: &str) -> Result<Vec<Version>> {
    let versions = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(Version::from_str)
        .collect::<Result<Vec<_>>>()?;

    if versions.is_empty() {
        return Err(PipelineError::Config("Version list is empty".to_string()));
    }
    Ok(versions)
}

/// Key of one article variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub article_id: u32,
    pub version: Version,
}

impl VariantKey {
    pub fn new(article_id: u32, version: Version) -> Self {
        Self { article_id, version }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}/{}", self.article_id, self.version)
    }
}

/// Directory layout of a study
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir().join("metadata.json")
    }

    /// Default location of the article sheet (CSV export)
    pub fn sheet_path(&self) -> PathBuf {
        self.data_dir().join("writing_polish_rcds.csv")
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.root.join("outputs")
    }

    pub fn polished_dir(&self) -> PathBuf {
        self.outputs_dir().join("polished_articles")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    /// Cleaned original text of an article
    pub fn original_text(&self, article_id: u32) -> PathBuf {
        self.data_dir().join(format!("article_{:03}.txt", article_id))
    }

    /// Polished text of one repetition
    pub fn polished_text(&self, repetition: u32, article_id: u32) -> PathBuf {
        self.polished_dir()
            .join(format!("rep{}", repetition))
            .join(format!("output_{:03}.txt", article_id))
    }

    /// Source text of a variant
    pub fn text_path(&self, key: VariantKey) -> PathBuf {
        match key.version {
            Version::Original => self.original_text(key.article_id),
            Version::Repetition(n) => self.polished_text(n, key.article_id),
        }
    }

    pub fn token_usage_log(&self) -> PathBuf {
        self.polished_dir().join("token_usage.log")
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(".")
    }
}

/// API credentials read once at process start
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub gptzero: Option<String>,
    pub originality: Option<String>,
    pub polish: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self {
            gptzero: read_env(GPTZERO_KEY_VAR),
            originality: read_env(ORIGINALITY_KEY_VAR),
            polish: read_env(POLISH_KEY_VAR),
        }
    }

    /// The polishing key is required up front.
    pub fn require_polish(&self) -> Result<&str> {
        self.polish.as_deref().ok_or_else(|| {
            PipelineError::Config(format!(
                "API key not found. Please set {} in the environment.",
                POLISH_KEY_VAR
            ))
        })
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Chat-completion base URL, honouring `OPENAI_BASE_URL`
pub fn polish_base_url() -> Option<String> {
    read_env(POLISH_BASE_URL_VAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_roundtrip_labels() {
        assert_eq!(Version::Original.to_string(), "original");
        assert_eq!(Version::Repetition(3).to_string(), "rep3");
        assert_eq!("rep12".parse::<Version>().ok(), Some(Version::Repetition(12)));
        assert_eq!(" original ".parse::<Version>().ok(), Some(Version::Original));
    }

    #[test]
    fn test_version_rejects_garbage() {
        assert!("rep0".parse::<Version>().is_err());
        assert!("repx".parse::<Version>().is_err());
        assert!("polished".parse::<Version>().is_err());
    }

    #[test]
    fn test_parse_versions_keeps_order() -> Result<()> {
        let versions = parse_versions("rep2,original,rep1")?;
        assert_eq!(
            versions,
            vec![Version::Repetition(2), Version::Original, Version::Repetition(1)]
        );
        assert!(parse_versions(" , ").is_err());
        Ok(())
    }

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/study");
        assert_eq!(
            layout.text_path(VariantKey::new(7, Version::Original)),
            PathBuf::from("/study/data/article_007.txt")
        );
        assert_eq!(
            layout.text_path(VariantKey::new(12, Version::Repetition(2))),
            PathBuf::from("/study/outputs/polished_articles/rep2/output_012.txt")
        );
    }
}
