//! Per-article, per-version result collection.
//!
//! The [`Aggregator`] walks the registry in order and, for each article, the
//! configured version sequence. Variants whose source text is missing are
//! skipped with a warning; nothing is zero-filled.

use crate::cache::ResultCache;
use crate::config::{Layout, VariantKey, Version};
use crate::detection::{Detector, GptZeroVerdict, OriginalityVerdict, Reply};
use crate::error::Result;
use crate::export::na;
use crate::metrics::{text::letter_length, MetricsCalculator, MetricsRecord};
use crate::registry::{ArticleMeta, Registry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Rows that belong to one article variant
pub trait VariantRow {
    fn variant(&self) -> VariantKey;
}

/// Metadata and metrics of one (article, version)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityRow {
    pub article_id: u32,
    pub title: String,
    #[serde(with = "na")]
    pub year: Option<i32>,
    pub location: String,
    pub authors: String,
    pub version: Version,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub smog_index: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub avg_sentence_length: f64,
    pub complex_word_percentage: f64,
    pub lexical_density: f64,
    pub passive_voice_percentage: f64,
    pub letter_count: usize,
}

impl ReadabilityRow {
    pub fn new(key: VariantKey, meta: &ArticleMeta, m: MetricsRecord) -> Self {
        Self {
            article_id: key.article_id,
            title: meta.title.clone(),
            year: meta.year,
            location: meta.location.clone(),
            authors: meta.authors_display(),
            version: key.version,
            flesch_reading_ease: m.flesch_reading_ease,
            flesch_kincaid_grade: m.flesch_kincaid_grade,
            smog_index: m.smog_index,
            automated_readability_index: m.automated_readability_index,
            coleman_liau_index: m.coleman_liau_index,
            avg_sentence_length: m.avg_sentence_length,
            complex_word_percentage: m.complex_word_percentage,
            lexical_density: m.lexical_density,
            passive_voice_percentage: m.passive_voice_percentage,
            letter_count: m.letter_count,
        }
    }

    pub fn metrics(&self) -> MetricsRecord {
        MetricsRecord {
            flesch_reading_ease: self.flesch_reading_ease,
            flesch_kincaid_grade: self.flesch_kincaid_grade,
            smog_index: self.smog_index,
            automated_readability_index: self.automated_readability_index,
            coleman_liau_index: self.coleman_liau_index,
            avg_sentence_length: self.avg_sentence_length,
            complex_word_percentage: self.complex_word_percentage,
            lexical_density: self.lexical_density,
            passive_voice_percentage: self.passive_voice_percentage,
            letter_count: self.letter_count,
        }
    }
}

impl VariantRow for ReadabilityRow {
    fn variant(&self) -> VariantKey {
        VariantKey::new(self.article_id, self.version)
    }
}

/// GPTZero verdict of one (article, version)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptZeroRow {
    pub article_id: u32,
    pub title: String,
    pub authors: String,
    #[serde(with = "na")]
    pub year: Option<i32>,
    pub location: String,
    pub version: Version,
    pub completely_generated_prob: f64,
    pub human_prob: f64,
    pub ai_prob: f64,
    pub mixed_prob: f64,
    pub predicted_class: String,
    pub confidence_category: String,
    pub letter_length: usize,
    pub error: Option<String>,
}

impl GptZeroRow {
    pub fn new(key: VariantKey, meta: &ArticleMeta, v: GptZeroVerdict, letter_length: usize) -> Self {
        Self {
            article_id: key.article_id,
            title: meta.title.clone(),
            authors: meta.authors_display(),
            year: meta.year,
            location: meta.location.clone(),
            version: key.version,
            completely_generated_prob: v.completely_generated_prob,
            human_prob: v.human_prob,
            ai_prob: v.ai_prob,
            mixed_prob: v.mixed_prob,
            predicted_class: v.predicted_class,
            confidence_category: v.confidence_category,
            letter_length,
            error: v.error,
        }
    }
}

impl VariantRow for GptZeroRow {
    fn variant(&self) -> VariantKey {
        VariantKey::new(self.article_id, self.version)
    }
}

/// Originality.ai verdict of one (article, version)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalityRow {
    pub article_id: u32,
    pub title: String,
    pub authors: String,
    #[serde(with = "na")]
    pub year: Option<i32>,
    pub location: String,
    pub version: Version,
    #[serde(with = "na")]
    pub ai_classification: Option<f64>,
    #[serde(with = "na")]
    pub original_classification: Option<f64>,
    #[serde(with = "na")]
    pub ai_confidence: Option<f64>,
    #[serde(with = "na")]
    pub original_confidence: Option<f64>,
    pub letter_length: usize,
    pub error: Option<String>,
}

impl OriginalityRow {
    pub fn new(
        key: VariantKey,
        meta: &ArticleMeta,
        v: OriginalityVerdict,
        letter_length: usize,
    ) -> Self {
        Self {
            article_id: key.article_id,
            title: meta.title.clone(),
            authors: meta.authors_display(),
            year: meta.year,
            location: meta.location.clone(),
            version: key.version,
            ai_classification: v.ai_classification,
            original_classification: v.original_classification,
            ai_confidence: v.ai_confidence,
            original_confidence: v.original_confidence,
            letter_length,
            error: v.error,
        }
    }
}

impl VariantRow for OriginalityRow {
    fn variant(&self) -> VariantKey {
        VariantKey::new(self.article_id, self.version)
    }
}

/// One (article, version, detector) row of the combined detection table.
///
/// `ai_score` is GPTZero's completely-generated probability or Originality's AI
/// confidence; `human_score` is GPTZero's human probability or Originality's
/// original confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRow {
    pub article_id: u32,
    pub title: String,
    #[serde(with = "na")]
    pub year: Option<i32>,
    pub location: String,
    pub version: Version,
    pub detector: String,
    pub predicted_class: String,
    #[serde(with = "na")]
    pub ai_score: Option<f64>,
    #[serde(with = "na")]
    pub human_score: Option<f64>,
    pub letter_length: usize,
    pub error: Option<String>,
}

impl From<&GptZeroRow> for DetectionRow {
    fn from(r: &GptZeroRow) -> Self {
        Self {
            article_id: r.article_id,
            title: r.title.clone(),
            year: r.year,
            location: r.location.clone(),
            version: r.version,
            detector: "gptzero".to_string(),
            predicted_class: r.predicted_class.clone(),
            ai_score: Some(r.completely_generated_prob),
            human_score: Some(r.human_prob),
            letter_length: r.letter_length,
            error: r.error.clone(),
        }
    }
}

impl From<&OriginalityRow> for DetectionRow {
    fn from(r: &OriginalityRow) -> Self {
        let label = OriginalityVerdict {
            ai_classification: r.ai_classification,
            original_classification: r.original_classification,
            ..Default::default()
        }
        .label();

        Self {
            article_id: r.article_id,
            title: r.title.clone(),
            year: r.year,
            location: r.location.clone(),
            version: r.version,
            detector: "originality".to_string(),
            predicted_class: label.to_string(),
            ai_score: r.ai_confidence,
            human_score: r.original_confidence,
            letter_length: r.letter_length,
            error: r.error.clone(),
        }
    }
}

impl VariantRow for DetectionRow {
    fn variant(&self) -> VariantKey {
        VariantKey::new(self.article_id, self.version)
    }
}

/// Output of the detection workflow
#[derive(Debug, Clone, Default)]
pub struct DetectionTables {
    pub gptzero: Vec<GptZeroRow>,
    pub originality: Vec<OriginalityRow>,
    /// Long form, GPTZero before Originality within each variant
    pub combined: Vec<DetectionRow>,
}

/// Order rows by registry id, then by configured version.
///
/// Rows of the same variant keep their relative order; rows whose variant is
/// not in the registry × versions grid are dropped.
pub fn reorder<R: VariantRow>(rows: Vec<R>, registry: &Registry, versions: &[Version]) -> Vec<R> {
    let mut by_key: HashMap<VariantKey, Vec<R>> = HashMap::new();
    for row in rows {
        by_key.entry(row.variant()).or_default().push(row);
    }

    let mut ordered = Vec::new();
    for article_id in registry.ids() {
        for version in versions {
            if let Some(group) = by_key.remove(&VariantKey::new(article_id, *version)) {
                ordered.extend(group);
            }
        }
    }
    ordered
}

/// Drives the readability and detection workflows over registry × versions
pub struct Aggregator<'a> {
    layout: &'a Layout,
    registry: &'a Registry,
    versions: Vec<Version>,
}

impl<'a> Aggregator<'a> {
    pub fn new(layout: &'a Layout, registry: &'a Registry, versions: Vec<Version>) -> Self {
        Self {
            layout,
            registry,
            versions,
        }
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Existing variants with their metadata and text, in processing order
    fn variants(&self) -> Vec<(VariantKey, &'a ArticleMeta, String)> {
        let mut out = Vec::new();
        for (article_id, meta) in self.registry.iter() {
            info!(article_id, "Processing article");
            for version in &self.versions {
                let key = VariantKey::new(article_id, *version);
                let path = self.layout.text_path(key);
                if !path.exists() {
                    warn!(article_id, version = %version, "Text file not found, skipping");
                    continue;
                }
                match std::fs::read_to_string(&path) {
                    Ok(text) => out.push((key, meta, text)),
                    Err(e) => {
                        error!(article_id, version = %version, path = %path.display(), error = %e, "Failed to read text");
                    }
                }
            }
        }
        out
    }

    /// Metrics for every existing variant
    pub fn readability(&self, calculator: &MetricsCalculator) -> Vec<ReadabilityRow> {
        let rows: Vec<ReadabilityRow> = self
            .variants()
            .into_iter()
            .map(|(key, meta, text)| ReadabilityRow::new(key, meta, calculator.measure(&text)))
            .collect();

        info!(rows = rows.len(), "Readability assessment complete");
        rows
    }

    /// Both detectors for every existing variant, served from the cache when possible.
    ///
    /// Detector failures are kept as rows with default fields and an error;
    /// only configuration errors and unreadable cache files abort.
    pub async fn detection<G, O>(
        &self,
        cache: &ResultCache,
        gptzero: &G,
        originality: &O,
    ) -> Result<DetectionTables>
    where
        G: Detector<Verdict = GptZeroVerdict>,
        O: Detector<Verdict = OriginalityVerdict>,
    {
        let mut tables = DetectionTables::default();

        for (key, meta, text) in self.variants() {
            let letters = letter_length(&text);

            let reply = cache.fetch(gptzero, key, &text).await?;
            if let Reply::Failure { error } = &reply {
                warn!(detector = gptzero.name(), variant = %key, error = %error, "Detection failed");
            }
            let verdict = gptzero.verdict(&reply)?;
            tables.gptzero.push(GptZeroRow::new(key, meta, verdict, letters));

            let reply = cache.fetch(originality, key, &text).await?;
            if let Reply::Failure { error } = &reply {
                warn!(detector = originality.name(), variant = %key, error = %error, "Detection failed");
            }
            let verdict = originality.verdict(&reply)?;
            tables
                .originality
                .push(OriginalityRow::new(key, meta, verdict, letters));
        }

        let gptzero_rows = reorder(tables.gptzero, self.registry, &self.versions);
        let originality_rows = reorder(tables.originality, self.registry, &self.versions);

        let combined = gptzero_rows
            .iter()
            .map(DetectionRow::from)
            .chain(originality_rows.iter().map(DetectionRow::from))
            .collect();

        info!(
            gptzero = gptzero_rows.len(),
            originality = originality_rows.len(),
            "AI detection complete"
        );

        Ok(DetectionTables {
            combined: reorder(combined, self.registry, &self.versions),
            gptzero: gptzero_rows,
            originality: originality_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{GptZeroClient, OriginalityClient};
    use mockito::Server;
    use serde_json::json;
    use tempfile::TempDir;

    fn meta(title: &str) -> ArticleMeta {
        ArticleMeta {
            title: title.to_string(),
            year: Some(2020),
            location: "USA".to_string(),
            authors: Vec::new(),
        }
    }

    /// Registry [3, 1, 2]; originals for all, rep1 only for 3 and 2
    fn fixture() -> Result<(TempDir, Layout, Registry)> {
        let dir = TempDir::new()?;
        let layout = Layout::new(dir.path());
        let mut registry = Registry::new();
        for id in [3, 1, 2] {
            registry.insert(id, meta(&format!("Letter {}", id)));
            let path = layout.original_text(id);
            std::fs::create_dir_all(path.parent().expect("data dir"))?;
            std::fs::write(&path, format!("Original letter number {}. It was read by all.", id))?;
        }
        for id in [3, 2] {
            let path = layout.polished_text(1, id);
            std::fs::create_dir_all(path.parent().expect("rep dir"))?;
            std::fs::write(&path, format!("Polished letter {}.", id))?;
        }
        Ok((dir, layout, registry))
    }

    fn keys<R: VariantRow>(rows: &[R]) -> Vec<(u32, Version)> {
        rows.iter()
            .map(|r| {
                let k = r.variant();
                (k.article_id, k.version)
            })
            .collect()
    }

    const EXPECTED_ORDER: [(u32, Version); 5] = [
        (3, Version::Original),
        (3, Version::Repetition(1)),
        (1, Version::Original),
        (2, Version::Original),
        (2, Version::Repetition(1)),
    ];

    #[test]
    fn test_readability_skips_missing_and_keeps_order() -> Result<()> {
        let (_dir, layout, registry) = fixture()?;
        let versions = vec![Version::Original, Version::Repetition(1)];
        let aggregator = Aggregator::new(&layout, &registry, versions);

        let rows = aggregator.readability(&MetricsCalculator::new());
        assert_eq!(keys(&rows), EXPECTED_ORDER.to_vec());
        assert_eq!(rows[0].title, "Letter 3");
        assert_eq!(rows[0].authors, "N/A");
        assert!(rows.iter().all(|r| r.letter_count > 0));
        Ok(())
    }

    #[test]
    fn test_reorder_groups_by_registry_then_version() {
        let mut registry = Registry::new();
        for id in [3, 1, 2] {
            registry.insert(id, meta("x"));
        }
        let versions = [Version::Original, Version::Repetition(1)];
        let row_for = |id, v| ReadabilityRow::new(VariantKey::new(id, v), &meta("x"), MetricsRecord::default());

        let shuffled = vec![
            row_for(2, Version::Repetition(1)),
            row_for(1, Version::Original),
            row_for(3, Version::Repetition(1)),
            row_for(2, Version::Original),
            row_for(3, Version::Original),
            row_for(7, Version::Original),
            row_for(1, Version::Repetition(2)),
        ];
        let ordered = reorder(shuffled, &registry, &versions);
        assert_eq!(
            keys(&ordered),
            vec![
                (3, Version::Original),
                (3, Version::Repetition(1)),
                (1, Version::Original),
                (2, Version::Original),
                (2, Version::Repetition(1)),
            ]
        );
    }

    #[tokio::test]
    async fn test_detection_orders_and_caches() -> Result<()> {
        let (dir, layout, registry) = fixture()?;
        let versions = vec![Version::Original, Version::Repetition(1)];

        let mut server = Server::new_async().await;
        let gptzero_mock = server
            .mock("POST", "/v2/predict/text")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"documents": [{
                    "completely_generated_prob": 0.25,
                    "class_probabilities": {"human": 0.75, "ai": 0.2, "mixed": 0.05},
                    "predicted_class": "human",
                    "confidence_category": "medium"
                }]})
                .to_string(),
            )
            .expect(5)
            .create_async()
            .await;
        let originality_mock = server
            .mock("POST", "/api/v2/scan")
            .with_status(500)
            .with_body("overloaded")
            .expect(5)
            .create_async()
            .await;

        let gptzero = GptZeroClient::new(Some("g".to_string()))?
            .with_endpoint(format!("{}/v2/predict/text", server.url()));
        let originality = OriginalityClient::new(Some("o".to_string()))?
            .with_endpoint(format!("{}/api/v2/scan", server.url()));
        let cache = ResultCache::new(layout.outputs_dir());
        let aggregator = Aggregator::new(&layout, &registry, versions);

        let first = aggregator.detection(&cache, &gptzero, &originality).await?;
        let second = aggregator.detection(&cache, &gptzero, &originality).await?;

        assert_eq!(keys(&first.gptzero), EXPECTED_ORDER.to_vec());
        assert_eq!(keys(&first.originality), EXPECTED_ORDER.to_vec());
        assert_eq!(first.combined.len(), 10);
        assert_eq!(first.combined[0].detector, "gptzero");
        assert_eq!(first.combined[1].detector, "originality");
        assert_eq!(first.combined[1].article_id, 3);

        assert_eq!(first.gptzero[0].completely_generated_prob, 0.25);
        assert_eq!(first.gptzero[0].predicted_class, "human");
        assert!(first.originality.iter().all(|r| r.error.is_some() && r.ai_confidence.is_none()));

        assert_eq!(first.gptzero, second.gptzero);
        assert_eq!(first.originality, second.originality);

        assert!(dir
            .path()
            .join("outputs/originalityai_responses/rep1/ai_detection_002.json")
            .exists());

        gptzero_mock.assert_async().await;
        originality_mock.assert_async().await;
        Ok(())
    }
}
