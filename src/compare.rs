//! Metrics for sheets that already carry a polished column.
//!
//! Each sheet row yields two rows: one for `Original` and one for `Polished`
//! (version label `excel_polished`).

use crate::error::{OptionExt, Result};
use crate::export::na;
use crate::metrics::{MetricsCalculator, MetricsRecord};
use crate::prep::parse_year;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const ORIGINAL_LABEL: &str = "original";
pub const SHEET_POLISHED_LABEL: &str = "excel_polished";

/// Metrics of one text of a comparison sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub article_id: u32,
    pub title: String,
    #[serde(with = "na")]
    pub year: Option<i32>,
    pub location: String,
    pub version: String,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub smog_index: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub avg_sentence_length: f64,
    pub complex_word_percentage: f64,
    pub lexical_density: f64,
    pub passive_voice_percentage: f64,
}

impl ComparisonRow {
    fn new(article_id: u32, pair: &SheetPair, version: &str, m: MetricsRecord) -> Self {
        Self {
            article_id,
            title: pair.title.clone(),
            year: pair.year,
            location: pair.location.clone(),
            version: version.to_string(),
            flesch_reading_ease: m.flesch_reading_ease,
            flesch_kincaid_grade: m.flesch_kincaid_grade,
            smog_index: m.smog_index,
            automated_readability_index: m.automated_readability_index,
            coleman_liau_index: m.coleman_liau_index,
            avg_sentence_length: m.avg_sentence_length,
            complex_word_percentage: m.complex_word_percentage,
            lexical_density: m.lexical_density,
            passive_voice_percentage: m.passive_voice_percentage,
        }
    }
}

struct SheetPair {
    title: String,
    year: Option<i32>,
    location: String,
    original: String,
    polished: String,
}

fn read_pairs(path: &Path) -> Result<Vec<SheetPair>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let original_col = column("Original")
        .ok_or_config("Sheet must contain 'Original' and 'Polished' columns")?;
    let polished_col = column("Polished")
        .ok_or_config("Sheet must contain 'Original' and 'Polished' columns")?;
    let title_col = column("Title");
    let year_col = column("Year");
    let group_col = column("GRP");

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_string);

        pairs.push(SheetPair {
            title: field(title_col).unwrap_or_else(|| "Unknown Title".to_string()),
            year: field(year_col).as_deref().and_then(parse_year),
            location: field(group_col)
                .unwrap_or_else(|| "Unknown".to_string())
                .to_uppercase(),
            original: field(Some(original_col)).unwrap_or_default(),
            polished: field(Some(polished_col)).unwrap_or_default(),
        });
    }
    Ok(pairs)
}

/// Measure the `Original` and `Polished` text of every sheet row
pub fn compare_sheet(calculator: &MetricsCalculator, sheet: &Path) -> Result<Vec<ComparisonRow>> {
    info!(path = %sheet.display(), "Starting combined readability analysis");

    let pairs = read_pairs(sheet)?;
    let mut rows = Vec::with_capacity(pairs.len() * 2);

    for (idx, pair) in pairs.iter().enumerate() {
        let article_id = (idx + 1) as u32;
        rows.push(ComparisonRow::new(
            article_id,
            pair,
            ORIGINAL_LABEL,
            calculator.measure(&pair.original),
        ));
        rows.push(ComparisonRow::new(
            article_id,
            pair,
            SHEET_POLISHED_LABEL,
            calculator.measure(&pair.polished),
        ));
    }

    info!(articles = pairs.len(), rows = rows.len(), "Sheet comparison complete");
    Ok(rows)
}
