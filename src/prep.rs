//! Data preparation: citation clean-up and article extraction from the study sheet.
//!
//! The sheet is read from its CSV export. Each row becomes one article with a
//! 1-based id, a cleaned text file and a metadata entry.

use crate::config::Layout;
use crate::error::{OptionExt, Result};
use crate::registry::{ArticleMeta, Location, Registry};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{error, info};

fn citation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(\s)").expect("citation pattern is valid"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"))
}

/// Clean inline citation numbers out of an article.
///
/// - A run of digits directly followed by whitespace is dropped (the whitespace stays),
///   so `"Smith2 et al."` becomes `"Smith et al."`.
/// - Runs of two or more whitespace characters collapse to one space.
/// - Leading/trailing whitespace is trimmed.
///
/// Digits followed by anything else (punctuation, end of text) are left alone,
/// but any digit run before whitespace goes: `"version2.0 released"` becomes
/// `"version2. released"`.
pub fn normalize(text: &str) -> String {
    let without_citations = citation_regex().replace_all(text, "$1");
    let collapsed = whitespace_regex().replace_all(&without_citations, " ");
    collapsed.trim().to_string()
}

/// One article row of the study sheet
#[derive(Debug, Clone)]
pub struct SheetArticle {
    pub title: String,
    pub year: Option<i32>,
    pub group: String,
    pub authors: Vec<String>,
    pub original: String,
}

/// Read the article sheet (CSV export). `Original`, `Title`, `Year` and `GRP` are required.
pub fn read_sheet(path: &Path) -> Result<Vec<SheetArticle>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let original_col = column("Original").ok_or_config("Sheet is missing the 'Original' column")?;
    let title_col = column("Title").ok_or_config("Sheet is missing the 'Title' column")?;
    let year_col = column("Year").ok_or_config("Sheet is missing the 'Year' column")?;
    let group_col = column("GRP").ok_or_config("Sheet is missing the 'GRP' column")?;
    let authors_col = column("Authors");

    let mut articles = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        articles.push(SheetArticle {
            title: field(title_col),
            year: parse_year(&field(year_col)),
            group: field(group_col),
            authors: authors_col
                .map(|idx| split_authors(&field(idx)))
                .unwrap_or_default(),
            original: field(original_col),
        });
    }

    info!(path = %path.display(), count = articles.len(), "Loaded articles from sheet");
    Ok(articles)
}

/// Parse a sheet year cell ("2020", "2020.0")
pub fn parse_year(cell: &str) -> Option<i32> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|y| y.is_finite())
        .map(|y| y as i32)
}

fn split_authors(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Clean every sheet article, write `data/article_NNN.txt` and `data/metadata.json`.
pub fn prepare(layout: &Layout, sheet: &Path) -> Result<Registry> {
    info!("Data preparation step started...");
    std::fs::create_dir_all(layout.data_dir())?;

    let articles = read_sheet(sheet)?;
    let mut registry = Registry::new();

    for (idx, article) in articles.into_iter().enumerate() {
        let article_id = (idx + 1) as u32;

        registry.insert(
            article_id,
            ArticleMeta {
                title: article.title,
                year: article.year,
                location: Location::from_group_code(&article.group).as_str().to_string(),
                authors: article.authors,
            },
        );

        let cleaned = normalize(&article.original);
        let path = layout.original_text(article_id);
        match std::fs::write(&path, cleaned) {
            Ok(()) => info!(path = %path.display(), "Cleaned text saved"),
            Err(e) => error!(path = %path.display(), error = %e, "Error saving cleaned text"),
        }
    }

    if let Err(e) = registry.save(&layout.metadata_path()) {
        error!(path = %layout.metadata_path().display(), error = %e, "Error saving metadata");
    }

    Ok(registry)
}

/// Run data preparation, or load the existing registry when `skip` is set.
pub fn load_or_prepare(layout: &Layout, sheet: &Path, skip: bool) -> Result<Registry> {
    if skip {
        info!("Skipping data preparation step. Loading pre-existing cleaned data...");
        Registry::load(&layout.metadata_path())
    } else {
        prepare(layout, sheet)
    }
}
