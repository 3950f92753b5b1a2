//! rustpolish - LLM polishing study pipeline
//!
//! Polishes the study letters with an LLM, scores readability of every version
//! and submits each version to GPTZero and Originality.ai.
//!
//! ## Usage
//!
//! ```bash
//! rustpolish polish --repetitions 3
//! rustpolish readability --versions original,rep1,rep2,rep3
//! rustpolish detect
//! rustpolish summarize
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rustpolish::{
    aggregate::{Aggregator, GptZeroRow},
    cache::ResultCache,
    compare,
    config::{self, ApiKeys, Layout, DEFAULT_VERSIONS},
    detection::{GptZeroClient, OriginalityClient},
    export,
    metrics::MetricsCalculator,
    polish::{LlmConfig, PolishClient, TokenUsage, DEFAULT_BASE_URL, DEFAULT_MODEL},
    prep,
    prompts::{PromptBook, DEFAULT_VERSION},
    registry::Registry,
    summary,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// LLM polishing study pipeline
#[derive(Parser)]
#[command(name = "rustpolish")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Study root holding data/, outputs/ and results/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the articles and polish them with an LLM
    Polish {
        /// Number of polishing repetitions
        #[arg(long, default_value = "1")]
        repetitions: u32,

        /// Chat-completion model
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Sampling temperature
        #[arg(long, default_value = "0.7")]
        temperature: f64,

        /// Prompt template version
        #[arg(long = "prompt_version", default_value = DEFAULT_VERSION)]
        prompt_version: String,

        /// Reuse data/metadata.json and the cleaned texts
        #[arg(long)]
        skip_data_prep: bool,

        /// Article sheet (CSV export), default data/writing_polish_rcds.csv
        #[arg(long)]
        sheet: Option<PathBuf>,
    },

    /// Readability and scientific-writing metrics for every version
    Readability {
        /// Comma-separated version sequence
        #[arg(long, default_value = DEFAULT_VERSIONS)]
        versions: String,
    },

    /// AI-content detection with GPTZero and Originality.ai
    Detect {
        /// Comma-separated version sequence
        #[arg(long, default_value = DEFAULT_VERSIONS)]
        versions: String,
    },

    /// Metrics for the Original and Polished columns of a sheet
    Compare {
        /// Sheet (CSV export), default data/writing_polish_rcds.csv
        #[arg(long)]
        sheet: Option<PathBuf>,
    },

    /// Summaries of the GPTZero score by location, year and version
    Summarize {
        /// Publication years compared on original texts
        #[arg(long, value_delimiter = ',', default_value = "2020,2024")]
        years: Vec<i32>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    let layout = Layout::new(cli.root);

    match cli.command {
        Commands::Polish {
            repetitions,
            model,
            temperature,
            prompt_version,
            skip_data_prep,
            sheet,
        } => {
            let sheet = sheet.unwrap_or_else(|| layout.sheet_path());
            run_polish(
                &layout,
                repetitions,
                model,
                temperature,
                prompt_version,
                skip_data_prep,
                sheet,
            )
            .await
        }
        Commands::Readability { versions } => run_readability(&layout, &versions),
        Commands::Detect { versions } => run_detection(&layout, &versions).await,
        Commands::Compare { sheet } => {
            let sheet = sheet.unwrap_or_else(|| layout.sheet_path());
            run_compare(&layout, sheet)
        }
        Commands::Summarize { years } => run_summary(&layout, &years),
    }
}

// ============================================================================
// Polishing
// ============================================================================

async fn run_polish(
    layout: &Layout,
    repetitions: u32,
    model: String,
    temperature: f64,
    prompt_version: String,
    skip_data_prep: bool,
    sheet: PathBuf,
) -> Result<()> {
    info!(
        repetitions,
        model = %model,
        temperature,
        prompt_version = %prompt_version,
        skip_data_prep,
        "Starting the polishing workflow"
    );

    let keys = ApiKeys::from_env();
    let api_key = keys.require_polish()?.to_string();

    let registry = prep::load_or_prepare(layout, &sheet, skip_data_prep)
        .context("Data preparation failed")?;

    let config = LlmConfig {
        base_url: config::polish_base_url().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        api_key,
        model,
        temperature,
        prompt_version,
    };
    let client = PolishClient::new(config, &PromptBook::new())?;

    let total = registry.len();
    for rep in 1..=repetitions {
        info!(rep, repetitions, "Starting repetition");
        println!("\n--- Repetition {}/{} ---", rep, repetitions);

        for article_id in registry.ids() {
            let source = layout.original_text(article_id);
            let text = match std::fs::read_to_string(&source) {
                Ok(t) => t,
                Err(e) => {
                    error!(article_id, rep, path = %source.display(), error = %e, "Error reading cleaned text");
                    continue;
                }
            };

            info!(article_id, total, rep, "Polishing article");
            let polished = match client.polish(&text).await {
                Ok(p) => p,
                Err(e) => {
                    error!(article_id, rep, error = %e, "Error processing article");
                    continue;
                }
            };

            let target = layout.polished_text(rep, article_id);
            let written = target
                .parent()
                .map_or(Ok(()), std::fs::create_dir_all)
                .and_then(|_| std::fs::write(&target, polished));
            match written {
                Ok(()) => info!(path = %target.display(), "Polished article saved"),
                Err(e) => error!(article_id, rep, path = %target.display(), error = %e, "Error saving polished article"),
            }
        }
    }

    let usage = client.token_usage();
    append_token_usage(layout, &usage).context("Failed to write token usage log")?;
    println!(
        "Token usage: {} prompt + {} completion = {} total",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    );

    info!("Workflow completed");
    Ok(())
}

fn append_token_usage(layout: &Layout, usage: &TokenUsage) -> Result<()> {
    let path = layout.token_usage_log();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "{}", usage.log_line(&timestamp))?;

    info!(path = %path.display(), total_tokens = usage.total_tokens, "Token usage logged");
    Ok(())
}

// ============================================================================
// Readability & Detection
// ============================================================================

fn run_readability(layout: &Layout, versions: &str) -> Result<()> {
    info!("Starting readability assessment workflow");

    let versions = config::parse_versions(versions)?;
    let registry = Registry::load(&layout.metadata_path())?;
    let calculator = MetricsCalculator::new();

    let rows = Aggregator::new(layout, &registry, versions).readability(&calculator);

    let results = layout.results_dir();
    export::save_json(
        &results.join(export::READABILITY_JSON),
        &export::readability_json(&registry, &rows)?,
    )
    .context("Failed to save readability JSON")?;
    export::save_csv(&results.join(export::READABILITY_CSV), &rows)
        .context("Failed to save readability CSV")?;

    println!("Scored {} texts.", rows.len());
    Ok(())
}

async fn run_detection(layout: &Layout, versions: &str) -> Result<()> {
    info!("Starting AI detection workflow with GPTZero and Originality.ai");

    let versions = config::parse_versions(versions)?;
    let registry = Registry::load(&layout.metadata_path())?;
    let keys = ApiKeys::from_env();

    let gptzero = GptZeroClient::new(keys.gptzero)?;
    let originality = OriginalityClient::new(keys.originality)?;
    let cache = ResultCache::new(layout.outputs_dir());

    let tables = Aggregator::new(layout, &registry, versions)
        .detection(&cache, &gptzero, &originality)
        .await
        .context("AI detection failed")?;

    let results = layout.results_dir();
    export::save_csv(&results.join(export::GPTZERO_CSV), &tables.gptzero)
        .context("Failed to save GPTZero results")?;
    export::save_csv(&results.join(export::ORIGINALITY_CSV), &tables.originality)
        .context("Failed to save Originality.ai results")?;
    export::save_csv(&results.join(export::DETECTION_CSV), &tables.combined)
        .context("Failed to save detection results")?;

    let failures = tables.combined.iter().filter(|r| r.error.is_some()).count();
    println!(
        "Detection rows: {} ({} with errors)",
        tables.combined.len(),
        failures
    );
    Ok(())
}

// ============================================================================
// Sheet Comparison & Summary
// ============================================================================

fn run_compare(layout: &Layout, sheet: PathBuf) -> Result<()> {
    let rows = compare::compare_sheet(&MetricsCalculator::new(), &sheet)
        .with_context(|| format!("Failed to analyze {}", sheet.display()))?;

    export::save_csv(&layout.results_dir().join(export::COMPARISON_CSV), &rows)
        .context("Failed to save comparison results")?;
    Ok(())
}

fn run_summary(layout: &Layout, years: &[i32]) -> Result<()> {
    let path = layout.results_dir().join(export::GPTZERO_CSV);
    let rows: Vec<GptZeroRow> = export::load_csv(&path)
        .with_context(|| format!("Failed to load {} (run `detect` first)", path.display()))?;

    let by_year = summary::by_location_year(&rows, years);
    let by_version = summary::by_location_version(&rows);

    let results = layout.results_dir();
    export::save_csv(&results.join(export::SUMMARY_BY_YEAR_CSV), &by_year)?;
    export::save_csv(&results.join(export::SUMMARY_BY_VERSION_CSV), &by_version)?;

    for row in by_year.iter().chain(by_version.iter()) {
        println!(
            "{:<6} {:<9} n={:<3} median={:.3} q1={:.3} q3={:.3}",
            row.location, row.group, row.n, row.median, row.q1, row.q3
        );
    }
    Ok(())
}
