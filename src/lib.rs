//! # rustpolish
//!
//! LLM polishing study pipeline: polish scholarly letters, score their
//! readability and run them through two AI-content detectors.
//!
//! ## Modules
//!
//! - [`prep`] - Citation clean-up and article extraction from the study sheet
//! - [`registry`] - Ordered article metadata (`data/metadata.json`)
//! - [`metrics`] - Readability and scientific-writing scores
//! - [`detection`] - GPTZero and Originality.ai clients
//! - [`cache`] - Write-once cache of detector replies
//! - [`polish`] - Chat-completion polishing client
//! - [`prompts`] - Versioned polishing prompts
//! - [`aggregate`] - Per-article, per-version result tables
//! - [`export`] - CSV and JSON output
//! - [`compare`] - Metrics for sheets with a polished column
//! - [`summary`] - Box-plot summaries of detector scores
//! - [`config`] - Paths, version labels, API keys
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustpolish::{aggregate::Aggregator, config::{parse_versions, Layout}, metrics::MetricsCalculator, registry::Registry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let layout = Layout::new(".");
//!     let registry = Registry::load(&layout.metadata_path())?;
//!     let versions = parse_versions("original,rep1")?;
//!     let rows = Aggregator::new(&layout, &registry, versions).readability(&MetricsCalculator::new());
//!     println!("Scored {} texts", rows.len());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod cache;
pub mod compare;
pub mod config;
pub mod detection;
pub mod error;
pub mod export;
pub mod metrics;
pub mod polish;
pub mod prep;
pub mod prompts;
pub mod registry;
pub mod summary;

pub use error::{PipelineError, Result};
