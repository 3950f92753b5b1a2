//! Custom error types for rustpolish.
//!
//! This module defines all error types used throughout the pipeline.
//! All functions return `Result<T, PipelineError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for rustpolish operations.
///
/// Detector transport failures never show up here: they are folded into
/// [`crate::detection::Reply::Failure`] at the client boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// External API returned an error
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message or response body
        message: String,
    },

    /// Polishing call failed for one article
    #[error("Polishing request failed: {source}")]
    Polish {
        #[source]
        source: Box<PipelineError>,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error (missing key, missing column, unknown prompt version)
    #[error("Config error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl PipelineError {
    /// Wrap an error raised while polishing an article.
    pub fn polish(source: PipelineError) -> Self {
        PipelineError::Polish {
            source: Box::new(source),
        }
    }
}

/// Result type alias using `PipelineError`
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a configuration error message
    fn ok_or_config(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_config(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| PipelineError::Config(msg.to_string()))
    }
}
