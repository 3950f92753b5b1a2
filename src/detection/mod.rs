//! AI-content detection clients.
//!
//! Each detector turns a text into a [`Reply`]: the raw JSON body on success,
//! or an error description when the request failed. Replies are persisted
//! verbatim by [`crate::cache::ResultCache`] and interpreted into typed verdicts
//! afterwards, so a cached reply and a fresh one are handled identically.
//!
//! - [`gptzero`] - GPTZero `/v2/predict/text`
//! - [`originality`] - Originality.ai `/api/v2/scan`

pub mod gptzero;
pub mod originality;

pub use gptzero::{GptZeroClient, GptZeroVerdict};
pub use originality::{OriginalityClient, OriginalityVerdict};

use crate::error::Result;
use serde_json::Value;

/// Outcome of one detection request
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Response body of a 2xx answer
    Success(Value),
    /// Transport or HTTP failure, never fatal
    Failure { error: String },
}

impl Reply {
    pub fn failure(error: impl Into<String>) -> Self {
        Reply::Failure {
            error: error.into(),
        }
    }

    /// Persisted form: the body itself, or `{"error": "..."}`
    pub fn to_json(&self) -> Value {
        match self {
            Reply::Success(body) => body.clone(),
            Reply::Failure { error } => serde_json::json!({ "error": error }),
        }
    }

    /// Inverse of [`Reply::to_json`]: an object holding nothing but a string
    /// `error` field is a stored failure.
    pub fn from_json(value: Value) -> Self {
        if let Some(obj) = value.as_object() {
            if obj.len() == 1 {
                if let Some(error) = obj.get("error").and_then(Value::as_str) {
                    return Reply::failure(error);
                }
            }
        }
        Reply::Success(value)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failure { .. })
    }
}

/// A billed AI-detection service
#[allow(async_fn_in_trait)]
pub trait Detector {
    /// Typed reading of a reply
    type Verdict;

    /// Short detector name used in exports ("gptzero", "originality")
    fn name(&self) -> &'static str;

    /// Directory under `outputs/` holding this detector's cached replies
    fn cache_dir(&self) -> &'static str;

    /// Submit one text. `Err` only for configuration problems such as a missing key.
    async fn detect(&self, text: &str) -> Result<Reply>;

    /// Interpret a reply, fresh or cached
    fn verdict(&self, reply: &Reply) -> Result<Self::Verdict>;
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
