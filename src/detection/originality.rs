//! Originality.ai API client.
//!
//! Only the AI scan is enabled; plagiarism, readability and grammar scans are
//! switched off in every request.

use super::{Detector, Reply};
use crate::error::{OptionExt, PipelineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Originality.ai scan endpoint
pub const ORIGINALITY_API_URL: &str = "https://api.originality.ai/api/v2/scan";

/// AI model selector sent with every scan
const AI_MODEL: &str = "turbo";

/// AI/Original classification and confidence pair; `None` when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalityVerdict {
    pub ai_classification: Option<f64>,
    pub original_classification: Option<f64>,
    pub ai_confidence: Option<f64>,
    pub original_confidence: Option<f64>,
    pub error: Option<String>,
}

impl OriginalityVerdict {
    /// "AI" or "Original" by classification flag, "N/A" if neither is set
    pub fn label(&self) -> &'static str {
        if self.ai_classification.is_some_and(|v| v >= 1.0) {
            "AI"
        } else if self.original_classification.is_some_and(|v| v >= 1.0) {
            "Original"
        } else {
            crate::registry::NOT_AVAILABLE
        }
    }
}

/// Originality.ai API client
pub struct OriginalityClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OriginalityClient {
    /// Create a new client. A missing key only fails once a request is needed.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: ORIGINALITY_API_URL.to_string(),
            api_key,
        })
    }

    /// Point the client at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Detector for OriginalityClient {
    type Verdict = OriginalityVerdict;

    fn name(&self) -> &'static str {
        "originality"
    }

    fn cache_dir(&self) -> &'static str {
        "originalityai_responses"
    }

    async fn detect(&self, text: &str) -> Result<Reply> {
        if text.trim().is_empty() {
            return Ok(Reply::failure("Text content is empty"));
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_config("ORIGINALITY_API_KEY is not set")?;

        let payload = serde_json::json!({
            "content": text,
            "storeScan": false,
            "aiModel": AI_MODEL,
            "scan_ai": true,
            "scan_plag": false,
            "scan_readability": false,
            "scan_grammar_spelling": false,
        });

        debug!(chars = text.len(), "Sending Originality.ai request");

        let response = match self
            .client
            .post(&self.endpoint)
            .header("X-OAI-API-KEY", api_key)
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Originality.ai request failed");
                return Ok(Reply::failure(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Originality.ai API error");
            return Ok(Reply::failure(format!("HTTP {}: {}", status, body)));
        }

        match response.json::<Value>().await {
            Ok(body) => Ok(Reply::Success(body)),
            Err(e) => {
                warn!(error = %e, "Failed to parse Originality.ai response");
                Ok(Reply::failure(e.to_string()))
            }
        }
    }

    fn verdict(&self, reply: &Reply) -> Result<OriginalityVerdict> {
        match reply {
            Reply::Success(body) => Ok(parse_verdict(body)),
            Reply::Failure { error } => Ok(OriginalityVerdict {
                error: Some(error.clone()),
                ..Default::default()
            }),
        }
    }
}

/// Read `ai.classification.{AI,Original}` and `ai.confidence.{AI,Original}`
fn parse_verdict(body: &Value) -> OriginalityVerdict {
    let ai = &body["ai"];
    let number = |section: &str, key: &str| ai[section][key].as_f64();

    OriginalityVerdict {
        ai_classification: number("classification", "AI"),
        original_classification: number("classification", "Original"),
        ai_confidence: number("confidence", "AI"),
        original_confidence: number("confidence", "Original"),
        error: None,
    }
}
