//! GPTZero API client.
//!
//! `POST /v2/predict/text` with `{document, multilingual}` and an `x-api-key`
//! header. The verdict comes from the first entry of `documents`.

use super::{round3, Detector, Reply};
use crate::error::{OptionExt, PipelineError, Result};
use crate::registry::NOT_AVAILABLE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// GPTZero prediction endpoint
pub const GPTZERO_API_URL: &str = "https://api.gptzero.me/v2/predict/text";

/// Scores read from a GPTZero reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GptZeroVerdict {
    pub completely_generated_prob: f64,
    pub human_prob: f64,
    pub ai_prob: f64,
    pub mixed_prob: f64,
    pub predicted_class: String,
    pub confidence_category: String,
    pub error: Option<String>,
}

impl Default for GptZeroVerdict {
    fn default() -> Self {
        Self {
            completely_generated_prob: 0.0,
            human_prob: 0.0,
            ai_prob: 0.0,
            mixed_prob: 0.0,
            predicted_class: NOT_AVAILABLE.to_string(),
            confidence_category: NOT_AVAILABLE.to_string(),
            error: None,
        }
    }
}

/// GPTZero API client
pub struct GptZeroClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GptZeroClient {
    /// Create a new client. A missing key only fails once a request is needed.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: GPTZERO_API_URL.to_string(),
            api_key,
        })
    }

    /// Point the client at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Detector for GptZeroClient {
    type Verdict = GptZeroVerdict;

    fn name(&self) -> &'static str {
        "gptzero"
    }

    fn cache_dir(&self) -> &'static str {
        "gptzero_responses"
    }

    async fn detect(&self, text: &str) -> Result<Reply> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_config("GPTZERO_API_KEY is not set")?;

        let payload = serde_json::json!({
            "document": text,
            "multilingual": false,
        });

        debug!(chars = text.len(), "Sending GPTZero request");

        let response = match self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "GPTZero request failed");
                return Ok(Reply::failure(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "GPTZero API error");
            return Ok(Reply::failure(format!(
                "HTTP {} for url: {}",
                status, self.endpoint
            )));
        }

        match response.json::<Value>().await {
            Ok(body) => Ok(Reply::Success(body)),
            Err(e) => {
                warn!(error = %e, "Failed to parse GPTZero response");
                Ok(Reply::failure(e.to_string()))
            }
        }
    }

    fn verdict(&self, reply: &Reply) -> Result<GptZeroVerdict> {
        match reply {
            Reply::Success(body) => parse_verdict(body),
            Reply::Failure { error } => Ok(GptZeroVerdict {
                error: Some(error.clone()),
                ..Default::default()
            }),
        }
    }
}

// === GPTZero API Response Types ===

#[derive(Debug, Deserialize)]
struct GptZeroResponse {
    #[serde(default)]
    documents: Vec<GptZeroDocument>,
}

#[derive(Debug, Deserialize)]
struct GptZeroDocument {
    #[serde(default)]
    class_probabilities: Option<ClassProbabilities>,
    #[serde(default)]
    completely_generated_prob: Option<f64>,
    #[serde(default)]
    predicted_class: Option<String>,
    #[serde(default)]
    confidence_category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClassProbabilities {
    #[serde(default)]
    human: Option<f64>,
    #[serde(default)]
    ai: Option<f64>,
    #[serde(default)]
    mixed: Option<f64>,
}

/// Parse a GPTZero body, defaulting absent fields to 0.0 / "N/A"
fn parse_verdict(body: &Value) -> Result<GptZeroVerdict> {
    let response: GptZeroResponse = serde_json::from_value(body.clone())?;

    let Some(doc) = response.documents.into_iter().next() else {
        return Ok(GptZeroVerdict::default());
    };

    let probs = doc.class_probabilities;
    let prob = |pick: fn(&ClassProbabilities) -> Option<f64>| {
        round3(probs.as_ref().and_then(pick).unwrap_or(0.0))
    };

    Ok(GptZeroVerdict {
        completely_generated_prob: round3(doc.completely_generated_prob.unwrap_or(0.0)),
        human_prob: prob(|p| p.human),
        ai_prob: prob(|p| p.ai),
        mixed_prob: prob(|p| p.mixed),
        predicted_class: doc
            .predicted_class
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        confidence_category: doc
            .confidence_category
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn sample_body() -> Value {
        json!({
            "documents": [{
                "class_probabilities": {"human": 0.10234, "ai": 0.85011, "mixed": 0.04761},
                "completely_generated_prob": 0.91276,
                "predicted_class": "ai",
                "confidence_category": "high"
            }]
        })
    }

    #[test]
    fn test_parse_verdict() -> Result<()> {
        let verdict = parse_verdict(&sample_body())?;
        assert_eq!(verdict.completely_generated_prob, 0.913);
        assert_eq!(verdict.human_prob, 0.102);
        assert_eq!(verdict.ai_prob, 0.85);
        assert_eq!(verdict.mixed_prob, 0.048);
        assert_eq!(verdict.predicted_class, "ai");
        assert_eq!(verdict.confidence_category, "high");
        Ok(())
    }

    #[test]
    fn test_parse_verdict_defaults() -> Result<()> {
        let verdict = parse_verdict(&json!({}))?;
        assert_eq!(verdict, GptZeroVerdict::default());

        let partial = parse_verdict(&json!({"documents": [{"predicted_class": "human"}]}))?;
        assert_eq!(partial.predicted_class, "human");
        assert_eq!(partial.confidence_category, NOT_AVAILABLE);
        assert_eq!(partial.ai_prob, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_detect_success() -> Result<()> {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/predict/text")
            .match_header("x-api-key", "test-key")
            .match_body(Matcher::Json(json!({
                "document": "Some letter.",
                "multilingual": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(sample_body().to_string())
            .expect(1)
            .create_async()
            .await;

        let client = GptZeroClient::new(Some("test-key".to_string()))?
            .with_endpoint(format!("{}/v2/predict/text", server.url()));

        let reply = client.detect("Some letter.").await?;
        assert_eq!(reply, Reply::Success(sample_body()));
        assert_eq!(client.verdict(&reply)?.predicted_class, "ai");

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_http_500_becomes_failure_reply() -> Result<()> {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/predict/text")
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create_async()
            .await;

        let client = GptZeroClient::new(Some("k".to_string()))?
            .with_endpoint(format!("{}/v2/predict/text", server.url()));

        let reply = client.detect("text").await?;
        match &reply {
            Reply::Failure { error } => assert!(error.contains("500")),
            other => panic!("expected failure, got {:?}", other),
        }

        let verdict = client.verdict(&reply)?;
        assert_eq!(verdict.predicted_class, NOT_AVAILABLE);
        assert!(verdict.error.is_some());

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_connection_refused_becomes_failure_reply() -> Result<()> {
        let client = GptZeroClient::new(Some("k".to_string()))?
            .with_endpoint("http://127.0.0.1:1/v2/predict/text");

        let reply = client.detect("Some letter.").await?;
        assert!(matches!(reply, Reply::Failure { .. }));

        let verdict = client.verdict(&reply)?;
        assert_eq!(verdict.predicted_class, NOT_AVAILABLE);
        assert!(verdict.error.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() -> Result<()> {
        let client = GptZeroClient::new(None)?;
        let err = client.detect("text").await;
        assert!(matches!(err, Err(PipelineError::Config(_))));
        Ok(())
    }
}
