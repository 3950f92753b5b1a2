//! LLM-based article polishing.
//!
//! One chat-completion request per article, sent to an OpenAI-compatible
//! endpoint. The answer is returned verbatim.

use crate::error::{PipelineError, Result};
use crate::prompts::{build_polish_prompt, PromptBook};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::ops::AddAssign;
use tracing::{debug, info};

/// Default OpenAI-compatible API base
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model name
pub const DEFAULT_MODEL: &str = "chatgpt-4o-latest";

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub prompt_version: String,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            prompt_version: crate::prompts::DEFAULT_VERSION.to_string(),
        }
    }
}

/// Token usage tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// `timestamp,prompt,completion,total` line for the usage log
    pub fn log_line(&self, timestamp: &str) -> String {
        format!(
            "{},{},{},{}",
            timestamp, self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// OpenAI-compatible API response structures
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

/// Chat-completion client bound to one model and prompt version
pub struct PolishClient {
    client: reqwest::Client,
    config: LlmConfig,
    template: String,
    usage: Cell<TokenUsage>,
}

impl PolishClient {
    /// Build a client. An unknown prompt version is a configuration error.
    pub fn new(config: LlmConfig, prompts: &PromptBook) -> Result<Self> {
        let template = prompts.template(&config.prompt_version)?.to_string();

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            model = %config.model,
            temperature = config.temperature,
            prompt_version = %config.prompt_version,
            "Polishing client initialized"
        );

        Ok(Self {
            client,
            config,
            template,
            usage: Cell::new(TokenUsage::default()),
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Tokens consumed by all successful calls so far
    pub fn token_usage(&self) -> TokenUsage {
        self.usage.get()
    }

    /// Polish one article.
    ///
    /// Empty input is rejected without a request. Request failures come back as
    /// [`PipelineError::Polish`].
    pub async fn polish(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(PipelineError::Validation(
                "The article text is empty and cannot be polished.".to_string(),
            ));
        }

        let (content, usage) = self
            .complete(&build_polish_prompt(&self.template, text))
            .await
            .map_err(PipelineError::polish)?;

        let mut total = self.usage.get();
        total += usage;
        self.usage.set(total);
        Ok(content)
    }

    async fn complete(&self, prompt: &str) -> Result<(String, TokenUsage)> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": self.config.temperature
        });

        let api_url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        debug!(url = %api_url, chars = prompt.len(), "Sending LLM request");

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(PipelineError::Network)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Api {
                code: status.as_u16(),
                message: format!("LLM API error: {} - {}", status, error_text),
            });
        }

        let api_response: ChatCompletionResponse = response.json().await?;

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                PipelineError::Validation("LLM response contained no message".to_string())
            })?;

        Ok((content, usage))
    }
}
