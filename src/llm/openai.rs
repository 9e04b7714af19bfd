//! OpenAI-compatible chat-completions client
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` contract.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::{Config, Message, Result, WayfarerError};
use crate::llm::traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

/// Chat-completions API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Create a client from configuration. Fails when the API key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let endpoint = config.completions_url()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn to_llm_response(response: ChatResponse) -> Result<LLMResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| WayfarerError::llm("Response contained no choices"))?
            .message
            .content
            .unwrap_or_default();

        Ok(LLMResponse {
            content,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model: response.model,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAiClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let options = options.unwrap_or_default();
        let request = ChatRequest {
            model,
            messages,
            temperature: options.temperature,
            seed: options.seed,
            max_tokens: options.max_tokens,
            stop: options.stop.as_deref(),
        };

        debug!(
            model,
            messages = messages.len(),
            endpoint = %self.endpoint,
            "sending chat request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    WayfarerError::llm(format!("Cannot connect to {}", self.endpoint))
                } else if e.is_timeout() {
                    WayfarerError::llm(format!("Request to {} timed out", self.endpoint))
                } else {
                    WayfarerError::from(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(WayfarerError::llm(format!(
                "API error ({}): {}",
                status, detail
            )));
        }

        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| WayfarerError::llm(format!("Failed to parse response: {}", e)))?;

        let response = Self::to_llm_response(chat_response)?;
        if let Some(ref usage) = response.usage {
            debug!(total_tokens = usage.total_tokens, "chat request complete");
        }
        Ok(response)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
