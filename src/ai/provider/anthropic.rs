//! Native Anthropic Messages Client
//!
//! Used only when an Anthropic model points at the official API host.
//! The system prompt travels in the top-level `system` field and the answer
//! is the concatenation of the returned `text` blocks.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::{ChatClient, ChatRequest, WireProtocol, decode_body, join_url};
use crate::constants::llm;
use crate::types::{CodeIntelError, Result};

pub struct AnthropicClient {
    api_key: SecretString,
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CodeIntelError::AiTransport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            endpoint: messages_endpoint(base_url),
            model: model.to_string(),
            client,
        })
    }

    fn build_request(&self, request: &ChatRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: llm::ANTHROPIC_MAX_TOKENS,
            system: request.system.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.user.clone(),
            }],
            temperature: request.temperature,
        }
    }
}

/// `<base>/v1/messages`, or `<base>/messages` when the base already ends in `/v1`
fn messages_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        join_url(base, "messages")
    } else {
        join_url(base, "v1/messages")
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        debug!(
            model = %self.model,
            system_prompt_len = request.system.len(),
            user_prompt_len = request.user.len(),
            temperature = request.temperature,
            "Sending Anthropic messages request"
        );

        let start_time = Instant::now();
        let body = self.build_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", llm::ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API call failed ({}): {}", status.as_u16(), body);
            return Err(CodeIntelError::AiCall {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let response_body: MessagesResponse = decode_body(&raw)?;
        let text = response_body.text();
        if text.is_empty() {
            return Err(CodeIntelError::ResponseParse {
                message: "No text content in Anthropic response".to_string(),
                raw,
            });
        }

        info!(
            "AI call succeeded ({} ms, model: {})",
            start_time.elapsed().as_millis(),
            self.model
        );
        Ok(text)
    }

    fn protocol(&self) -> WireProtocol {
        WireProtocol::AnthropicNative
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}
